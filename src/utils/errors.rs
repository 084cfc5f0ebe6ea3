use serde::Deserialize;

/// Type alias for Result with DashboardError
pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DashboardError {
    // Input errors, raised before any network round trip
    #[error("Validation Error: {0}")]
    Validation(String),

    // Wallet errors
    #[error("Please connect your wallet first")]
    WalletNotConnected,
    #[error("Signature Denied: {0}")]
    SignatureDenied(String),

    // Gateway errors, message carried verbatim
    #[error("{0}")]
    Gateway(String),

    // Consent write path
    #[error("Failed to create consent: {0}")]
    ConsentCreationFailed(String),
    #[error("Failed to update consent: {0}")]
    ConsentUpdateFailed(String),

    #[error("Clipboard Error: {0}")]
    Clipboard(String),

    #[error("Configuration Error: {0}")]
    Config(String),
    #[error("Serialization Error: {0}")]
    Serialization(String),
}

impl DashboardError {
    /// Stable tag for logs and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            DashboardError::Validation(_) => "validation_error",
            DashboardError::WalletNotConnected => "wallet_not_connected",
            DashboardError::SignatureDenied(_) => "signature_denied",
            DashboardError::Gateway(_) => "gateway_error",
            DashboardError::ConsentCreationFailed(_) => "consent_creation_failed",
            DashboardError::ConsentUpdateFailed(_) => "consent_update_failed",
            DashboardError::Clipboard(_) => "clipboard_error",
            DashboardError::Config(_) => "config_error",
            DashboardError::Serialization(_) => "serialization_error",
        }
    }

    /// Every failure in the dashboard can be retried by the user or left by navigating away.
    pub fn is_recoverable(&self) -> bool {
        true
    }

    /// The user-facing message, without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            DashboardError::Validation(msg)
            | DashboardError::SignatureDenied(msg)
            | DashboardError::Gateway(msg)
            | DashboardError::ConsentCreationFailed(msg)
            | DashboardError::ConsentUpdateFailed(msg)
            | DashboardError::Clipboard(msg)
            | DashboardError::Config(msg)
            | DashboardError::Serialization(msg) => msg.clone(),
            DashboardError::WalletNotConnected => self.to_string(),
        }
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(error: reqwest::Error) -> Self {
        DashboardError::Gateway(error.to_string())
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(error: serde_json::Error) -> Self {
        DashboardError::Serialization(error.to_string())
    }
}

/// Error body returned by the gateway. Either field may carry the message.
#[derive(Debug, Default, Deserialize)]
pub struct GatewayErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

impl GatewayErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.error
            .filter(|e| !e.trim().is_empty())
            .or(self.message.filter(|m| !m.trim().is_empty()))
    }
}

// Helper macro for convenient error creation
#[macro_export]
macro_rules! dashboard_err {
    ($err_type:ident, $msg:expr) => {
        $crate::utils::errors::DashboardError::$err_type($msg.to_string())
    };
}
