use crate::utils::errors::{DashboardError, Result};
use async_trait::async_trait;
use ethers::signers::{LocalWallet, Signer};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Wallet provider contract consumed by the dashboard.
///
/// Only the adapter mutates connection state. Callers read `current_account`
/// at the moment they need it and never cache it across a reconnect.
#[async_trait]
pub trait WalletAdapter: Send + Sync {
    async fn current_account(&self) -> Option<String>;
    async fn connect(&self) -> Result<String>;
    async fn disconnect(&self);
    /// Sign an arbitrary message. Rejection is an expected outcome.
    async fn sign(&self, message: &str) -> Result<String>;
}

/// Process-wide wallet context, passed explicitly to every consumer.
pub type WalletHandle = Arc<dyn WalletAdapter>;

/// Asked before each signature; returning false declines it.
pub type SignApproval = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Wallet adapter backed by a local secp256k1 key
pub struct LocalWalletAdapter {
    wallet: Option<LocalWallet>,
    connected: RwLock<bool>,
    approval: Option<SignApproval>,
}

impl LocalWalletAdapter {
    pub fn new(private_key: Option<&str>) -> Result<Self> {
        let wallet = private_key
            .map(|key| {
                LocalWallet::from_str(key)
                    .map_err(|e| DashboardError::Config(format!("Invalid wallet private key: {}", e)))
            })
            .transpose()?;

        Ok(Self {
            wallet,
            connected: RwLock::new(false),
            approval: None,
        })
    }

    pub fn with_approval(mut self, approval: SignApproval) -> Self {
        self.approval = Some(approval);
        self
    }

    pub fn into_handle(self) -> WalletHandle {
        Arc::new(self)
    }

    fn address_of(wallet: &LocalWallet) -> String {
        format!("{:#x}", wallet.address())
    }
}

#[async_trait]
impl WalletAdapter for LocalWalletAdapter {
    async fn current_account(&self) -> Option<String> {
        if !*self.connected.read().await {
            return None;
        }
        self.wallet.as_ref().map(Self::address_of)
    }

    async fn connect(&self) -> Result<String> {
        let wallet = self.wallet.as_ref().ok_or(DashboardError::WalletNotConnected)?;
        *self.connected.write().await = true;

        let account = Self::address_of(wallet);
        info!(account = %account, "Wallet connected");
        Ok(account)
    }

    async fn disconnect(&self) {
        *self.connected.write().await = false;
        info!("Wallet disconnected");
    }

    async fn sign(&self, message: &str) -> Result<String> {
        let wallet = match (&self.wallet, *self.connected.read().await) {
            (Some(wallet), true) => wallet,
            _ => return Err(DashboardError::SignatureDenied("Wallet is locked".to_string())),
        };

        if let Some(approve) = &self.approval {
            if !approve(message) {
                warn!("User declined the signature request");
                return Err(DashboardError::SignatureDenied("User rejected the request".to_string()));
            }
        }

        let signature = wallet
            .sign_message(message)
            .await
            .map_err(|e| DashboardError::SignatureDenied(e.to_string()))?;

        Ok(format!("0x{}", signature))
    }
}
