use crate::constant::{CONSENT_MESSAGE_PATIENT, CONSENT_MESSAGE_PREFIX};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consent {
    pub id: String,
    pub patient_id: String,
    pub purpose: String,
    pub status: ConsentStatus,
    #[serde(default)]
    pub wallet_address: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub blockchain_tx_hash: Option<String>,
}

impl Consent {
    pub fn is_pending(&self) -> bool {
        self.status == ConsentStatus::Pending
    }
}

/// Consent status as reported by the gateway.
///
/// Kept open: statuses the backend introduces later are carried in `Other`
/// and round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConsentStatus {
    Pending,
    Active,
    Revoked,
    Other(String),
}

impl ConsentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ConsentStatus::Pending => "pending",
            ConsentStatus::Active => "active",
            ConsentStatus::Revoked => "revoked",
            ConsentStatus::Other(raw) => raw.as_str(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ConsentStatus::Other(_))
    }
}

impl From<String> for ConsentStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => ConsentStatus::Pending,
            "active" => ConsentStatus::Active,
            "revoked" => ConsentStatus::Revoked,
            _ => ConsentStatus::Other(raw),
        }
    }
}

impl From<&str> for ConsentStatus {
    fn from(raw: &str) -> Self {
        ConsentStatus::from(raw.to_string())
    }
}

impl From<ConsentStatus> for String {
    fn from(status: ConsentStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ConsentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed set of purposes a new consent may be created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentPurpose {
    ResearchStudy,
    ResearchInstitutionSharing,
    ThirdPartyAnalytics,
    InsuranceProvider,
}

impl ConsentPurpose {
    pub const ALL: [ConsentPurpose; 4] = [
        ConsentPurpose::ResearchStudy,
        ConsentPurpose::ResearchInstitutionSharing,
        ConsentPurpose::ThirdPartyAnalytics,
        ConsentPurpose::InsuranceProvider,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsentPurpose::ResearchStudy => "Research Study Participation",
            ConsentPurpose::ResearchInstitutionSharing => "Data Sharing with Research Institution",
            ConsentPurpose::ThirdPartyAnalytics => "Third-Party Analytics Access",
            ConsentPurpose::InsuranceProvider => "Insurance Provider Access",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == raw)
    }
}

impl fmt::Display for ConsentPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The canonical message a wallet signs to authorize a consent.
pub fn consent_message(purpose: &str, patient_id: &str) -> String {
    format!("{}{}{}{}", CONSENT_MESSAGE_PREFIX, purpose, CONSENT_MESSAGE_PATIENT, patient_id)
}

/// Body of the consent-creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentInput {
    pub patient_id: String,
    pub purpose: String,
    pub wallet_address: String,
    pub signature: String,
}

/// Body of the consent-update request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentUpdate {
    pub status: ConsentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blockchain_tx_hash: Option<String>,
}

impl ConsentUpdate {
    pub fn status(status: ConsentStatus) -> Self {
        Self {
            status,
            blockchain_tx_hash: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsentsResponse {
    #[serde(default)]
    pub consents: Vec<Consent>,
}

/// Status buttons offered above the consent list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ConsentStatus),
}

impl StatusFilter {
    pub fn as_query(&self) -> Option<&str> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Only(status) => Some(status.as_str()),
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "" | "all" => StatusFilter::All,
            other => StatusFilter::Only(ConsentStatus::from(other)),
        }
    }
}

/// Filter snapshot for the consent list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsentFilter {
    pub patient_id: Option<String>,
    pub status: StatusFilter,
}
