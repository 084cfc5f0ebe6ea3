use crate::api::SharedGateway;
use crate::blockchain::wallet::WalletHandle;
use crate::models::consent::consent_message;
use crate::models::{
    Consent, ConsentFilter, ConsentInput, ConsentPurpose, ConsentStatus, ConsentUpdate, StatusFilter,
};
use crate::services::list_view::{FetchOutcome, ListController, ListPage, ListSource, ListState};
use crate::utils::errors::{DashboardError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Consent list backed by the gateway.
pub struct ConsentSource {
    gateway: SharedGateway,
}

#[async_trait]
impl ListSource for ConsentSource {
    type Filter = ConsentFilter;
    type Item = Consent;

    async fn fetch(&self, filter: &ConsentFilter) -> Result<ListPage<Consent>> {
        let response = self.gateway.list_consents(filter).await?;
        Ok(ListPage::new(response.consents))
    }
}

/// Create and status-transition operations for consents.
#[derive(Clone)]
pub struct ConsentWorkflow {
    gateway: SharedGateway,
    wallet: WalletHandle,
}

impl ConsentWorkflow {
    pub fn new(gateway: SharedGateway, wallet: WalletHandle) -> Self {
        Self { gateway, wallet }
    }

    /// Preconditions for creating a consent, checked in order before any
    /// signing or network call. Returns the authorizing account.
    pub fn check_preconditions<'a>(patient_id: &str, purpose: &str, account: Option<&'a str>) -> Result<&'a str> {
        let account = account
            .filter(|a| !a.is_empty())
            .ok_or(DashboardError::WalletNotConnected)?;

        if patient_id.trim().is_empty() || purpose.trim().is_empty() {
            return Err(DashboardError::Validation("Please fill in all fields".to_string()));
        }

        Ok(account)
    }

    /// Ask the wallet to sign the canonical consent message.
    pub async fn sign(&self, patient_id: &str, purpose: &str) -> Result<String> {
        let message = consent_message(purpose, patient_id);
        self.wallet.sign(&message).await.map_err(|e| match e {
            denied @ DashboardError::SignatureDenied(_) => denied,
            other => DashboardError::SignatureDenied(other.message()),
        })
    }

    /// Send an already-signed consent to the gateway.
    pub async fn submit(&self, patient_id: &str, purpose: &str, account: &str, signature: &str) -> Result<Consent> {
        let input = ConsentInput {
            patient_id: patient_id.to_string(),
            purpose: purpose.to_string(),
            wallet_address: account.to_string(),
            signature: signature.to_string(),
        };

        let consent = self.gateway.create_consent(&input).await.map_err(|e| {
            warn!(patient_id = %patient_id, error = %e, "Consent creation failed");
            DashboardError::ConsentCreationFailed(e.message())
        })?;

        info!(consent_id = %consent.id, patient_id = %patient_id, "Consent created");
        Ok(consent)
    }

    /// Validate, sign, and submit a new consent in one step.
    pub async fn create_consent(&self, patient_id: &str, purpose: &str, account: Option<&str>) -> Result<Consent> {
        let account = Self::check_preconditions(patient_id, purpose, account)?;
        let signature = self.sign(patient_id, purpose).await?;
        self.submit(patient_id, purpose, account, &signature).await
    }

    /// Request a status change. Legality of the transition is left to the backend.
    pub async fn update_consent_status(&self, consent_id: &str, new_status: ConsentStatus) -> Result<Consent> {
        self.update_consent(consent_id, ConsentUpdate::status(new_status)).await
    }

    pub async fn update_consent(&self, consent_id: &str, update: ConsentUpdate) -> Result<Consent> {
        let consent = self.gateway.update_consent(consent_id, &update).await.map_err(|e| {
            warn!(consent_id = %consent_id, status = %update.status, error = %e, "Consent update failed");
            DashboardError::ConsentUpdateFailed(e.message())
        })?;

        info!(consent_id = %consent_id, status = %consent.status, "Consent updated");
        Ok(consent)
    }
}

/// Actions offered on a consent card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentAction {
    Approve,
    Revoke,
}

impl ConsentAction {
    pub fn target_status(&self) -> ConsentStatus {
        match self {
            ConsentAction::Approve => ConsentStatus::Active,
            ConsentAction::Revoke => ConsentStatus::Revoked,
        }
    }
}

/// Approve and revoke are offered only on pending consents, and only with a wallet connected.
pub fn available_actions(consent: &Consent, wallet_connected: bool) -> Vec<ConsentAction> {
    if consent.is_pending() && wallet_connected {
        vec![ConsentAction::Approve, ConsentAction::Revoke]
    } else {
        Vec::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SignedDraft {
    patient_id: String,
    purpose: String,
    account: String,
    signature: String,
}

/// Create-consent form state.
#[derive(Debug, Clone, Default)]
pub struct ConsentForm {
    pub patient_id: String,
    pub purpose: String,
    pub open: bool,
    pub creating: bool,
    signed: Option<SignedDraft>,
}

impl ConsentForm {
    pub fn has_signature(&self) -> bool {
        self.signed.is_some()
    }

    fn reusable_signature(&self, account: &str) -> Option<String> {
        self.signed
            .as_ref()
            .filter(|s| s.patient_id == self.patient_id && s.purpose == self.purpose && s.account == account)
            .map(|s| s.signature.clone())
    }
}

/// The consent view: filtered list, create form, and approve/revoke actions.
///
/// After every successful write the list is re-fetched with the current
/// filter; the view never shows a locally synthesized consent.
#[derive(Clone)]
pub struct ConsentManager {
    workflow: ConsentWorkflow,
    wallet: WalletHandle,
    list: ListController<ConsentSource>,
    form: Arc<Mutex<ConsentForm>>,
}

impl ConsentManager {
    pub fn new(gateway: SharedGateway, wallet: WalletHandle) -> Self {
        Self::with_filter(gateway, wallet, ConsentFilter::default())
    }

    /// Start from a given status/patient filter; the first fetch happens on `mount`.
    pub fn with_filter(gateway: SharedGateway, wallet: WalletHandle, filter: ConsentFilter) -> Self {
        let list = ListController::new(
            ConsentSource {
                gateway: gateway.clone(),
            },
            filter,
        );

        Self {
            workflow: ConsentWorkflow::new(gateway, wallet.clone()),
            wallet,
            list,
            form: Arc::new(Mutex::new(ConsentForm::default())),
        }
    }

    pub fn workflow(&self) -> &ConsentWorkflow {
        &self.workflow
    }

    pub async fn mount(&self) -> Result<FetchOutcome> {
        self.list.mount().await
    }

    pub async fn state(&self) -> ListState<ConsentFilter, Consent> {
        self.list.state().await
    }

    pub async fn set_status_filter(&self, status: StatusFilter) -> Result<Option<FetchOutcome>> {
        self.list.update_filter(|f| f.status = status).await
    }

    pub async fn set_patient_filter(&self, patient_id: Option<String>) -> Result<Option<FetchOutcome>> {
        self.list.update_filter(|f| f.patient_id = patient_id).await
    }

    pub async fn form(&self) -> ConsentForm {
        self.form.lock().await.clone()
    }

    pub async fn toggle_form(&self) -> bool {
        let mut form = self.form.lock().await;
        form.open = !form.open;
        form.open
    }

    pub async fn set_patient_id(&self, patient_id: &str) {
        self.form.lock().await.patient_id = patient_id.to_string();
    }

    pub async fn set_purpose(&self, purpose: &str) {
        self.form.lock().await.purpose = purpose.to_string();
    }

    /// Actions for `consent` given the wallet state right now.
    pub async fn actions_for(&self, consent: &Consent) -> Vec<ConsentAction> {
        available_actions(consent, self.wallet.current_account().await.is_some())
    }

    /// Submit the create form.
    ///
    /// On failure the form keeps its fields and any signature already produced
    /// for them, so the user can retry the same submission without re-entering
    /// data. A retry reuses the signature only while patient, purpose and
    /// account are unchanged.
    pub async fn create(&self) -> Result<Consent> {
        let account = self.wallet.current_account().await;

        let (patient_id, purpose, account, cached) = {
            let mut form = self.form.lock().await;
            let account = ConsentWorkflow::check_preconditions(&form.patient_id, &form.purpose, account.as_deref())?
                .to_string();
            if ConsentPurpose::parse(&form.purpose).is_none() {
                return Err(DashboardError::Validation(format!("Unknown consent purpose: {}", form.purpose)));
            }
            if form.creating {
                return Err(DashboardError::Validation("A consent is already being created".to_string()));
            }
            form.creating = true;
            let cached = form.reusable_signature(&account);
            (form.patient_id.clone(), form.purpose.clone(), account, cached)
        };

        let signature = match cached {
            Some(signature) => signature,
            None => match self.workflow.sign(&patient_id, &purpose).await {
                Ok(signature) => {
                    self.form.lock().await.signed = Some(SignedDraft {
                        patient_id: patient_id.clone(),
                        purpose: purpose.clone(),
                        account: account.clone(),
                        signature: signature.clone(),
                    });
                    signature
                }
                Err(e) => {
                    self.form.lock().await.creating = false;
                    return Err(e);
                }
            },
        };

        match self.workflow.submit(&patient_id, &purpose, &account, &signature).await {
            Ok(consent) => {
                *self.form.lock().await = ConsentForm::default();
                self.refresh_after_write().await;
                Ok(consent)
            }
            Err(e) => {
                self.form.lock().await.creating = false;
                Err(e)
            }
        }
    }

    pub async fn approve(&self, consent_id: &str) -> Result<Consent> {
        self.update_status(consent_id, ConsentStatus::Active).await
    }

    pub async fn revoke(&self, consent_id: &str) -> Result<Consent> {
        self.update_status(consent_id, ConsentStatus::Revoked).await
    }

    /// Apply a status change, then re-fetch the filtered list. A failure leaves the list untouched.
    pub async fn update_status(&self, consent_id: &str, new_status: ConsentStatus) -> Result<Consent> {
        let consent = self.workflow.update_consent_status(consent_id, new_status).await?;
        self.refresh_after_write().await;
        Ok(consent)
    }

    // The write already succeeded; a failed re-fetch shows up as the list's error state.
    async fn refresh_after_write(&self) {
        if let Err(e) = self.list.refresh().await {
            warn!(error = %e, "Consent list refresh after write failed");
        }
    }
}
