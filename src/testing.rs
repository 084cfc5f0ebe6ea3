//! In-memory collaborators for unit tests.

use crate::api::Gateway;
use crate::blockchain::wallet::WalletAdapter;
use crate::display::copy::Clipboard;
use crate::models::{
    Consent, ConsentFilter, ConsentInput, ConsentStatus, ConsentUpdate, ConsentsResponse, Pagination,
    Patient, PatientQuery, PatientsResponse, Record, RecordsResponse, Stats, TransactionFilter,
    Transaction, TransactionsResponse,
};
use crate::utils::errors::{DashboardError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

pub const ACCOUNT: &str = "0x71c7656ec7ab88b098defb751b7401b5f6d8976f";

pub fn consent(id: &str, patient_id: &str, status: &str) -> Consent {
    Consent {
        id: id.to_string(),
        patient_id: patient_id.to_string(),
        purpose: "Research Study Participation".to_string(),
        status: ConsentStatus::from(status),
        wallet_address: Some(ACCOUNT.to_string()),
        signature: Some("0xsig".to_string()),
        created_at: Some("2024-01-15T10:00:00Z".to_string()),
        updated_at: None,
        blockchain_tx_hash: None,
    }
}

pub fn patient(id: &str, name: &str) -> Patient {
    Patient {
        id: id.to_string(),
        name: name.to_string(),
        email: Some(format!("{}@example.com", id)),
        date_of_birth: Some("1990-01-15".to_string()),
        gender: None,
        phone: None,
        address: None,
        wallet_address: None,
    }
}

pub fn transaction(id: &str, from: &str) -> Transaction {
    Transaction {
        id: id.to_string(),
        tx_type: Some("consent_approval".to_string()),
        from: Some(from.to_string()),
        to: Some("0x0000000000000000000000000000000000000001".to_string()),
        amount: None,
        currency: None,
        status: Some("confirmed".to_string()),
        timestamp: Some("2024-01-15T10:00:00Z".to_string()),
        created_at: None,
        blockchain_tx_hash: None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListPatients(PatientQuery),
    GetPatient(String),
    GetRecords(String),
    ListConsents(ConsentFilter),
    CreateConsent(ConsentInput),
    UpdateConsent(String, ConsentUpdate),
    ListTransactions(TransactionFilter),
    GetStats,
}

#[derive(Default)]
struct GatewayData {
    patients: Vec<Patient>,
    records: HashMap<String, Vec<Record>>,
    consents: Vec<Consent>,
    transactions: Vec<Transaction>,
    stats: Stats,
    calls: Vec<Call>,
    failures: HashMap<&'static str, String>,
    holds: HashMap<String, oneshot::Receiver<()>>,
    next_id: u32,
}

/// Gateway backed by vectors, with per-operation failure injection and
/// the ability to hold a response until the test releases it.
#[derive(Clone, Default)]
pub struct FakeGateway {
    data: Arc<Mutex<GatewayData>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_consents(self, consents: Vec<Consent>) -> Self {
        self.data.lock().unwrap().consents = consents;
        self
    }

    pub fn with_patients(self, patients: Vec<Patient>) -> Self {
        self.data.lock().unwrap().patients = patients;
        self
    }

    pub fn with_records(self, patient_id: &str, records: Vec<Record>) -> Self {
        self.data.lock().unwrap().records.insert(patient_id.to_string(), records);
        self
    }

    pub fn with_transactions(self, transactions: Vec<Transaction>) -> Self {
        self.data.lock().unwrap().transactions = transactions;
        self
    }

    pub fn with_stats(self, stats: Stats) -> Self {
        self.data.lock().unwrap().stats = stats;
        self
    }

    /// Make `operation` fail with `message` until cleared.
    pub fn fail(&self, operation: &'static str, message: &str) {
        self.data.lock().unwrap().failures.insert(operation, message.to_string());
    }

    pub fn recover(&self, operation: &'static str) {
        self.data.lock().unwrap().failures.remove(operation);
    }

    /// Hold the next response for `key` until the returned sender fires.
    pub fn hold(&self, key: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.data.lock().unwrap().holds.insert(key.to_string(), rx);
        tx
    }

    pub fn calls(&self) -> Vec<Call> {
        self.data.lock().unwrap().calls.clone()
    }

    pub fn network_calls(&self) -> usize {
        self.calls().len()
    }

    pub fn consents(&self) -> Vec<Consent> {
        self.data.lock().unwrap().consents.clone()
    }

    fn record(&self, call: Call, operation: &'static str) -> Result<()> {
        let mut data = self.data.lock().unwrap();
        data.calls.push(call);
        match data.failures.get(operation) {
            Some(message) => Err(DashboardError::Gateway(message.clone())),
            None => Ok(()),
        }
    }

    async fn wait_for_release(&self, key: &str) {
        let hold = self.data.lock().unwrap().holds.remove(key);
        if let Some(rx) = hold {
            let _ = rx.await;
        }
    }
}

pub fn consent_key(filter: &ConsentFilter) -> String {
    format!("consents:{}", filter.status.as_query().unwrap_or("all"))
}

pub fn transaction_key(filter: &TransactionFilter) -> String {
    format!("transactions:{}", filter.wallet_address.as_deref().unwrap_or("all"))
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn list_patients(&self, query: &PatientQuery) -> Result<PatientsResponse> {
        self.record(Call::ListPatients(query.clone()), "list_patients")?;
        self.wait_for_release(&format!("patients:{}", query.search)).await;

        let data = self.data.lock().unwrap();
        let matching: Vec<Patient> = data
            .patients
            .iter()
            .filter(|p| query.search.is_empty() || p.name.to_lowercase().contains(&query.search.to_lowercase()))
            .cloned()
            .collect();
        let limit = query.limit.max(1) as usize;
        let total = matching.len();
        let start = (query.page.saturating_sub(1) as usize) * limit;
        Ok(PatientsResponse {
            patients: matching.into_iter().skip(start).take(limit).collect(),
            pagination: Some(Pagination {
                page: query.page,
                limit: query.limit,
                total: total as u64,
                total_pages: total.div_ceil(limit) as u32,
            }),
        })
    }

    async fn get_patient(&self, patient_id: &str) -> Result<Patient> {
        self.record(Call::GetPatient(patient_id.to_string()), "get_patient")?;
        let data = self.data.lock().unwrap();
        data.patients
            .iter()
            .find(|p| p.id == patient_id)
            .cloned()
            .ok_or_else(|| DashboardError::Gateway("Patient not found".to_string()))
    }

    async fn get_patient_records(&self, patient_id: &str) -> Result<RecordsResponse> {
        self.record(Call::GetRecords(patient_id.to_string()), "get_patient_records")?;
        let data = self.data.lock().unwrap();
        Ok(RecordsResponse {
            records: data.records.get(patient_id).cloned().unwrap_or_default(),
        })
    }

    async fn list_consents(&self, filter: &ConsentFilter) -> Result<ConsentsResponse> {
        self.record(Call::ListConsents(filter.clone()), "list_consents")?;

        // answered as of the moment the request reached the server
        let consents: Vec<Consent> = {
            let data = self.data.lock().unwrap();
            data.consents
                .iter()
                .filter(|c| filter.status.as_query().map_or(true, |s| c.status.as_str() == s))
                .filter(|c| filter.patient_id.as_deref().map_or(true, |p| c.patient_id == p))
                .cloned()
                .collect()
        };
        self.wait_for_release(&consent_key(filter)).await;
        Ok(ConsentsResponse { consents })
    }

    async fn create_consent(&self, input: &ConsentInput) -> Result<Consent> {
        self.record(Call::CreateConsent(input.clone()), "create_consent")?;
        let mut data = self.data.lock().unwrap();
        data.next_id += 1;
        let created = Consent {
            id: format!("consent-new-{}", data.next_id),
            patient_id: input.patient_id.clone(),
            purpose: input.purpose.clone(),
            status: ConsentStatus::Pending,
            wallet_address: Some(input.wallet_address.clone()),
            signature: Some(input.signature.clone()),
            created_at: Some("2024-02-01T09:30:00Z".to_string()),
            updated_at: None,
            blockchain_tx_hash: None,
        };
        data.consents.push(created.clone());
        Ok(created)
    }

    async fn update_consent(&self, consent_id: &str, update: &ConsentUpdate) -> Result<Consent> {
        self.record(Call::UpdateConsent(consent_id.to_string(), update.clone()), "update_consent")?;
        let mut data = self.data.lock().unwrap();
        let consent = data
            .consents
            .iter_mut()
            .find(|c| c.id == consent_id)
            .ok_or_else(|| DashboardError::Gateway("Consent not found".to_string()))?;
        consent.status = update.status.clone();
        if update.blockchain_tx_hash.is_some() {
            consent.blockchain_tx_hash = update.blockchain_tx_hash.clone();
        }
        Ok(consent.clone())
    }

    async fn list_transactions(&self, filter: &TransactionFilter) -> Result<TransactionsResponse> {
        self.record(Call::ListTransactions(filter.clone()), "list_transactions")?;
        self.wait_for_release(&transaction_key(filter)).await;

        let data = self.data.lock().unwrap();
        let transactions = data
            .transactions
            .iter()
            .filter(|t| {
                filter
                    .wallet_address
                    .as_deref()
                    .map_or(true, |a| t.from.as_deref() == Some(a) || t.to.as_deref() == Some(a))
            })
            .take(filter.limit as usize)
            .cloned()
            .collect();
        Ok(TransactionsResponse { transactions })
    }

    async fn get_stats(&self) -> Result<Stats> {
        self.record(Call::GetStats, "get_stats")?;
        Ok(self.data.lock().unwrap().stats.clone())
    }
}

/// Wallet whose account and approval are set directly by the test.
#[derive(Default)]
pub struct FakeWallet {
    account: Mutex<Option<String>>,
    signed: Mutex<Vec<String>>,
    deny: AtomicBool,
}

impl FakeWallet {
    pub fn connected(account: &str) -> Arc<Self> {
        let wallet = Self::default();
        *wallet.account.lock().unwrap() = Some(account.to_string());
        Arc::new(wallet)
    }

    pub fn disconnected() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_account(&self, account: Option<&str>) {
        *self.account.lock().unwrap() = account.map(str::to_string);
    }

    pub fn deny_signatures(&self, deny: bool) {
        self.deny.store(deny, Ordering::SeqCst);
    }

    pub fn signed_messages(&self) -> Vec<String> {
        self.signed.lock().unwrap().clone()
    }
}

#[async_trait]
impl WalletAdapter for FakeWallet {
    async fn current_account(&self) -> Option<String> {
        self.account.lock().unwrap().clone()
    }

    async fn connect(&self) -> Result<String> {
        let mut account = self.account.lock().unwrap();
        Ok(account.get_or_insert_with(|| ACCOUNT.to_string()).clone())
    }

    async fn disconnect(&self) {
        *self.account.lock().unwrap() = None;
    }

    async fn sign(&self, message: &str) -> Result<String> {
        let mut signed = self.signed.lock().unwrap();
        signed.push(message.to_string());
        if self.deny.load(Ordering::SeqCst) {
            return Err(DashboardError::SignatureDenied("User rejected the request".to_string()));
        }
        Ok(format!("0xsig{}", signed.len()))
    }
}

/// Clipboard that keeps the last written text, or fails every write.
#[derive(Default)]
pub struct FakeClipboard {
    contents: Mutex<Option<String>>,
    writes: Mutex<usize>,
    broken: bool,
}

impl FakeClipboard {
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().unwrap().clone()
    }

    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

#[async_trait]
impl Clipboard for FakeClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        *self.writes.lock().unwrap() += 1;
        if self.broken {
            return Err(DashboardError::Clipboard("Document is not focused".to_string()));
        }
        *self.contents.lock().unwrap() = Some(text.to_string());
        Ok(())
    }
}

/// Yield until `condition` holds, so spawned tasks can reach their await points.
pub async fn settle_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..100 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}
