pub mod client;
pub mod routes;

use crate::models::{
    Consent, ConsentFilter, ConsentInput, ConsentUpdate, ConsentsResponse, Patient, PatientQuery,
    PatientsResponse, RecordsResponse, Stats, TransactionFilter, TransactionsResponse,
};
use crate::utils::errors::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub use client::ApiService;

/// Request/response facade over the healthcare-records backend.
///
/// Transport and status failures, timeouts included, come back as
/// `DashboardError::Gateway` carrying the server's message. A success body
/// that does not decode comes back as `DashboardError::Serialization`.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn list_patients(&self, query: &PatientQuery) -> Result<PatientsResponse>;
    async fn get_patient(&self, patient_id: &str) -> Result<Patient>;
    async fn get_patient_records(&self, patient_id: &str) -> Result<RecordsResponse>;
    async fn list_consents(&self, filter: &ConsentFilter) -> Result<ConsentsResponse>;
    async fn create_consent(&self, input: &ConsentInput) -> Result<Consent>;
    async fn update_consent(&self, consent_id: &str, update: &ConsentUpdate) -> Result<Consent>;
    async fn list_transactions(&self, filter: &TransactionFilter) -> Result<TransactionsResponse>;
    async fn get_stats(&self) -> Result<Stats>;
}

pub type SharedGateway = Arc<dyn Gateway>;
