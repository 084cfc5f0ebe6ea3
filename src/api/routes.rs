use crate::constant::{CONSENTS_PATH, PATIENTS_PATH, STATS_PATH, TRANSACTIONS_PATH};
use crate::models::{ConsentFilter, PatientQuery, TransactionFilter};

pub fn patients() -> String {
    PATIENTS_PATH.to_string()
}

pub fn patient(patient_id: &str) -> String {
    format!("{}/{}", PATIENTS_PATH, patient_id)
}

pub fn patient_records(patient_id: &str) -> String {
    format!("{}/{}/records", PATIENTS_PATH, patient_id)
}

pub fn consents() -> String {
    CONSENTS_PATH.to_string()
}

pub fn consent(consent_id: &str) -> String {
    format!("{}/{}", CONSENTS_PATH, consent_id)
}

pub fn transactions() -> String {
    TRANSACTIONS_PATH.to_string()
}

pub fn stats() -> String {
    STATS_PATH.to_string()
}

// Query shaping. Absent filters are omitted rather than sent empty.

pub fn patient_params(query: &PatientQuery) -> Vec<(&'static str, String)> {
    vec![
        ("page", query.page.to_string()),
        ("limit", query.limit.to_string()),
        ("search", query.search.clone()),
    ]
}

pub fn consent_params(filter: &ConsentFilter) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(patient_id) = filter.patient_id.as_deref().filter(|id| !id.is_empty()) {
        params.push(("patientId", patient_id.to_string()));
    }
    if let Some(status) = filter.status.as_query() {
        params.push(("status", status.to_string()));
    }
    params
}

pub fn transaction_params(filter: &TransactionFilter) -> Vec<(&'static str, String)> {
    let mut params = vec![("limit", filter.limit.to_string())];
    if let Some(address) = filter.wallet_address.as_deref().filter(|a| !a.is_empty()) {
        params.push(("walletAddress", address.to_string()));
    }
    params
}
