use serde::{Deserialize, Serialize};

/// Aggregate platform counters. Missing fields read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    pub total_patients: u64,
    pub total_records: u64,
    pub total_consents: u64,
    pub active_consents: u64,
    pub pending_consents: u64,
    pub total_transactions: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatItem {
    pub label: &'static str,
    pub value: u64,
    pub description: &'static str,
    pub primary: bool,
}

impl Stats {
    pub fn items(&self) -> Vec<StatItem> {
        vec![
            StatItem {
                label: "Total Patients",
                value: self.total_patients,
                description: "Registered patients in the system",
                primary: true,
            },
            StatItem {
                label: "Total Records",
                value: self.total_records,
                description: "Medical records stored on blockchain",
                primary: true,
            },
            StatItem {
                label: "Total Consents",
                value: self.total_consents,
                description: "Consent agreements created",
                primary: false,
            },
            StatItem {
                label: "Active Consents",
                value: self.active_consents,
                description: "Currently active consent agreements",
                primary: false,
            },
            StatItem {
                label: "Pending Consents",
                value: self.pending_consents,
                description: "Consents awaiting approval",
                primary: false,
            },
            StatItem {
                label: "Total Transactions",
                value: self.total_transactions,
                description: "Blockchain transactions processed",
                primary: false,
            },
        ]
    }
}
