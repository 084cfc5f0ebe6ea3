use crate::constant::DEFAULT_CURRENCY;
use serde::{Deserialize, Serialize};

/// Read-only projection of a blockchain event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type", default)]
    pub tx_type: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub amount: Option<serde_json::Value>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub blockchain_tx_hash: Option<String>,
}

impl Transaction {
    pub fn currency(&self) -> &str {
        self.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }

    pub fn is_confirmed(&self) -> bool {
        self.status.as_deref() == Some("confirmed")
    }

    /// Amount as sent by the gateway, which may be a number or a decimal string.
    pub fn amount_display(&self) -> Option<String> {
        match self.amount.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(raw) => Some(raw.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Event time, falling back to the record's creation time.
    pub fn occurred_at(&self) -> Option<&str> {
        self.timestamp.as_deref().or(self.created_at.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionsResponse {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// Filter snapshot for the transaction list. `wallet_address` is `None` for "all".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionFilter {
    pub wallet_address: Option<String>,
    pub limit: u32,
}

impl Default for TransactionFilter {
    fn default() -> Self {
        Self {
            wallet_address: None,
            limit: crate::constant::DEFAULT_TRANSACTIONS_LIMIT,
        }
    }
}
