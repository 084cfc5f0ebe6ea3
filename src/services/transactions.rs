use crate::api::SharedGateway;
use crate::blockchain::wallet::WalletHandle;
use crate::models::{Transaction, TransactionFilter};
use crate::services::list_view::{FetchOutcome, ListController, ListPage, ListSource, ListState};
use crate::utils::errors::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct TransactionSource {
    gateway: SharedGateway,
}

#[async_trait]
impl ListSource for TransactionSource {
    type Filter = TransactionFilter;
    type Item = Transaction;

    async fn fetch(&self, filter: &TransactionFilter) -> Result<ListPage<Transaction>> {
        let response = self.gateway.list_transactions(filter).await?;
        Ok(ListPage::new(response.transactions))
    }
}

/// Transaction log, scoped to the connected wallet ("My Transactions") or unscoped.
///
/// The wallet address is part of the filter snapshot and is re-read from the
/// wallet on every dispatch.
#[derive(Clone)]
pub struct TransactionHistory {
    list: ListController<TransactionSource>,
    wallet: WalletHandle,
    mine: Arc<AtomicBool>,
    limit: u32,
}

impl TransactionHistory {
    pub fn new(gateway: SharedGateway, wallet: WalletHandle, limit: u32) -> Self {
        let filter = TransactionFilter {
            wallet_address: None,
            limit,
        };
        Self {
            list: ListController::new(TransactionSource { gateway }, filter),
            wallet,
            mine: Arc::new(AtomicBool::new(true)),
            limit,
        }
    }

    pub async fn mount(&self) -> Result<FetchOutcome> {
        let filter = self.resolve_filter().await;
        self.list.replace_filter(filter).await;
        self.list.mount().await
    }

    pub async fn state(&self) -> ListState<TransactionFilter, Transaction> {
        self.list.state().await
    }

    pub fn is_scoped_to_wallet(&self) -> bool {
        self.mine.load(Ordering::SeqCst)
    }

    /// The scope toggle is only offered while a wallet is connected.
    pub async fn can_toggle_scope(&self) -> bool {
        self.wallet.current_account().await.is_some()
    }

    pub fn scope_label(&self) -> &'static str {
        if self.is_scoped_to_wallet() {
            "My Transactions"
        } else {
            "All Transactions"
        }
    }

    pub async fn set_scope(&self, mine: bool) -> Result<Option<FetchOutcome>> {
        self.mine.store(mine, Ordering::SeqCst);
        self.sync_account().await
    }

    pub async fn toggle_scope(&self) -> Result<Option<FetchOutcome>> {
        self.set_scope(!self.is_scoped_to_wallet()).await
    }

    /// Re-read the wallet; call after a connect or disconnect.
    pub async fn sync_account(&self) -> Result<Option<FetchOutcome>> {
        let filter = self.resolve_filter().await;
        self.list.set_filter(filter).await
    }

    async fn resolve_filter(&self) -> TransactionFilter {
        let wallet_address = if self.is_scoped_to_wallet() {
            self.wallet.current_account().await
        } else {
            None
        };
        TransactionFilter {
            wallet_address,
            limit: self.limit,
        }
    }
}
