use crate::models::Pagination;
use crate::utils::errors::Result;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// One page of items returned by a list fetch.
#[derive(Debug, Clone)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub pagination: Option<Pagination>,
}

impl<T> ListPage<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            pagination: None,
        }
    }
}

/// Where a list view gets its items from, given a filter snapshot.
#[async_trait]
pub trait ListSource: Send + Sync + 'static {
    type Filter: Clone + PartialEq + Debug + Send + Sync;
    type Item: Clone + Send + Sync;

    async fn fetch(&self, filter: &Self::Filter) -> Result<ListPage<Self::Item>>;
}

/// Observable state of a list view.
#[derive(Debug, Clone)]
pub struct ListState<F, T> {
    pub filter: F,
    pub items: Vec<T>,
    pub pagination: Option<Pagination>,
    pub loading: bool,
    pub error: Option<String>,
    /// Set by the first settled fetch and never reset for this view instance.
    pub has_loaded_once: bool,
    /// Sequence number of the most recent dispatch.
    pub latest_dispatch: u64,
}

/// How a dispatched fetch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// The filter changed, or a newer fetch was dispatched, while the request was in flight.
    Discarded,
}

/// Fetch-on-mount / fetch-on-filter-change controller shared by the list views.
///
/// Each dispatch carries a sequence number and a snapshot of the filter it was
/// issued for. A settled response is applied only if it belongs to the latest
/// dispatch and its snapshot still equals the current filter, so a slow
/// response never overwrites a newer one, whatever the arrival order. This
/// holds for repeated fetches of the same filter too, such as the re-fetch
/// after a write.
pub struct ListController<S: ListSource> {
    source: Arc<S>,
    state: Arc<Mutex<ListState<S::Filter, S::Item>>>,
}

impl<S: ListSource> Clone for ListController<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            state: self.state.clone(),
        }
    }
}

impl<S: ListSource> ListController<S> {
    pub fn new(source: S, filter: S::Filter) -> Self {
        Self {
            source: Arc::new(source),
            state: Arc::new(Mutex::new(ListState {
                filter,
                items: Vec::new(),
                pagination: None,
                loading: false,
                error: None,
                has_loaded_once: false,
                latest_dispatch: 0,
            })),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Issue the initial fetch for the current filter.
    pub async fn mount(&self) -> Result<FetchOutcome> {
        self.refresh().await
    }

    pub async fn state(&self) -> ListState<S::Filter, S::Item> {
        self.state.lock().await.clone()
    }

    pub async fn filter(&self) -> S::Filter {
        self.state.lock().await.filter.clone()
    }

    /// Replace the filter and fetch, unless it is unchanged.
    pub async fn set_filter(&self, filter: S::Filter) -> Result<Option<FetchOutcome>> {
        {
            let mut state = self.state.lock().await;
            if state.filter == filter {
                return Ok(None);
            }
            state.filter = filter;
        }
        self.refresh().await.map(Some)
    }

    /// Edit the filter in place and fetch if the edit changed it.
    pub async fn update_filter(&self, edit: impl FnOnce(&mut S::Filter)) -> Result<Option<FetchOutcome>> {
        let mut next = self.filter().await;
        edit(&mut next);
        self.set_filter(next).await
    }

    /// Set the filter without fetching; used before the first mount.
    pub(crate) async fn replace_filter(&self, filter: S::Filter) {
        self.state.lock().await.filter = filter;
    }

    /// Fetch for the current filter snapshot and apply the result if still current.
    ///
    /// A failure that is applied sets `error` and stops `loading` but leaves
    /// `items` at their last good value; it is also returned to the caller.
    pub async fn refresh(&self) -> Result<FetchOutcome> {
        let (dispatch, snapshot) = {
            let mut state = self.state.lock().await;
            if !state.has_loaded_once {
                state.loading = true;
            }
            state.latest_dispatch += 1;
            (state.latest_dispatch, state.filter.clone())
        };

        debug!(dispatch, filter = ?snapshot, "Dispatching list fetch");
        let result = self.source.fetch(&snapshot).await;

        let mut state = self.state.lock().await;
        if state.latest_dispatch != dispatch || state.filter != snapshot {
            debug!(
                dispatch,
                latest = state.latest_dispatch,
                filter = ?snapshot,
                current = ?state.filter,
                "Discarding stale list response"
            );
            return Ok(FetchOutcome::Discarded);
        }

        state.loading = false;
        state.has_loaded_once = true;
        match result {
            Ok(page) => {
                state.items = page.items;
                state.pagination = page.pagination;
                state.error = None;
                Ok(FetchOutcome::Applied)
            }
            Err(e) => {
                warn!(filter = ?snapshot, error = %e, "List fetch failed");
                state.error = Some(e.message());
                Err(e)
            }
        }
    }
}
