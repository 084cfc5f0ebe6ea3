use crate::api::SharedGateway;
use crate::models::Stats;
use crate::utils::errors::Result;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct StatsState {
    pub stats: Option<Stats>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Aggregate statistics view. A failed reload keeps the last good numbers.
#[derive(Clone)]
pub struct StatsDashboard {
    gateway: SharedGateway,
    state: Arc<Mutex<StatsState>>,
}

impl StatsDashboard {
    pub fn new(gateway: SharedGateway) -> Self {
        Self {
            gateway,
            state: Arc::new(Mutex::new(StatsState::default())),
        }
    }

    pub async fn state(&self) -> StatsState {
        self.state.lock().await.clone()
    }

    pub async fn load(&self) -> Result<Stats> {
        self.state.lock().await.loading = true;

        let result = self.gateway.get_stats().await;

        let mut state = self.state.lock().await;
        state.loading = false;
        match result {
            Ok(stats) => {
                state.stats = Some(stats.clone());
                state.error = None;
                Ok(stats)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load statistics");
                state.error = Some(e.message());
                Err(e)
            }
        }
    }
}
