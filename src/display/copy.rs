//! Click-to-copy for identifiers, with a transient "copied" indicator.

use crate::constant::DEFAULT_COPIED_FEEDBACK_MS;
use crate::display::identifier::AdaptiveIdentifier;
use crate::utils::errors::{DashboardError, Result};
use async_trait::async_trait;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error};

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<()>;
}

/// Terminal clipboard: writes the text on its own line to stdout.
#[derive(Debug, Default)]
pub struct StdoutClipboard;

#[async_trait]
impl Clipboard for StdoutClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", text).map_err(|e| DashboardError::Clipboard(e.to_string()))
    }
}

pub struct CopyableIdentifier {
    identifier: AdaptiveIdentifier,
    clipboard: Arc<dyn Clipboard>,
    feedback: Duration,
    copied: Arc<AtomicBool>,
    revert: Option<JoinHandle<()>>,
}

impl CopyableIdentifier {
    pub fn new(identifier: AdaptiveIdentifier, clipboard: Arc<dyn Clipboard>) -> Self {
        Self {
            identifier,
            clipboard,
            feedback: Duration::from_millis(DEFAULT_COPIED_FEEDBACK_MS),
            copied: Arc::new(AtomicBool::new(false)),
            revert: None,
        }
    }

    pub fn with_feedback(mut self, feedback: Duration) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn identifier(&self) -> &AdaptiveIdentifier {
        &self.identifier
    }

    pub fn identifier_mut(&mut self) -> &mut AdaptiveIdentifier {
        &mut self.identifier
    }

    pub fn is_copied(&self) -> bool {
        self.copied.load(Ordering::SeqCst)
    }

    pub fn has_pending_revert(&self) -> bool {
        self.revert.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Copy the full identifier. A repeat copy while the indicator is showing
    /// restarts its timer. Clipboard failures are logged and leave the
    /// indicator untouched.
    pub async fn copy(&mut self) -> bool {
        if let Err(e) = self.clipboard.write_text(self.identifier.full()).await {
            error!(error = %e, "Failed to copy identifier");
            return false;
        }

        if let Some(previous) = self.revert.take() {
            previous.abort();
        }
        self.copied.store(true, Ordering::SeqCst);

        let copied = self.copied.clone();
        let feedback = self.feedback;
        self.revert = Some(tokio::spawn(async move {
            tokio::time::sleep(feedback).await;
            copied.store(false, Ordering::SeqCst);
        }));

        debug!(identifier = %self.identifier.full(), "Identifier copied");
        true
    }
}

impl Drop for CopyableIdentifier {
    fn drop(&mut self) {
        if let Some(revert) = self.revert.take() {
            revert.abort();
        }
    }
}
