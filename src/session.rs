use std::sync::Arc;

use serde::Serialize;

use crate::stats::{noop_error_handler, ErrorHandler, SessionStats, StatsSnapshot};
use crate::tun::TunBuilderCapture;

/// Structured form of [`ClientSession::summary`].
#[derive(Debug, Serialize)]
pub struct SessionReport<'a> {
    pub capture: &'a TunBuilderCapture,
    pub stats: StatsSnapshot,
}

/// Everything a client session records: the captured tunnel configuration and
/// the traffic counters. Both live exactly as long as the session.
#[derive(Debug)]
pub struct ClientSession {
    pub capture: TunBuilderCapture,
    pub stats: Arc<SessionStats>,
}

impl ClientSession {
    pub fn new(on_error: ErrorHandler) -> Self {
        Self {
            capture: TunBuilderCapture::new(),
            stats: Arc::new(SessionStats::new(on_error)),
        }
    }

    /// Handle for the transport thread that feeds the counters.
    #[must_use]
    pub fn stats_handle(&self) -> Arc<SessionStats> {
        Arc::clone(&self.stats)
    }

    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}Traffic:\n{}",
            self.capture.render(),
            self.stats.snapshot()
        )
    }

    #[must_use]
    pub fn report(&self) -> SessionReport<'_> {
        SessionReport {
            capture: &self.capture,
            stats: self.stats.snapshot(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.report())
    }
}

impl Default for ClientSession {
    fn default() -> Self {
        Self::new(noop_error_handler())
    }
}
