//! Per-session traffic counters and the transport error hook.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Returned by [`SessionStats::stat_name`] for an index outside [`StatKind`].
pub const UNKNOWN_STAT_NAME: &str = "UNKNOWN_STAT_TYPE";

/// Closed set of counted traffic categories. Discriminants are the stable
/// counter indices: new kinds go at the end, existing ones never move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatKind {
    /// Bytes received on the encrypted channel.
    BytesIn = 0,
    /// Bytes sent on the encrypted channel.
    BytesOut = 1,
    /// Bytes read from the tun interface.
    TunBytesIn = 2,
    /// Bytes written to the tun interface.
    TunBytesOut = 3,
}

impl StatKind {
    pub const COUNT: usize = 4;

    pub const ALL: [StatKind; Self::COUNT] = [
        StatKind::BytesIn,
        StatKind::BytesOut,
        StatKind::TunBytesIn,
        StatKind::TunBytesOut,
    ];

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::BytesIn => "BYTES_IN",
            Self::BytesOut => "BYTES_OUT",
            Self::TunBytesIn => "TUN_BYTES_IN",
            Self::TunBytesOut => "TUN_BYTES_OUT",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Receives `(error_type, detail)` whenever the transport reports a failure.
pub type ErrorHandler = Arc<dyn Fn(usize, Option<&str>) + Send + Sync>;

/// Wrap a closure as an [`ErrorHandler`].
pub fn error_handler<F>(handler: F) -> ErrorHandler
where
    F: Fn(usize, Option<&str>) + Send + Sync + 'static,
{
    Arc::new(handler)
}

/// Handler that drops every notification.
#[must_use]
pub fn noop_error_handler() -> ErrorHandler {
    error_handler(|_, _| {})
}

/// Handler that forwards notifications to the log at warn level.
#[must_use]
pub fn log_error_handler() -> ErrorHandler {
    error_handler(|error_type, detail| match detail {
        Some(text) => tracing::warn!(error_type, detail = ?text, "session_error"),
        None => tracing::warn!(error_type, "session_error"),
    })
}

/// Counter bank for one tunnel session.
///
/// Safe to share across threads: the transport can increment while a status
/// thread reads. Counters wrap on overflow (plain `fetch_add`).
pub struct SessionStats {
    stats: [AtomicI64; StatKind::COUNT],
    on_error: ErrorHandler,
}

impl SessionStats {
    pub fn new(on_error: ErrorHandler) -> Self {
        Self {
            stats: std::array::from_fn(|_| AtomicI64::new(0)),
            on_error,
        }
    }

    /// Add `value` to counter `stat_type`. Out-of-range indices are ignored.
    pub fn inc_stat(&self, stat_type: usize, value: i64) {
        if let Some(counter) = self.stats.get(stat_type) {
            counter.fetch_add(value, Ordering::Relaxed);
        }
    }

    /// Current value of counter `stat_type`, or 0 when out of range.
    #[must_use]
    pub fn get_stat(&self, stat_type: usize) -> i64 {
        self.stats
            .get(stat_type)
            .map_or(0, |counter| counter.load(Ordering::Relaxed))
    }

    pub fn inc(&self, kind: StatKind, value: i64) {
        self.inc_stat(kind.index(), value);
    }

    #[must_use]
    pub fn stat(&self, kind: StatKind) -> i64 {
        self.get_stat(kind.index())
    }

    #[must_use]
    pub fn stat_name(stat_type: usize) -> &'static str {
        StatKind::from_index(stat_type).map_or(UNKNOWN_STAT_NAME, StatKind::name)
    }

    /// Report a transport error to the installed handler.
    pub fn error(&self, error_type: usize, text: Option<&str>) {
        (self.on_error)(error_type, text);
    }

    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            bytes_in: self.stat(StatKind::BytesIn),
            bytes_out: self.stat(StatKind::BytesOut),
            tun_bytes_in: self.stat(StatKind::TunBytesIn),
            tun_bytes_out: self.stat(StatKind::TunBytesOut),
        }
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new(noop_error_handler())
    }
}

impl fmt::Debug for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStats")
            .field("stats", &self.snapshot())
            .finish_non_exhaustive()
    }
}

/// Point-in-time copy of every counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub bytes_in: i64,
    pub bytes_out: i64,
    pub tun_bytes_in: i64,
    pub tun_bytes_out: i64,
}

impl StatsSnapshot {
    #[must_use]
    pub fn get(&self, kind: StatKind) -> i64 {
        match kind {
            StatKind::BytesIn => self.bytes_in,
            StatKind::BytesOut => self.bytes_out,
            StatKind::TunBytesIn => self.tun_bytes_in,
            StatKind::TunBytesOut => self.tun_bytes_out,
        }
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for kind in StatKind::ALL {
            writeln!(f, "{}={}", kind.name(), self.get(kind))?;
        }
        Ok(())
    }
}
