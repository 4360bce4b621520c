// tuncap library crate
//
// Records tun builder directives into an inspectable snapshot and keeps
// per-session traffic counters. The binary in main.rs is a thin CLI over it.

// Ambient infrastructure
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;

// Tunnel configuration capture
pub mod tun;

// Traffic accounting
pub mod session;
pub mod stats;

pub use error::{AppError, Result};
pub use session::ClientSession;
pub use stats::{SessionStats, StatKind};
pub use tun::{TunBuilder, TunBuilderCapture};
