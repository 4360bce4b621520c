use std::fs::OpenOptions;
use std::path::Path;
use std::sync::OnceLock;

use slog::Drain;

/// Map a level name (as found in `RUST_LOG` or the config file) to a filter.
/// Anything unrecognised falls back to Info.
#[must_use]
pub fn parse_level(value: &str) -> log::LevelFilter {
    let lower = value.to_ascii_lowercase();
    if lower.contains("trace") {
        log::LevelFilter::Trace
    } else if lower.contains("debug") {
        log::LevelFilter::Debug
    } else if lower.contains("warn") {
        log::LevelFilter::Warn
    } else if lower.contains("error") {
        log::LevelFilter::Error
    } else if lower.contains("off") {
        log::LevelFilter::Off
    } else {
        log::LevelFilter::Info
    }
}

fn effective_level(verbose: bool) -> log::LevelFilter {
    match std::env::var("RUST_LOG") {
        Ok(value) => parse_level(&value),
        Err(_) if verbose => log::LevelFilter::Debug,
        Err(_) => log::LevelFilter::Info,
    }
}

/// Install `logger` as the process-wide slog logger and route the `log`
/// facade into it. Only the first call installs; later calls just adjust the
/// level. Returns whether this call installed the logger.
fn install_logger(logger: slog::Logger, level: log::LevelFilter) -> bool {
    static GLOBAL_GUARD: OnceLock<slog_scope::GlobalLoggerGuard> = OnceLock::new();

    let mut installed = false;
    GLOBAL_GUARD.get_or_init(|| {
        installed = true;
        let guard = slog_scope::set_global_logger(logger);
        if let Err(e) = slog_stdlog::init() {
            eprintln!("log bridge already set: {}", e);
        }
        guard
    });
    log::set_max_level(level);
    installed
}

fn async_root<D>(drain: D) -> slog::Logger
where
    D: Drain<Ok = (), Err = slog::Never> + Send + 'static,
{
    let drain = slog_async::Async::new(drain)
        .overflow_strategy(slog_async::OverflowStrategy::Block)
        .build()
        .fuse();
    slog::Logger::root(drain, slog::o!("app" => "tuncap"))
}

pub fn init_terminal(verbose: bool) {
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::CompactFormat::new(decorator).build().fuse();
    if !install_logger(async_root(drain), effective_level(verbose)) {
        tracing::debug!("terminal_logger_already_installed");
    }
}

pub fn init_file(path: &Path, verbose: bool) -> anyhow::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let decorator = slog_term::PlainDecorator::new(file);
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    if !install_logger(async_root(drain), effective_level(verbose)) {
        tracing::debug!(path = ?path.display().to_string(), "file_logger_already_installed");
    }
    Ok(())
}
