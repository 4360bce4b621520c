use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, error};

use tuncap::cli::{self, Cli, Command};
use tuncap::config::{self, AppConfig, OutputFormat};
use tuncap::logging;
use tuncap::stats::{log_error_handler, SessionStats, StatKind};
use tuncap::tun::{directive, RedirectGatewayFlags, TracingTunBuilder};
use tuncap::ClientSession;

fn main() {
    let cli = Cli::parse();

    let app_config = match load_config(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(1);
        }
    };
    init_logging(&app_config, cli.verbose);

    if let Err(e) = run(cli.command, &app_config) {
        error!("{:#}", e);
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let cfg = match path {
        Some(p) => config::load_from(p)
            .with_context(|| format!("failed to load config {}", p.display()))?,
        None => config::load().context("failed to load config")?,
    };
    Ok(cfg)
}

fn init_logging(app_config: &AppConfig, verbose_flag: bool) {
    let verbose = verbose_flag || app_config.general.verbose;
    match app_config.general.log_file.as_deref() {
        Some(path) => {
            if let Err(e) = logging::init_file(Path::new(path), verbose) {
                eprintln!("cannot open log file {}: {}; logging to stderr", path, e);
                logging::init_terminal(verbose);
            }
        }
        None => logging::init_terminal(verbose),
    }
}

fn run(command: Command, app_config: &AppConfig) -> anyhow::Result<()> {
    match command {
        Command::Replay { file, format } => {
            let directives = directive::load_directives(&file)
                .with_context(|| format!("failed to read directives from {}", file.display()))?;
            debug!(
                count = directives.len(),
                path = ?file.display().to_string(),
                "tun_directives_loaded"
            );

            let mut session = ClientSession::new(log_error_handler());
            directive::replay(&mut TracingTunBuilder::new(&mut session.capture), &directives)?;

            let format = format.map_or(app_config.output.format, OutputFormat::from);
            match format {
                OutputFormat::Text => print!("{}", session.capture.render()),
                OutputFormat::Json => println!("{}", session.to_json()?),
            }
        }
        Command::Flags { mask } => {
            let mask = cli::parse_mask(&mask)?;
            println!("{}", RedirectGatewayFlags(mask));
        }
        Command::StatNames => {
            for kind in StatKind::ALL {
                println!("{}\t{}", kind.index(), SessionStats::stat_name(kind.index()));
            }
        }
    }
    Ok(())
}
