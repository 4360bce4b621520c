use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::OutputFormat;

#[derive(Parser)]
#[command(
    name = "tuncap",
    about = "Capture tun builder directives and inspect session stats",
    version = env!("TUNCAP_BUILD_VERSION"),
    long_version = env!("TUNCAP_LONG_VERSION")
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (default: ~/.config/tuncap/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Replay a JSON list of tun directives and print the captured config
    Replay {
        /// Path to the directive file
        file: PathBuf,

        /// Output format (overrides the config file)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
    },

    /// Decode a redirect-gateway flag mask (decimal or 0x-prefixed hex)
    Flags {
        mask: String,
    },

    /// List session stat kinds and their counter indices
    StatNames,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Parse a flag mask given as decimal or `0x` hex.
pub fn parse_mask(value: &str) -> anyhow::Result<u32> {
    let value = value.trim();
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse::<u32>(),
    };
    parsed.map_err(|e| anyhow::anyhow!("invalid flag mask {:?}: {}", value, e))
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{parse_mask, Cli, Command, FormatArg};

    #[test]
    fn parses_decimal_and_hex() {
        assert_eq!(parse_mask("17").unwrap(), 17);
        assert_eq!(parse_mask("0x11").unwrap(), 17);
        assert_eq!(parse_mask(" 0X3 ").unwrap(), 3);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_mask("def1").is_err());
        assert!(parse_mask("0xzz").is_err());
        assert!(parse_mask("-1").is_err());
    }

    #[test]
    fn replay_accepts_format_and_global_flags() {
        let cli = Cli::try_parse_from([
            "tuncap",
            "replay",
            "demos/directives.json",
            "--format",
            "json",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert!(cli.config.is_none());
        match cli.command {
            Command::Replay { file, format } => {
                assert_eq!(file.to_str(), Some("demos/directives.json"));
                assert!(matches!(format, Some(FormatArg::Json)));
            }
            _ => panic!("expected replay"),
        }
    }
}
