//! CLI argument definitions for the triage binary.
//!
//! Config file resolution: --config flag > TRIAGE_CONFIG env var > ~/.triage/config.toml.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDateTime};
use clap::{Parser, Subcommand};

/// Triage - scores, summarizes and extracts actions from operations messages.
#[derive(Parser, Debug)]
#[command(name = "triage", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze messages and print one JSON result per line.
    ///
    /// Input is a JSON message, array of messages, or plain text. Without
    /// --input or --text it is read from stdin.
    Analyze {
        /// JSON file of messages.
        #[arg(short = 'i', long = "input")]
        input: Option<PathBuf>,

        /// Analyze this text as a single message.
        #[arg(short = 't', long = "text", conflicts_with = "input")]
        text: Option<String>,

        /// Reference time for resolving relative dates (RFC 3339 or
        /// YYYY-MM-DDTHH:MM:SS). Defaults to the local clock.
        #[arg(long = "now", value_parser = parse_reference_time)]
        now: Option<NaiveDateTime>,
    },

    /// Print the dependency map for a JSON array of tasks.
    Dependencies {
        /// JSON file of tasks; stdin when omitted.
        #[arg(short = 'i', long = "input")]
        input: Option<PathBuf>,
    },

    /// Print the effective configuration as TOML.
    Config {
        /// Write the configuration to this path instead of printing it.
        #[arg(long = "write")]
        write: Option<PathBuf>,
    },
}

impl CliArgs {
    /// Resolve the configuration file path.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("TRIAGE_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Log filter directive: --log-level flag, else the configured level.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

/// Accepts RFC 3339 (the offset's local wall time is kept) or a naive
/// `YYYY-MM-DDTHH:MM[:SS]`.
pub fn parse_reference_time(s: &str) -> Result<NaiveDateTime, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .map_err(|e| format!("invalid reference time '{s}': {e}"))
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".triage").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".triage").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_analyze_args() {
        let args = CliArgs::try_parse_from([
            "triage",
            "analyze",
            "--text",
            "Mop the lobby",
            "--now",
            "2026-03-11T08:00:00",
        ])
        .unwrap();
        match args.command {
            Command::Analyze { input, text, now } => {
                assert!(input.is_none());
                assert_eq!(text.as_deref(), Some("Mop the lobby"));
                assert_eq!(
                    now,
                    NaiveDate::from_ymd_opt(2026, 3, 11).unwrap().and_hms_opt(8, 0, 0)
                );
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_input_and_text_conflict() {
        let res = CliArgs::try_parse_from([
            "triage", "analyze", "--input", "a.json", "--text", "hi",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let args =
            CliArgs::try_parse_from(["triage", "config", "--config", "/tmp/triage.toml"]).unwrap();
        assert_eq!(args.resolve_config_path(), PathBuf::from("/tmp/triage.toml"));
        assert_eq!(args.resolve_log_level("warn"), "warn");
    }

    #[test]
    fn test_reference_time_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 3, 11)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        assert_eq!(parse_reference_time("2026-03-11T08:30:00+02:00"), Ok(expected));
        assert_eq!(parse_reference_time("2026-03-11T08:30"), Ok(expected));
        assert!(parse_reference_time("next tuesday").is_err());
    }
}
