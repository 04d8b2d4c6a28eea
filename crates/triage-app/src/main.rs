//! Triage application binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Build the `Analyzer` once (fatal on failure)
//! 3. Run the requested command, printing JSON to stdout
//!
//! Logs go to stderr so stdout stays machine-readable.

mod cli;
mod input;

use std::path::Path;
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use clap::Parser;
use tokio::io::AsyncReadExt;
use tokio::sync::Semaphore;

use triage_core::{Message, MessageSource, TriageConfig};
use triage_insight::Analyzer;

use cli::{CliArgs, Command};
use input::{parse_messages, parse_tasks};

/// Read a file, or all of stdin when no path is given.
async fn read_input(path: Option<&Path>) -> std::io::Result<String> {
    match path {
        Some(p) => tokio::fs::read_to_string(p).await,
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            Ok(buf)
        }
    }
}

/// Analyze every message against the others, at most one per core at a time.
/// Results are printed in input order.
async fn analyze_batch(
    analyzer: Arc<Analyzer>,
    messages: Vec<Message>,
    now: NaiveDateTime,
) -> Result<(), Box<dyn std::error::Error>> {
    let workers = std::thread::available_parallelism().map_or(1, |n| n.get());
    let permits = Arc::new(Semaphore::new(workers));
    let messages = Arc::new(messages);
    tracing::info!(messages = messages.len(), workers, "Analyzing batch");

    let mut handles = Vec::with_capacity(messages.len());
    for index in 0..messages.len() {
        let permit = Arc::clone(&permits).acquire_owned().await?;
        let analyzer = Arc::clone(&analyzer);
        let messages = Arc::clone(&messages);
        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            analyzer.analyze_at(&messages[index], &messages, now)
        }));
    }

    for handle in handles {
        let result = handle.await?;
        println!("{}", serde_json::to_string(&result)?);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let config_exists = config_file.exists();
    let config = if config_exists {
        TriageConfig::load_or_default(&config_file)
    } else {
        TriageConfig::default()
    };

    // Tracing.
    let level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .init();

    tracing::info!("Starting triage v{}", env!("CARGO_PKG_VERSION"));
    if config_exists {
        tracing::info!(path = %config_file.display(), "Configuration loaded");
    } else {
        tracing::info!(path = %config_file.display(), "No configuration file, using defaults");
    }

    match args.command {
        Command::Config { write } => {
            config.validate()?;
            match write {
                Some(path) => {
                    config.save(&path)?;
                    tracing::info!(path = %path.display(), "Configuration written");
                }
                None => print!("{}", toml::to_string_pretty(&config)?),
            }
        }

        Command::Analyze { input, text, now } => {
            let messages = match text {
                Some(t) => vec![Message::new("", t, MessageSource::Manual)],
                None => parse_messages(&read_input(input.as_deref()).await?)?,
            };
            if messages.is_empty() {
                tracing::warn!("No messages to analyze");
                return Ok(());
            }

            let analyzer = Arc::new(Analyzer::new(config)?);
            let now = now.unwrap_or_else(|| Local::now().naive_local());
            analyze_batch(analyzer, messages, now).await?;
        }

        Command::Dependencies { input } => {
            let tasks = parse_tasks(&read_input(input.as_deref()).await?)?;
            let analyzer = Analyzer::new(config)?;
            let map = tokio::task::spawn_blocking(move || analyzer.analyze_dependencies(&tasks)).await?;
            tracing::info!(tasks_with_dependencies = map.len(), "Dependency analysis complete");
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
    }

    Ok(())
}
