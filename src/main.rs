//! CLI entry point for the embedding store.
//!
//! Provides commands for configuration, one-off embeddings, and running a
//! stream of JSON requests against a single in-process store.

use anyhow::{Context, Result};
use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use vecsearch::service::EmbedRequest;
use vecsearch::{Settings, VectorService};

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Embedding store with exact similarity search
#[derive(Parser)]
#[command(
    name = "vecsearch",
    version = env!("CARGO_PKG_VERSION"),
    about = "Embedding store with exact cosine similarity search",
    next_line_help = true,
    styles = clap_cargo_style(),
    after_help = "Request stream example:\n  {\"op\":\"store\",\"id\":\"d1\",\"text\":\"cat\"}\n  {\"op\":\"search\",\"query_text\":\"cat\",\"top_k\":2}\n  {\"op\":\"list\",\"limit\":10}"
)]
struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true, env = "VECSEARCH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Initialize project
    #[command(about = "Set up .vecsearch directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration settings
    #[command(about = "Display active settings")]
    Config,

    /// Embed a single text and print the vector
    Embed {
        text: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Execute newline-delimited JSON requests against one store
    #[command(
        long_about = "Read one JSON request per line from FILE (or stdin), execute each in order, \
                      and print one JSON response per line. Blank lines and lines starting with '#' \
                      are skipped. Exits with status 1 if any request failed."
    )]
    Run {
        /// Request file; stdin when omitted
        file: Option<PathBuf>,
    },
}

/// Load settings and start logging at the configured level.
fn load_settings(config: Option<&Path>) -> Result<Settings> {
    let settings = match config {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("Configuration error loading from {}", path.display()))?,
        None => Settings::load().context("Configuration error")?,
    };
    vecsearch::logging::init(&settings.logging.level);
    Ok(settings)
}

/// Execute every request line, printing responses. Returns the failure count.
async fn run_requests<R>(service: &VectorService, reader: R) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut failures = 0;

    while let Some(line) = lines.next_line().await.context("Failed to read request")? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let response = service.handle_json(line).await;
        if response.is_error() {
            failures += 1;
        }
        println!("{}", serde_json::to_string(&response)?);
    }

    Ok(failures)
}

async fn run(cli: Cli) -> Result<bool> {
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Init { force } => {
            let path = Settings::init_config_file(force).map_err(|e| anyhow::anyhow!("{e}"))?;
            println!("Created configuration file at: {}", path.display());
            println!("Edit this file to customize your settings.");
            Ok(true)
        }

        Commands::Config => {
            let settings = load_settings(config)?;
            println!("Current Configuration:");
            println!("{}", "=".repeat(50));
            println!("{}", toml::to_string_pretty(&settings)?);
            Ok(true)
        }

        Commands::Embed { text, json } => {
            let service = VectorService::from_settings(&load_settings(config)?)?;
            let response = service.embed(EmbedRequest { text }).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("dimension: {}", response.dimension);
                let values: Vec<String> =
                    response.embedding.iter().map(|v| format!("{v:.6}")).collect();
                println!("[{}]", values.join(", "));
            }
            Ok(true)
        }

        Commands::Run { file } => {
            let service = VectorService::from_settings(&load_settings(config)?)?;
            let failures = match file {
                Some(path) => {
                    let file = tokio::fs::File::open(&path)
                        .await
                        .with_context(|| format!("Cannot open {}", path.display()))?;
                    run_requests(&service, BufReader::new(file)).await?
                }
                None => run_requests(&service, BufReader::new(tokio::io::stdin())).await?,
            };
            if failures > 0 {
                tracing::warn!(failures, "some requests failed");
            }
            Ok(failures == 0)
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}
