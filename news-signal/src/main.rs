//! news-signal CLI - score headlines into trading signals

use anyhow::{Context, Result};
use clap::Parser;
use news_signal::{SignalConfig, SignalPipeline};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "news-signal")]
#[command(about = "Turn news headlines into company, sentiment and trading bias")]
struct Cli {
    /// Headlines to analyze; read one per line from stdin when omitted
    #[arg(value_name = "TEXT")]
    texts: Vec<String>,

    /// TOML config file, which must exist; without it config/news-signal.toml is read if present
    #[arg(short, long)]
    config: Option<String>,

    /// Use the offline keyword classifier instead of the hosted model
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr, signals to stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cfg = SignalConfig::load(cli.config.as_deref())?;
    info!(
        companies = ?cfg.companies.symbols(),
        offline = cli.offline,
        "Configuration loaded"
    );

    let pipeline = SignalPipeline::from_config(&cfg, cli.offline)?;
    pipeline.start().await?;

    let texts = if cli.texts.is_empty() {
        read_stdin_lines().await?
    } else {
        cli.texts
    };

    let mut failures = 0usize;
    for text in &texts {
        match pipeline.analyze(text).await {
            Ok(signal) => println!("{}", serde_json::to_string(&signal)?),
            Err(e) => {
                error!(text = %text, "Analysis failed: {}", e);
                failures += 1;
            }
        }
    }

    pipeline.stop().await?;

    anyhow::ensure!(failures == 0, "{} of {} headlines failed", failures, texts.len());
    Ok(())
}

async fn read_stdin_lines() -> Result<Vec<String>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut texts = Vec::new();

    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let line = line.trim();
        if !line.is_empty() {
            texts.push(line.to_string());
        }
    }

    Ok(texts)
}
