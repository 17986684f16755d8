//! Example usage of the News Signal pipeline
//!
//! This example demonstrates:
//! 1. Building the pipeline around the offline keyword classifier
//! 2. Scoring a handful of headlines
//! 3. Explicit classifier shutdown

use anyhow::Result;
use news_signal::{SignalConfig, SignalPipeline};
use tracing::{info, Level};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("News Signal - Example");
    info!("=====================");

    // Step 1: Build the pipeline from default configuration
    let cfg = SignalConfig::default();
    let pipeline = SignalPipeline::from_config(&cfg, true)?;
    pipeline.start().await?;
    info!("Pipeline ready, tracking {:?}", pipeline.universe().symbols());

    // Step 2: Score headlines
    let headlines = [
        "NVDA beats earnings expectations with record data center revenue",
        "Market closed flat today",
        "PFE faces major lawsuit after recall, shares plunge",
        "Santander holds dividend steady",
        "Cisco rallies on strong guidance",
    ];

    for headline in headlines {
        let signal = pipeline.analyze(headline).await?;
        info!(
            "{:<70} -> {:<7} {:<8} {:.3} {:+.1}",
            headline,
            signal.detected_company,
            signal.sentiment_label,
            signal.sentiment_confidence,
            signal.adjustment
        );
    }

    // Step 3: Shut the classifier down
    pipeline.stop().await?;
    info!("Done");

    Ok(())
}
