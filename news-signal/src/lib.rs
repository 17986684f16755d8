//! News Signal - text-to-signal pipeline
//!
//! This crate turns free text such as a news headline into a trading signal.
//! It includes:
//! - A zero-shot classifier seam with a hosted and an offline backend
//! - Company attribution against a configured ticker universe
//! - Sentiment scoring and the confidence-gated adjustment derived from it
//! - The pipeline composing those stages

pub mod adjuster;
pub mod classifier;
pub mod company;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod sentiment;

// Re-export commonly used types
pub use adjuster::adjust_output;
pub use classifier::{
    ClassificationResult, ClassifierStatus, InferenceApiClassifier, KeywordClassifier,
    ZeroShotClassifier,
};
pub use company::CompanyAttributor;
pub use self::config::{ClassifierConfig, CompanyUniverse, SignalConfig};
pub use error::PipelineError;
pub use pipeline::SignalPipeline;
pub use sentiment::{SentimentScore, SentimentScorer};

// Re-export common types for convenience
pub use common::{DetectedCompany, SentimentLabel, Signal};
