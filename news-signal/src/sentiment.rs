//! Sentiment scoring
//!
//! Reports the model's raw best guess. Whether that guess is strong enough to
//! move a trade is decided separately by [`crate::adjuster::adjust_output`].

use crate::classifier::ZeroShotClassifier;
use crate::error::{PipelineError, Result};
use common::SentimentLabel;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Raw sentiment reading for one piece of text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub label: SentimentLabel,
    pub confidence: f64, // 0.0 to 1.0
}

pub struct SentimentScorer {
    classifier: Arc<dyn ZeroShotClassifier>,
    candidates: Vec<String>,
}

impl SentimentScorer {
    pub fn new(classifier: Arc<dyn ZeroShotClassifier>) -> Self {
        Self {
            classifier,
            candidates: SentimentLabel::ALL
                .iter()
                .map(|l| l.as_str().to_string())
                .collect(),
        }
    }

    /// Top sentiment label and its score, unthresholded
    pub async fn score(&self, text: &str) -> Result<SentimentScore> {
        let result = self.classifier.classify(text, &self.candidates).await?;
        result.ensure_within(&self.candidates)?;

        let (label, confidence) = result.top();
        let label = label
            .parse::<SentimentLabel>()
            .map_err(PipelineError::MalformedClassification)?;

        debug!(label = %label, confidence, "Sentiment scored");
        Ok(SentimentScore { label, confidence })
    }
}
