//! Zero-shot classification capability
//!
//! The pipeline treats classification as a black box: given text and a list of
//! candidate labels, rank the labels by a probability-like score. Concrete
//! backends implement [`ZeroShotClassifier`] and are injected into the
//! pipeline at construction time.

pub mod inference_api;
pub mod keyword;

pub use inference_api::InferenceApiClassifier;
pub use keyword::KeywordClassifier;

use crate::error::{PipelineError, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::cmp::Ordering;
use tokio::sync::RwLock;

/// Scores may overshoot [0, 1] by float noise from softmax normalisation
const SCORE_TOLERANCE: f64 = 1e-6;

/// Lifecycle state of a classifier backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ClassifierStatus {
    #[default]
    Idle,
    Ready,
    Stopped,
}

/// Black-box zero-shot classifier
///
/// One instance is created at startup, started once, shared by every stage of
/// the pipeline and stopped explicitly on shutdown. Implementations must be
/// safe to call concurrently.
#[async_trait]
pub trait ZeroShotClassifier: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Current lifecycle state
    async fn status(&self) -> ClassifierStatus;

    /// Rank `candidate_labels` for `text`
    ///
    /// Fails with [`PipelineError::ClassifierUnavailable`] when the backend
    /// cannot be reached (or has been stopped) and with
    /// [`PipelineError::MalformedClassification`] when the answer does not
    /// have the expected shape.
    async fn classify(&self, text: &str, candidate_labels: &[String]) -> Result<ClassificationResult>;

    /// Called once before the first classification
    async fn on_start(&self) -> Result<()>;

    /// Called once on shutdown; later calls to `classify` fail
    async fn on_stop(&self) -> Result<()>;
}

/// Ranked output of one classification call
///
/// Always non-empty and sorted descending by score. Equal scores keep the
/// order the backend reported them in.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    ranked: Vec<(String, f64)>,
}

impl ClassificationResult {
    /// Build from the parallel `labels` / `scores` sequences a backend returns
    pub fn from_parallel(labels: Vec<String>, scores: Vec<f64>) -> Result<Self> {
        if labels.len() != scores.len() {
            return Err(PipelineError::MalformedClassification(format!(
                "{} labels but {} scores",
                labels.len(),
                scores.len()
            )));
        }

        Self::from_pairs(labels.into_iter().zip(scores).collect())
    }

    /// Build from (label, score) pairs in any order
    pub fn from_pairs(pairs: Vec<(String, f64)>) -> Result<Self> {
        if pairs.is_empty() {
            return Err(PipelineError::MalformedClassification(
                "empty result".to_string(),
            ));
        }

        let mut ranked = Vec::with_capacity(pairs.len());
        for (label, score) in pairs {
            if !score.is_finite() || score < -SCORE_TOLERANCE || score > 1.0 + SCORE_TOLERANCE {
                return Err(PipelineError::MalformedClassification(format!(
                    "score {} for label '{}' is outside [0, 1]",
                    score, label
                )));
            }
            ranked.push((label, score.clamp(0.0, 1.0)));
        }

        // sort_by is stable, ties keep backend order
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        Ok(Self { ranked })
    }

    /// Best (label, score) pair
    pub fn top(&self) -> (&str, f64) {
        let (label, score) = &self.ranked[0];
        (label.as_str(), *score)
    }

    /// Labels, best first
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.ranked.iter().map(|(label, _)| label.as_str())
    }

    /// Scores parallel to [`labels`](Self::labels)
    pub fn scores(&self) -> impl Iterator<Item = f64> + '_ {
        self.ranked.iter().map(|(_, score)| *score)
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    /// Reject results carrying labels that were never offered
    pub fn ensure_within(&self, candidate_labels: &[String]) -> Result<()> {
        match self.labels().find(|label| !candidate_labels.iter().any(|c| c == label)) {
            Some(stray) => Err(PipelineError::MalformedClassification(format!(
                "label '{}' is not one of the candidates",
                stray
            ))),
            None => Ok(()),
        }
    }
}

/// Shared lifecycle bookkeeping for classifier backends
#[derive(Debug, Default)]
pub(crate) struct Lifecycle {
    status: RwLock<ClassifierStatus>,
}

impl Lifecycle {
    pub(crate) async fn status(&self) -> ClassifierStatus {
        *self.status.read().await
    }

    pub(crate) async fn set(&self, status: ClassifierStatus) {
        *self.status.write().await = status;
    }

    pub(crate) async fn ensure_open(&self, name: &str) -> Result<()> {
        if self.status().await == ClassifierStatus::Stopped {
            return Err(PipelineError::ClassifierUnavailable(format!(
                "{} has been stopped",
                name
            )));
        }
        Ok(())
    }
}
