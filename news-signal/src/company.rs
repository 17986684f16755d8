//! Company attribution
//!
//! Decides which tracked company, if any, a piece of text is about.

use crate::classifier::ZeroShotClassifier;
use crate::config::CompanyUniverse;
use crate::error::Result;
use common::DetectedCompany;
use std::sync::Arc;
use tracing::debug;

/// Top score must be strictly above this to attribute a company
pub const ATTRIBUTION_THRESHOLD: f64 = 0.5;

pub struct CompanyAttributor {
    classifier: Arc<dyn ZeroShotClassifier>,
    universe: CompanyUniverse,
}

impl CompanyAttributor {
    pub fn new(classifier: Arc<dyn ZeroShotClassifier>, universe: CompanyUniverse) -> Self {
        Self {
            classifier,
            universe,
        }
    }

    pub fn universe(&self) -> &CompanyUniverse {
        &self.universe
    }

    /// Attribute `text` to the best-scoring tracked company
    pub async fn attribute(&self, text: &str) -> Result<DetectedCompany> {
        let candidates = self.universe.symbols();
        let result = self.classifier.classify(text, candidates).await?;
        result.ensure_within(candidates)?;

        let (label, score) = result.top();
        let detected = if score > ATTRIBUTION_THRESHOLD {
            DetectedCompany::Company(label.to_string())
        } else {
            DetectedCompany::Unknown
        };

        debug!(top = label, score, detected = %detected, "Company attribution");
        Ok(detected)
    }
}
