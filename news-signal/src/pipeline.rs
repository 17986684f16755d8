//! Signal Pipeline - turns free text into a trading signal
//!
//! Composes the three stages:
//! - Company attribution against the configured universe
//! - Sentiment scoring against {positive, negative, neutral}
//! - Confidence-gated adjustment of the sentiment reading
//!
//! Both classification stages share one injected classifier. The pipeline keeps
//! no state between calls, so one instance can serve many tasks at once.

use crate::adjuster::adjust_output;
use crate::classifier::{InferenceApiClassifier, KeywordClassifier, ZeroShotClassifier};
use crate::company::CompanyAttributor;
use crate::config::{CompanyUniverse, SignalConfig};
use crate::error::Result;
use crate::sentiment::SentimentScorer;
use common::Signal;
use std::sync::Arc;
use tracing::{debug, info};

pub struct SignalPipeline {
    classifier: Arc<dyn ZeroShotClassifier>,
    attributor: CompanyAttributor,
    scorer: SentimentScorer,
}

impl SignalPipeline {
    /// Create a pipeline around an already constructed classifier
    pub fn new(classifier: Arc<dyn ZeroShotClassifier>, universe: CompanyUniverse) -> Self {
        Self {
            attributor: CompanyAttributor::new(Arc::clone(&classifier), universe),
            scorer: SentimentScorer::new(Arc::clone(&classifier)),
            classifier,
        }
    }

    /// Build the classifier named by `cfg` and wrap it
    ///
    /// `offline` selects the keyword classifier instead of the hosted model.
    pub fn from_config(cfg: &SignalConfig, offline: bool) -> anyhow::Result<Self> {
        let classifier: Arc<dyn ZeroShotClassifier> = if offline {
            Arc::new(KeywordClassifier::new(&cfg.keywords)?)
        } else {
            Arc::new(InferenceApiClassifier::new(&cfg.classifier)?)
        };

        Ok(Self::new(classifier, cfg.companies.clone()))
    }

    pub fn classifier(&self) -> &Arc<dyn ZeroShotClassifier> {
        &self.classifier
    }

    pub fn universe(&self) -> &CompanyUniverse {
        self.attributor.universe()
    }

    /// Start the underlying classifier
    pub async fn start(&self) -> Result<()> {
        info!(classifier = self.classifier.name(), "Signal pipeline starting");
        self.classifier.on_start().await
    }

    /// Stop the underlying classifier
    pub async fn stop(&self) -> Result<()> {
        info!(classifier = self.classifier.name(), "Signal pipeline stopping");
        self.classifier.on_stop().await
    }

    /// Run all stages on `text`
    ///
    /// Any classifier failure fails the whole call; no partial signal is
    /// returned.
    pub async fn analyze(&self, text: &str) -> Result<Signal> {
        debug!(text, "Analyzing");

        let detected_company = self.attributor.attribute(text).await?;
        let sentiment = self.scorer.score(text).await?;
        let adjustment = adjust_output(sentiment.label, sentiment.confidence);

        info!(
            company = %detected_company,
            sentiment = %sentiment.label,
            confidence = sentiment.confidence,
            adjustment,
            "Signal generated"
        );

        Ok(Signal {
            detected_company,
            sentiment_label: sentiment.label,
            sentiment_confidence: sentiment.confidence,
            adjustment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{ClassificationResult, ClassifierStatus};
    use crate::error::PipelineError;
    use async_trait::async_trait;
    use common::{DetectedCompany, SentimentLabel};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers company and sentiment queries with fixed top scores
    struct FixedClassifier {
        company: (&'static str, f64),
        sentiment: (&'static str, f64),
        calls: AtomicUsize,
    }

    impl FixedClassifier {
        fn new(company: (&'static str, f64), sentiment: (&'static str, f64)) -> Arc<Self> {
            Arc::new(Self {
                company,
                sentiment,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ZeroShotClassifier for FixedClassifier {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn status(&self) -> ClassifierStatus {
            ClassifierStatus::Ready
        }

        async fn classify(&self, _text: &str, candidate_labels: &[String]) -> Result<ClassificationResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            let (top, score) = if candidate_labels.iter().any(|l| l == "positive") {
                self.sentiment
            } else {
                self.company
            };

            // spread the remainder evenly over the other candidates
            let rest = (1.0 - score) / (candidate_labels.len() - 1).max(1) as f64;
            let scores = candidate_labels
                .iter()
                .map(|l| if l == top { score } else { rest })
                .collect();
            ClassificationResult::from_parallel(candidate_labels.to_vec(), scores)
        }

        async fn on_start(&self) -> Result<()> {
            Ok(())
        }

        async fn on_stop(&self) -> Result<()> {
            Ok(())
        }
    }

    fn pipeline(classifier: Arc<FixedClassifier>) -> SignalPipeline {
        SignalPipeline::new(classifier, CompanyUniverse::default())
    }

    #[tokio::test]
    async fn test_attribution_threshold_is_exclusive() {
        let at_threshold = pipeline(FixedClassifier::new(("NVDA", 0.5), ("neutral", 0.6)));
        let signal = at_threshold.analyze("text").await.unwrap();
        assert_eq!(signal.detected_company, DetectedCompany::Unknown);

        let above = pipeline(FixedClassifier::new(("NVDA", 0.51), ("neutral", 0.6)));
        let signal = above.analyze("text").await.unwrap();
        assert_eq!(signal.detected_company, DetectedCompany::Company("NVDA".to_string()));
    }

    #[tokio::test]
    async fn test_sentiment_reported_verbatim() {
        let p = pipeline(FixedClassifier::new(("ING", 0.8), ("positive", 0.42)));
        let signal = p.analyze("text").await.unwrap();

        assert_eq!(signal.sentiment_label, SentimentLabel::Positive);
        assert_eq!(signal.sentiment_confidence, 0.42);
        assert_eq!(signal.adjustment, 0.0);
    }

    #[tokio::test]
    async fn test_two_classifier_calls_per_text() {
        let classifier = FixedClassifier::new(("PFE", 0.8), ("negative", 0.93));
        let p = pipeline(Arc::clone(&classifier));

        p.analyze("PFE faces major lawsuit").await.unwrap();
        p.analyze("PFE faces major lawsuit").await.unwrap();

        assert_eq!(classifier.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_repeated_calls_are_identical() {
        let p = pipeline(FixedClassifier::new(("CSCO", 0.7), ("negative", 0.95)));

        let first = p.analyze("Cisco cuts guidance").await.unwrap();
        let second = p.analyze("Cisco cuts guidance").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_from_config_offline() {
        let p = SignalPipeline::from_config(&SignalConfig::default(), true).unwrap();
        assert_eq!(p.classifier().name(), "keyword");
        assert_eq!(p.universe(), &CompanyUniverse::default());

        p.start().await.unwrap();
        let signal = p.analyze("Nvidia shares surge to record after earnings beat").await.unwrap();
        assert_eq!(signal.detected_company, DetectedCompany::Company("NVDA".to_string()));
        assert_eq!(signal.sentiment_label, SentimentLabel::Positive);

        p.stop().await.unwrap();
        let err = p.analyze("anything").await.unwrap_err();
        assert!(matches!(err, PipelineError::ClassifierUnavailable(_)));
    }
}
