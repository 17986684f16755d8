//! Offline keyword classifier
//!
//! Deterministic stand-in for a hosted model. Each candidate label is scored by
//! how many of its lexicon entries (plus the label text itself) occur in the
//! input as whole words, then normalised so the scores sum to one. Text with no
//! hits at all comes out uniform, which keeps company attribution at `unknown`.
//!
//! Lexicon entries match in any case. A label containing capitals, such as a
//! ticker, only matches exactly as written, so "San Francisco" is not `SAN`.

use super::{ClassificationResult, ClassifierStatus, Lifecycle, ZeroShotClassifier};
use crate::error::{PipelineError, Result};
use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Pseudo-count added to every label before normalising
const PRIOR: f64 = 0.1;

pub struct KeywordClassifier {
    lexicon: HashMap<String, Vec<Regex>>,
    /// Compiled label patterns, keyed by the label as offered
    label_patterns: RwLock<HashMap<String, Regex>>,
    lifecycle: Lifecycle,
}

impl KeywordClassifier {
    /// Build from a label -> keywords map. Keys are looked up case-insensitively.
    pub fn new(keywords: &HashMap<String, Vec<String>>) -> anyhow::Result<Self> {
        let mut lexicon = HashMap::new();
        let mut label_patterns = HashMap::new();
        for (label, words) in keywords {
            let patterns = words
                .iter()
                .map(|w| word_pattern(w))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            lexicon.insert(label.to_lowercase(), patterns);
            label_patterns.insert(label.clone(), label_pattern(label)?);
        }

        Ok(Self {
            lexicon,
            label_patterns: RwLock::new(label_patterns),
            lifecycle: Lifecycle::default(),
        })
    }

    async fn own_pattern(&self, label: &str) -> Result<Regex> {
        if let Some(pattern) = self.label_patterns.read().await.get(label) {
            return Ok(pattern.clone());
        }

        let pattern = label_pattern(label).map_err(|e| {
            PipelineError::ClassifierUnavailable(format!("cannot match label '{}': {}", label, e))
        })?;
        self.label_patterns
            .write()
            .await
            .insert(label.to_string(), pattern.clone());
        Ok(pattern)
    }

    async fn hits(&self, text: &str, label: &str) -> Result<usize> {
        let mut count = self.own_pattern(label).await?.find_iter(text).count();
        if let Some(patterns) = self.lexicon.get(&label.to_lowercase()) {
            count += patterns.iter().map(|p| p.find_iter(text).count()).sum::<usize>();
        }
        Ok(count)
    }
}

fn word_pattern(word: &str) -> std::result::Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(word.trim())))
}

fn label_pattern(label: &str) -> std::result::Result<Regex, regex::Error> {
    if label.chars().any(char::is_uppercase) {
        Regex::new(&format!(r"\b{}\b", regex::escape(label.trim())))
    } else {
        word_pattern(label)
    }
}

#[async_trait]
impl ZeroShotClassifier for KeywordClassifier {
    fn name(&self) -> &str {
        "keyword"
    }

    async fn status(&self) -> ClassifierStatus {
        self.lifecycle.status().await
    }

    async fn classify(&self, text: &str, candidate_labels: &[String]) -> Result<ClassificationResult> {
        self.lifecycle.ensure_open(self.name()).await?;

        let mut weights = Vec::with_capacity(candidate_labels.len());
        for label in candidate_labels {
            weights.push(self.hits(text, label).await? as f64 + PRIOR);
        }

        let total: f64 = weights.iter().sum();
        let scores: Vec<f64> = weights.iter().map(|w| w / total).collect();

        debug!(labels = ?candidate_labels, scores = ?scores, "Keyword classification");

        ClassificationResult::from_parallel(candidate_labels.to_vec(), scores)
    }

    async fn on_start(&self) -> Result<()> {
        info!(labels = self.lexicon.len(), "Keyword classifier starting");
        self.lifecycle.set(ClassifierStatus::Ready).await;
        Ok(())
    }

    async fn on_stop(&self) -> Result<()> {
        info!("Keyword classifier stopping");
        self.lifecycle.set(ClassifierStatus::Stopped).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> KeywordClassifier {
        let mut keywords = HashMap::new();
        keywords.insert("positive".to_string(), vec!["beats".to_string(), "record".to_string()]);
        keywords.insert("negative".to_string(), vec!["lawsuit".to_string()]);
        keywords.insert("PFE".to_string(), vec!["pfizer".to_string()]);
        KeywordClassifier::new(&keywords).unwrap()
    }

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_ticker_in_text_wins() {
        let result = classifier()
            .classify("NVDA beats earnings expectations", &labels(&["NVDA", "ING", "PFE"]))
            .await
            .unwrap();

        let (label, score) = result.top();
        assert_eq!(label, "NVDA");
        assert!(score > 0.5);
    }

    #[tokio::test]
    async fn test_lexicon_alias_matches_case_insensitively() {
        let result = classifier()
            .classify("PFIZER faces major lawsuit", &labels(&["NVDA", "PFE"]))
            .await
            .unwrap();

        assert_eq!(result.top().0, "PFE");
    }

    #[tokio::test]
    async fn test_no_hits_is_uniform() {
        let result = classifier()
            .classify("Market closed flat today", &labels(&["NVDA", "ING", "SAN", "PFE", "CSCO"]))
            .await
            .unwrap();

        for score in result.scores() {
            assert!((score - 0.2).abs() < 1e-12);
        }
    }

    #[tokio::test]
    async fn test_whole_words_only() {
        // "ING" must not match inside "closing"
        let result = classifier()
            .classify("closing bell", &labels(&["ING", "SAN"]))
            .await
            .unwrap();

        assert!((result.top().1 - 0.5).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_ticker_matches_only_as_written() {
        let c = classifier();
        let tickers = labels(&["SAN", "ING", "PFE"]);

        let result = c.classify("San Francisco office is closing", &tickers).await.unwrap();
        assert!((result.top().1 - 1.0 / 3.0).abs() < 1e-12);

        let result = c.classify("ing results due", &tickers).await.unwrap();
        assert!((result.top().1 - 1.0 / 3.0).abs() < 1e-12);

        let result = c.classify("SAN raises dividend", &tickers).await.unwrap();
        assert_eq!(result.top().0, "SAN");
    }

    #[tokio::test]
    async fn test_label_patterns_are_cached() {
        let c = classifier();
        let offered = labels(&["AAPL", "positive"]);

        let first = c.classify("AAPL beats", &offered).await.unwrap();
        let cached = c.label_patterns.read().await.len();
        let second = c.classify("AAPL beats", &offered).await.unwrap();

        assert_eq!(c.label_patterns.read().await.len(), cached);
        assert!(c.label_patterns.read().await.contains_key("AAPL"));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_more_hits_more_confidence() {
        let c = classifier();
        let sentiments = labels(&["positive", "negative", "neutral"]);

        let one = c.classify("NVDA beats estimates", &sentiments).await.unwrap();
        let two = c.classify("NVDA beats estimates with record revenue", &sentiments).await.unwrap();

        assert_eq!(one.top().0, "positive");
        assert_eq!(two.top().0, "positive");
        assert!(two.top().1 > one.top().1);
        assert!(two.top().1 > 0.9);
    }

    #[tokio::test]
    async fn test_stopped_classifier_is_unavailable() {
        let c = classifier();
        c.on_start().await.unwrap();
        assert_eq!(c.status().await, ClassifierStatus::Ready);

        c.on_stop().await.unwrap();
        let err = c.classify("anything", &labels(&["NVDA"])).await.unwrap_err();
        assert!(matches!(err, PipelineError::ClassifierUnavailable(_)));
    }
}
