//! Hosted zero-shot classifier
//!
//! Talks to an inference endpoint speaking the Hugging Face Inference API
//! zero-shot protocol (`facebook/bart-large-mnli` by default).

use super::{ClassificationResult, ClassifierStatus, Lifecycle, ZeroShotClassifier};
use crate::config::ClassifierConfig;
use crate::error::{PipelineError, Result};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct InferenceApiClassifier {
    client: Client,
    url: String,
    model: String,
    api_token: Option<String>,
    lifecycle: Lifecycle,
}

#[derive(Debug, Serialize)]
struct ZeroShotRequest<'a> {
    inputs: &'a str,
    parameters: ZeroShotParameters<'a>,
    options: RequestOptions,
}

#[derive(Debug, Serialize)]
struct ZeroShotParameters<'a> {
    candidate_labels: &'a [String],
    multi_label: bool,
}

#[derive(Debug, Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

/// Both response layouts seen in the wild
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ZeroShotResponse {
    /// `{"sequence": ..., "labels": [...], "scores": [...]}`
    Parallel {
        #[serde(default)]
        #[allow(dead_code)]
        sequence: Option<String>,
        labels: Vec<String>,
        scores: Vec<f64>,
    },
    /// `[{"label": ..., "score": ...}, ...]`
    Ranked(Vec<LabelScore>),
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

impl InferenceApiClassifier {
    pub fn new(cfg: &ClassifierConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("building HTTP client")?;

        Ok(Self {
            client,
            url: format!("{}/models/{}", cfg.endpoint.trim_end_matches('/'), cfg.model),
            model: cfg.model.clone(),
            api_token: cfg.api_token.clone().filter(|t| !t.trim().is_empty()),
            lifecycle: Lifecycle::default(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn decode(body: &[u8]) -> Result<ClassificationResult> {
        let response: ZeroShotResponse = serde_json::from_slice(body).map_err(|e| {
            PipelineError::MalformedClassification(format!("undecodable response: {}", e))
        })?;

        match response {
            ZeroShotResponse::Parallel { labels, scores, .. } => {
                ClassificationResult::from_parallel(labels, scores)
            }
            ZeroShotResponse::Ranked(pairs) => ClassificationResult::from_pairs(
                pairs.into_iter().map(|p| (p.label, p.score)).collect(),
            ),
        }
    }
}

#[async_trait]
impl ZeroShotClassifier for InferenceApiClassifier {
    fn name(&self) -> &str {
        &self.model
    }

    async fn status(&self) -> ClassifierStatus {
        self.lifecycle.status().await
    }

    async fn classify(&self, text: &str, candidate_labels: &[String]) -> Result<ClassificationResult> {
        self.lifecycle.ensure_open(self.name()).await?;

        let request = ZeroShotRequest {
            inputs: text,
            parameters: ZeroShotParameters {
                candidate_labels,
                multi_label: false,
            },
            options: RequestOptions {
                wait_for_model: true,
            },
        };

        let mut builder = self.client.post(&self.url).json(&request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| {
            PipelineError::ClassifierUnavailable(format!("request to {} failed: {}", self.url, e))
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            PipelineError::ClassifierUnavailable(format!("reading response from {} failed: {}", self.url, e))
        })?;

        if !status.is_success() {
            let detail = String::from_utf8_lossy(&body);
            warn!(url = %self.url, status = %status, "Classifier request rejected");
            return Err(PipelineError::ClassifierUnavailable(format!(
                "{} returned {}: {}",
                self.url,
                status,
                detail.trim()
            )));
        }

        let result = Self::decode(&body)?;
        result.ensure_within(candidate_labels)?;

        debug!(model = %self.model, top = ?result.top(), "Classified");
        Ok(result)
    }

    async fn on_start(&self) -> Result<()> {
        info!(url = %self.url, authenticated = self.api_token.is_some(), "Inference API classifier starting");
        self.lifecycle.set(ClassifierStatus::Ready).await;
        Ok(())
    }

    async fn on_stop(&self) -> Result<()> {
        info!(url = %self.url, "Inference API classifier stopping");
        self.lifecycle.set(ClassifierStatus::Stopped).await;
        Ok(())
    }
}
