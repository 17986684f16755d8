//! Shared signal types
//!
//! The vocabulary passed between the news pipeline and anything that trades on
//! its output: sentiment labels, company attribution and the final signal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentiment toward the subject of a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Candidate order handed to the classifier
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(SentimentLabel::Positive),
            "negative" => Ok(SentimentLabel::Negative),
            "neutral" => Ok(SentimentLabel::Neutral),
            other => Err(format!("unknown sentiment label '{}'", other)),
        }
    }
}

/// Marker used when no tracked company could be attributed
pub const UNKNOWN_COMPANY: &str = "unknown";

/// Company a piece of text was attributed to
///
/// Serializes as the bare ticker symbol, or `"unknown"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DetectedCompany {
    Company(String),
    Unknown,
}

impl DetectedCompany {
    /// Ticker symbol, if a company was attributed
    pub fn symbol(&self) -> Option<&str> {
        match self {
            DetectedCompany::Company(symbol) => Some(symbol),
            DetectedCompany::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, DetectedCompany::Unknown)
    }
}

impl fmt::Display for DetectedCompany {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectedCompany::Company(symbol) => f.pad(symbol),
            DetectedCompany::Unknown => f.pad(UNKNOWN_COMPANY),
        }
    }
}

impl From<String> for DetectedCompany {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case(UNKNOWN_COMPANY) {
            DetectedCompany::Unknown
        } else {
            DetectedCompany::Company(value)
        }
    }
}

impl From<DetectedCompany> for String {
    fn from(value: DetectedCompany) -> Self {
        value.to_string()
    }
}

/// Output of the text-to-signal pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub detected_company: DetectedCompany,
    pub sentiment_label: SentimentLabel,
    pub sentiment_confidence: f64, // 0.0 to 1.0
    pub adjustment: f64,           // one of -0.1, 0.0, 0.1
}
