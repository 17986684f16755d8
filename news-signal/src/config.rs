//! Pipeline configuration
//!
//! Loaded from an optional TOML file, then overridden by environment variables
//! prefixed `NEWS_SIGNAL` with `__` as the section separator, e.g.
//! `NEWS_SIGNAL__CLASSIFIER__API_TOKEN`.

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_CONFIG_PATH: &str = "config/news-signal.toml";

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalConfig {
    /// Tracked companies
    #[serde(default)]
    pub companies: CompanyUniverse,

    /// Hosted zero-shot classifier settings
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Lexicon for the offline keyword classifier, keyed by label
    #[serde(default = "default_keywords")]
    pub keywords: HashMap<String, Vec<String>>,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            companies: CompanyUniverse::default(),
            classifier: ClassifierConfig::default(),
            keywords: default_keywords(),
        }
    }
}

impl SignalConfig {
    /// Load from an explicit file, or from [`DEFAULT_CONFIG_PATH`] when `path`
    /// is `None`, then apply the environment.
    ///
    /// An explicit file must exist; the default one may be absent.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path, true),
            None => (DEFAULT_CONFIG_PATH, false),
        };

        let cfg = Config::builder()
            .add_source(File::with_name(path).required(required))
            .add_source(
                Environment::with_prefix("NEWS_SIGNAL")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("companies.symbols")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("building config from {}", path))?;

        let signal_cfg: SignalConfig = cfg.try_deserialize().context("deserializing config")?;
        signal_cfg.validate()?;
        Ok(signal_cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.companies.validate()?;
        anyhow::ensure!(
            !self.classifier.endpoint.trim().is_empty(),
            "classifier.endpoint missing"
        );
        anyhow::ensure!(
            !self.classifier.model.trim().is_empty(),
            "classifier.model missing"
        );
        anyhow::ensure!(
            self.classifier.timeout_secs > 0,
            "classifier.timeout_secs must be > 0"
        );
        Ok(())
    }
}

/// Ordered set of ticker symbols the pipeline can attribute text to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyUniverse {
    pub symbols: Vec<String>,
}

impl Default for CompanyUniverse {
    fn default() -> Self {
        Self {
            symbols: ["NVDA", "ING", "SAN", "PFE", "CSCO"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl CompanyUniverse {
    pub fn new<I, S>(symbols: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let universe = Self {
            symbols: symbols.into_iter().map(Into::into).collect(),
        };
        universe.validate()?;
        Ok(universe)
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.symbols.is_empty(), "companies.symbols must not be empty");
        for (i, symbol) in self.symbols.iter().enumerate() {
            anyhow::ensure!(!symbol.trim().is_empty(), "companies.symbols[{}] is blank", i);
            anyhow::ensure!(
                !symbol.eq_ignore_ascii_case(common::UNKNOWN_COMPANY),
                "'{}' is reserved and cannot be a company symbol",
                symbol
            );
            anyhow::ensure!(
                !self.symbols[..i].contains(symbol),
                "companies.symbols lists '{}' twice",
                symbol
            );
        }
        Ok(())
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }
}

/// Hosted zero-shot classifier endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Bearer token, usually supplied through the environment
    #[serde(default)]
    pub api_token: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_endpoint() -> String {
    "https://api-inference.huggingface.co".to_string()
}

fn default_model() -> String {
    "facebook/bart-large-mnli".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_keywords() -> HashMap<String, Vec<String>> {
    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    let mut keywords = HashMap::new();

    keywords.insert("positive".to_string(), words(&[
        "beat", "beats", "growth", "rise", "rises", "surge", "surges", "gain", "gains",
        "profit", "record", "upgrade", "upgraded", "bullish", "rally", "rallies", "soar",
        "soars", "strong", "outperform", "breakthrough", "approval", "approved", "deal",
    ]));

    keywords.insert("negative".to_string(), words(&[
        "miss", "misses", "crash", "drop", "drops", "fall", "falls", "decline", "loss",
        "losses", "lawsuit", "probe", "fine", "downgrade", "downgraded", "bearish", "plunge",
        "plunges", "recall", "layoffs", "fraud", "weak", "warning", "collapse",
    ]));

    keywords.insert("neutral".to_string(), words(&[
        "flat", "unchanged", "steady", "mixed", "holds", "in line", "sideways", "quiet",
    ]));

    // Company names, so headlines without the ticker still attribute
    keywords.insert("NVDA".to_string(), words(&["nvidia", "geforce"]));
    keywords.insert("ING".to_string(), words(&["ing group", "ing bank"]));
    keywords.insert("SAN".to_string(), words(&["santander"]));
    keywords.insert("PFE".to_string(), words(&["pfizer"]));
    keywords.insert("CSCO".to_string(), words(&["cisco"]));

    keywords
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = SignalConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.companies.symbols(), &["NVDA", "ING", "SAN", "PFE", "CSCO"]);
        assert_eq!(cfg.classifier.model, "facebook/bart-large-mnli");
    }

    #[test]
    fn test_universe_rejects_bad_symbols() {
        assert!(CompanyUniverse::new(Vec::<String>::new()).is_err());
        assert!(CompanyUniverse::new(["NVDA", " "]).is_err());
        assert!(CompanyUniverse::new(["NVDA", "NVDA"]).is_err());
        assert!(CompanyUniverse::new(["NVDA", "Unknown"]).is_err());
        assert!(CompanyUniverse::new(["AAPL", "MSFT"]).is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join(format!("news-signal-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("signal.toml");

        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[companies]
symbols = ["AAPL", "MSFT"]

[classifier]
endpoint = "http://localhost:8080"
timeout_secs = 5
"#
        )
        .unwrap();

        let cfg = SignalConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(cfg.companies.symbols(), &["AAPL", "MSFT"]);
        assert_eq!(cfg.classifier.endpoint, "http://localhost:8080");
        assert_eq!(cfg.classifier.timeout_secs, 5);
        // untouched sections fall back to defaults
        assert_eq!(cfg.classifier.model, "facebook/bart-large-mnli");
        assert!(cfg.keywords.contains_key("positive"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let err = SignalConfig::load(Some("does/not/exist/my-companies.toml")).unwrap_err();
        assert!(err.to_string().contains("my-companies.toml"));
    }

    #[test]
    fn test_default_file_is_optional() {
        // no config/ directory next to the crate manifest
        let cfg = SignalConfig::load(None).unwrap();
        assert!(cfg.validate().is_ok());
    }
}
