//! External vision-analysis service settings.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct AnalyzerConfig {
    /// Base URL of the generative API.
    #[validate(url)]
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for frame analysis.
    #[validate(length(min = 1, max = 128))]
    #[serde(default = "default_model")]
    pub model: String,

    /// Service credential. Usually supplied as `ZONEWATCH_ANALYZER__API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".into()
}

fn default_model() -> String {
    "gemini-2.5-flash".into()
}

impl AnalyzerConfig {
    /// Copy safe to print or log.
    pub fn redacted(&self) -> Self {
        Self {
            api_key: self.api_key.as_ref().map(|_| "***".into()),
            ..self.clone()
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
        }
    }
}
