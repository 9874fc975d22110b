use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_DATASET: &str = "data/schools.csv";
pub const DEFAULT_STICKER_PRICE: f64 = 85_000.0;
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_API_KEY_ENV: &str = "ADMIT_ODDS_API_KEY";
pub const DEFAULT_EXPLAIN_TIMEOUT: &str = "30s";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Local path or http(s) URL of the school dataset.
    #[serde(default = "default_dataset")]
    pub dataset: String,
    /// Published cost of attendance used for the net price estimate.
    #[serde(default = "default_sticker_price")]
    pub sticker_price: f64,
    #[serde(default)]
    pub explain: ExplainConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExplainConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Name of the environment variable holding the bearer token.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Human-readable duration, e.g. "30s" or "1m".
    #[serde(default = "default_explain_timeout")]
    pub timeout: String,
}

fn default_dataset() -> String {
    DEFAULT_DATASET.to_string()
}

fn default_sticker_price() -> f64 {
    DEFAULT_STICKER_PRICE
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_explain_timeout() -> String {
    DEFAULT_EXPLAIN_TIMEOUT.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: default_dataset(),
            sticker_price: default_sticker_price(),
            explain: ExplainConfig::default(),
        }
    }
}

impl Default for ExplainConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout: default_explain_timeout(),
        }
    }
}

impl ExplainConfig {
    /// Parsed request timeout. Falls back to the default when the configured
    /// string is not a valid duration; `validate_config` reports that case.
    pub fn timeout(&self) -> Duration {
        humantime::parse_duration(&self.timeout).unwrap_or(Duration::from_secs(30))
    }
}
