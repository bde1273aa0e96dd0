use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub markets: MarketsConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub backend: BackendConfig,
}

/// The DMA selector: which metro markets the console exposes and which one
/// a fresh session opens on.
#[derive(Debug, Deserialize)]
pub struct MarketsConfig {
    #[serde(default = "default_markets")]
    pub available: Vec<String>,
    #[serde(default = "default_market")]
    pub default: String,
}

impl Default for MarketsConfig {
    fn default() -> Self {
        Self {
            available: default_markets(),
            default: default_market(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: crate::llm::Provider,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    pub api_key_env: Option<String>,
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: crate::llm::Provider::default(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            api_key_env: None,
            base_url: None,
        }
    }
}

/// Bounds on calls into the intelligence backend. A hung call fails with a
/// data-unavailable condition instead of hanging the session.
#[derive(Debug, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

// Defaults
fn default_markets() -> Vec<String> {
    vec![
        "Dallas-Fort Worth".into(),
        "Houston".into(),
        "Austin".into(),
        "San Antonio".into(),
    ]
}
fn default_market() -> String {
    "Dallas-Fort Worth".into()
}
fn default_model() -> String {
    "arcee-ai/trinity-large-preview:free".into()
}
fn default_max_tokens() -> u32 {
    4096
}
fn default_timeout_secs() -> u64 {
    120
}
fn default_max_retries() -> u32 {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            markets: MarketsConfig::default(),
            llm: LlmConfig::default(),
            backend: BackendConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config {}: {e}", path.display())))?;
        toml::from_str(&content).map_err(|e| Error::config(format!("Failed to parse config: {e}")))
    }

    pub fn validate(&self) -> Result<()> {
        if self.markets.available.is_empty() {
            return Err(Error::config("markets.available must not be empty"));
        }
        if !self.markets.available.contains(&self.markets.default) {
            return Err(Error::config(format!(
                "markets.default \"{}\" is not in markets.available",
                self.markets.default
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config_parses() {
        let toml = r#"
[markets]
available = ["Dallas-Fort Worth", "Houston", "Austin", "San Antonio", "El Paso"]
default = "Houston"

[llm]
provider = "anthropic"
model = "claude-sonnet-4-5-20250929"
max_tokens = 2048

[backend]
timeout_secs = 45
max_retries = 1
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.markets.available.len(), 5);
        assert_eq!(config.markets.default, "Houston");
        assert_eq!(config.llm.max_tokens, 2048);
        assert_eq!(config.backend.timeout_secs, 45);
        assert_eq!(config.backend.max_retries, 1);
        config.validate().unwrap();
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.markets.available.len(), 4);
        assert_eq!(config.markets.default, "Dallas-Fort Worth");
        assert_eq!(config.backend.timeout_secs, 120);
        assert_eq!(config.backend.max_retries, 3);
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_default_outside_available() {
        let toml = r#"
[markets]
available = ["Houston"]
default = "Austin"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_market_list() {
        let mut config = Config::default();
        config.markets.available.clear();
        assert!(config.validate().is_err());
    }
}
