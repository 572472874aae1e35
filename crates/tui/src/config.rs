use anyhow::{Context, Result};
use draftai_api::client::DEFAULT_API_BASE;
use draftai_api::{ApiResult, GenerationClient, Tone, ToneSelection};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const API_URL_ENV: &str = "DRAFTAI_API_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub compose: ComposeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Overall request timeout. Unset means the request may take as long as
    /// the server does.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComposeConfig {
    /// `""` for automatic, otherwise one of the standalone tones.
    #[serde(default)]
    pub default_tone: String,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("Using default config: {:#}", e);
                Self::default()
            }
        }
    }

    /// Applies `DRAFTAI_API_URL` when it is set and non-empty.
    pub fn with_env_overrides(self) -> Self {
        self.with_api_url(std::env::var(API_URL_ENV).ok())
    }

    fn with_api_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        self
    }

    /// The configured starting tone. Only tones the standalone picker offers
    /// are accepted; anything else falls back to automatic.
    pub fn default_tone(&self) -> ToneSelection {
        match ToneSelection::parse(&self.compose.default_tone) {
            Ok(ToneSelection::Fixed(tone)) if !Tone::STANDALONE.contains(&tone) => {
                tracing::warn!(
                    "Tone {} is not offered here; falling back to automatic tone",
                    tone.label()
                );
                ToneSelection::Auto
            }
            Ok(tone) => tone,
            Err(e) => {
                tracing::warn!("{}; falling back to automatic tone", e);
                ToneSelection::Auto
            }
        }
    }

    pub fn build_client(&self) -> ApiResult<GenerationClient> {
        match self.api.timeout_seconds {
            Some(secs) => {
                GenerationClient::with_timeout(&self.api.base_url, Duration::from_secs(secs))
            }
            None => GenerationClient::new(&self.api.base_url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[api]
base_url = "https://mail-helper.example.com"
timeout_seconds = 45

[compose]
default_tone = "casual"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.api.base_url, "https://mail-helper.example.com");
        assert_eq!(config.api.timeout_seconds, Some(45));
        assert_eq!(config.default_tone(), ToneSelection::Fixed(Tone::Casual));
    }

    #[test]
    fn missing_sections_take_defaults() {
        let config: Config = toml::from_str("[compose]\ndefault_tone = \"\"\n").unwrap();
        assert_eq!(config.api.base_url, DEFAULT_API_BASE);
        assert_eq!(config.api.timeout_seconds, None);
        assert_eq!(config.default_tone(), ToneSelection::Auto);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("absent.toml"));
        assert_eq!(config.api.base_url, DEFAULT_API_BASE);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api\nbase_url = ").unwrap();
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn env_url_overrides_file_value() {
        let config = Config::default().with_api_url(Some(" http://10.0.0.5:9000 ".to_string()));
        assert_eq!(config.api.base_url, "http://10.0.0.5:9000");

        let config = Config::default().with_api_url(Some("   ".to_string()));
        assert_eq!(config.api.base_url, DEFAULT_API_BASE);
    }

    #[test]
    fn unknown_default_tone_means_auto() {
        let mut config = Config::default();
        config.compose.default_tone = "sarcastic".to_string();
        assert_eq!(config.default_tone(), ToneSelection::Auto);
    }

    #[test]
    fn extension_only_tones_are_not_a_valid_default() {
        for value in ["concise", "Kind"] {
            let mut config = Config::default();
            config.compose.default_tone = value.to_string();
            assert_eq!(config.default_tone(), ToneSelection::Auto, "{value}");
        }
    }

    #[test]
    fn bad_base_url_fails_client_construction() {
        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();
        assert!(config.build_client().is_err());

        config.api.base_url = "http://localhost:8080/".to_string();
        config.api.timeout_seconds = Some(10);
        assert!(config.build_client().is_ok());
    }
}
