use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::generator::GenerationSettings;
use crate::generator::client::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::generator::prompt::DEFAULT_MAX_SOURCE_CHARS;
use crate::speech::DEFAULT_RATE;

pub const SUPPORTED_LOCALES: &[&str] = &["en", "ko"];
pub const MIN_SOURCE_CHARS: usize = 200;

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_max_source_chars")]
    pub max_source_chars: usize,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_speech_enabled")]
    pub speech_enabled: bool,
    #[serde(default)]
    pub speech_command: String,
    #[serde(default = "default_speech_rate")]
    pub speech_rate: f32,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}
fn default_max_source_chars() -> usize {
    DEFAULT_MAX_SOURCE_CHARS
}
fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_locale() -> String {
    "en".to_string()
}
fn default_speech_enabled() -> bool {
    true
}
fn default_speech_rate() -> f32 {
    DEFAULT_RATE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            endpoint: default_endpoint(),
            max_source_chars: default_max_source_chars(),
            theme: default_theme(),
            locale: default_locale(),
            speech_enabled: default_speech_enabled(),
            speech_command: String::new(),
            speech_rate: default_speech_rate(),
        }
    }
}

// The API key stays out of logs and panics.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "<set>" })
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("max_source_chars", &self.max_source_chars)
            .field("theme", &self.theme)
            .field("locale", &self.locale)
            .field("speech_enabled", &self.speech_enabled)
            .field("speech_command", &self.speech_command)
            .field("speech_rate", &self.speech_rate)
            .finish()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        tracing::info!(path = %path.display(), "config saved");
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fsidrill")
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Repair values a hand-edited file may have broken.
    pub fn normalize(&mut self) {
        if self.max_source_chars < MIN_SOURCE_CHARS {
            self.max_source_chars = MIN_SOURCE_CHARS;
        }
        if !SUPPORTED_LOCALES.contains(&self.locale.as_str()) {
            self.locale = default_locale();
        }
        if !self.speech_rate.is_finite() || !(0.1..=10.0).contains(&self.speech_rate) {
            self.speech_rate = default_speech_rate();
        }
        if self.model.trim().is_empty() {
            self.model = default_model();
        }
        if self.endpoint.trim().is_empty() {
            self.endpoint = default_endpoint();
        }
    }

    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            api_key: self.api_key.trim().to_string(),
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
            max_source_chars: self.max_source_chars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.api_key.is_empty());
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.max_source_chars, 3000);
        assert_eq!(config.speech_rate, 0.9);
        assert!(config.speech_enabled);
    }

    #[test]
    fn test_config_serde_partial_file() {
        let toml_str = r#"
api_key = "abc123"
theme = "gruvbox-dark"
locale = "ko"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api_key, "abc123");
        assert_eq!(config.theme, "gruvbox-dark");
        assert_eq!(config.locale, "ko");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.api_key = "secret".to_string();
        config.speech_enabled = false;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = [").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_normalize_repairs_bad_values() {
        let mut config = Config {
            max_source_chars: 5,
            locale: "fr".to_string(),
            speech_rate: -1.0,
            model: "  ".to_string(),
            ..Config::default()
        };
        config.normalize();
        assert_eq!(config.max_source_chars, MIN_SOURCE_CHARS);
        assert_eq!(config.locale, "en");
        assert_eq!(config.speech_rate, 0.9);
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = Config {
            api_key: "very-secret".to_string(),
            ..Config::default()
        };
        assert!(!format!("{config:?}").contains("very-secret"));
    }

    #[test]
    fn test_generation_settings_trim_key() {
        let config = Config {
            api_key: "  key \n".to_string(),
            ..Config::default()
        };
        assert_eq!(config.generation_settings().api_key, "key");
        assert!(config.has_api_key());
        assert!(!Config::default().has_api_key());
    }
}
