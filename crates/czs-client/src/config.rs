//! Client configuration.
//!
//! Base URLs, the CSRF token and the UI language are explicit fields on
//! [`Config`], which is passed to the client at construction time. It can be
//! loaded from `~/.config/czs-client/config.json` or from environment
//! variables (with `.env` support).

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config directory paths
const APP_NAME: &str = "czs-client";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Active UI language. Error messages and the home route are localized
/// for French; anything else falls back to English.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fr,
}

impl Language {
    /// Parse a language tag; `"fr"` selects French, anything else English.
    pub fn parse(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("fr") {
            Language::Fr
        } else {
            Language::En
        }
    }

    /// The language-specific home route on the web service.
    pub fn home_route(&self) -> &'static str {
        match self {
            Language::Fr => "/fr/accueil",
            Language::En => "/en/home",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the web (session) service.
    pub web_base_url: String,
    /// Base URL of the API (resource) service.
    pub api_base_url: String,
    /// Anti-forgery token attached to web requests when present.
    /// The hosting environment is expected to supply it before calls run.
    #[serde(default)]
    pub csrf_token: Option<String>,
    /// Active UI language for localized messages and the home route.
    #[serde(default)]
    pub language: Language,
}

impl Config {
    pub fn new(web_base_url: impl Into<String>, api_base_url: impl Into<String>) -> Self {
        Self {
            web_base_url: web_base_url.into(),
            api_base_url: api_base_url.into(),
            csrf_token: None,
            language: Language::En,
        }
    }

    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Build a configuration from `CZS_WEB_URL`, `CZS_API_URL`,
    /// `CZS_CSRF_TOKEN` and `CZS_LANG`, loading a `.env` file if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let web_base_url = std::env::var("CZS_WEB_URL").context("CZS_WEB_URL is not set")?;
        let api_base_url = std::env::var("CZS_API_URL").context("CZS_API_URL is not set")?;

        Ok(Self {
            web_base_url,
            api_base_url,
            // An empty value must not end up as an empty CSRF header
            csrf_token: std::env::var("CZS_CSRF_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
            language: std::env::var("CZS_LANG")
                .map(|l| Language::parse(&l))
                .unwrap_or_default(),
        })
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        serde_json::from_str(&contents).context("Failed to parse config file")
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parse() {
        assert_eq!(Language::parse("fr"), Language::Fr);
        assert_eq!(Language::parse("FR"), Language::Fr);
        assert_eq!(Language::parse("en"), Language::En);
        assert_eq!(Language::parse("de"), Language::En);
        assert_eq!(Language::parse(""), Language::En);
    }

    #[test]
    fn test_home_routes() {
        assert_eq!(Language::Fr.home_route(), "/fr/accueil");
        assert_eq!(Language::En.home_route(), "/en/home");
    }

    #[test]
    fn test_from_env_ignores_empty_csrf_token() {
        std::env::set_var("CZS_WEB_URL", "http://web.local");
        std::env::set_var("CZS_API_URL", "http://api.local");
        std::env::set_var("CZS_CSRF_TOKEN", "");

        let config = Config::from_env().unwrap();
        assert!(config.csrf_token.is_none());

        std::env::set_var("CZS_CSRF_TOKEN", "csrf-42");
        let config = Config::from_env().unwrap();
        assert_eq!(config.csrf_token.as_deref(), Some("csrf-42"));

        std::env::remove_var("CZS_WEB_URL");
        std::env::remove_var("CZS_API_URL");
        std::env::remove_var("CZS_CSRF_TOKEN");
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::new("http://web.local", "http://api.local")
            .with_csrf_token("tok")
            .with_language(Language::Fr);

        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.web_base_url, "http://web.local");
        assert_eq!(parsed.api_base_url, "http://api.local");
        assert_eq!(parsed.csrf_token.as_deref(), Some("tok"));
        assert_eq!(parsed.language, Language::Fr);
    }
}
