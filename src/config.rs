use serde::{Deserialize, Serialize};
use std::env;
use url::Url;
use crate::data::Theme;
use crate::error::{LevelError, LevelResult};

pub const DEFAULT_API_URL: &str = "https://api.perplexity.ai";
pub const DEFAULT_MODEL: &str = "sonar";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteApiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub web_search: bool,
    pub timeout_secs: Option<u64>, // no timeout when unset
}

impl Default for QuoteApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            web_search: true,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub theme: Theme,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub quote: QuoteApiConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables, reading `.env` first
    pub fn from_env() -> LevelResult<Self> {
        dotenv::dotenv().ok();
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file. Environment variables still override it.
    pub fn from_file(path: &str) -> LevelResult<Self> {
        dotenv::dotenv().ok();
        let content = std::fs::read_to_string(path)
            .map_err(|e| LevelError::Configuration(format!("Failed to read config file: {}", e)))?;

        let mut config = Self::from_toml(&content)?;
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> LevelResult<Self> {
        toml::from_str(content)
            .map_err(|e| LevelError::Configuration(format!("Failed to parse config file: {}", e)))
    }

    /// Save configuration to file. The API key is never written out.
    pub fn save_to_file(&self, path: &str) -> LevelResult<()> {
        let mut persisted = self.clone();
        persisted.quote.api_key.clear();

        let content = toml::to_string_pretty(&persisted)
            .map_err(|e| LevelError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| LevelError::Configuration(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Changes only the theme in the file at `path`, leaving every other
    /// setting as written there. Environment overrides are not persisted.
    pub fn save_theme(path: &str, theme: Theme) -> LevelResult<Self> {
        let mut config = match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                return Err(LevelError::Configuration(format!("Failed to read config file: {}", e)))
            }
        };
        config.ui.theme = theme;

        let content = toml::to_string_pretty(&config)
            .map_err(|e| LevelError::Configuration(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)
            .map_err(|e| LevelError::Configuration(format!("Failed to write config file: {}", e)))?;

        Ok(config)
    }

    fn apply_env(&mut self) -> LevelResult<()> {
        if let Ok(key) = env::var("QUOTE_API_KEY").or_else(|_| env::var("PERPLEXITY_API_KEY")) {
            self.quote.api_key = key;
        }

        if let Ok(url) = env::var("QUOTE_API_URL") {
            self.quote.base_url = url;
        }

        if let Ok(model) = env::var("QUOTE_MODEL") {
            self.quote.model = model;
        }

        if let Ok(web_search) = env::var("QUOTE_WEB_SEARCH") {
            self.quote.web_search = web_search.parse()
                .map_err(|_| LevelError::Configuration("Invalid QUOTE_WEB_SEARCH".to_string()))?;
        }

        if let Ok(timeout) = env::var("QUOTE_TIMEOUT_SECS") {
            self.quote.timeout_secs = Some(timeout.parse()
                .map_err(|_| LevelError::Configuration("Invalid QUOTE_TIMEOUT_SECS".to_string()))?);
        }

        if let Ok(theme) = env::var("UI_THEME") {
            self.ui.theme = theme.parse().map_err(LevelError::Configuration)?;
        }

        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.logging.level = log_level;
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> LevelResult<()> {
        let url = Url::parse(&self.quote.base_url)
            .map_err(|e| LevelError::Configuration(format!("Invalid quote API url: {}", e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(LevelError::Configuration(format!("Unsupported url scheme: {}", url.scheme())));
        }

        if self.quote.model.trim().is_empty() {
            return Err(LevelError::Configuration("Model cannot be empty".to_string()));
        }

        if self.quote.timeout_secs == Some(0) {
            return Err(LevelError::Configuration("Timeout must be greater than 0".to_string()));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(LevelError::Configuration(format!("Invalid log level: {}", self.logging.level)));
        }

        Ok(())
    }

    /// Extra checks for commands that call the quote API.
    pub fn validate_for_quotes(&self) -> LevelResult<()> {
        if self.quote.api_key.trim().is_empty() {
            return Err(LevelError::Configuration(
                "QUOTE_API_KEY (or PERPLEXITY_API_KEY) not found".to_string(),
            ));
        }
        Ok(())
    }
}
