use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::predictions::validate_min_gradient;
use crate::youtube::data_api::MAX_IDS_PER_REQUEST;

/// Configuration for the guitar channel catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// YouTube Data API settings
    pub youtube: YouTubeConfig,

    /// Data directory and store settings
    pub store: StoreConfig,

    /// Publish prediction defaults
    pub predictions: PredictionConfig,

    /// Output shaping for CLI and API responses
    pub presentation: PresentationConfig,

    /// HTTP API settings
    pub api: ApiConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YouTubeConfig {
    /// Base URL of the Data API
    pub api_endpoint: String,

    /// API key, required for any remote lookup
    pub api_key: Option<String>,

    /// HTTP request timeout in seconds
    pub request_timeout_seconds: u64,

    /// Channel ids sent per channels request (1-50)
    pub max_ids_per_request: usize,

    /// User agent for API and page requests
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding channels, suggestions, predictions and terms
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    /// Default gradient threshold for both prediction views
    pub min_gradient: f64,

    /// Drop below-average slots from the single channel view by default
    pub filter_below_average: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// Channel descriptions are cut to this many characters
    pub description_max_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level when RUST_LOG is not set
    pub level: String,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_endpoint: "https://www.googleapis.com/youtube/v3".to_string(),
            api_key: None,
            request_timeout_seconds: 30,
            max_ids_per_request: MAX_IDS_PER_REQUEST,
            user_agent: concat!("guitar-catalog/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl YouTubeConfig {
    /// The configured API key, ignoring blank values
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
        }
    }
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            min_gradient: 0.7,
            filter_below_average: false,
        }
    }
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            description_max_chars: 300,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the first config file found, then apply
    /// environment overrides
    pub fn load() -> Result<Self> {
        let config_paths = [
            "guitar-catalog.toml",
            "config/guitar-catalog.toml",
            "/etc/guitar-catalog/config.toml",
        ];

        for path in &config_paths {
            if Path::new(path).exists() {
                return Self::from_file(path);
            }
        }

        Self::from_env()
    }

    /// Load configuration from a specific file, then apply environment overrides
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path.display(), e))?;
        let mut config: Config = toml::from_str(&config_str)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path.display(), e))?;

        tracing::info!("📄 Loaded configuration from: {}", path.display());
        config.apply_env()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(api_key) = std::env::var("GUITAR_CATALOG_YOUTUBE_API_KEY") {
            self.youtube.api_key = Some(api_key);
        }

        if let Ok(data_dir) = std::env::var("GUITAR_CATALOG_DATA_DIR") {
            self.store.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(min_gradient) = std::env::var("GUITAR_CATALOG_MIN_GRADIENT") {
            self.predictions.min_gradient = min_gradient
                .parse()
                .map_err(|e| anyhow!("Invalid GUITAR_CATALOG_MIN_GRADIENT: {}", e))?;
        }

        if let Ok(port) = std::env::var("GUITAR_CATALOG_PORT") {
            self.api.port = port
                .parse()
                .map_err(|e| anyhow!("Invalid GUITAR_CATALOG_PORT: {}", e))?;
        }

        if let Ok(log_level) = std::env::var("GUITAR_CATALOG_LOG_LEVEL") {
            self.logging.level = log_level;
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path);
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.youtube.max_ids_per_request == 0
            || self.youtube.max_ids_per_request > MAX_IDS_PER_REQUEST
        {
            return Err(anyhow!(
                "max_ids_per_request must be between 1 and {}",
                MAX_IDS_PER_REQUEST
            ));
        }

        validate_min_gradient(self.predictions.min_gradient).map_err(|e| anyhow!("{}", e))?;

        if self.presentation.description_max_chars == 0 {
            return Err(anyhow!("description_max_chars must be greater than 0"));
        }

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Guitar Catalog Configuration:\n\
            - Data Directory: {}\n\
            - YouTube API Key: {}\n\
            - Min Gradient: {}\n\
            - Description Max Chars: {}\n\
            - API Port: {}",
            self.store.data_dir.display(),
            if self.youtube.api_key().is_some() { "set" } else { "missing" },
            self.predictions.min_gradient,
            self.presentation.description_max_chars,
            self.api.port
        )
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.config.youtube.api_key = Some(api_key);
        self
    }

    pub fn with_api_endpoint(mut self, endpoint: String) -> Self {
        self.config.youtube.api_endpoint = endpoint;
        self
    }

    pub fn with_data_dir(mut self, dir: PathBuf) -> Self {
        self.config.store.data_dir = dir;
        self
    }

    pub fn with_min_gradient(mut self, min_gradient: f64) -> Self {
        self.config.predictions.min_gradient = min_gradient;
        self
    }

    pub fn with_description_max_chars(mut self, max_chars: usize) -> Self {
        self.config.presentation.description_max_chars = max_chars;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.api.port = port;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
