//! Configuration management
//!
//! Loads configuration from config.toml at startup.
//! Endpoints, credentials, timeouts and output paths all live here;
//! nothing is read from process-wide constants.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Environment variable overriding `brokerage.token`
pub const TOKEN_ENV: &str = "MOVERS_BROKERAGE_TOKEN";

/// Application configuration
///
/// Loaded from config.toml at startup. Every section and field has a default,
/// so an empty file (or no file at all) yields a runnable configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub brokerage: BrokerageConfig,

    #[serde(default)]
    pub scanner: ScannerConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Brokerage instrument directory
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BrokerageConfig {
    /// Instruments endpoint (GET)
    #[serde(default = "default_brokerage_url")]
    pub url: String,

    /// Bearer token sent in the Authorization header
    #[serde(default)]
    pub token: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Market scanner screens
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScannerConfig {
    /// Scan endpoint (POST)
    #[serde(default = "default_scanner_url")]
    pub url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum rows requested per screen
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Lower bound of the close-price filter
    #[serde(default = "default_min_price")]
    pub min_price: f64,

    /// Upper bound of the close-price filter
    #[serde(default = "default_max_price")]
    pub max_price: f64,

    /// Listing exchanges included in the screen
    #[serde(default = "default_exchanges")]
    pub exchanges: Vec<String>,
}

/// Report destinations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_gainers_path")]
    pub gainers_path: PathBuf,

    #[serde(default = "default_losers_path")]
    pub losers_path: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Fetch the gainers and losers screens concurrently
    #[serde(default)]
    pub concurrent_screens: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for rolling JSON log files; console only when unset
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl Default for BrokerageConfig {
    fn default() -> Self {
        Self {
            url: default_brokerage_url(),
            token: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            url: default_scanner_url(),
            timeout_secs: default_timeout_secs(),
            limit: default_limit(),
            min_price: default_min_price(),
            max_price: default_max_price(),
            exchanges: default_exchanges(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            gainers_path: default_gainers_path(),
            losers_path: default_losers_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

fn default_brokerage_url() -> String {
    "https://api-invest.tinkoff.ru/openapi/market/stocks".to_string()
}

fn default_scanner_url() -> String {
    "https://scanner.tradingview.com/america/scan".to_string()
}

fn default_timeout_secs() -> u64 {
    3
}

fn default_limit() -> u32 {
    150
}

fn default_min_price() -> f64 {
    2.0
}

fn default_max_price() -> f64 {
    10_000.0
}

fn default_exchanges() -> Vec<String> {
    vec!["AMEX".to_string(), "NASDAQ".to_string(), "NYSE".to_string()]
}

fn default_gainers_path() -> PathBuf {
    PathBuf::from("top_gainers")
}

fn default_losers_path() -> PathBuf {
    PathBuf::from("top_losers")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl BrokerageConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ScannerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from config.toml file
    ///
    /// The path comes from `CONFIG_PATH`, falling back to `config.toml`.
    /// If the file doesn't exist, returns default configuration.
    /// `MOVERS_BROKERAGE_TOKEN`, when set, replaces the configured token.
    /// # Errors
    /// Returns error if the file exists but cannot be read, parsed or validated.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());

        let mut config = match std::fs::read_to_string(&config_path) {
            Ok(contents) => Self::from_toml(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // File not found - use defaults
                Config::default()
            }
            Err(e) => return Err(ConfigError::IoError(e)),
        };

        if let Ok(token) = std::env::var(TOKEN_ENV) {
            config.brokerage.token = token;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Reject settings that cannot produce a meaningful run
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.brokerage.url)
            .map_err(|e| ConfigError::Invalid(format!("brokerage.url: {}", e)))?;
        Url::parse(&self.scanner.url)
            .map_err(|e| ConfigError::Invalid(format!("scanner.url: {}", e)))?;

        if self.brokerage.timeout_secs == 0 || self.scanner.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be positive".to_string()));
        }
        if self.scanner.limit == 0 {
            return Err(ConfigError::Invalid("scanner.limit must be positive".to_string()));
        }
        if !(self.scanner.min_price <= self.scanner.max_price) {
            return Err(ConfigError::Invalid(format!(
                "scanner.min_price {} exceeds max_price {}",
                self.scanner.min_price, self.scanner.max_price
            )));
        }
        if self.output.gainers_path == self.output.losers_path {
            return Err(ConfigError::Invalid(format!(
                "gainers and losers reports share the path {}",
                self.output.gainers_path.display()
            )));
        }

        Ok(())
    }
}

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading file
    IoError(std::io::Error),
    /// Parse error (invalid TOML)
    ParseError(String),
    /// Parsed but unusable values
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "Failed to read config file: {}", e),
            ConfigError::ParseError(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Invalid(e) => write!(f, "Invalid config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError(e) => Some(e),
            ConfigError::ParseError(_) | ConfigError::Invalid(_) => None,
        }
    }
}
