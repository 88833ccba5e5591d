//! Configuration module for hotfeed.

use serde::Deserialize;
use std::path::Path;

use crate::hotentry::{DEFAULT_REFRESH_INTERVAL_SECS, DEFAULT_THRESHOLD};
use crate::{HotfeedError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Timezone for displaying the last update time (e.g., "Asia/Tokyo", "UTC").
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Public base URL used as the channel link instead of the Host header.
    #[serde(default)]
    pub public_url: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5001
}

fn default_timezone() -> String {
    "Asia/Tokyo".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timezone: default_timezone(),
            public_url: None,
        }
    }
}

/// Upstream source configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Primary JSON endpoint.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Fallback RSS 1.0 endpoint.
    #[serde(default = "default_rss_url")]
    pub rss_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// User-Agent pool, one picked at random per request.
    #[serde(default = "default_user_agents")]
    pub user_agents: Vec<String>,
}

fn default_api_url() -> String {
    "https://b.hatena.ne.jp/api/ipad.hotentry?mode=general".to_string()
}

fn default_rss_url() -> String {
    "https://b.hatena.ne.jp/hotentry.rss".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_user_agents() -> Vec<String> {
    vec![
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
        "Mozilla/5.0 (X11; Linux x86_64; rv:89.0) Gecko/20100101 Firefox/89.0".to_string(),
    ]
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            rss_url: default_rss_url(),
            timeout_secs: default_timeout(),
            user_agents: default_user_agents(),
        }
    }
}

/// Background refresh configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Whether the background refresh runs at all.
    #[serde(default = "default_scheduler_enabled")]
    pub enabled: bool,
    /// Refresh interval in seconds.
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
}

fn default_scheduler_enabled() -> bool {
    true
}

fn default_interval() -> u64 {
    DEFAULT_REFRESH_INTERVAL_SECS
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: default_scheduler_enabled(),
            interval_secs: default_interval(),
        }
    }
}

/// Feed generation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Threshold used when the request has none or an invalid one.
    #[serde(default = "default_threshold")]
    pub default_threshold: i64,
}

fn default_threshold() -> i64 {
    DEFAULT_THRESHOLD
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_threshold: default_threshold(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/hotfeed.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream configuration.
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Scheduler configuration.
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// Feed configuration.
    #[serde(default)]
    pub feed: FeedConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(HotfeedError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| HotfeedError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `PORT`: listening port (ignored when empty or not a number)
    /// - `HOTFEED_LOG_LEVEL`: log level
    pub fn apply_env_overrides(&mut self) {
        if let Ok(port) = std::env::var("PORT") {
            if let Ok(port) = port.trim().parse::<u16>() {
                self.server.port = port;
            }
        }

        if let Ok(level) = std::env::var("HOTFEED_LOG_LEVEL") {
            if !level.is_empty() {
                self.logging.level = level;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validate_upstream_url("upstream.api_url", &self.upstream.api_url)?;
        validate_upstream_url("upstream.rss_url", &self.upstream.rss_url)?;

        if self.upstream.user_agents.is_empty() {
            return Err(HotfeedError::Config(
                "upstream.user_agents must not be empty".to_string(),
            ));
        }
        if self.upstream.timeout_secs == 0 {
            return Err(HotfeedError::Config(
                "upstream.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.scheduler.interval_secs == 0 {
            return Err(HotfeedError::Config(
                "scheduler.interval_secs must be greater than 0".to_string(),
            ));
        }
        if self.server.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(HotfeedError::Config(format!(
                "unknown timezone: {}",
                self.server.timezone
            )));
        }
        Ok(())
    }
}

fn validate_upstream_url(field: &str, value: &str) -> Result<()> {
    let parsed = url::Url::parse(value)
        .map_err(|e| HotfeedError::Config(format!("{field} is not a valid URL: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(HotfeedError::Config(format!(
            "{field} has unsupported scheme: {scheme}"
        ))),
    }
}
