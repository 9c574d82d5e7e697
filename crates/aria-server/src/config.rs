//! Server configuration loading from file and environment variables.

use aria_notify::{CalendarConfig, MailConfig};
use aria_voice::LiveKitConfig;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// LiveKit credentials for the SIP bridge.
    #[serde(default)]
    pub livekit: LiveKitConfig,

    /// Transactional mail provider settings.
    #[serde(default)]
    pub mail: MailConfig,

    /// Advisor-callback calendar settings.
    #[serde(default)]
    pub calendar: CalendarConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Busy timeout for SQLite connections, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Maximum number of pooled SQLite connections.
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "aria_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    3000
}

fn default_db_path() -> String {
    "aria.db".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

fn default_pool_max_size() -> u32 {
    8
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            pool_max_size: default_pool_max_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `ARIA_HOST` overrides `server.host`
/// - `ARIA_PORT` overrides `server.port`
/// - `ARIA_DB_PATH` overrides `database.path`
/// - `ARIA_LOG_LEVEL` overrides `logging.level`
/// - `ARIA_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `ARIA_LIVEKIT_URL` / `ARIA_LIVEKIT_API_KEY` / `ARIA_LIVEKIT_API_SECRET`
///   override the `livekit` section
/// - `ARIA_MAIL_API_KEY` / `ARIA_SENDER_EMAIL` / `ARIA_BACK_OFFICE_EMAIL`
///   override the `mail` section
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    // Environment variable overrides
    if let Ok(host) = std::env::var("ARIA_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Ok(port) = std::env::var("ARIA_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Ok(db_path) = std::env::var("ARIA_DB_PATH") {
        config.database.path = db_path;
    }
    if let Ok(level) = std::env::var("ARIA_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(json) = std::env::var("ARIA_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Ok(url) = std::env::var("ARIA_LIVEKIT_URL") {
        config.livekit.url = url;
    }
    if let Ok(key) = std::env::var("ARIA_LIVEKIT_API_KEY") {
        config.livekit.api_key = key;
    }
    if let Ok(secret) = std::env::var("ARIA_LIVEKIT_API_SECRET") {
        config.livekit.api_secret = secret;
    }
    if let Ok(key) = std::env::var("ARIA_MAIL_API_KEY") {
        config.mail.api_key = key;
    }
    if let Ok(sender) = std::env::var("ARIA_SENDER_EMAIL") {
        config.mail.sender_email = sender;
    }
    if let Ok(back_office) = std::env::var("ARIA_BACK_OFFICE_EMAIL") {
        config.mail.back_office_email = back_office;
    }

    Ok(config)
}
