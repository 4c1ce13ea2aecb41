//! Configuration management
//!
//! Loads configuration from:
//! 1. Default values
//! 2. Configuration files (config/default.toml, config/local.toml)
//! 3. Environment variables (override)

use serde::Deserialize;
use std::path::PathBuf;

/// Default snapshot lifetime: 7 days
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 60 * 60 * 24 * 7;

/// Largest TTL a `chrono::Duration` can hold (i64 milliseconds)
pub const MAX_CACHE_TTL_SECONDS: u64 = i64::MAX as u64 / 1000;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub literal: LiteralConfig,
    pub toggl: TogglConfig,
    pub cache: CacheConfig,
    pub models: ModelsConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Port number (e.g., 8080)
    pub port: u16,
}

/// Literal (reading list) credentials and endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct LiteralConfig {
    /// GraphQL endpoint
    pub api_url: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LiteralConfig {
    pub fn has_credentials(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

/// Toggl Track credentials and endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TogglConfig {
    /// REST API base, without trailing slash
    pub api_url: String,
    #[serde(default)]
    pub api_token: String,
    /// Workspace whose projects and clients are listed
    #[serde(default)]
    pub workspace_id: u64,
}

/// File snapshot configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Directory holding `books.json`, `projects.json` and `covers/`
    pub static_dir: PathBuf,
    /// Snapshot lifetime in seconds (default: 604800 = 7 days)
    pub ttl_seconds: u64,
}

impl CacheConfig {
    pub fn snapshot_path(&self, file_name: &str) -> PathBuf {
        self.static_dir.join(file_name)
    }

    pub fn covers_dir(&self) -> PathBuf {
        self.static_dir.join("covers")
    }

    /// Snapshot lifetime, saturating at the largest representable duration
    pub fn ttl(&self) -> chrono::Duration {
        i64::try_from(self.ttl_seconds)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }
}

/// Building model location
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    /// Directory containing the `building-fragments-*.glb` files
    pub dir: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Log format: "pretty" or "json"
    pub format: String,
}

impl LoggingConfig {
    /// Filter directives used when `RUST_LOG` is not set
    pub fn default_filter(&self) -> String {
        format!("portfolio={},tower_http=debug", self.level.to_lowercase())
    }

    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// # Loading Order
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/local.toml (if exists)
    /// 4. Environment variables (PORTFOLIO__*)
    /// 5. LITERAL_EMAIL, LITERAL_PASSWORD, TOGGL_API_TOKEN, TOGGL_WORKSPACE_ID
    ///
    /// # Errors
    /// Returns error if configuration is invalid
    pub fn load() -> Result<Self, crate::error::AppError> {
        use config::{Config, Environment, File};

        let env_var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        let config = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("literal.api_url", "https://api.literal.club/")?
            .set_default("toggl.api_url", "https://api.track.toggl.com/api/v9")?
            .set_default("toggl.workspace_id", 0)?
            .set_default("cache.static_dir", "./static")?
            .set_default("cache.ttl_seconds", DEFAULT_CACHE_TTL_SECONDS)?
            .set_default("models.dir", "./static/models")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("PORTFOLIO")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("literal.email", env_var("LITERAL_EMAIL"))?
            .set_override_option("literal.password", env_var("LITERAL_PASSWORD"))?
            .set_override_option("toggl.api_token", env_var("TOGGL_API_TOKEN"))?
            .set_override_option("toggl.workspace_id", env_var("TOGGL_WORKSPACE_ID"))?
            .build()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;
        app_config.validate()?;
        Ok(app_config)
    }

    fn validate(&self) -> Result<(), crate::error::AppError> {
        if self.cache.ttl_seconds == 0 {
            return Err(crate::error::AppError::Config(
                "cache.ttl_seconds must be greater than 0".to_string(),
            ));
        }
        if self.cache.ttl_seconds > MAX_CACHE_TTL_SECONDS {
            return Err(crate::error::AppError::Config(format!(
                "cache.ttl_seconds must not exceed {MAX_CACHE_TTL_SECONDS}"
            )));
        }

        for (key, value) in [
            ("literal.api_url", &self.literal.api_url),
            ("toggl.api_url", &self.toggl.api_url),
        ] {
            url::Url::parse(value).map_err(|e| {
                crate::error::AppError::Config(format!("{key} is not a valid URL: {e}"))
            })?;
        }

        if self.logging.level.parse::<tracing::Level>().is_err() {
            return Err(crate::error::AppError::Config(format!(
                "logging.level must be one of trace, debug, info, warn, error (got {:?})",
                self.logging.level
            )));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(crate::error::AppError::Config(format!(
                "logging.format must be \"pretty\" or \"json\" (got {:?})",
                self.logging.format
            )));
        }

        Ok(())
    }
}
