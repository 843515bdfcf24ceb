use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub session: SessionConfig,
    pub oauth: OAuthConfig,
    pub admin: AdminConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_num_threads")]
    pub num_threads: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// "redb" or "memory"
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Idle lifetime in seconds
    #[serde(default = "default_session_ttl")]
    pub ttl: i64,
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval: u64,
    #[serde(default)]
    pub secure_cookie: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub authorize_url: String,
    pub token_url: String,
    pub user_info_url: String,
    #[serde(default = "default_scope")]
    pub scope: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub console: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: default_storage_path(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            ttl: default_session_ttl(),
            cleanup_interval: default_cleanup_interval(),
            secure_cookie: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            console: false,
        }
    }
}

// Default value functions
fn default_port() -> u16 {
    8080
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_num_threads() -> usize {
    num_cpus::get()
}

fn default_backend() -> String {
    "redb".to_string()
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("accounts.redb")
}

fn default_cookie_name() -> String {
    "reaper_sid".to_string()
}

fn default_session_ttl() -> i64 {
    86_400 // 1 day
}

fn default_cleanup_interval() -> u64 {
    300 // 5 minutes
}

fn default_scope() -> String {
    "all".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            bail!("Server port must be greater than 0");
        }

        if self.server.num_threads == 0 {
            bail!("num_threads must be greater than 0");
        }

        match self.storage.backend.as_str() {
            "redb" => {
                if self.storage.path.as_os_str().is_empty() {
                    bail!("storage.path must not be empty for the redb backend");
                }
            }
            "memory" => {}
            other => bail!("Invalid storage backend '{}'. Must be one of: redb, memory", other),
        }

        if self.session.cookie_name.is_empty() {
            bail!("session.cookie_name must not be empty");
        }

        if self.session.ttl <= 0 {
            bail!("session.ttl must be greater than 0");
        }

        if self.session.cleanup_interval == 0 {
            bail!("session.cleanup_interval must be greater than 0");
        }

        for (name, value) in [
            ("client_id", &self.oauth.client_id),
            ("client_secret", &self.oauth.client_secret),
            ("authorize_url", &self.oauth.authorize_url),
            ("token_url", &self.oauth.token_url),
            ("user_info_url", &self.oauth.user_info_url),
        ] {
            if value.is_empty() {
                bail!("oauth.{} must not be empty", name);
            }
        }

        if self.oauth.request_timeout == 0 {
            bail!("oauth.request_timeout must be greater than 0");
        }

        if self.admin.api_key.is_empty() {
            bail!("admin.api_key must not be empty");
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            bail!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.logging.level
            );
        }

        let valid_formats = ["json", "console"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            bail!(
                "Invalid log format '{}'. Must be one of: json, console",
                self.logging.format
            );
        }

        Ok(())
    }
}
