use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr, time::Duration};

use crate::{constants::DEFAULT_SESSION_TTL, entities::language::Language};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    /// Directory holding one file per slot; in-memory slots when unset.
    #[serde(default)]
    pub storage_dir: Option<String>,

    /// Hex SHA-256 of the admin secret.
    #[serde(default)]
    pub admin_password_hash: String,

    /// humantime duration, e.g. `24h`.
    #[serde(default = "default_session_ttl")]
    pub session_ttl: String,

    #[serde(default)]
    pub default_language: Language,

    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Portfolio-Projects".to_string()
}
fn default_session_ttl() -> String {
    humantime::format_duration(DEFAULT_SESSION_TTL).to_string()
}
fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            env: default_env(),
            name: default_name(),
            storage_dir: None,
            admin_password_hash: String::new(),
            session_ttl: default_session_ttl(),
            default_language: Language::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(Environment::with_prefix("APP").prefix_separator("_").ignore_empty(true));

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if let Err(e) = humantime::parse_duration(self.session_ttl.trim()) {
            errors.push(format!("SESSION_TTL is not a valid duration: {}", e));
        }
        if self.is_production() && self.admin_password_hash.trim().is_empty() {
            tracing::warn!("ADMIN_PASSWORD_HASH is not set; admin features are disabled");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    /// Falls back to the default ttl when the configured value does not parse.
    pub fn session_ttl(&self) -> Duration {
        humantime::parse_duration(self.session_ttl.trim()).unwrap_or(DEFAULT_SESSION_TTL)
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("storage_dir", &self.storage_dir)
            .field("admin_password_hash", &self.admin_password_hash.redact())
            .field("session_ttl", &self.session_ttl)
            .field("default_language", &self.default_language)
            .field("log_filter", &self.log_filter)
            .finish()
    }
}
