//! Runtime configuration.
//!
//! `APP_SETTINGS` picks a [`Profile`]; the profile supplies defaults which the
//! remaining variables may override:
//!
//! - `DATABASE_URL`: SQLite connection string
//! - `HOST`: IPv4 address to bind to (default: 127.0.0.1)
//! - `PORT`: port to bind to (default: 5000)
//! - `DOCS_DIR`: directory served under `/docs` (default: swagger)

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://team_roles.db";
const TESTING_DATABASE_URL: &str = "sqlite::memory:";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("unknown configuration profile `{0}`")]
    UnknownProfile(String),

    #[error("{key} has an invalid value `{value}`")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Development,
    Testing,
    Staging,
    Production,
}

impl Profile {
    /// Accepts `development` as well as the `config.DevelopmentConfig` form.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        let name = trimmed.strip_prefix("config.").unwrap_or(trimmed);
        let name = name.strip_suffix("Config").unwrap_or(name);

        match name.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Profile::Development),
            "testing" | "test" => Ok(Profile::Testing),
            "staging" => Ok(Profile::Staging),
            "production" | "prod" => Ok(Profile::Production),
            _ => Err(ConfigError::UnknownProfile(raw.to_string())),
        }
    }

    pub fn debug(self) -> bool {
        !matches!(self, Profile::Production)
    }

    pub fn testing(self) -> bool {
        matches!(self, Profile::Testing)
    }

    fn default_database_url(self) -> &'static str {
        match self {
            Profile::Testing => TESTING_DATABASE_URL,
            _ => DEFAULT_DATABASE_URL,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub profile: Profile,
    pub debug: bool,
    pub testing: bool,
    pub database_url: String,
    pub host: Ipv4Addr,
    pub port: u16,
    pub docs_dir: PathBuf,
}

impl Settings {
    /// Loads settings from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let profile = lookup("APP_SETTINGS")
            .ok_or(ConfigError::Missing("APP_SETTINGS"))
            .and_then(|raw| Profile::parse(&raw))?;

        let mut settings = Self::for_profile(profile);

        if let Some(url) = lookup("DATABASE_URL") {
            settings.database_url = url;
        }
        if let Some(host) = lookup("HOST") {
            settings.host = host
                .parse()
                .map_err(|_| ConfigError::Invalid { key: "HOST", value: host })?;
        }
        if let Some(port) = lookup("PORT") {
            settings.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value: port })?;
        }
        if let Some(dir) = lookup("DOCS_DIR") {
            settings.docs_dir = PathBuf::from(dir);
        }

        Ok(settings)
    }

    pub fn for_profile(profile: Profile) -> Self {
        Self {
            profile,
            debug: profile.debug(),
            testing: profile.testing(),
            database_url: profile.default_database_url().to_string(),
            host: Ipv4Addr::LOCALHOST,
            port: 5000,
            docs_dir: PathBuf::from("swagger"),
        }
    }

    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }

    /// Base URL advertised in the API description.
    pub fn server_url(&self) -> String {
        format!("http://{}:{}/", self.host, self.port)
    }

    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "team_roles_api=debug,tower_http=debug,info"
        } else {
            "info"
        }
    }
}
