//! Server configuration from environment variables.

use std::time::Duration;

use crate::stores::DEFAULT_PLAN_TTL;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SHEET_DB: &str = "trpgsheet.db";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("STORAGE must be 'sqlite' or 'memory', got '{0}'")]
    InvalidStorage(String),

    #[error("{var} must be a port number, got '{value}'")]
    InvalidPort { var: &'static str, value: String },

    #[error("LEVEL_UP_PLAN_TTL_SECS must be a whole number of seconds, got '{0}'")]
    InvalidPlanTtl(String),
}

/// Where sheets are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite { path: String },
    /// Lost on restart.
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    /// Comma-separated origins, or `*`. CORS is off when unset.
    pub cors_allowed_origins: Option<String>,
    pub level_up_plan_ttl: Duration,
}

impl ServerConfig {
    /// Read `SERVER_HOST`, `SERVER_PORT` (or `PORT`), `STORAGE`, `SHEET_DB`,
    /// `CORS_ALLOWED_ORIGINS` and `LEVEL_UP_PLAN_TTL_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.into());
        let port = match lookup("SERVER_PORT")
            .map(|raw| ("SERVER_PORT", raw))
            .or_else(|| lookup("PORT").map(|raw| ("PORT", raw)))
        {
            Some((var, raw)) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort { var, value: raw })?,
            None => DEFAULT_PORT,
        };

        let storage = match lookup("STORAGE")
            .map(|raw| raw.trim().to_ascii_lowercase())
            .as_deref()
        {
            None | Some("") | Some("sqlite") => StorageBackend::Sqlite {
                path: lookup("SHEET_DB").unwrap_or_else(|| DEFAULT_SHEET_DB.into()),
            },
            Some("memory") => StorageBackend::Memory,
            Some(other) => return Err(ConfigError::InvalidStorage(other.to_string())),
        };

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty());

        let level_up_plan_ttl = match lookup("LEVEL_UP_PLAN_TTL_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidPlanTtl(raw))?,
            None => DEFAULT_PLAN_TTL,
        };

        Ok(Self {
            host,
            port,
            storage,
            cors_allowed_origins,
            level_up_plan_ttl,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
