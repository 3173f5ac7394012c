//! Base endpoint selection.
//!
//! The API root is configuration, never a per-call argument. Two presets
//! exist (local development and the hosted deployment); `ROSTER_API_URL`
//! overrides both.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub const LOCAL_BASE_URL: &str = "http://localhost:8080/api/v1/students";
pub const PRODUCTION_BASE_URL: &str = "https://student-curd-api-y9yw.onrender.com/api/v1/students";

pub const API_URL_VAR: &str = "ROSTER_API_URL";
pub const ENV_VAR: &str = "ROSTER_ENV";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown environment `{0}` (expected `local` or `production`)")]
    UnknownEnvironment(String),
    #[error("the API base URL is empty")]
    EmptyBaseUrl,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Local,
    Production,
}

impl Environment {
    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Local => LOCAL_BASE_URL,
            Environment::Production => PRODUCTION_BASE_URL,
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "dev" | "development" => Ok(Environment::Local),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(ConfigError::UnknownEnvironment(s.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Local => f.write_str("local"),
            Environment::Production => f.write_str("production"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let base_url = base_url.into().trim().to_string();
        if base_url.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        Ok(Self { base_url })
    }

    pub fn for_environment(env: Environment) -> Self {
        Self {
            base_url: env.base_url().to_string(),
        }
    }

    /// Load `.env` if present, then resolve from `ROSTER_API_URL` or
    /// `ROSTER_ENV` (default `local`).
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::resolve(
            dotenvy::var(API_URL_VAR).ok().as_deref(),
            dotenvy::var(ENV_VAR).ok().as_deref(),
        )
    }

    /// Explicit URL beats the named environment; neither means local.
    pub fn resolve(api_url: Option<&str>, env: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(url) = api_url {
            return Self::new(url);
        }
        let env = match env {
            Some(name) => name.parse()?,
            None => Environment::default(),
        };
        Ok(Self::for_environment(env))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
