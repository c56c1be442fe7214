//! Client configuration.
//!
//! Deserializable so applications can embed it in their own config files;
//! every field except `api_key` has a default.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::http::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use crate::types::{Operation, ResponseFormat};

pub const DEFAULT_BASE_URL: &str = "http://api.petfinder.com/";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_key: String,
    /// Only needed to sign `auth.getToken`.
    pub api_secret: Option<String>,
    pub response_format: ResponseFormat,
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Operations that get a session token, fetched on first use.
    pub token_required: Vec<Operation>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_secret: None,
            response_format: ResponseFormat::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            token_required: Vec::new(),
        }
    }
}

impl ClientConfig {
    pub fn new(api_key: &str, api_secret: Option<&str>) -> Self {
        Self {
            api_key: api_key.to_string(),
            api_secret: api_secret.map(str::to_string),
            ..Self::default()
        }
    }

    /// Read `PETFINDER_API_KEY` (required), `PETFINDER_API_SECRET`,
    /// `PETFINDER_FORMAT` and `PETFINDER_BASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key =
            lookup("PETFINDER_API_KEY").ok_or(ConfigError::MissingEnv("PETFINDER_API_KEY"))?;
        let mut config = Self {
            api_key,
            api_secret: lookup("PETFINDER_API_SECRET"),
            ..Self::default()
        };
        if let Some(format) = lookup("PETFINDER_FORMAT") {
            config.response_format = format.parse()?;
        }
        if let Some(base_url) = lookup("PETFINDER_BASE_URL") {
            config.base_url = base_url;
        }
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
