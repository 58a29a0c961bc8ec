use esa_common::env;
use esa_common::esa::{EsaClientConfig, DEFAULT_BASE_URL};

use crate::error::AppError;

const HOST_VAR: &str = "ESA_RELAY_HOST";
const DEFAULT_HOST: &str = "0.0.0.0";

/// Relay configuration, loaded once at startup from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub team_name: String,
    pub host: String,
    pub port: u16,
    pub api_base_url: String,
}

impl Config {
    /// Required:
    /// - `ESA_API_KEY`
    /// - `ESA_TEAM_NAME`
    ///
    /// Optional:
    /// - `PORT` (default: 3000)
    /// - `ESA_RELAY_HOST` (default: "0.0.0.0")
    /// - `ESA_API_BASE_URL` (default: "https://api.esa.io/v1")
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| AppError::Config(format!("{name} environment variable is required")))
        };
        let api_key = required(env::API_KEY)?;
        let team_name = required(env::TEAM_NAME)?;

        let port = match lookup(env::PORT).filter(|v| !v.is_empty()) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                AppError::Config(format!("{} must be a port number, got {raw:?}", env::PORT))
            })?,
            None => env::DEFAULT_PORT,
        };

        Ok(Self {
            api_key,
            team_name,
            host: lookup(HOST_VAR)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            api_base_url: lookup(env::API_BASE_URL)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn esa_client_config(&self) -> EsaClientConfig {
        EsaClientConfig::new(&self.api_key, &self.team_name).with_base_url(&self.api_base_url)
    }
}
