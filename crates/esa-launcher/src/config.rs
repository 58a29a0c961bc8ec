use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use esa_common::env;

use crate::error::LauncherError;

const CONFIG_DIR_VAR: &str = "ESA_MCP_CONFIG_DIR";
const CONFIG_DIR_NAME: &str = ".esa-mcp-server";
const CONFIG_FILE_NAME: &str = "config.json";

/// Launcher settings. Persisted under the same keys as the environment
/// variables they become when the relay is started.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LauncherConfig {
    #[serde(rename = "ESA_API_KEY", default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(rename = "ESA_TEAM_NAME", default, skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,

    #[serde(
        rename = "PORT",
        default,
        deserialize_with = "number_or_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub port: Option<u16>,
}

impl LauncherConfig {
    /// Both credentials are present and non-empty.
    pub fn is_complete(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.api_key) && present(&self.team_name)
    }

    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(env::DEFAULT_PORT)
    }

    /// Variables injected into the relay process on top of the inherited
    /// environment. Unset values are left to the parent environment.
    pub fn env_vars(&self) -> Vec<(&'static str, String)> {
        let mut vars = Vec::with_capacity(3);
        if let Some(key) = &self.api_key {
            vars.push((env::API_KEY, key.clone()));
        }
        if let Some(team) = &self.team_name {
            vars.push((env::TEAM_NAME, team.clone()));
        }
        vars.push((env::PORT, self.port_or_default().to_string()));
        vars
    }
}

/// Older config files store the port as a string.
fn number_or_string<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPort {
        Number(u16),
        Text(String),
    }

    match Option::<RawPort>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawPort::Number(n)) => Ok(Some(n)),
        Some(RawPort::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(RawPort::Text(s)) => s
            .trim()
            .parse::<u16>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid port: {s:?}"))),
    }
}

/// The per-user JSON file holding [`LauncherConfig`].
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$ESA_MCP_CONFIG_DIR/config.json`, falling back to
    /// `~/.esa-mcp-server/config.json`.
    pub fn default_location() -> Self {
        let dir = match std::env::var(CONFIG_DIR_VAR) {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(CONFIG_DIR_NAME),
        };
        Self::new(dir.join(CONFIG_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Never fails: a missing file is an empty config, and an unreadable or
    /// malformed one is reported and then treated as empty.
    pub fn load(&self) -> LauncherConfig {
        match self.try_load() {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "ignoring unreadable config file");
                LauncherConfig::default()
            }
        }
    }

    fn try_load(&self) -> Result<LauncherConfig, LauncherError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(LauncherConfig::default())
            }
            Err(e) => {
                return Err(LauncherError::ConfigRead {
                    path: self.path.clone(),
                    message: e.to_string(),
                })
            }
        };
        serde_json::from_slice(&bytes).map_err(|e| LauncherError::ConfigRead {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    pub fn save(&self, config: &LauncherConfig) -> Result<(), LauncherError> {
        let write_err = |source| LauncherError::ConfigWrite {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let bytes = serde_json::to_vec_pretty(config)?;
        std::fs::write(&self.path, bytes).map_err(write_err)?;
        Ok(())
    }
}
