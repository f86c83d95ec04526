// Copyright 2025 Sandlog (https://github.com/sandlog/sandlog)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Sandlog Server Configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: HttpServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub robot: RobotServiceConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpServerConfig {
    /// HTTP API listen address (e.g., "127.0.0.1:47200")
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Enable CORS (the notes UI is served from another origin in dev)
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Path to the note-store data directory
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

/// Where to reach the robot-management service for configuration lookups.
///
/// Leaving `base_url` unset disables the `/api/config` endpoint; the notes
/// API keeps working without it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RobotServiceConfig {
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds, applied to every robot-service call
    #[serde(default = "default_robot_timeout")]
    pub timeout_secs: u64,
}

fn default_listen_addr() -> String {
    "127.0.0.1:47200".to_string()
}

fn default_enable_cors() -> bool {
    true
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./sandlog-data")
}

fn default_robot_timeout() -> u64 {
    30
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            enable_cors: default_enable_cors(),
        }
    }
}

impl Default for RobotServiceConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout_secs: default_robot_timeout(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: HttpServerConfig::default(),
            storage: StorageConfig::default(),
            robot: RobotServiceConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file, or defaults when no file is
    /// given.
    pub fn load(path: Option<impl AsRef<Path>>) -> Result<Self> {
        match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path.as_ref())?;
                Ok(toml::from_str(&contents)?)
            }
            None => Ok(Self::default()),
        }
    }

    /// Validate the configuration before startup.
    pub fn validate(&self) -> Result<()> {
        self.server
            .listen_addr
            .parse::<SocketAddr>()
            .map_err(|e| anyhow::anyhow!("invalid listen_addr '{}': {e}", self.server.listen_addr))?;

        if let Some(base_url) = &self.robot.base_url {
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                anyhow::bail!("robot.base_url must be an http(s) URL, got '{base_url}'");
            }
        }

        if self.robot.timeout_secs == 0 {
            anyhow::bail!("robot.timeout_secs must be greater than 0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        ServerConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            [server]
            listen_addr = "0.0.0.0:8080"

            [robot]
            base_url = "http://robots.internal:9090"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.listen_addr, "0.0.0.0:8080");
        assert!(config.server.enable_cors);
        assert_eq!(config.storage.data_dir, PathBuf::from("./sandlog-data"));
        assert_eq!(
            config.robot.base_url.as_deref(),
            Some("http://robots.internal:9090")
        );
        assert_eq!(config.robot.timeout_secs, 30);
        config.validate().unwrap();
    }

    #[test]
    fn bad_listen_addr_fails_validation() {
        let mut config = ServerConfig::default();
        config.server.listen_addr = "not an address".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_http_robot_url_fails_validation() {
        let mut config = ServerConfig::default();
        config.robot.base_url = Some("ftp://robots".into());
        assert!(config.validate().is_err());
    }
}
