//! Configuration loading and management
//!
//! Configuration comes from an optional YAML file with environment-variable
//! overrides (`PORT`, `DATA_DIR`, `STATIC_DIR`). Every field has a default,
//! so the service also runs with no configuration at all.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Path of the config file read by [`AppConfig::load`] when present
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// TCP port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the JSON store files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory of static assets served as the fallback route
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_port() -> u16 {
    3000
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("public")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            data_dir: default_data_dir(),
            static_dir: default_static_dir(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).context("failed to parse config")?;
        Ok(config)
    }

    /// Load configuration for the running process.
    ///
    /// Reads `config.yaml` if it exists, then applies environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = if Path::new(DEFAULT_CONFIG_FILE).exists() {
            Self::from_yaml_file(DEFAULT_CONFIG_FILE)?
        } else {
            Self::default()
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(port) = std::env::var("PORT") {
            self.port = port
                .parse()
                .with_context(|| format!("invalid PORT value '{}'", port))?;
        }
        if let Ok(dir) = std::env::var("DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("STATIC_DIR") {
            self.static_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    /// Socket address to bind
    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Backing file for the order collection
    pub fn orders_path(&self) -> PathBuf {
        self.data_dir.join("pedidos.json")
    }

    /// Backing file for the sales ledger
    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join("banco.json")
    }

    /// Backing file for the weekly history log
    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join("historicoSemanal.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_original_layout() {
        let config = AppConfig::default();

        assert_eq!(config.port, 3000);
        assert_eq!(config.orders_path(), PathBuf::from("data/pedidos.json"));
        assert_eq!(config.ledger_path(), PathBuf::from("data/banco.json"));
        assert_eq!(
            config.history_path(),
            PathBuf::from("data/historicoSemanal.json")
        );
    }

    #[test]
    fn yaml_fields_are_all_optional() {
        let config = AppConfig::from_yaml_str("port: 8080\n").unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.static_dir, PathBuf::from("public"));
    }
}
