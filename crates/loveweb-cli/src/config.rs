use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Simple configuration for loveweb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the pre-built runtime asset flavors
    /// (`release/` and `compat/` subdirectories).
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,

    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assets_dir: default_assets_dir(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_assets_dir() -> PathBuf {
    if let Some(dirs) = directories::ProjectDirs::from("com", "loveweb", "loveweb") {
        dirs.data_dir().join("runtime")
    } else {
        PathBuf::from("runtime")
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load config from default location or create default if not found
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(&path, content)?;
            Ok(config)
        }
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "loveweb", "loveweb") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.loveweb/config.toml")
        }
    }
}
