//! Configuration management for automcp generation runs.
//!
//! This module defines the `Config` struct describing one generation run. The
//! configuration can be loaded from a YAML or TOML file, created
//! programmatically, or assembled from command-line arguments.
//!
//! # Examples
//!
//! ```no_run
//! use automcp::core::config::Config;
//!
//! // Create a new config programmatically
//! let mut config = Config::new("weather", "tools.json");
//! config.reject_duplicate_names = true;
//!
//! // Or load from a config file
//! # async fn load() -> automcp::Result<()> {
//! let config = Config::from_file("automcp.yaml").await?;
//! # Ok(())
//! # }
//! ```

// Internal imports (std, crate)
use std::path::{Path, PathBuf};

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::core::error::{Error, Result};

/// Configuration for one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Service name; also names the output directory
    pub service_name: String,

    /// Path to the JSON descriptor list
    pub tools_path: PathBuf,

    /// Directory the generated project is placed under
    #[serde(default = "default_servers_root")]
    pub servers_root: PathBuf,

    /// Skeleton directory; the embedded skeleton is used when unset
    #[serde(default)]
    pub template_dir: Option<PathBuf>,

    /// Fail instead of warning when two descriptors share a name
    #[serde(default)]
    pub reject_duplicate_names: bool,
}

impl Config {
    /// Create a new Config with default values
    pub fn new(service_name: impl Into<String>, tools_path: impl Into<PathBuf>) -> Self {
        Self {
            service_name: service_name.into(),
            tools_path: tools_path.into(),
            servers_root: default_servers_root(),
            template_dir: None,
            reject_duplicate_names: false,
        }
    }

    /// Load configuration from a `.yml`, `.yaml` or `.toml` file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        match extension(path) {
            Some("toml") => Ok(toml::from_str(&content)?),
            Some("yml" | "yaml") | None => Ok(serde_yaml::from_str(&content)?),
            Some(other) => Err(Error::config(format!(
                "Unsupported config format '.{other}' for {}",
                path.display()
            ))),
        }
    }

    /// Save configuration to a file, picking the format from the extension
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match extension(path) {
            Some("toml") => toml::to_string_pretty(self)
                .map_err(|e| Error::config(format!("Failed to encode TOML: {e}")))?,
            _ => serde_yaml::to_string(self)?,
        };
        fs::write(path, content).await?;
        Ok(())
    }

    /// Directory the generated project will be written to
    pub fn target_dir(&self) -> PathBuf {
        self.servers_root.join(&self.service_name)
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

fn default_servers_root() -> PathBuf {
    PathBuf::from("servers")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_config_roundtrip_yaml() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("automcp.yaml");

        let config = Config::new("weather", "tools.json");
        config.save(&file_path).await?;

        let loaded = Config::from_file(&file_path).await?;
        assert_eq!(loaded, config);
        assert_eq!(loaded.servers_root, PathBuf::from("servers"));
        assert_eq!(loaded.template_dir, None);
        assert!(!loaded.reject_duplicate_names);

        Ok(())
    }

    #[tokio::test]
    async fn test_config_from_toml() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("automcp.toml");
        fs::write(
            &file_path,
            "service_name = \"billing\"\ntools_path = \"out/tools.json\"\nreject_duplicate_names = true\n",
        )
        .await?;

        let loaded = Config::from_file(&file_path).await?;
        assert_eq!(loaded.service_name, "billing");
        assert_eq!(loaded.tools_path, PathBuf::from("out/tools.json"));
        assert!(loaded.reject_duplicate_names);
        assert_eq!(loaded.target_dir(), PathBuf::from("servers/billing"));

        Ok(())
    }

    #[tokio::test]
    async fn test_config_rejects_unknown_format() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("automcp.ini");
        fs::write(&file_path, "service_name=x").await?;

        let err = Config::from_file(&file_path).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        Ok(())
    }
}
