//! Configuration for habitplan

use std::path::{Path, PathBuf};

use eyre::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the hosted generation service
    #[serde(default = "default_service_url")]
    pub service_url: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Directory where answers, plan, and completion state are persisted
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Drop the free-text custom-interests question from the questionnaire
    #[serde(default)]
    pub skip_custom_interests: bool,
}

fn default_service_url() -> String {
    // Netlify functions prefix, matching the deployed service layout
    "http://localhost:8888/.netlify/functions".to_string()
}

fn default_timeout_ms() -> u64 {
    60_000
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("habitplan")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            timeout_ms: default_timeout_ms(),
            data_dir: default_data_dir(),
            skip_custom_interests: false,
        }
    }
}

impl Config {
    /// Load config from file, or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            return Ok(config);
        }

        // Try default locations
        let default_paths = [
            dirs::config_dir().map(|p| p.join("habitplan").join("config.yml")),
            Some(PathBuf::from("habitplan.yml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let config: Config = serde_yaml::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Config::default())
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.service_url.contains("/.netlify/functions"));
        assert_eq!(config.timeout_ms, 60_000);
        assert!(!config.skip_custom_interests);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: Config = serde_yaml::from_str("service_url: https://planner.example.com/api\n").unwrap();
        assert_eq!(config.service_url, "https://planner.example.com/api");
        assert_eq!(config.timeout_ms, 60_000);
    }

    #[test]
    fn test_save_and_load() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.yml");

        let mut config = Config::default();
        config.skip_custom_interests = true;
        config.save(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert!(loaded.skip_custom_interests);
        assert_eq!(loaded.service_url, config.service_url);
    }
}
