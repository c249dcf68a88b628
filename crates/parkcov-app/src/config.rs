//! Configuration management for parkcov
//!
//! Config stored at: ~/.config/parkcov/config.json

use parkcov_domain::model::TOP_PRIORITY_TIER;
use parkcov_types::{ConfigError, OutputFormat, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Store directory override (catalog and annotations)
    #[serde(default)]
    pub store_dir: Option<PathBuf>,

    /// Default output format (json, table)
    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,

    /// Split pivot columns by dimension 1
    #[serde(default = "default_true")]
    pub show_dimension1: bool,

    /// Split pivot columns by dimension 2
    #[serde(default = "default_true")]
    pub show_dimension2: bool,

    /// Supplier codes removed from the product snapshot before analysis
    #[serde(default)]
    pub excluded_suppliers: Vec<String>,

    /// Priority category the policy engine inspects
    #[serde(default = "default_policy_category")]
    pub policy_category: String,

    /// Teams offered as owners of model annotations
    #[serde(default = "default_teams")]
    pub teams: Vec<String>,
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_true() -> bool {
    true
}

fn default_policy_category() -> String {
    TOP_PRIORITY_TIER.to_string()
}

fn default_teams() -> Vec<String> {
    ["Sales", "Purchasing", "Product", "Logistics"]
        .iter()
        .map(|t| t.to_string())
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: None,
            output_format: default_output_format(),
            show_dimension1: true,
            show_dimension2: true,
            excluded_suppliers: Vec::new(),
            policy_category: default_policy_category(),
            teams: default_teams(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("parkcov");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Get the store directory path
    pub fn store_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.store_dir {
            return Ok(dir.clone());
        }

        let store_dir = dirs::data_dir()
            .ok_or(ConfigError::NotFound)?
            .join("parkcov");
        Ok(store_dir)
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            Self::from_json(&content)
        } else {
            Ok(Config::default())
        }
    }

    /// Parse config text; missing fields take their defaults
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()).into())
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Whether a team name is one of the configured owners
    pub fn is_known_team(&self, team: &str) -> bool {
        self.teams.iter().any(|t| t == team)
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Parkcov Configuration")?;
        writeln!(f, "=====================")?;
        writeln!(f)?;
        writeln!(
            f,
            "Store dir:          {}",
            self.store_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Output format:      {}", self.output_format)?;
        writeln!(f, "Show dimension 1:   {}", self.show_dimension1)?;
        writeln!(f, "Show dimension 2:   {}", self.show_dimension2)?;
        writeln!(
            f,
            "Excluded suppliers: {}",
            if self.excluded_suppliers.is_empty() {
                "(none)".to_string()
            } else {
                self.excluded_suppliers.join(", ")
            }
        )?;
        writeln!(f, "Policy category:    {}", self.policy_category)?;
        writeln!(f, "Teams:              {}", self.teams.join(", "))?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:        {}", path.display())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.output_format, OutputFormat::Table);
        assert!(config.show_dimension1 && config.show_dimension2);
        assert!(config.excluded_suppliers.is_empty());
        assert_eq!(config.policy_category, "AA");
        assert!(config.is_known_team("Purchasing"));
        assert!(!config.is_known_team("Marketing"));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = Config::from_json(r#"{"excluded_suppliers": ["3"], "show_dimension2": false}"#)
            .unwrap();
        assert_eq!(config.excluded_suppliers, vec!["3"]);
        assert!(!config.show_dimension2);
        assert!(config.show_dimension1);
        assert_eq!(config.teams.len(), 4);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = Config::from_json("{oops").unwrap_err();
        assert!(matches!(
            err,
            parkcov_types::Error::Config(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_store_dir_override() {
        let config = Config {
            store_dir: Some(PathBuf::from("/tmp/parkcov-store")),
            ..Default::default()
        };
        assert_eq!(config.store_dir().unwrap(), PathBuf::from("/tmp/parkcov-store"));
    }

    #[test]
    fn test_roundtrip_json() {
        let config = Config {
            excluded_suppliers: vec!["3".to_string()],
            policy_category: "A".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_string_pretty(&config).unwrap();
        assert_eq!(Config::from_json(&json).unwrap(), config);
    }
}
