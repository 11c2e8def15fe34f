use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = ".depslint.yml";

/// Artifact kind the validator consumes unless configured otherwise
pub const DEPS_TECH: &str = "deps.js";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LintConfig {
    /// File suffixes (techs) whose artifacts are deps declarations
    #[serde(default = "default_techs")]
    pub techs: Vec<String>,

    /// Glob patterns excluded from directory scans
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

fn default_techs() -> Vec<String> {
    vec![DEPS_TECH.to_string()]
}

fn default_exclude() -> Vec<String> {
    vec!["**/node_modules/**".to_string()]
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            techs: default_techs(),
            exclude: default_exclude(),
        }
    }
}

impl LintConfig {
    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty file means "all defaults"
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        if config.techs.is_empty() {
            anyhow::bail!("`techs` must list at least one tech");
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load an explicitly requested config, or `.depslint.yml` from `dir` when present
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        let path: PathBuf = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = dir.join(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    debug!("No {DEFAULT_CONFIG_FILE} found, using defaults");
                    return Ok(Self::default());
                }
                default
            }
        };

        debug!("Loading config from {}", path.display());
        Self::from_file(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = LintConfig::default();
        assert_eq!(config.techs, vec!["deps.js"]);
        assert_eq!(config.exclude, vec!["**/node_modules/**"]);
        assert_eq!(LintConfig::from_yaml("").unwrap(), config);
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let config = LintConfig::from_yaml("techs: [deps.js, deps.yml]\n").unwrap();
        assert_eq!(config.techs, vec!["deps.js", "deps.yml"]);
        assert_eq!(config.exclude, vec!["**/node_modules/**"]);
    }

    #[test]
    fn test_rejects_unknown_keys_and_empty_techs() {
        assert!(LintConfig::from_yaml("tech: deps.js\n").is_err());
        assert!(LintConfig::from_yaml("techs: []\n").is_err());
    }

    #[test]
    fn test_load_prefers_explicit_then_default_file() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(
            LintConfig::load(None, temp_dir.path()).unwrap(),
            LintConfig::default()
        );

        fs::write(
            temp_dir.path().join(DEFAULT_CONFIG_FILE),
            "exclude: ['libs/**']\n",
        )
        .unwrap();
        let config = LintConfig::load(None, temp_dir.path()).unwrap();
        assert_eq!(config.exclude, vec!["libs/**"]);

        let missing = temp_dir.path().join("other.yml");
        assert!(LintConfig::load(Some(&missing), temp_dir.path()).is_err());
    }
}
