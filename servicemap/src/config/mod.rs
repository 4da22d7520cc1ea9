//! Configuration for the servicemap engine
//!
//! Default config file: ./servicemap.toml

use crate::cache::{CacheConfig, DEFAULT_TTL_SECS};
use crate::schema::fields::{CUSTOM_FIELDS, IDENTITY_FIELDS, SERVICE_FLAGS, SYSTEM_FIELDS};
use crate::schema::FieldSets;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "servicemap.toml";

/// Main configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub layer: LayerConfig,
    #[serde(default)]
    pub dictionary: DictionaryConfig,
    #[serde(default)]
    pub schema: CacheConfig,
    #[serde(default)]
    pub fields: FieldsConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LayerConfig {
    /// JSON snapshot backing the in-memory feature store
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("./data/layer.json")
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DictionaryConfig {
    /// Keyword dictionary rows (.json, .yaml or .yml)
    #[serde(default = "default_dictionary_path")]
    pub path: PathBuf,
    /// Seconds a loaded dictionary stays fresh
    #[serde(default = "default_dictionary_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_dictionary_ttl_secs() -> u64 {
    DEFAULT_TTL_SECS
}

fn default_dictionary_path() -> PathBuf {
    PathBuf::from("./data/keywords.json")
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            path: default_dictionary_path(),
            ttl_secs: default_dictionary_ttl_secs(),
        }
    }
}

impl DictionaryConfig {
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            ttl_secs: self.ttl_secs,
        }
    }
}

/// Overrides for the built-in field sets. Absent lists keep the defaults.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct FieldsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_flags: Option<Vec<String>>,
}

impl FieldsConfig {
    pub fn to_field_sets(&self) -> FieldSets {
        let pick = |value: &Option<Vec<String>>, fallback: &[&str]| -> Vec<String> {
            value
                .clone()
                .unwrap_or_else(|| fallback.iter().map(|s| s.to_string()).collect())
        };
        FieldSets::new(
            pick(&self.system, SYSTEM_FIELDS),
            pick(&self.identity, IDENTITY_FIELDS),
            pick(&self.custom, CUSTOM_FIELDS),
            pick(&self.service_flags, SERVICE_FLAGS),
        )
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log output format: "pretty" or "json"
    /// Override with LOG_FORMAT env var
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter string
    /// Override with RUST_LOG env var
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_log_level() -> String {
    "info,servicemap=debug".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

/// Expand ~ to home directory in path
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    let s = path.to_string_lossy();
    if let Some(rest) = s.strip_prefix("~/") {
        let home = home_dir()?;
        Ok(home.join(rest))
    } else if s == "~" {
        home_dir()
    } else {
        Ok(path.to_path_buf())
    }
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| Error::Config("Cannot determine home directory".to_string()))
}

impl Config {
    /// Load config from file path, falling back to defaults when absent
    pub fn load_or_default(config_path: &Path) -> Result<Self> {
        let mut config = if config_path.exists() {
            let content = fs::read_to_string(config_path)?;
            toml::from_str(&content)?
        } else {
            tracing::debug!(path = %config_path.display(), "Config file not found, using defaults");
            Config::default()
        };
        config.expand_paths()?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    pub fn field_sets(&self) -> FieldSets {
        self.fields.to_field_sets()
    }

    fn expand_paths(&mut self) -> Result<()> {
        self.layer.snapshot_path = expand_tilde(&self.layer.snapshot_path)?;
        self.dictionary.path = expand_tilde(&self.dictionary.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_or_default(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.dictionary.ttl_secs, DEFAULT_TTL_SECS);
        assert_eq!(config.schema.ttl_secs, DEFAULT_TTL_SECS);
        assert_eq!(config.observability.log_format, "pretty");
        assert_eq!(config.field_sets().service_flags().len(), SERVICE_FLAGS.len());
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(
            &path,
            r#"
[dictionary]
path = "/srv/keywords.yaml"
ttl_secs = 60

[fields]
service_flags = ["Transportation", "Meals"]
"#,
        )
        .unwrap();

        let config = Config::load_or_default(&path).unwrap();
        assert_eq!(config.dictionary.path, PathBuf::from("/srv/keywords.yaml"));
        assert_eq!(config.dictionary.ttl_secs, 60);
        assert_eq!(config.layer.snapshot_path, default_snapshot_path());

        let sets = config.field_sets();
        assert_eq!(sets.service_flags(), ["Transportation", "Meals"]);
        assert!(sets.is_identity("OBJECTID"));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "[layer\nsnapshot_path = 3").unwrap();
        assert!(matches!(Config::load_or_default(&path), Err(Error::Toml(_))));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(DEFAULT_CONFIG_FILE);
        let mut config = Config::default();
        config.schema.ttl_secs = 120;
        config.fields.custom = Some(vec!["Notes".to_string()]);
        config.save(&path).unwrap();

        let loaded = Config::load_or_default(&path).unwrap();
        assert_eq!(loaded.schema.ttl_secs, 120);
        assert_eq!(loaded.field_sets().custom_fields(), ["Notes"]);
        assert!(loaded.fields.system.is_none());
    }

    #[test]
    fn test_expand_tilde() {
        let plain = Path::new("/tmp/x.json");
        assert_eq!(expand_tilde(plain).unwrap(), plain);
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde(Path::new("~/x.json")).unwrap(), home.join("x.json"));
        }
    }
}
