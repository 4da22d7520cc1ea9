use super::DictionaryRow;
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Where dictionary rows come from
pub trait DictionarySource: Send + Sync {
    fn load_rows(&self) -> Result<Vec<DictionaryRow>>;

    /// Human-readable source name
    fn name(&self) -> &str;
}

/// Fixed rows, mostly useful for tests and embedding
impl DictionarySource for Vec<DictionaryRow> {
    fn load_rows(&self) -> Result<Vec<DictionaryRow>> {
        Ok(self.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Rows read from a JSON or YAML table file
pub struct FileDictionarySource {
    path: PathBuf,
    name: String,
}

impl FileDictionarySource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DictionarySource for FileDictionarySource {
    fn load_rows(&self) -> Result<Vec<DictionaryRow>> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            Error::Collaborator(format!(
                "Cannot read dictionary '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        match self.path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
            other => Err(Error::Config(format!(
                "Unsupported dictionary format '{}' for {}",
                other.unwrap_or(""),
                self.path.display()
            ))),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
