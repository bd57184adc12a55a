use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::RuntimeResult;
use crate::source::DirectorySource;

/// Settings for a [`BundleStore`](crate::BundleStore), usually read from an
/// `ftl-i18n.toml` file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub use_isolating: bool,
    pub default_namespace: String,
    pub resource_root: Option<PathBuf>,
    pub preload: Vec<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            use_isolating: false,
            default_namespace: "translation".to_string(),
            resource_root: None,
            preload: Vec::new(),
        }
    }
}

impl StoreConfig {
    pub fn directory_source(&self) -> Option<DirectorySource> {
        self.resource_root
            .as_ref()
            .map(|root| DirectorySource::new(root.clone()))
    }
}

pub fn load_config(path: &Path) -> RuntimeResult<StoreConfig> {
    let contents = fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}

/// Like [`load_config`], but a missing file yields the defaults.
pub fn load_config_or_default(path: &Path) -> RuntimeResult<StoreConfig> {
    if !path.exists() {
        return Ok(StoreConfig::default());
    }
    load_config(path)
}
