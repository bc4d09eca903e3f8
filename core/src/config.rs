use crate::extensions::{SupportedExtensions, DEFAULT_EXTENSIONS};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Allow-listed extensions, lowercase and without dots
    pub extensions: Vec<String>,
    pub host: String,
    pub port: u16,
    /// Directory the HTTP service confines requested paths to
    pub root: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            root: None,
        }
    }
}

impl AppConfig {
    pub fn supported_extensions(&self) -> SupportedExtensions {
        SupportedExtensions::new(&self.extensions)
    }
}

/// Default config file location, e.g. ~/.config/filehash/config.toml
pub fn default_config_path() -> PathBuf {
    let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config_dir.join("filehash").join("config.toml")
}

/// Load from the default file (if present) and FILEHASH_* environment variables
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(None)
}

/// Load from `file` instead of the default location.
///
/// An explicitly named file must exist; the default one is optional.
pub fn load_config_from(file: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let source = match file {
        Some(path) => File::from(path).required(true),
        None => File::from(default_config_path()).required(false),
    };

    Config::builder()
        .add_source(source)
        .add_source(
            Environment::with_prefix("FILEHASH")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("extensions"),
        ) // e.g. FILEHASH_EXTENSIONS=pdf,docx
        .build()?
        .try_deserialize::<AppConfig>()?
        .validate()
}

impl AppConfig {
    /// An empty root would confine nothing
    fn validate(self) -> Result<Self, ConfigError> {
        if self.root.as_deref().is_some_and(|root| root.as_os_str().is_empty()) {
            return Err(ConfigError::Message("root must not be empty".to_string()));
        }
        Ok(self)
    }
}
