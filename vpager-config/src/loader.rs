//! Option loading from JSON and TOML sources.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::models::{ConfigWarning, PagerOptions, PagerSettings};

/// Result of a successful load: the normalized settings plus anything that
/// was skipped along the way.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub settings: PagerSettings,
    pub warnings: Vec<ConfigWarning>,
}

impl ConfigLoad {
    fn from_options(options: PagerOptions, base: PagerSettings) -> Self {
        let (settings, warnings) = options.apply_to(base);
        Self { settings, warnings }
    }
}

/// Loads [`PagerOptions`] and normalizes them on top of a base.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    base: PagerSettings,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `base` instead of the defaults for anything the source leaves
    /// unset or gets wrong.
    pub fn with_base(base: PagerSettings) -> Self {
        Self { base }
    }

    pub fn from_value(
        &self,
        value: serde_json::Value,
    ) -> Result<ConfigLoad, ConfigError> {
        let options: PagerOptions = serde_json::from_value(value)?;
        Ok(ConfigLoad::from_options(options, self.base))
    }

    pub fn from_json_str(&self, raw: &str) -> Result<ConfigLoad, ConfigError> {
        let options: PagerOptions = serde_json::from_str(raw)?;
        Ok(ConfigLoad::from_options(options, self.base))
    }

    pub fn from_toml_str(&self, raw: &str) -> Result<ConfigLoad, ConfigError> {
        let options: PagerOptions = toml::from_str(raw)?;
        Ok(ConfigLoad::from_options(options, self.base))
    }

    /// Load from a `.json` or `.toml` file, chosen by extension.
    pub fn load_path(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<ConfigLoad, ConfigError> {
        let path = path.as_ref();
        let raw =
            std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        log::debug!("Loading pager options from {}", path.display());
        match ext.as_deref() {
            Some("json") => self.from_json_str(&raw),
            Some("toml") => self.from_toml_str(&raw),
            _ => Err(ConfigError::UnsupportedFormat(PathBuf::from(path))),
        }
    }
}
