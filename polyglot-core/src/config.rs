use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::yaml;

const DEFAULT_LOCALE: &str = "en";
const DEFAULT_DOMAIN: &str = "messages";
const DEFAULT_LOCALES_DIR: &str = "locales";

/// Translation settings shared by every request.
///
/// `locales_dirs` are in precedence order: when two directories translate the
/// same message, the one listed first wins.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BabelConfig {
    pub default_locale: String,
    pub domain: String,
    pub locales_dirs: Vec<PathBuf>,
}

impl Default for BabelConfig {
    fn default() -> Self {
        Self {
            default_locale: DEFAULT_LOCALE.to_string(),
            domain: DEFAULT_DOMAIN.to_string(),
            locales_dirs: vec![PathBuf::from(DEFAULT_LOCALES_DIR)],
        }
    }
}

impl BabelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = locale.into();
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn locales_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.locales_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(yaml::load_from_file(path)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(yaml::load_from_str(content)?)
    }
}
