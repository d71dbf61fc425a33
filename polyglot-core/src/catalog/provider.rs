use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{Catalog, PluralForms};
use crate::error::{Error, Result};
use crate::locale::Locale;

/// Source of catalogs for one (directory, locale, domain).
///
/// A directory without a catalog for the locale is not an error, providers
/// return an empty catalog instead.
#[async_trait]
pub trait CatalogProvider: Send + Sync + 'static {
    async fn load(&self, dir: &Path, locale: &Locale, domain: &str) -> Result<Catalog>;
}

/// On-disk shape of a TOML catalog.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CatalogFile {
    pub messages: HashMap<String, String>,
    pub plurals: HashMap<String, HashMap<String, String>>,
    pub contexts: HashMap<String, HashMap<String, String>>,
    pub context_plurals: HashMap<String, HashMap<String, HashMap<String, String>>>,
}

impl CatalogFile {
    pub fn into_catalog(self, locale: &Locale) -> Catalog {
        let mut catalog = Catalog::new(locale);
        for (msgid, msgstr) in self.messages {
            catalog.insert(msgid, msgstr);
        }
        for (msgid, forms) in self.plurals {
            catalog.insert_plural(msgid, plural_forms(forms));
        }
        for (context, entries) in self.contexts {
            for (msgid, msgstr) in entries {
                catalog.insert_with_context(&context, &msgid, msgstr);
            }
        }
        for (context, entries) in self.context_plurals {
            for (msgid, forms) in entries {
                catalog.insert_plural_with_context(&context, &msgid, plural_forms(forms));
            }
        }
        catalog
    }
}

fn plural_forms(raw: HashMap<String, String>) -> PluralForms {
    raw.into_iter()
        .filter_map(|(category, msgstr)| match category.parse() {
            Ok(form) => Some((form, msgstr)),
            Err(e) => {
                warn!("Skipping plural form: {}", e);
                None
            }
        })
        .collect()
}

/// Reads `<dir>/<locale>/LC_MESSAGES/<domain>.toml`.
///
/// Locale directories are tried from most to least specific (`fr_CH`,
/// `fr-CH`, `fr`) and the first existing file is used.
#[derive(Debug, Default, Clone, Copy)]
pub struct TomlCatalogProvider;

impl TomlCatalogProvider {
    pub fn candidates(dir: &Path, locale: &Locale, domain: &str) -> Vec<PathBuf> {
        let mut names = vec![locale.posix()];
        if let Some(region) = locale.region() {
            names.push(format!("{}_{}", locale.language(), region));
            names.push(format!("{}-{}", locale.language(), region));
        }
        names.push(locale.language().to_string());
        names.dedup();

        let file = format!("{domain}.toml");
        names
            .into_iter()
            .map(|name| dir.join(name).join("LC_MESSAGES").join(&file))
            .collect()
    }
}

#[async_trait]
impl CatalogProvider for TomlCatalogProvider {
    async fn load(&self, dir: &Path, locale: &Locale, domain: &str) -> Result<Catalog> {
        for path in Self::candidates(dir, locale, domain) {
            let content = match tokio::fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(Error::catalog_load(path, e)),
            };

            let file: CatalogFile =
                toml::from_str(&content).map_err(|e| Error::catalog_load(&path, e))?;
            debug!("Read catalog {}", path.display());
            return Ok(file.into_catalog(locale));
        }

        debug!(
            "No {} catalog for {} in {}",
            domain,
            locale,
            dir.display()
        );
        Ok(Catalog::new(locale))
    }
}
