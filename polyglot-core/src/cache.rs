//! Process-lifetime cache of merged catalogs.
//!
//! Catalogs are keyed by `(domain, language)` and never rebuilt. Each key owns
//! a `OnceCell`, so concurrent misses for the same key run one load while the
//! others wait for its result.

use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::catalog::{Catalog, CatalogProvider};
use crate::error::Result;
use crate::locale::Locale;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub domain: String,
    pub language: String,
}

impl CacheKey {
    pub fn new(domain: &str, locale: &Locale) -> Self {
        Self {
            domain: domain.to_string(),
            language: locale.language().to_string(),
        }
    }
}

pub struct TranslationCache {
    provider: Arc<dyn CatalogProvider>,
    dirs: Vec<PathBuf>,
    entries: DashMap<CacheKey, Arc<OnceCell<Arc<Catalog>>>>,
}

impl TranslationCache {
    /// `dirs` are in precedence order: the first directory wins on collisions.
    pub fn new(provider: Arc<dyn CatalogProvider>, dirs: Vec<PathBuf>) -> Self {
        Self {
            provider,
            dirs,
            entries: DashMap::new(),
        }
    }

    /// Number of keys with a loaded catalog.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.value().initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, domain: &str, locale: &Locale) -> Option<Arc<Catalog>> {
        let key = CacheKey::new(domain, locale);
        let cell = self.entries.get(&key)?;
        cell.value().get().cloned()
    }

    pub async fn lookup(&self, domain: &str, locale: &Locale) -> Result<Arc<Catalog>> {
        let key = CacheKey::new(domain, locale);
        let cell = self.cell(&key);

        if let Some(catalog) = cell.get() {
            debug!("Catalog cache hit for {}/{}", key.domain, key.language);
            return Ok(Arc::clone(catalog));
        }

        let catalog = cell
            .get_or_try_init(|| async {
                let merged = self.load_merged(domain, locale).await?;
                info!(
                    "Loaded catalog {}/{} ({} entries from {} dirs)",
                    key.domain,
                    key.language,
                    merged.len(),
                    self.dirs.len()
                );
                Ok::<_, crate::Error>(Arc::new(merged))
            })
            .await?;
        Ok(Arc::clone(catalog))
    }

    fn cell(&self, key: &CacheKey) -> Arc<OnceCell<Arc<Catalog>>> {
        if let Some(cell) = self.entries.get(key) {
            return Arc::clone(cell.value());
        }
        Arc::clone(self.entries.entry(key.clone()).or_default().value())
    }

    /// Least preferred directory first, so entries of earlier directories
    /// overwrite those of later ones.
    async fn load_merged(&self, domain: &str, locale: &Locale) -> Result<Catalog> {
        let mut merged = Catalog::new(locale);
        for dir in self.dirs.iter().rev() {
            debug!("Loading {} catalog for {} from {}", domain, locale, dir.display());
            let catalog = self.provider.load(dir, locale, domain).await?;
            merged.merge(catalog);
        }
        Ok(merged)
    }
}
