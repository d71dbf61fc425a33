pub mod accept;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod format;
pub mod locale;
pub mod yaml;

pub use accept::{LanguagePreference, parse_accept_language, preferred_language};
pub use cache::{CacheKey, TranslationCache};
pub use catalog::{Catalog, CatalogProvider, PluralForm, PluralForms, TomlCatalogProvider};
pub use config::BabelConfig;
pub use error::{Error, Result};
pub use format::substitute;
pub use locale::Locale;

pub use async_trait::async_trait;
