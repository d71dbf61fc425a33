use std::path::PathBuf;
use thiserror::Error;

use crate::yaml::YamlLoaderError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed error returned by catalog providers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
    /// The process-wide translation API was used before `install`.
    #[error("translations are not initialized, install a Babel instance first")]
    NotInitialized,
    #[error("translations are already initialized")]
    AlreadyInitialized,
    #[error("invalid locale `{tag}`: {reason}")]
    LocaleParse { tag: String, reason: String },
    #[error("failed to load catalog {}: {source}", path.display())]
    CatalogLoad {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
    #[error("config error: {0}")]
    Config(#[from] YamlLoaderError),
}

impl Error {
    pub fn locale_parse(tag: impl Into<String>, reason: impl ToString) -> Self {
        Error::LocaleParse {
            tag: tag.into(),
            reason: reason.to_string(),
        }
    }

    pub fn catalog_load(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        Error::CatalogLoad {
            path: path.into(),
            source: source.into(),
        }
    }
}
