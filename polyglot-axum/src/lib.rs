pub mod babel;
pub mod context;
pub mod err;
pub mod global;
pub mod middleware;
pub mod selector;
pub mod server;

pub use babel::{Babel, BabelBuilder, Translator};
pub use context::{current_locale, sync_with_locale, with_locale};
pub use err::Error;
pub use middleware::handle_babel;
pub use selector::{
    AcceptLanguage, Chain, Cookie, FnSelector, LocaleSelector, PathPrefix, select_locale_by_request,
    selector_fn,
};
pub use server::WebServer;

pub use polyglot_core::{BabelConfig, Catalog, CatalogProvider, Locale, PluralForm, TomlCatalogProvider};
