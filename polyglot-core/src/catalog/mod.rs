//! Translation catalogs.
//!
//! A catalog maps message ids to translations. Context-qualified entries are
//! keyed as `context \u{4} msgid`, plural entries are keyed by the singular
//! msgid and hold one form per CLDR cardinal category.

mod provider;

pub use provider::{CatalogFile, CatalogProvider, TomlCatalogProvider};

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use intl_pluralrules::{PluralCategory, PluralRuleType, PluralRules};
use unic_langid::LanguageIdentifier;

use crate::locale::Locale;

const CONTEXT_SEPARATOR: char = '\u{4}';

/// CLDR cardinal plural category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralForm {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralForm {
    pub fn as_str(self) -> &'static str {
        match self {
            PluralForm::Zero => "zero",
            PluralForm::One => "one",
            PluralForm::Two => "two",
            PluralForm::Few => "few",
            PluralForm::Many => "many",
            PluralForm::Other => "other",
        }
    }
}

impl fmt::Display for PluralForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PluralForm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zero" => Ok(PluralForm::Zero),
            "one" => Ok(PluralForm::One),
            "two" => Ok(PluralForm::Two),
            "few" => Ok(PluralForm::Few),
            "many" => Ok(PluralForm::Many),
            "other" => Ok(PluralForm::Other),
            _ => Err(format!("unknown plural category: {s}")),
        }
    }
}

impl From<PluralCategory> for PluralForm {
    fn from(category: PluralCategory) -> Self {
        match category {
            PluralCategory::ZERO => PluralForm::Zero,
            PluralCategory::ONE => PluralForm::One,
            PluralCategory::TWO => PluralForm::Two,
            PluralCategory::FEW => PluralForm::Few,
            PluralCategory::MANY => PluralForm::Many,
            PluralCategory::OTHER => PluralForm::Other,
        }
    }
}

pub type PluralForms = HashMap<PluralForm, String>;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    locale: Option<Locale>,
    messages: HashMap<String, String>,
    plurals: HashMap<String, PluralForms>,
    rules: LazyRules,
}

/// Plural rules of the catalog locale, built on the first plural lookup.
///
/// A clone starts empty and builds its own rules.
#[derive(Default)]
struct LazyRules(OnceLock<Option<PluralRules>>);

impl Clone for LazyRules {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl fmt::Debug for LazyRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.0.get() {
            None => "pending",
            Some(None) => "none",
            Some(Some(_)) => "cldr",
        };
        f.write_str(state)
    }
}

fn context_key(context: &str, msgid: &str) -> String {
    format!("{context}{CONTEXT_SEPARATOR}{msgid}")
}

fn untranslated<'a>(singular: &'a str, plural: &'a str, n: u64) -> &'a str {
    if n == 1 { singular } else { plural }
}

impl Catalog {
    /// Empty catalog whose plural rules follow `locale`.
    pub fn new(locale: &Locale) -> Self {
        Self {
            locale: Some(locale.clone()),
            ..Self::default()
        }
    }

    /// Shared catalog without locale or entries. Every lookup falls through.
    pub fn null() -> Arc<Catalog> {
        static NULL: OnceLock<Arc<Catalog>> = OnceLock::new();
        Arc::clone(NULL.get_or_init(|| Arc::new(Catalog::default())))
    }

    pub fn locale(&self) -> Option<&Locale> {
        self.locale.as_ref()
    }

    pub fn len(&self) -> usize {
        self.messages.len() + self.plurals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn insert(&mut self, msgid: impl Into<String>, msgstr: impl Into<String>) {
        self.messages.insert(msgid.into(), msgstr.into());
    }

    pub fn insert_with_context(&mut self, context: &str, msgid: &str, msgstr: impl Into<String>) {
        self.messages.insert(context_key(context, msgid), msgstr.into());
    }

    pub fn insert_plural(&mut self, msgid: impl Into<String>, forms: PluralForms) {
        self.plurals.insert(msgid.into(), forms);
    }

    pub fn insert_plural_with_context(&mut self, context: &str, msgid: &str, forms: PluralForms) {
        self.plurals.insert(context_key(context, msgid), forms);
    }

    /// Merge `other` into `self`. Entries of `other` win on collision.
    pub fn merge(&mut self, other: Catalog) {
        if self.locale.is_none() && other.locale.is_some() {
            self.locale = other.locale;
            self.rules = LazyRules::default();
        }
        self.messages.extend(other.messages);
        self.plurals.extend(other.plurals);
    }

    /// Plural category of `n` under this catalog's locale.
    ///
    /// Falls back to `one`/`other` when no CLDR rules exist for the locale.
    pub fn plural_form(&self, n: u64) -> PluralForm {
        self.rules()
            .and_then(|rules| rules.select(n).ok())
            .map(PluralForm::from)
            .unwrap_or(if n == 1 { PluralForm::One } else { PluralForm::Other })
    }

    pub fn gettext<'a>(&'a self, message: &'a str) -> &'a str {
        self.lookup(message).unwrap_or(message)
    }

    pub fn ngettext<'a>(&'a self, singular: &'a str, plural: &'a str, n: u64) -> &'a str {
        self.lookup_plural(singular, n)
            .unwrap_or_else(|| untranslated(singular, plural, n))
    }

    pub fn pgettext<'a>(&'a self, context: &str, message: &'a str) -> &'a str {
        self.lookup(&context_key(context, message)).unwrap_or(message)
    }

    pub fn npgettext<'a>(
        &'a self,
        context: &str,
        singular: &'a str,
        plural: &'a str,
        n: u64,
    ) -> &'a str {
        self.lookup_plural(&context_key(context, singular), n)
            .unwrap_or_else(|| untranslated(singular, plural, n))
    }

    fn rules(&self) -> Option<&PluralRules> {
        self.rules
            .0
            .get_or_init(|| self.locale.as_ref().and_then(plural_rules))
            .as_ref()
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        self.messages
            .get(key)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    fn lookup_plural(&self, key: &str, n: u64) -> Option<&str> {
        let forms = self.plurals.get(key)?;
        let form = self.plural_form(n);
        forms
            .get(&form)
            .or_else(|| forms.get(&PluralForm::Other))
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

fn plural_rules(locale: &Locale) -> Option<PluralRules> {
    PluralRules::create(locale.langid().clone(), PluralRuleType::CARDINAL)
        .ok()
        .or_else(|| {
            let bare = locale.language().parse::<LanguageIdentifier>().ok()?;
            PluralRules::create(bare, PluralRuleType::CARDINAL).ok()
        })
}
