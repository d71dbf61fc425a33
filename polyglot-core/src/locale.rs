use std::fmt;
use std::str::FromStr;

use unic_langid::LanguageIdentifier;

use crate::error::{Error, Result};

/// A resolved locale such as `fr-CH`.
///
/// Displays in the POSIX form used by gettext directories (`fr_CH`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    id: LanguageIdentifier,
}

impl Locale {
    /// Parse a language tag. Case is canonicalized, so `EN-us` becomes `en-US`.
    ///
    /// Subtags may be delimited by `-` or by `_`, so the POSIX spelling of a
    /// gettext directory (`en_US`) parses to the same locale as `en-US`.
    pub fn parse(tag: &str) -> Result<Self> {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return Err(Error::locale_parse(tag, "empty tag"));
        }
        if trimmed == "*" {
            return Err(Error::locale_parse(tag, "wildcard is not a locale"));
        }

        let id = trimmed
            .parse::<LanguageIdentifier>()
            .map_err(|e| Error::locale_parse(tag, e))?;
        if id.language.is_empty() {
            return Err(Error::locale_parse(tag, "missing language subtag"));
        }
        Ok(Self { id })
    }

    /// Primary language subtag, e.g. `fr`.
    pub fn language(&self) -> &str {
        self.id.language.as_str()
    }

    pub fn script(&self) -> Option<&str> {
        self.id.script.as_ref().map(|s| s.as_str())
    }

    pub fn region(&self) -> Option<&str> {
        self.id.region.as_ref().map(|r| r.as_str())
    }

    /// Canonical BCP-47 form, e.g. `fr-CH`.
    pub fn tag(&self) -> String {
        self.id.to_string()
    }

    /// POSIX form without variants, e.g. `fr_CH` or `zh_Hant_TW`.
    pub fn posix(&self) -> String {
        let mut out = self.language().to_string();
        for part in [self.script(), self.region()].into_iter().flatten() {
            out.push('_');
            out.push_str(part);
        }
        out
    }

    pub fn langid(&self) -> &LanguageIdentifier {
        &self.id
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.posix())
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
