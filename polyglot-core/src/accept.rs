//! `Accept-Language` parsing.
//!
//! Entries are ranked by quality, highest first. Entries with equal quality
//! keep the order they had in the header.

use regex::Regex;
use std::sync::OnceLock;

/// One language range from an `Accept-Language` header.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguagePreference {
    pub tag: String,
    pub quality: f32,
}

impl LanguagePreference {
    /// `q=0` means "not acceptable" in RFC 7231. Such entries are still
    /// returned by [`parse_accept_language`], ranked last.
    pub fn is_acceptable(&self) -> bool {
        self.quality > 0.0
    }
}

fn accept_regex() -> &'static Regex {
    static ACCEPT_REGEX: OnceLock<Regex> = OnceLock::new();
    ACCEPT_REGEX.get_or_init(|| {
        Regex::new(concat!(
            // language range with non-q parameters
            r"([^\s;,]+",
            r"(?:[\x20\t]*;[\x20\t]*(?:[^\s;,q][^\s;,]*|q[^\s;,=][^\s;,]*))*)",
            // optional quality, anything after it up to the next comma is ignored
            r"(?:[\x20\t]*;[\x20\t]*q=([^\s;,]*)[^,]*)?",
        ))
        .expect("Invalid regex pattern")
    })
}

/// Parse an `Accept-Language` header into ranked preferences.
///
/// The wildcard `*` is dropped. An entry whose `q` is not a finite number is
/// dropped; numeric values are clamped into `[0, 1]`.
///
/// The `q` parameter name is matched case-sensitively: `en;Q=0.1` is `en` with
/// an unknown parameter, ranked at quality 1. An entry without a language
/// range, such as a bare `;q=0.5`, yields the tag `q=0.5`, which later fails
/// to parse as a locale.
pub fn parse_accept_language(header: &str) -> Vec<LanguagePreference> {
    let mut prefs: Vec<LanguagePreference> = accept_regex()
        .captures_iter(header)
        .filter_map(|caps| {
            let range = caps.get(1)?.as_str();
            let tag = range.split(';').next().unwrap_or(range).trim();
            if tag.is_empty() || tag == "*" {
                return None;
            }

            let quality = match caps.get(2) {
                None => 1.0,
                Some(q) => q
                    .as_str()
                    .parse::<f32>()
                    .ok()
                    .filter(|q| q.is_finite())?
                    .clamp(0.0, 1.0),
            };

            Some(LanguagePreference {
                tag: tag.to_string(),
                quality,
            })
        })
        .collect();

    // stable: equal qualities keep header order
    prefs.sort_by(|a, b| b.quality.total_cmp(&a.quality));
    prefs
}

/// Tag of the highest ranked preference, if any.
pub fn preferred_language(header: &str) -> Option<String> {
    parse_accept_language(header)
        .into_iter()
        .next()
        .map(|pref| pref.tag)
}
