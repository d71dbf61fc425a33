use regex::{Captures, Regex};
use std::sync::OnceLock;
use tracing::debug;

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER_REGEX.get_or_init(|| {
        Regex::new(r"%(?:%|\(([^)]*)\)[-#0 +]*[0-9]*(?:\.[0-9]+)?[sdiufFeEgGxXr])")
            .expect("Invalid regex pattern")
    })
}

/// Replace `%(name)s` style placeholders with values from `args`.
///
/// The argument is always inserted as the raw string. Conversion type,
/// flags, width and precision are matched but ignored, so `%(ratio).2f` with
/// `ratio = "0.5"` renders `0.5`, not `0.50`. `%%` becomes `%`. Placeholders
/// without a matching argument stay untouched.
pub fn substitute(template: &str, args: &[(&str, &str)]) -> String {
    if !template.contains('%') {
        return template.to_string();
    }

    placeholder_regex()
        .replace_all(template, |caps: &Captures| {
            let Some(name) = caps.get(1) else {
                return "%".to_string();
            };
            match args.iter().find(|(k, _)| *k == name.as_str()) {
                Some((_, v)) => v.to_string(),
                None => {
                    debug!("No value for placeholder `{}`", name.as_str());
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}
