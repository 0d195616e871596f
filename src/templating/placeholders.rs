//! Double-brace placeholder syntax: `{{NAME}}`, optionally `{{ NAME }}`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

pub const OPEN: &str = "{{";

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder regex is valid")
});

/// Distinct placeholder names referenced by `text`
pub fn names(text: &str) -> BTreeSet<String> {
    PLACEHOLDER
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Number of placeholder occurrences, repeats included
pub fn count(text: &str) -> usize {
    PLACEHOLDER.find_iter(text).count()
}

/// Any remaining opening delimiter counts, well-formed or not
pub fn unresolved_count(text: &str) -> usize {
    text.matches(OPEN).count()
}
