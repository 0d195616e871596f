use regex::Regex;

use crate::models::ContentCheck;
use crate::report::{Defect, DefectKind};
use crate::templating::placeholders;

/// Matches any required value name standing alone as a word.
pub struct RawNameMatcher(Option<Regex>);

impl RawNameMatcher {
    pub fn new(names: &[&str]) -> Self {
        if names.is_empty() {
            return Self(None);
        }
        let alternation = names
            .iter()
            .map(|name| regex::escape(name))
            .collect::<Vec<_>>()
            .join("|");
        Self(Regex::new(&format!(r"\b(?:{alternation})\b")).ok())
    }

    /// Distinct names found in `text`, in order of first appearance
    pub fn find(&self, text: &str) -> Vec<String> {
        let Some(regex) = &self.0 else {
            return Vec::new();
        };
        let mut found: Vec<String> = Vec::new();
        for m in regex.find_iter(text) {
            if !found.iter().any(|name| name == m.as_str()) {
                found.push(m.as_str().to_string());
            }
        }
        found
    }
}

/// Run one check against file content. Returns the defect when it fails.
pub fn run_check(
    check: &ContentCheck,
    source: &str,
    text: &str,
    raw_names: &RawNameMatcher,
) -> Option<Defect> {
    let failure = match check {
        ContentCheck::NoUnresolvedPlaceholders { .. } => {
            let remaining = placeholders::unresolved_count(text);
            (remaining > 0).then(|| {
                format!(
                    "{remaining} unresolved placeholder marker(s) '{}' remain",
                    placeholders::OPEN
                )
            })
        }
        ContentCheck::NoRawVariableNames { .. } => {
            let found = raw_names.find(text);
            (!found.is_empty()).then(|| {
                format!(
                    "raw variable name(s) used as literal text: {}",
                    found.join(", ")
                )
            })
        }
        ContentCheck::Contains { marker, .. } => {
            (!text.contains(marker.as_str())).then(|| format!("missing declaration marker '{marker}'"))
        }
        ContentCheck::MinPlaceholders { threshold, .. } => {
            let found = placeholders::count(text);
            (found < *threshold).then(|| {
                format!("found {found} placeholder(s), expected at least {threshold}")
            })
        }
        ContentCheck::Marker { name, pattern, .. } => (!pattern.is_match(text))
            .then(|| format!("missing {name} (/{}/)", pattern.as_str())),
    }?;

    let kind = match check {
        ContentCheck::Marker { .. } => DefectKind::ManifestMarkerMissing,
        _ => DefectKind::ContentCheckFailure,
    };
    Some(Defect::new(kind, check.severity(), source, failure))
}
