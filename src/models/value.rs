use serde::Serialize;
use std::path::PathBuf;

use super::config::{FormatSpec, RequiredValueSpec};
use crate::source::SourceError;

/// A required value as read from the value source.
#[derive(Debug, Clone)]
pub struct RequiredValue {
    pub name: String,
    pub raw_value: Option<String>,
    pub format: Option<FormatSpec>,
    /// Set when the source holds a value that cannot be used
    pub source_error: Option<SourceError>,
}

impl RequiredValue {
    pub fn new(spec: &RequiredValueSpec, raw_value: Option<String>) -> Self {
        Self {
            name: spec.name.clone(),
            raw_value,
            format: spec.format.clone(),
            source_error: None,
        }
    }

    pub fn unusable(spec: &RequiredValueSpec, error: SourceError) -> Self {
        Self {
            source_error: Some(error),
            ..Self::new(spec, None)
        }
    }

    pub fn present(&self) -> bool {
        self.raw_value.is_some()
    }
}

/// Values that passed validation, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedValues {
    entries: Vec<(String, String)>,
}

impl ValidatedValues {
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The file produced by one generator run.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedArtifact {
    pub output_path: PathBuf,
    #[serde(skip)]
    pub content: String,
    pub byte_size: u64,
    pub fingerprint: String,
}
