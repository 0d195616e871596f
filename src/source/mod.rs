//! Environment value source: where required values come from.
//!
//! The validator and generator never touch `std::env` directly; they receive
//! whatever a [`ValueSource`] hands back, so tests inject a [`MapSource`].

mod mask;

pub use mask::mask;

use std::collections::BTreeMap;
use std::env;
use std::ffi::OsString;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{RequiredValue, RequiredValueSpec};

/// A value that is set but cannot be used as text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("value is not valid UTF-8")]
    NotUnicode,
}

pub trait ValueSource {
    /// Look up one named value. Absence is `Ok(None)`, never an error.
    fn get(&self, name: &str) -> Result<Option<String>, SourceError>;
}

/// Reads from the process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl ValueSource for ProcessEnv {
    fn get(&self, name: &str) -> Result<Option<String>, SourceError> {
        os_value(env::var_os(name))
    }
}

fn os_value(value: Option<OsString>) -> Result<Option<String>, SourceError> {
    value
        .map(|value| value.into_string().map_err(|_| SourceError::NotUnicode))
        .transpose()
}

/// Fixed set of values, used for `--var` overrides and tests.
#[derive(Debug, Default, Clone)]
pub struct MapSource {
    values: BTreeMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapSource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut source = MapSource::new();
        for (name, value) in iter {
            source.insert(name, value);
        }
        source
    }
}

impl ValueSource for MapSource {
    fn get(&self, name: &str) -> Result<Option<String>, SourceError> {
        Ok(self.values.get(name).cloned())
    }
}

/// Overrides win over the base source
pub struct LayeredSource<B> {
    overrides: MapSource,
    base: B,
}

impl<B: ValueSource> LayeredSource<B> {
    pub fn new(overrides: MapSource, base: B) -> Self {
        Self { overrides, base }
    }
}

impl<B: ValueSource> ValueSource for LayeredSource<B> {
    fn get(&self, name: &str) -> Result<Option<String>, SourceError> {
        match self.overrides.get(name)? {
            Some(value) => Ok(Some(value)),
            None => self.base.get(name),
        }
    }
}

/// Read every required value, in declaration order.
///
/// Empty and whitespace-only values count as absent: CI engines expand an
/// unset secret to the empty string.
pub fn read_values(source: &dyn ValueSource, specs: &[RequiredValueSpec]) -> Vec<RequiredValue> {
    specs
        .iter()
        .map(|spec| match source.get(&spec.name) {
            Ok(raw) => {
                let raw = raw.filter(|value| !value.trim().is_empty());
                match &raw {
                    Some(value) => debug!("{} = {}", spec.name, mask(value)),
                    None => debug!("{} is not set", spec.name),
                }
                RequiredValue::new(spec, raw)
            }
            Err(error) => {
                warn!("{} is set but unusable: {error}", spec.name);
                RequiredValue::unusable(spec, error)
            }
        })
        .collect()
}
