pub mod engine;
pub mod error;
pub mod placeholders;

pub use engine::TemplateEngine;
pub use error::TemplateError;

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::models::ValidatedValues;

/// A template file and the placeholder names it references.
#[derive(Debug, Clone)]
pub struct Template {
    pub source_path: PathBuf,
    pub text: String,
    pub placeholder_names: BTreeSet<String>,
}

impl Template {
    pub fn load(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::from_text(path.to_path_buf(), text))
    }

    pub fn from_text(source_path: PathBuf, text: impl Into<String>) -> Self {
        let text = text.into();
        let placeholder_names = placeholders::names(&text);
        Self {
            source_path,
            text,
            placeholder_names,
        }
    }

    /// Placeholder names with no validated value
    pub fn unresolved(&self, values: &ValidatedValues) -> Vec<String> {
        self.placeholder_names
            .iter()
            .filter(|name| !values.contains(name))
            .cloned()
            .collect()
    }
}
