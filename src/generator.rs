//! Artifact generation: render the template and write it atomically.

use miette::Diagnostic;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{GeneratedArtifact, ValidatedValues};
use crate::templating::{Template, TemplateEngine, TemplateError, placeholders};
use crate::validation::Validation;
use crate::verify::fingerprint;

#[derive(Error, Debug, Diagnostic)]
pub enum GenerationError {
    #[error("Refusing to generate: {} fatal validation defect(s)", .0)]
    #[diagnostic(help("Fix the reported values; the previous artifact was left untouched"))]
    ValidationFailed(usize),

    #[error("Template placeholders have no validated value: {}", .0.join(", "))]
    UnresolvedPlaceholders(Vec<String>),

    #[error("Cannot read template {}", .path.display())]
    TemplateUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Template(#[from] TemplateError),

    #[error("Rendered output still contains {0} unresolved placeholder(s)")]
    IncompleteRender(usize),

    #[error("Cannot write {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl GenerationError {
    /// I/O failures on the output path end the run; everything else is a
    /// refusal that leaves the filesystem untouched.
    pub fn is_write_failure(&self) -> bool {
        matches!(self, GenerationError::WriteFailure { .. })
    }
}

#[derive(Default)]
pub struct Generator {
    engine: TemplateEngine,
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `template` with the validated values. Pure: touches no files.
    pub fn render(
        &self,
        template: &Template,
        validation: &Validation,
    ) -> Result<String, GenerationError> {
        let fatal = validation.fatal().count();
        if fatal > 0 {
            return Err(GenerationError::ValidationFailed(fatal));
        }

        let unresolved = template.unresolved(&validation.values);
        if !unresolved.is_empty() {
            return Err(GenerationError::UnresolvedPlaceholders(unresolved));
        }

        let rendered = self.engine.render(template, &validation.values)?;

        let leftover = placeholders::unresolved_count(&rendered);
        if leftover > 0 {
            return Err(GenerationError::IncompleteRender(leftover));
        }
        Ok(rendered)
    }

    /// Load the template, render it and atomically replace `output`.
    pub fn generate(
        &self,
        template_path: &Path,
        validation: &Validation,
        output: &Path,
    ) -> Result<GeneratedArtifact, GenerationError> {
        // Refuse before reading anything so a failed validation never depends
        // on the template being present
        let fatal = validation.fatal().count();
        if fatal > 0 {
            return Err(GenerationError::ValidationFailed(fatal));
        }

        let template =
            Template::load(template_path).map_err(|source| GenerationError::TemplateUnreadable {
                path: template_path.to_path_buf(),
                source,
            })?;
        debug!(
            "Loaded template {} with {} placeholder(s)",
            template_path.display(),
            template.placeholder_names.len()
        );

        let content = self.render(&template, validation)?;
        write_atomic(output, &content).map_err(|source| GenerationError::WriteFailure {
            path: output.to_path_buf(),
            source,
        })?;

        let artifact = GeneratedArtifact {
            output_path: output.to_path_buf(),
            byte_size: content.len() as u64,
            fingerprint: fingerprint(content.as_bytes()),
            content,
        };
        info!(
            "Wrote {} ({} bytes, fingerprint {})",
            output.display(),
            artifact.byte_size,
            artifact.fingerprint
        );
        Ok(artifact)
    }
}

/// Write `content` to a temp file beside `path`, then rename it into place.
///
/// The parent directory must already exist. Readers see either the old file
/// or the complete new one. The replacement keeps the permissions of the file
/// it replaces; a new file is world-readable.
pub fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(content.as_bytes())?;
    if let Some(permissions) = published_permissions(path)? {
        tmp.as_file().set_permissions(permissions)?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Temp files are created owner-only; the published file must not be.
fn published_permissions(path: &Path) -> io::Result<Option<fs::Permissions>> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(Some(metadata.permissions())),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(default_permissions()),
        Err(error) => Err(error),
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}
