//! Template error types with miette integration

use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
#[error("Template error in {path}: {reason}")]
pub struct TemplateError {
    #[source_code]
    src: NamedSource<String>,

    #[label("{}", self.reason)]
    span: Option<SourceSpan>,

    path: String,

    reason: String,

    #[help]
    help: Option<String>,

    #[source]
    source: Option<minijinja::Error>,
}

impl TemplateError {
    pub fn from_minijinja_error(error: minijinja::Error, source: String, source_path: &Path) -> Self {
        let (span, reason, help) = Self::extract_error_info(&error, &source);
        let path = source_path.display().to_string();

        Self {
            src: NamedSource::new(path.clone(), source),
            span,
            path,
            reason,
            help,
            source: Some(error),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    fn extract_error_info(
        error: &minijinja::Error,
        source: &str,
    ) -> (Option<SourceSpan>, String, Option<String>) {
        let span = match (error.range(), error.line()) {
            (Some(range), _) => Some(SourceSpan::from(range)),
            // MiniJinja uses 1-based line numbers
            (None, Some(line)) => Some(SourceSpan::from(Self::line_to_offset(
                source,
                line.saturating_sub(1),
            ))),
            (None, None) => None,
        };

        let detail = error.detail().unwrap_or("unknown");
        let reason = match error.kind() {
            minijinja::ErrorKind::UndefinedError => {
                format!("undefined placeholder: {}", error.detail().unwrap_or("(unnamed)"))
            }
            minijinja::ErrorKind::SyntaxError => format!("syntax error: {detail}"),
            minijinja::ErrorKind::UnknownFilter => format!("unknown filter: {detail}"),
            minijinja::ErrorKind::UnknownFunction => format!("unknown function: {detail}"),
            minijinja::ErrorKind::InvalidOperation => format!("invalid operation: {detail}"),
            _ => error.to_string(),
        };

        let help = match error.kind() {
            minijinja::ErrorKind::UndefinedError => Some(
                "Every {{NAME}} placeholder must be declared under required_values and set in the environment"
                    .to_string(),
            ),
            minijinja::ErrorKind::SyntaxError => Some(
                "Placeholders are plain {{NAME}} tokens; other template syntax is not supported"
                    .to_string(),
            ),
            _ => None,
        };

        (span, reason, help)
    }

    /// Calculate byte offset from line number
    fn line_to_offset(source: &str, target_line: usize) -> usize {
        let mut current_line = 0;

        for (idx, ch) in source.char_indices() {
            if current_line == target_line {
                return idx;
            }

            if ch == '\n' {
                current_line += 1;
            }
        }

        source.len()
    }
}
