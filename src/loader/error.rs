use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    #[diagnostic(help("Run `deploycfg init` to write the default configuration"))]
    NotFound(PathBuf),

    #[error("Failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {message}")]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("Required value '{0}' is declared more than once")]
    DuplicateValue(String),

    #[error("Path '{}' must be relative to the deployment root and stay inside it", .0.display())]
    PathEscapesRoot(PathBuf),

    #[error("Directory entry '{}' declares content checks", .0.display())]
    #[diagnostic(help("Content checks only run against files; move them to a file entry"))]
    ChecksOnDirectory(PathBuf),

    #[error("Template and output both point at '{}'", .0.display())]
    OutputOverwritesTemplate(PathBuf),
}
