use serde::Serialize;
use std::fmt;

use crate::models::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DefectKind {
    MissingValue,
    FormatWarning,
    FormatError,
    GenerationAborted,
    WriteFailure,
    MissingEntry,
    ContentCheckFailure,
    ManifestMarkerMissing,
}

impl fmt::Display for DefectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DefectKind::MissingValue => "MissingValue",
            DefectKind::FormatWarning => "FormatWarning",
            DefectKind::FormatError => "FormatError",
            DefectKind::GenerationAborted => "GenerationAborted",
            DefectKind::WriteFailure => "WriteFailure",
            DefectKind::MissingEntry => "MissingEntry",
            DefectKind::ContentCheckFailure => "ContentCheckFailure",
            DefectKind::ManifestMarkerMissing => "ManifestMarkerMissing",
        };
        f.write_str(name)
    }
}

/// One problem found during a run. Defects are collected, never thrown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Defect {
    pub kind: DefectKind,
    pub severity: Severity,
    /// Value name or entry path the defect belongs to
    pub source: String,
    pub message: String,
}

impl Defect {
    pub fn new(
        kind: DefectKind,
        severity: Severity,
        source: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            source: source.into(),
            message: message.into(),
        }
    }

    pub fn missing_value(name: &str) -> Self {
        Self::new(
            DefectKind::MissingValue,
            Severity::Fatal,
            name,
            "required value is not set",
        )
    }

    /// Format problems split by severity into warnings and errors
    pub fn format(name: &str, severity: Severity, message: impl Into<String>) -> Self {
        let kind = if severity.is_fatal() {
            DefectKind::FormatError
        } else {
            DefectKind::FormatWarning
        };
        Self::new(kind, severity, name, message)
    }

    pub fn is_fatal(&self) -> bool {
        self.severity.is_fatal()
    }
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.source, self.message)
    }
}
