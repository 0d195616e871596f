//! Aggregated verdict for one pipeline run.

mod defect;
mod render;

pub use defect::{Defect, DefectKind};
pub use render::{OutputFormat, render_json, render_text};

use serde::Serialize;
use std::path::PathBuf;

use crate::models::{EntryKind, GeneratedArtifact};

/// Size and fingerprint of an entry that was found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryObservation {
    pub path: PathBuf,
    pub kind: EntryKind,
    pub byte_size: u64,
    /// Files only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    /// Directories only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_count: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VerificationReport {
    pub defects: Vec<Defect>,
    pub entries: Vec<EntryObservation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<GeneratedArtifact>,
    /// Set when an unrecoverable I/O failure stopped the run early
    pub aborted: bool,
}

impl VerificationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, defect: Defect) {
        self.defects.push(defect);
    }

    /// Append defects in discovery order. Duplicates are kept.
    pub fn extend(&mut self, defects: impl IntoIterator<Item = Defect>) {
        self.defects.extend(defects);
    }

    pub fn fatal(&self) -> impl Iterator<Item = &Defect> {
        self.defects.iter().filter(|d| d.is_fatal())
    }

    pub fn advisory(&self) -> impl Iterator<Item = &Defect> {
        self.defects.iter().filter(|d| !d.is_fatal())
    }

    pub fn fatal_count(&self) -> usize {
        self.fatal().count()
    }

    /// A run passes when it produced no fatal defect, however many advisories
    pub fn passed(&self) -> bool {
        self.fatal_count() == 0
    }

    pub fn exit_code(&self) -> u8 {
        if self.passed() { 0 } else { 1 }
    }

    pub fn count_of(&self, kind: DefectKind) -> usize {
        self.defects.iter().filter(|d| d.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    #[test]
    fn test_empty_report_passes() {
        let report = VerificationReport::new();
        assert!(report.passed());
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_advisory_defects_do_not_fail() {
        let mut report = VerificationReport::new();
        report.push(Defect::format("APP_ID", Severity::Advisory, "bad prefix"));
        report.push(Defect::new(
            DefectKind::MissingEntry,
            Severity::Advisory,
            "css",
            "directory not found",
        ));
        assert!(report.passed());
        assert_eq!(report.advisory().count(), 2);
    }

    #[test]
    fn test_single_fatal_defect_fails() {
        let mut report = VerificationReport::new();
        report.push(Defect::format("APP_ID", Severity::Advisory, "bad prefix"));
        report.push(Defect::missing_value("API_KEY"));
        assert!(!report.passed());
        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.count_of(DefectKind::MissingValue), 1);
    }

    #[test]
    fn test_duplicates_are_kept_in_order() {
        let mut report = VerificationReport::new();
        let defect = Defect::missing_value("API_KEY");
        report.extend([defect.clone(), defect.clone()]);
        assert_eq!(report.defects, vec![defect.clone(), defect]);
    }

    #[test]
    fn test_format_defect_kind_follows_severity() {
        assert_eq!(
            Defect::format("X", Severity::Fatal, "m").kind,
            DefectKind::FormatError
        );
        assert_eq!(
            Defect::format("X", Severity::Advisory, "m").kind,
            DefectKind::FormatWarning
        );
    }
}
