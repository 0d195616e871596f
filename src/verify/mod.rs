//! Deployment tree verification.
//!
//! Walks the declared entries in order and records every defect it finds. No
//! check is skipped because an earlier one failed.

mod checks;
mod fingerprint;

pub use checks::{RawNameMatcher, run_check};
pub use fingerprint::{FINGERPRINT_LEN, fingerprint};

use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::models::{EntryKind, ExpectedEntry, PipelineConfig, Severity};
use crate::report::{Defect, DefectKind, EntryObservation};

#[derive(Debug, Clone, Default)]
pub struct Verification {
    pub defects: Vec<Defect>,
    pub observations: Vec<EntryObservation>,
}

pub struct Verifier<'a> {
    entries: &'a [ExpectedEntry],
    raw_names: RawNameMatcher,
}

impl<'a> Verifier<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self {
            entries: &config.expected_entries,
            raw_names: RawNameMatcher::new(&config.required_names()),
        }
    }

    /// Verify every declared entry under `root`. Read-only.
    pub fn verify(&self, root: &Path) -> Verification {
        let mut verification = Verification::default();

        for entry in self.entries {
            self.verify_entry(root, entry, &mut verification);
        }

        info!(
            "Verified {} entries: {} defect(s)",
            self.entries.len(),
            verification.defects.len()
        );
        verification
    }

    fn verify_entry(&self, root: &Path, entry: &ExpectedEntry, out: &mut Verification) {
        let source = entry.path.display().to_string();
        let full = root.join(&entry.path);

        let found = match entry.kind {
            EntryKind::File => full.is_file(),
            EntryKind::Directory => full.is_dir(),
        };
        if !found {
            let message = if full.exists() {
                format!("expected a {} but found something else", entry.kind)
            } else {
                format!("{} not found", entry.kind)
            };
            debug!("{source}: {message}");
            out.defects.push(Defect::new(
                DefectKind::MissingEntry,
                entry.criticality,
                source,
                message,
            ));
            return;
        }

        match entry.kind {
            EntryKind::File => self.verify_file(&full, entry, source, out),
            EntryKind::Directory => {
                let (file_count, byte_size) = directory_stats(&full);
                out.observations.push(EntryObservation {
                    path: entry.path.clone(),
                    kind: EntryKind::Directory,
                    byte_size,
                    fingerprint: None,
                    file_count: Some(file_count),
                });
            }
        }
    }

    fn verify_file(&self, full: &Path, entry: &ExpectedEntry, source: String, out: &mut Verification) {
        let bytes = match fs::read(full) {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!("Cannot read {}: {error}", full.display());
                // Present but unusable, whatever the entry's criticality
                out.defects.push(Defect::new(
                    DefectKind::ContentCheckFailure,
                    Severity::Fatal,
                    source,
                    format!("cannot read file: {error}"),
                ));
                return;
            }
        };

        out.observations.push(EntryObservation {
            path: entry.path.clone(),
            kind: EntryKind::File,
            byte_size: bytes.len() as u64,
            fingerprint: Some(fingerprint(&bytes)),
            file_count: None,
        });

        let text = String::from_utf8_lossy(&bytes);
        for check in &entry.checks {
            if let Some(defect) = run_check(check, &source, &text, &self.raw_names) {
                debug!("{defect}");
                out.defects.push(defect);
            }
        }
    }
}

/// Number of regular files and their combined size
fn directory_stats(dir: &Path) -> (usize, u64) {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .fold((0, 0), |(count, size), entry| {
            let len = entry.metadata().map(|m| m.len()).unwrap_or(0);
            (count + 1, size + len)
        })
}
