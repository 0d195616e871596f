use colored::Colorize;
use serde::Serialize;
use std::io::{self, Write};

use super::{Defect, VerificationReport};
use crate::models::EntryKind;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Human-readable report: one line per defect grouped by severity, then a
/// final PASS/FAIL line.
pub fn render_text(report: &VerificationReport, out: &mut impl Write) -> io::Result<()> {
    let fatal: Vec<&Defect> = report.fatal().collect();
    let advisory: Vec<&Defect> = report.advisory().collect();

    if !report.entries.is_empty() {
        writeln!(out, "{}", "Entries:".bold())?;
        for entry in &report.entries {
            let detail = match entry.kind {
                EntryKind::File => entry.fingerprint.clone().unwrap_or_default(),
                EntryKind::Directory => {
                    format!("{} file(s)", entry.file_count.unwrap_or_default())
                }
            };
            writeln!(
                out,
                "  {}  {}  {} bytes  {}",
                entry.path.display(),
                entry.kind,
                entry.byte_size,
                detail.dimmed()
            )?;
        }
    }

    if let Some(artifact) = &report.artifact {
        writeln!(
            out,
            "Generated {} ({} bytes, fingerprint {})",
            artifact.output_path.display(),
            artifact.byte_size,
            artifact.fingerprint
        )?;
    }

    if !fatal.is_empty() {
        writeln!(out, "{}", format!("Fatal defects ({}):", fatal.len()).red().bold())?;
        for defect in &fatal {
            writeln!(out, "  {} {defect}", "✗".red())?;
        }
    }

    if !advisory.is_empty() {
        writeln!(
            out,
            "{}",
            format!("Advisory defects ({}):", advisory.len()).yellow().bold()
        )?;
        for defect in &advisory {
            writeln!(out, "  {} {defect}", "!".yellow())?;
        }
    }

    if report.aborted {
        writeln!(out, "{}", "Run aborted after an unrecoverable I/O failure".red())?;
    }

    let summary = format!(
        "{} fatal defect(s), {} advisory",
        fatal.len(),
        advisory.len()
    );
    if report.passed() {
        writeln!(out, "{} {summary}", "PASS:".green().bold())?;
    } else {
        writeln!(out, "{} {summary}", "FAIL:".red().bold())?;
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    passed: bool,
    fatal: usize,
    advisory: usize,
    #[serde(flatten)]
    report: &'a VerificationReport,
}

pub fn render_json(report: &VerificationReport, out: &mut impl Write) -> io::Result<()> {
    let json = JsonReport {
        passed: report.passed(),
        fatal: report.fatal_count(),
        advisory: report.advisory().count(),
        report,
    };
    serde_json::to_writer_pretty(&mut *out, &json)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;
    use crate::report::{DefectKind, EntryObservation};
    use std::path::PathBuf;

    fn render(report: &VerificationReport) -> String {
        let mut buf = Vec::new();
        render_text(report, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_text_groups_by_severity() {
        let mut report = VerificationReport::new();
        report.push(Defect::format("APP_ID", Severity::Advisory, "must start with 1:"));
        report.push(Defect::missing_value("API_KEY"));

        let text = render(&report);
        let fatal_at = text.find("Fatal defects (1):").unwrap();
        let advisory_at = text.find("Advisory defects (1):").unwrap();
        assert!(fatal_at < advisory_at);
        assert!(text.contains("[MissingValue] API_KEY: required value is not set"));
        assert!(text.contains("[FormatWarning] APP_ID: must start with 1:"));
        assert!(text.contains("1 fatal defect(s), 1 advisory"));
        assert!(text.contains("FAIL:"));
        assert!(text.trim_end().lines().last().unwrap().contains("FAIL:"));
    }

    #[test]
    fn test_text_pass_summary() {
        let mut report = VerificationReport::new();
        report.entries.push(EntryObservation {
            path: PathBuf::from("index.html"),
            kind: EntryKind::File,
            byte_size: 42,
            fingerprint: Some("0123456789ab".into()),
            file_count: None,
        });
        let text = render(&report);
        assert!(text.contains("index.html  file  42 bytes"));
        assert!(text.contains("0123456789ab"));
        assert!(text.contains("PASS:"));
        assert!(!text.contains("Fatal defects"));
    }

    #[test]
    fn test_aborted_run_is_reported() {
        let mut report = VerificationReport::new();
        report.aborted = true;
        report.push(Defect::new(
            DefectKind::WriteFailure,
            Severity::Fatal,
            "out/config.js",
            "No such file or directory",
        ));
        let text = render(&report);
        assert!(text.contains("Run aborted"));
        assert!(text.contains("[WriteFailure] out/config.js"));
    }

    #[test]
    fn test_json_output() {
        let mut report = VerificationReport::new();
        report.push(Defect::missing_value("API_KEY"));
        let mut buf = Vec::new();
        render_json(&report, &mut buf).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["passed"], false);
        assert_eq!(value["fatal"], 1);
        assert_eq!(value["defects"][0]["kind"], "MissingValue");
        assert_eq!(value["defects"][0]["severity"], "fatal");
        assert_eq!(value["defects"][0]["source"], "API_KEY");
    }
}
