//! Sequential run: source → validator → generator → verifier → report.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::generator::{GenerationError, Generator};
use crate::models::{PipelineConfig, RequiredValue, Severity};
use crate::report::{Defect, DefectKind, VerificationReport};
use crate::source::{ValueSource, read_values};
use crate::validation::{Validation, validate};
use crate::verify::Verifier;

pub struct Pipeline<'a> {
    config: &'a PipelineConfig,
    root: PathBuf,
    generator: Generator,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a PipelineConfig, root: impl Into<PathBuf>) -> Self {
        Self {
            config,
            root: root.into(),
            generator: Generator::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.config.output)
    }

    pub fn read_values(&self, source: &dyn ValueSource) -> Vec<RequiredValue> {
        read_values(source, &self.config.required_values)
    }

    pub fn validate(&self, source: &dyn ValueSource) -> Validation {
        validate(&self.read_values(source))
    }

    /// Validate and generate, without verifying the tree.
    pub fn generate(&self, source: &dyn ValueSource) -> VerificationReport {
        let mut report = VerificationReport::new();
        let validation = self.validate(source);
        report.extend(validation.defects.iter().cloned());
        self.generate_into(&validation, &mut report);
        report
    }

    /// Verify the deployment tree as it is on disk.
    pub fn verify(&self) -> VerificationReport {
        let mut report = VerificationReport::new();
        self.verify_into(&mut report);
        report
    }

    /// Full run. Only an unrecoverable write failure cuts it short.
    pub fn run(&self, source: &dyn ValueSource) -> VerificationReport {
        info!("Running pipeline '{}' in {}", self.config.name, self.root.display());

        let mut report = VerificationReport::new();
        let validation = self.validate(source);
        report.extend(validation.defects.iter().cloned());

        if self.generate_into(&validation, &mut report) {
            self.verify_into(&mut report);
        }
        report
    }

    /// Returns false when the run must stop.
    fn generate_into(&self, validation: &Validation, report: &mut VerificationReport) -> bool {
        let template = self.root.join(&self.config.template);
        let output = self.output_path();

        match self.generator.generate(&template, validation, &output) {
            Ok(artifact) => {
                report.artifact = Some(artifact);
                true
            }
            Err(GenerationError::ValidationFailed(count)) => {
                warn!("Skipping generation: {count} fatal validation defect(s)");
                true
            }
            Err(error) if error.is_write_failure() => {
                report.push(Defect::new(
                    DefectKind::WriteFailure,
                    Severity::Fatal,
                    self.config.output.display().to_string(),
                    error.to_string(),
                ));
                report.aborted = true;
                false
            }
            Err(error) => {
                warn!("Generation aborted: {error}");
                report.push(Defect::new(
                    DefectKind::GenerationAborted,
                    Severity::Fatal,
                    self.config.template.display().to_string(),
                    error.to_string(),
                ));
                true
            }
        }
    }

    fn verify_into(&self, report: &mut VerificationReport) {
        let verification = Verifier::new(self.config).verify(&self.root);
        report.extend(verification.defects);
        report.entries.extend(verification.observations);
    }
}
