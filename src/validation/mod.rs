//! Value validation: presence and format of every required value.

use tracing::{debug, info};

use crate::models::{RequiredValue, Severity, ValidatedValues};
use crate::report::Defect;

/// Outcome of validating one set of required values.
#[derive(Debug, Clone, Default)]
pub struct Validation {
    pub values: ValidatedValues,
    pub defects: Vec<Defect>,
}

impl Validation {
    pub fn has_fatal(&self) -> bool {
        self.defects.iter().any(Defect::is_fatal)
    }

    pub fn fatal(&self) -> impl Iterator<Item = &Defect> {
        self.defects.iter().filter(|d| d.is_fatal())
    }
}

/// Check every value. Never stops at the first problem so the operator gets
/// the full list in one pass.
///
/// A value that fails a fatal format rule is left out of the validated set;
/// one that only trips an advisory rule is kept.
pub fn validate(values: &[RequiredValue]) -> Validation {
    let mut validation = Validation::default();

    for value in values {
        if let Some(error) = &value.source_error {
            validation
                .defects
                .push(Defect::format(&value.name, Severity::Fatal, error.to_string()));
            continue;
        }

        let Some(raw) = value.raw_value.as_deref() else {
            validation.defects.push(Defect::missing_value(&value.name));
            continue;
        };

        let mut usable = true;
        if let Some(format) = &value.format
            && !format.rule.matches(raw)
        {
            debug!("{} failed format rule: {}", value.name, format.rule);
            validation.defects.push(Defect::format(
                &value.name,
                format.severity,
                format.rule.to_string(),
            ));
            usable = !format.severity.is_fatal();
        }

        if usable {
            validation.values.insert(value.name.as_str(), raw);
        }
    }

    info!(
        "Validated {} of {} required values ({} defect(s))",
        validation.values.len(),
        values.len(),
        validation.defects.len()
    );
    validation
}
