pub mod config;
pub mod value;

pub use config::{
    ContentCheck, EntryKind, ExpectedEntry, FormatRule, FormatSpec, Pattern, PipelineConfig,
    RequiredValueSpec, Severity,
};
pub use value::{GeneratedArtifact, RequiredValue, ValidatedValues};
