use crate::models::PipelineConfig;
use once_cell::sync::Lazy;

// Embed the default pipeline and its template at compile time
pub const DEFAULT_PIPELINE_YAML: &str = include_str!("pipeline.yaml");
pub const DEFAULT_TEMPLATE: &str = include_str!("firebase-config.template.js");

/// File name looked up in the deployment root when no config path is given
pub const CONFIG_FILE_NAME: &str = "deploycfg.yml";

// Parse the default pipeline once at startup
pub static DEFAULT_PIPELINE: Lazy<PipelineConfig> = Lazy::new(|| {
    PipelineConfig::from_yaml(DEFAULT_PIPELINE_YAML)
        .expect("Failed to parse default pipeline definition - this is a bug")
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentCheck, EntryKind, Severity};
    use crate::templating::placeholders;

    #[test]
    fn test_default_pipeline_loads() {
        let config = &*DEFAULT_PIPELINE;
        assert_eq!(config.required_values.len(), 8);
        assert_eq!(config.output.to_str(), Some("firebase-config.js"));
    }

    #[test]
    fn test_default_template_covers_every_required_value() {
        let names = placeholders::names(DEFAULT_TEMPLATE);
        for spec in &DEFAULT_PIPELINE.required_values {
            assert!(names.contains(&spec.name), "{} missing", spec.name);
        }
        assert_eq!(placeholders::count(DEFAULT_TEMPLATE), 8);
    }

    #[test]
    fn test_default_manifest_markers() {
        let manifest = DEFAULT_PIPELINE
            .expected_entries
            .iter()
            .find(|entry| entry.path.ends_with("deploy.yml"))
            .unwrap();
        assert_eq!(manifest.kind, EntryKind::File);

        let advisory: Vec<_> = manifest
            .checks
            .iter()
            .filter(|check| check.severity() == Severity::Advisory)
            .collect();
        assert_eq!(advisory.len(), 1);
        assert!(matches!(
            advisory[0],
            ContentCheck::Marker { name, .. } if name == "manual dispatch trigger"
        ));
    }
}
