use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

use super::ConfigError;
use crate::defaults::{CONFIG_FILE_NAME, DEFAULT_PIPELINE};
use crate::models::{EntryKind, PipelineConfig};

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    File(PathBuf),
    BuiltIn,
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: PipelineConfig,
    pub origin: ConfigOrigin,
}

pub struct ConfigLoader {
    root: PathBuf,
    explicit: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            explicit: None,
        }
    }

    /// Use this file instead of looking for `deploycfg.yml` in the root.
    /// Unlike the implicit lookup, a missing explicit file is an error.
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit = Some(path.into());
        self
    }

    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let (config, origin) = match &self.explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path.clone()));
                }
                (Self::load_file(path)?, ConfigOrigin::File(path.clone()))
            }
            None => {
                let candidate = self.root.join(CONFIG_FILE_NAME);
                if candidate.is_file() {
                    (Self::load_file(&candidate)?, ConfigOrigin::File(candidate))
                } else {
                    debug!(
                        "No {} in {}, using the built-in pipeline",
                        CONFIG_FILE_NAME,
                        self.root.display()
                    );
                    (DEFAULT_PIPELINE.clone(), ConfigOrigin::BuiltIn)
                }
            }
        };

        check_config(&config)?;
        match &origin {
            ConfigOrigin::File(path) => info!("Loaded pipeline '{}' from {}", config.name, path.display()),
            ConfigOrigin::BuiltIn => info!("Using built-in pipeline '{}'", config.name),
        }
        Ok(LoadedConfig { config, origin })
    }

    fn load_file(path: &Path) -> Result<PipelineConfig, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        PipelineConfig::from_yaml(&content).map_err(|error| {
            let span = error
                .location()
                .map(|location| span_at(location.index(), &content));
            ConfigError::Parse {
                src: miette::NamedSource::new(path.display().to_string(), content.clone()),
                span,
                message: error.to_string(),
            }
        })
    }
}

/// One-character span, clamped to the source
fn span_at(index: usize, source: &str) -> miette::SourceSpan {
    let start = index.min(source.len());
    let len = usize::from(start < source.len());
    miette::SourceSpan::new(start.into(), len)
}

/// Structural rules serde cannot express
fn check_config(config: &PipelineConfig) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for spec in &config.required_values {
        if !seen.insert(spec.name.as_str()) {
            return Err(ConfigError::DuplicateValue(spec.name.clone()));
        }
    }

    for path in [&config.template, &config.output]
        .into_iter()
        .chain(config.expected_entries.iter().map(|entry| &entry.path))
    {
        if !stays_inside_root(path) {
            return Err(ConfigError::PathEscapesRoot(path.clone()));
        }
    }

    if let Some(entry) = config
        .expected_entries
        .iter()
        .find(|entry| entry.kind == EntryKind::Directory && !entry.checks.is_empty())
    {
        return Err(ConfigError::ChecksOnDirectory(entry.path.clone()));
    }

    if config.template == config.output {
        return Err(ConfigError::OutputOverwritesTemplate(config.output.clone()));
    }
    Ok(())
}

fn stays_inside_root(path: &Path) -> bool {
    !path.as_os_str().is_empty()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}
