//! Pipeline configuration loading.

mod config_loader;
mod error;

pub use config_loader::{ConfigLoader, ConfigOrigin, LoadedConfig};
pub use error::ConfigError;
