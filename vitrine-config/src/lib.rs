//! Configuration library for Vitrine.
//!
//! Resolves the effective server configuration from built-in defaults, an
//! optional TOML file and the process environment (after `.env` has been
//! loaded), and reports guard-rail warnings alongside the result. Command
//! line overrides are applied by the server on top of the loaded value.

pub mod loader;
pub mod models;
pub mod util;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoader, error::ConfigLoadError};
pub use models::{
    AnnotateConfig, Config, ConfigMetadata, CorsConfig, DatabaseConfig,
    ServerConfig, StorageConfig,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
