pub use vitrine_config::{
    AnnotateConfig, Config, ConfigLoad, ConfigLoadError, ConfigLoader,
    ConfigMetadata, ConfigWarnings, CorsConfig, DatabaseConfig, ServerConfig,
    StorageConfig, loader, models,
    models::sources,
};
