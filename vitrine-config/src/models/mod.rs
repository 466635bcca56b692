pub mod sources;

use std::path::PathBuf;

use url::Url;
use vitrine_core::{
    NamingStrategy, PublicUrlMapper, RejectionPolicy, UploadOptions,
};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://gallery.db";
pub const DEFAULT_UPLOAD_ROOT: &str = "./uploads";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8000/";
pub const DEFAULT_MOUNT_PATH: &str = "/uploads";
pub const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost:3001"];

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub cors: CorsConfig,
    pub annotate: AnnotateConfig,
    pub dev_mode: bool,
    pub metadata: ConfigMetadata,
}

impl Config {
    /// Address the HTTP listener binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub upload_root: PathBuf,
    pub public_base_url: Url,
    pub mount_path: String,
    /// Normalised: lower-case, no leading dot, never empty.
    pub accepted_extensions: Vec<String>,
    pub naming: NamingStrategy,
    pub rejection: RejectionPolicy,
}

impl StorageConfig {
    pub fn upload_options(&self) -> UploadOptions {
        UploadOptions::new(
            &self.accepted_extensions,
            self.naming,
            self.rejection,
        )
    }

    pub fn url_mapper(&self) -> vitrine_core::Result<PublicUrlMapper> {
        PublicUrlMapper::new(self.public_base_url.clone(), &self.mount_path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

impl CorsConfig {
    pub fn is_wildcard_included(&self) -> bool {
        self.allowed_origins
            .iter()
            .any(|origin| origin.trim() == "*")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotateConfig {
    /// TrueType font used for overlays; the bundled bitmap face is used
    /// when unset or unreadable.
    pub font_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
