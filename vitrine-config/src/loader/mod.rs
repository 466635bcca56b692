pub mod error;

use std::{
    fs,
    path::{Path, PathBuf},
};

use url::Url;
use vitrine_core::{
    NamingStrategy, RejectionPolicy, storage::keys::normalize_extension,
};

use crate::{
    models::{
        AnnotateConfig, Config, ConfigMetadata, CorsConfig, DEFAULT_CORS_ORIGINS,
        DEFAULT_DATABASE_URL, DEFAULT_HOST, DEFAULT_MOUNT_PATH, DEFAULT_PORT,
        DEFAULT_PUBLIC_BASE_URL, DEFAULT_UPLOAD_ROOT, DatabaseConfig,
        ServerConfig, StorageConfig,
        sources::{EnvConfig, FileConfig, FileStorageConfig},
    },
    validation::{self, ConfigWarnings},
};
use error::ConfigLoadError;

const DEFAULT_CONFIG_LOCATIONS: &[&str] =
    &["vitrine.toml", "config/vitrine.toml"];

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    /// Load `.env`, read the process environment and the config file, and
    /// compose them over the defaults.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        let env = EnvConfig::gather();
        let (file, config_path) = self.load_file_config(&env)?;

        let metadata = ConfigMetadata {
            config_path,
            env_file_loaded,
        };
        let (config, warnings) = Self::compose(file, env, metadata)?;
        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let (path, explicit) = match (&self.options.config_path, &env.config_path)
        {
            (Some(path), _) | (None, Some(path)) => (Some(path.clone()), true),
            (None, None) => (
                DEFAULT_CONFIG_LOCATIONS
                    .iter()
                    .map(PathBuf::from)
                    .find(|candidate| candidate.exists()),
                false,
            ),
        };

        let Some(path) = path else {
            return Ok((None, None));
        };
        if !path.exists() {
            if explicit {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            return Ok((None, None));
        }

        let file = read_file_config(&path)?;
        Ok((Some(file), Some(path)))
    }

    /// Merge one file layer and one environment layer over the defaults.
    /// Environment values win over file values.
    pub fn compose(
        file: Option<FileConfig>,
        env: EnvConfig,
        metadata: ConfigMetadata,
    ) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
        let mut warnings = ConfigWarnings::default();
        if metadata.config_path.is_none() {
            warnings.push_with_hint(
                "No vitrine.toml detected; using defaults and environment variables",
                "Set VITRINE_CONFIG to point at a configuration file",
            );
        }

        let EnvConfig {
            config_path: _,
            server_host,
            server_port,
            database_url,
            upload_root,
            public_base_url,
            mount_path,
            accepted_extensions,
            naming,
            rejection,
            cors_allowed_origins,
            cors_allow_credentials,
            font_path,
            dev_mode,
        } = env;
        let env_storage = EnvStorage {
            upload_root,
            public_base_url,
            mount_path,
            accepted_extensions,
            naming,
            rejection,
        };

        let FileConfig {
            server: file_server,
            database: file_database,
            storage: file_storage,
            cors: file_cors,
            annotate: file_annotate,
            dev_mode: file_dev_mode,
        } = file.unwrap_or_default();

        let port = match server_port {
            Some(raw) => raw.parse::<u16>().map_err(|source| {
                ConfigLoadError::InvalidPort { value: raw, source }
            })?,
            None => file_server.port.unwrap_or(DEFAULT_PORT),
        };
        let server = ServerConfig {
            host: server_host
                .or(file_server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        };

        let database_url = database_url
            .or(file_database.url)
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        if !database_url.starts_with("sqlite:") {
            return Err(ConfigLoadError::InvalidOption {
                field: "database url",
                message: format!(
                    "'{database_url}' is not a sqlite:// connection string"
                ),
            });
        }
        let database = DatabaseConfig { url: database_url };

        let storage = compose_storage(env_storage, file_storage)?;

        let cors = CorsConfig {
            allowed_origins: cors_allowed_origins
                .or(file_cors.allowed_origins)
                .unwrap_or_else(|| {
                    DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect()
                }),
            allow_credentials: cors_allow_credentials
                .or(file_cors.allow_credentials)
                .unwrap_or(true),
        };

        let annotate = AnnotateConfig {
            font_path: font_path.or(file_annotate.font_path),
        };

        let config = Config {
            server,
            database,
            storage,
            cors,
            annotate,
            dev_mode: dev_mode.or(file_dev_mode).unwrap_or(false),
            metadata,
        };

        warnings.extend(validation::apply_guard_rails(&config)?);
        Ok((config, warnings))
    }
}

pub fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    toml::from_str(&contents).map_err(|source| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

struct EnvStorage {
    upload_root: Option<PathBuf>,
    public_base_url: Option<String>,
    mount_path: Option<String>,
    accepted_extensions: Option<Vec<String>>,
    naming: Option<String>,
    rejection: Option<String>,
}

fn compose_storage(
    env: EnvStorage,
    file: FileStorageConfig,
) -> Result<StorageConfig, ConfigLoadError> {
    let raw_base = env
        .public_base_url
        .or(file.public_base_url)
        .unwrap_or_else(|| DEFAULT_PUBLIC_BASE_URL.to_string());
    let public_base_url =
        Url::parse(&raw_base).map_err(|source| ConfigLoadError::InvalidUrl {
            field: "public base url",
            value: raw_base.clone(),
            source,
        })?;

    let naming = match &env.naming {
        Some(raw) => raw.parse::<NamingStrategy>().map_err(|message| {
            ConfigLoadError::InvalidOption {
                field: "upload naming",
                message,
            }
        })?,
        None => file.naming.unwrap_or_default(),
    };
    let rejection = match &env.rejection {
        Some(raw) => raw.parse::<RejectionPolicy>().map_err(|message| {
            ConfigLoadError::InvalidOption {
                field: "upload rejection",
                message,
            }
        })?,
        None => file.rejection.unwrap_or_default(),
    };

    let mut accepted_extensions: Vec<String> = Vec::new();
    let raw_extensions = env
        .accepted_extensions
        .or(file.accepted_extensions)
        .unwrap_or_else(|| {
            vitrine_core::image_service::options::DEFAULT_ACCEPTED_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect()
        });
    for raw in raw_extensions {
        let ext = normalize_extension(&raw);
        if !ext.is_empty() && !accepted_extensions.contains(&ext) {
            accepted_extensions.push(ext);
        }
    }
    if accepted_extensions.is_empty() {
        return Err(ConfigLoadError::NoAcceptedExtensions);
    }

    let storage = StorageConfig {
        upload_root: env
            .upload_root
            .or(file.upload_root)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_ROOT)),
        public_base_url,
        mount_path: env
            .mount_path
            .or(file.mount_path)
            .unwrap_or_else(|| DEFAULT_MOUNT_PATH.to_string()),
        accepted_extensions,
        naming,
        rejection,
    };

    storage
        .url_mapper()
        .map_err(|err| ConfigLoadError::InvalidOption {
            field: "public base url",
            message: err.to_string(),
        })?;
    Ok(storage)
}
