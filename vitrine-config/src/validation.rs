use std::fmt;

use thiserror::Error;
use tracing::warn;

use vitrine_core::api::routes::legacy;

use crate::models::Config;

/// Legacy routes whose first segment a mount must not reuse.
const LEGACY_ROUTES: &[&str] = &[
    legacy::IMAGES,
    legacy::IMAGE,
    legacy::UPLOAD,
    legacy::REORDER,
    legacy::ANNOTATE,
];

/// Non-fatal findings produced while composing the configuration.
#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    items: Vec<ConfigWarning>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.hint {
            Some(hint) => write!(f, "{} ({hint})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl ConfigWarnings {
    pub fn push(&mut self, message: impl Into<String>) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint(
        &mut self,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }

    /// Emit every warning through `tracing`.
    pub fn log(&self) {
        for item in &self.items {
            match &item.hint {
                Some(hint) => warn!(hint = %hint, "{}", item.message),
                None => warn!("{}", item.message),
            }
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigGuardRailError {
    #[error("uploads mount path must not be the site root")]
    RootMountPath,
    #[error("uploads mount path '{path}' collides with the API prefix")]
    ApiMountPath { path: String },
    #[error("uploads mount path '{path}' collides with the route '{route}'")]
    RouteMountPath { path: String, route: &'static str },
}

/// Reject configurations that cannot be served and collect warnings for
/// those that are merely suspicious.
pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    let mount = config.storage.mount_path.trim_matches('/');
    if mount.is_empty() {
        return Err(ConfigGuardRailError::RootMountPath);
    }
    if mount == "api" || mount.starts_with("api/") {
        return Err(ConfigGuardRailError::ApiMountPath {
            path: config.storage.mount_path.clone(),
        });
    }
    let mount_head = first_segment(mount);
    if let Some(route) = LEGACY_ROUTES
        .iter()
        .copied()
        .find(|route| first_segment(route) == mount_head)
    {
        return Err(ConfigGuardRailError::RouteMountPath {
            path: config.storage.mount_path.clone(),
            route,
        });
    }

    if config.cors.is_wildcard_included() && config.cors.allow_credentials {
        warnings.push_with_hint(
            "CORS allows any origin while credentials are enabled; browsers will reject credentialed requests",
            "List explicit origins in CORS_ORIGINS or set CORS_ALLOW_CREDENTIALS=false",
        );
    }

    let base_path = config.storage.public_base_url.path().trim_end_matches('/');
    if base_path.ends_with(&format!("/{mount}")) {
        warnings.push_with_hint(
            format!(
                "public base url '{}' already ends with the uploads mount '/{mount}'; image urls will repeat it",
                config.storage.public_base_url
            ),
            "PUBLIC_BASE_URL should point at the server root, not the uploads directory",
        );
    }

    if config.dev_mode {
        warnings.push("dev mode enabled: CORS accepts every origin");
    }

    Ok(warnings)
}

fn first_segment(path: &str) -> &str {
    path.trim_start_matches('/').split('/').next().unwrap_or_default()
}
