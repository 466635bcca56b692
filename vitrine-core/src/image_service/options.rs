use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::storage::keys::normalize_extension;

pub const DEFAULT_ACCEPTED_EXTENSIONS: &[&str] =
    &["jpg", "jpeg", "png", "webp", "gif"];

/// How storage keys are assigned to uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingStrategy {
    /// Random key chosen at write time, independent of the id.
    #[default]
    #[serde(alias = "random_key")]
    Random,
    /// Provisional key first, then renamed to `<id>.<ext>` once the row
    /// exists.
    #[serde(alias = "id", alias = "identity_derived")]
    Identity,
}

impl FromStr for NamingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" | "random_key" | "uuid" => Ok(Self::Random),
            "identity" | "identity_derived" | "id" => Ok(Self::Identity),
            other => Err(format!(
                "unknown naming strategy '{other}' (expected 'random' or 'id')"
            )),
        }
    }
}

impl fmt::Display for NamingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => f.write_str("random"),
            Self::Identity => f.write_str("id"),
        }
    }
}

/// What to do with files whose extension is not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionPolicy {
    /// Drop the offending file, keep the rest of the batch.
    #[default]
    Skip,
    /// Fail the whole request before anything is written.
    Reject,
}

impl FromStr for RejectionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "reject" => Ok(Self::Reject),
            other => Err(format!(
                "unknown rejection policy '{other}' (expected 'skip' or 'reject')"
            )),
        }
    }
}

impl fmt::Display for RejectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip => f.write_str("skip"),
            Self::Reject => f.write_str("reject"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    accepted_extensions: BTreeSet<String>,
    pub naming: NamingStrategy,
    pub rejection: RejectionPolicy,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self::new(
            DEFAULT_ACCEPTED_EXTENSIONS.iter().copied(),
            NamingStrategy::default(),
            RejectionPolicy::default(),
        )
    }
}

impl UploadOptions {
    pub fn new<I, S>(
        accepted_extensions: I,
        naming: NamingStrategy,
        rejection: RejectionPolicy,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let accepted_extensions = accepted_extensions
            .into_iter()
            .map(|ext| normalize_extension(ext.as_ref()))
            .filter(|ext| !ext.is_empty())
            .collect();
        Self {
            accepted_extensions,
            naming,
            rejection,
        }
    }

    pub fn with_naming(mut self, naming: NamingStrategy) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_rejection(mut self, rejection: RejectionPolicy) -> Self {
        self.rejection = rejection;
        self
    }

    pub fn accepted_extensions(&self) -> &BTreeSet<String> {
        &self.accepted_extensions
    }

    pub fn accepts(&self, extension: &str) -> bool {
        self.accepted_extensions
            .contains(&normalize_extension(extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_are_normalized() {
        let options = UploadOptions::new(
            [".JPG", "png", ""],
            NamingStrategy::Random,
            RejectionPolicy::Skip,
        );
        assert!(options.accepts("jpg"));
        assert!(options.accepts(".PNG"));
        assert!(!options.accepts("gif"));
        assert_eq!(options.accepted_extensions().len(), 2);
    }

    #[test]
    fn strategies_parse_from_config_strings() {
        assert_eq!("id".parse::<NamingStrategy>().unwrap(), NamingStrategy::Identity);
        assert_eq!("Random".parse::<NamingStrategy>().unwrap(), NamingStrategy::Random);
        assert!("sequential".parse::<NamingStrategy>().is_err());
        assert_eq!("reject".parse::<RejectionPolicy>().unwrap(), RejectionPolicy::Reject);
        assert!("drop".parse::<RejectionPolicy>().is_err());
    }

    #[test]
    fn defaults_cover_common_image_types() {
        let options = UploadOptions::default();
        for ext in ["jpg", "jpeg", "png", "webp", "gif"] {
            assert!(options.accepts(ext));
        }
        assert!(!options.accepts("exe"));
    }
}
