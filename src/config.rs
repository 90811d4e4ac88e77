//! Store configuration: environment resolution and key derivation.
//!
//! Two env naming schemes are accepted. The modern `S3IO_*` scheme wins as
//! soon as any modern-named variable is present; otherwise the legacy `S3_*`
//! names are read. Resolution is memoized process-wide after the first
//! success; a restart is required to pick up environment changes.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::domain::errors::{ConfigError, ValidationError};
use crate::domain::value_objects::naming::{sanitize_subfolder, split_extension};
use crate::domain::value_objects::{Prefix, RemoteKey};

pub const ENV_PREFIX: &str = "S3IO_";
pub const LEGACY_ENV_PREFIX: &str = "S3_";

const THUMB_PREFIX_DEFAULT: &str = "thumbs";

const ENV_KEYS: [&str; 8] = [
    "ACCESS_KEY_ID",
    "SECRET_ACCESS_KEY",
    "BUCKET",
    "ENDPOINT_URL",
    "REGION",
    "INPUT_PREFIX",
    "OUTPUT_PREFIX",
    "THUMB_PREFIX",
];

/// Connection settings for one bucket, plus the logical key prefixes that
/// partition it. Read-only after construction.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub endpoint: Option<String>,
    pub region: Option<String>,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub input_prefix: Prefix,
    pub output_prefix: Prefix,
    pub thumb_prefix: Prefix,
}

static RESOLVED: OnceLock<StoreConfig> = OnceLock::new();

impl StoreConfig {
    /// Resolve from the process environment, memoized after first success.
    /// Failed attempts are not memoized, so a fixed environment can be
    /// retried without restarting.
    pub fn resolve() -> Result<&'static StoreConfig, ConfigError> {
        if let Some(config) = RESOLVED.get() {
            return Ok(config);
        }
        let config = Self::from_env()?;
        Ok(RESOLVED.get_or_init(|| config))
    }

    /// Resolve from the process environment without memoization.
    pub fn from_env() -> Result<StoreConfig, ConfigError> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_env_map(&vars)
    }

    /// Resolve from an explicit variable map. This is the pure core of
    /// resolution; `resolve`/`from_env` delegate here.
    pub fn from_env_map(vars: &HashMap<String, String>) -> Result<StoreConfig, ConfigError> {
        let modern_present = ENV_KEYS
            .iter()
            .any(|key| vars.contains_key(&format!("{}{}", ENV_PREFIX, key)));
        let scheme = if modern_present {
            ENV_PREFIX
        } else {
            LEGACY_ENV_PREFIX
        };

        let get = |name: &str| {
            vars.get(&format!("{}{}", scheme, name))
                .filter(|value| !value.is_empty())
                .cloned()
        };

        let access_key = get("ACCESS_KEY_ID");
        let secret_key = get("SECRET_ACCESS_KEY");
        let bucket = get("BUCKET");

        let mut missing = Vec::new();
        for (name, value) in [
            ("ACCESS_KEY_ID", &access_key),
            ("SECRET_ACCESS_KEY", &secret_key),
            ("BUCKET", &bucket),
        ] {
            if value.is_none() {
                missing.push(format!("{}{}", scheme, name));
            }
        }

        match (access_key, secret_key, bucket) {
            (Some(access_key), Some(secret_key), Some(bucket)) => Ok(StoreConfig {
                endpoint: get("ENDPOINT_URL"),
                region: get("REGION"),
                access_key,
                secret_key,
                bucket,
                input_prefix: Prefix::new(&get("INPUT_PREFIX").unwrap_or_default()),
                output_prefix: Prefix::new(&get("OUTPUT_PREFIX").unwrap_or_default()),
                thumb_prefix: Prefix::new(
                    &get("THUMB_PREFIX").unwrap_or_else(|| THUMB_PREFIX_DEFAULT.to_string()),
                ),
            }),
            _ => Err(ConfigError::MissingVariables(missing)),
        }
    }

    /// Compose the input key for a relative name, always under the input
    /// prefix.
    pub fn input_key_for(&self, name: &str) -> Result<RemoteKey, ValidationError> {
        self.input_prefix.join(name)
    }

    /// Like [`input_key_for`](Self::input_key_for), but idempotent: a name
    /// that already carries the input prefix is taken as a full key.
    pub fn resolve_input_key(&self, name: &str) -> Result<RemoteKey, ValidationError> {
        let clean = name.trim_start_matches('/');
        if !self.input_prefix.is_empty() && clean.starts_with(self.input_prefix.as_str()) {
            RemoteKey::new(clean)
        } else {
            self.input_prefix.join(clean)
        }
    }

    /// Compose the output key for a filename under an optional subfolder.
    pub fn output_key_for(
        &self,
        subfolder: &str,
        filename: &str,
    ) -> Result<RemoteKey, ValidationError> {
        if filename.is_empty() {
            return Err(ValidationError::EmptyFileName);
        }
        let subfolder = sanitize_subfolder(subfolder)?;
        if subfolder.is_empty() {
            self.output_prefix.join(filename)
        } else {
            self.output_prefix
                .join(&format!("{}/{}", subfolder, filename))
        }
    }

    /// Derive a source key's thumbnail key: extension replaced with `.jpg`,
    /// relocated under the thumbnail prefix with its directory path kept.
    pub fn thumb_key_for(&self, source_key: &RemoteKey) -> Result<RemoteKey, ValidationError> {
        let key = source_key.as_str();
        let (dir, name) = match key.rfind('/') {
            Some(idx) => (&key[..=idx], &key[idx + 1..]),
            None => ("", key),
        };
        let (stem, _ext) = split_extension(name);
        self.thumb_prefix.join(&format!("{}{}.jpg", dir, stem))
    }
}
