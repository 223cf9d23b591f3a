//! Resolution of the single API key the program runs with.
//!
//! Lookup order: `SARANGBANG_API_KEY`, then the legacy `GEMINI_API_KEY`,
//! then `api_key` from the config file, then the system keyring. A key that
//! is missing everywhere is fatal.

use crate::core::config::{Config, ConfigError};
use crate::core::keyring::{load_api_key, KeyringAccessError};
use std::fmt;
use tracing::{debug, warn};

pub const API_KEY_ENV: &str = "SARANGBANG_API_KEY";
pub const LEGACY_API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialOrigin {
    Environment(&'static str),
    ConfigFile,
    Keyring,
}

impl fmt::Display for CredentialOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialOrigin::Environment(name) => write!(f, "environment ({name})"),
            CredentialOrigin::ConfigFile => write!(f, "config file"),
            CredentialOrigin::Keyring => write!(f, "system keyring"),
        }
    }
}

#[derive(Clone)]
pub struct ApiKey {
    value: String,
    origin: CredentialOrigin,
}

impl ApiKey {
    pub fn new(value: impl Into<String>, origin: CredentialOrigin) -> Self {
        Self {
            value: value.into(),
            origin,
        }
    }

    pub fn expose(&self) -> &str {
        &self.value
    }

    pub fn origin(&self) -> CredentialOrigin {
        self.origin
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("value", &"<redacted>")
            .field("origin", &self.origin)
            .finish()
    }
}

/// Where keys can come from besides the config file.
pub trait CredentialSource {
    fn env_var(&self, name: &str) -> Option<String>;
    fn keyring_key(&self) -> Result<Option<String>, KeyringAccessError>;
}

pub struct SystemCredentialSource;

impl CredentialSource for SystemCredentialSource {
    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn keyring_key(&self) -> Result<Option<String>, KeyringAccessError> {
        load_api_key()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn resolve_api_key<S: CredentialSource>(
    source: &S,
    config: &Config,
) -> Result<ApiKey, ConfigError> {
    for name in [API_KEY_ENV, LEGACY_API_KEY_ENV] {
        if let Some(key) = non_blank(source.env_var(name)) {
            debug!(origin = name, "using API key from environment");
            return Ok(ApiKey::new(key, CredentialOrigin::Environment(name)));
        }
    }

    if let Some(key) = non_blank(config.api_key.clone()) {
        debug!("using API key from config file");
        return Ok(ApiKey::new(key, CredentialOrigin::ConfigFile));
    }

    match source.keyring_key() {
        Ok(key) => match non_blank(key) {
            Some(key) => {
                debug!("using API key from keyring");
                Ok(ApiKey::new(key, CredentialOrigin::Keyring))
            }
            None => Err(ConfigError::MissingCredential),
        },
        Err(err) if err.is_recoverable() => {
            warn!(error = %err, "keyring unavailable, treating API key as missing");
            Err(ConfigError::MissingCredential)
        }
        Err(err) => Err(ConfigError::Keyring(err)),
    }
}
