use crate::core::config::data::path_display;
use crate::core::keyring::KeyringAccessError;
use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

const QUICK_FIXES: &[&str] = &[
    "sarangbang auth                      # Store a key in the system keyring",
    "export SARANGBANG_API_KEY=...        # Use an environment variable",
    "api_key = \"...\" in config.toml       # Plain-text fallback",
];

/// Errors that stop the program before a conversation can start.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse the configuration file as valid TOML.
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// No API key in the environment, the config file, or the keyring.
    MissingCredential,

    /// The keyring could not be queried.
    Keyring(KeyringAccessError),
}

impl ConfigError {
    pub fn quick_fixes(&self) -> &'static [&'static str] {
        match self {
            ConfigError::MissingCredential | ConfigError::Keyring(_) => QUICK_FIXES,
            _ => &[],
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            ConfigError::MissingCredential => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "Failed to read config at {}: {}", path_display(path), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "Failed to parse config at {}: {}", path_display(path), source)
            }
            ConfigError::MissingCredential => write!(
                f,
                "🚨 No API key configured. Set SARANGBANG_API_KEY, add api_key to the config file, or run 'sarangbang auth'."
            ),
            ConfigError::Keyring(err) => write!(f, "Failed to access system keyring: {err}"),
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Keyring(err) => Some(err),
            ConfigError::MissingCredential => None,
        }
    }
}
