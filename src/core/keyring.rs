//! Storage of the API key in the platform keyring.

use keyring::Entry;
use std::error::Error;
use std::fmt;

pub const KEYRING_SERVICE: &str = "sarangbang";
pub const KEYRING_USER: &str = "gemini";

/// Describes failures when attempting to access the system keyring.
///
/// Recoverable errors mean the backend was temporarily unavailable (a locked
/// keychain, a missing secret service). Permanent errors carry the cause so
/// it can be shown to the user.
#[derive(Debug)]
pub enum KeyringAccessError {
    Recoverable(keyring::Error),
    Permanent(keyring::Error),
}

impl KeyringAccessError {
    fn inner(&self) -> &keyring::Error {
        match self {
            KeyringAccessError::Recoverable(err) | KeyringAccessError::Permanent(err) => err,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        matches!(self, KeyringAccessError::Recoverable(_))
    }
}

impl From<keyring::Error> for KeyringAccessError {
    fn from(err: keyring::Error) -> Self {
        match err {
            keyring::Error::PlatformFailure(_) | keyring::Error::NoStorageAccess(_) => {
                KeyringAccessError::Recoverable(err)
            }
            other => KeyringAccessError::Permanent(other),
        }
    }
}

impl fmt::Display for KeyringAccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner())
    }
}

impl Error for KeyringAccessError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.inner())
    }
}

fn entry() -> Result<Entry, KeyringAccessError> {
    Ok(Entry::new(KEYRING_SERVICE, KEYRING_USER)?)
}

/// Read the stored key. `Ok(None)` when nothing has been stored.
pub fn load_api_key() -> Result<Option<String>, KeyringAccessError> {
    match entry()?.get_password() {
        Ok(key) => Ok(Some(key)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

pub fn store_api_key(key: &str) -> Result<(), KeyringAccessError> {
    Ok(entry()?.set_password(key)?)
}

/// Remove the stored key. Returns false when there was nothing to remove.
pub fn delete_api_key() -> Result<bool, KeyringAccessError> {
    match entry()?.delete_credential() {
        Ok(()) => Ok(true),
        Err(keyring::Error::NoEntry) => Ok(false),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_failures_are_recoverable() {
        let err: KeyringAccessError =
            keyring::Error::PlatformFailure("locked".to_string().into()).into();
        assert!(err.is_recoverable());

        let err: KeyringAccessError = keyring::Error::NoEntry.into();
        assert!(!err.is_recoverable());
    }
}
