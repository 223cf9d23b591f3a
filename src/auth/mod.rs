//! `sarangbang auth` / `sarangbang deauth`: keep the Gemini key in the
//! system keyring.

use crate::core::keyring::{delete_api_key, load_api_key, store_api_key, KeyringAccessError};
use crossterm::tty::IsTty;
use std::error::Error;
use std::io::{self, BufRead};

mod ui;

use self::ui::{
    prompt_api_key, prompt_confirmation, prompt_masked_api_key, ConfirmationChoice, UiError,
};

pub trait KeyStore {
    fn load(&self) -> Result<Option<String>, KeyringAccessError>;
    fn store(&self, key: &str) -> Result<(), KeyringAccessError>;
    fn delete(&self) -> Result<bool, KeyringAccessError>;
}

pub struct SystemKeyStore;

impl KeyStore for SystemKeyStore {
    fn load(&self) -> Result<Option<String>, KeyringAccessError> {
        load_api_key()
    }

    fn store(&self, key: &str) -> Result<(), KeyringAccessError> {
        store_api_key(key)
    }

    fn delete(&self) -> Result<bool, KeyringAccessError> {
        delete_api_key()
    }
}

pub struct AuthManager<S: KeyStore = SystemKeyStore> {
    store: S,
}

impl AuthManager<SystemKeyStore> {
    pub fn new() -> Self {
        Self {
            store: SystemKeyStore,
        }
    }
}

impl Default for AuthManager<SystemKeyStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: KeyStore> AuthManager<S> {
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    pub fn interactive_auth(&self) -> Result<(), Box<dyn Error>> {
        let stdin = io::stdin();
        if stdin.is_tty() {
            self.auth_from(&mut stdin.lock(), |_| prompt_masked_api_key())
        } else {
            self.auth_from(&mut stdin.lock(), prompt_api_key)
        }
    }

    pub fn interactive_deauth(&self) -> Result<(), Box<dyn Error>> {
        let stdin = io::stdin();
        self.deauth_from(&mut stdin.lock())
    }

    /// `read_key` supplies the new key once any replacement is confirmed.
    fn auth_from<R, K>(&self, input: &mut R, read_key: K) -> Result<(), Box<dyn Error>>
    where
        R: BufRead,
        K: FnOnce(&mut R) -> Result<String, UiError>,
    {
        if self.store.load()?.is_some() {
            let choice = prompt_confirmation(input, "A key is already stored. Replace it?")?;
            if choice != ConfirmationChoice::Yes {
                println!("Cancelled.");
                return Ok(());
            }
        }

        let key = read_key(input)?;
        self.store.store(&key)?;
        println!("✅ API key stored in the system keyring");
        Ok(())
    }

    fn deauth_from<R: BufRead>(&self, input: &mut R) -> Result<(), Box<dyn Error>> {
        if self.store.load()?.is_none() {
            println!("No stored API key found.");
            return Ok(());
        }

        match prompt_confirmation(input, "Remove the stored API key?")? {
            ConfirmationChoice::Yes => {
                if self.store.delete()? {
                    println!("✅ API key removed from the system keyring");
                } else {
                    println!("No stored API key found.");
                }
            }
            ConfirmationChoice::No | ConfirmationChoice::Cancel => println!("Cancelled."),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::Cursor;

    #[derive(Default)]
    struct MemoryStore {
        key: RefCell<Option<String>>,
    }

    impl KeyStore for MemoryStore {
        fn load(&self) -> Result<Option<String>, KeyringAccessError> {
            Ok(self.key.borrow().clone())
        }

        fn store(&self, key: &str) -> Result<(), KeyringAccessError> {
            *self.key.borrow_mut() = Some(key.to_string());
            Ok(())
        }

        fn delete(&self) -> Result<bool, KeyringAccessError> {
            Ok(self.key.borrow_mut().take().is_some())
        }
    }

    #[test]
    fn auth_stores_entered_key() {
        let manager = AuthManager::with_store(MemoryStore::default());
        manager
            .auth_from(&mut Cursor::new("AIza-new\n"), prompt_api_key)
            .expect("auth succeeds");
        assert_eq!(manager.store.key.borrow().as_deref(), Some("AIza-new"));
    }

    #[test]
    fn auth_keeps_existing_key_unless_confirmed() {
        let manager = AuthManager::with_store(MemoryStore::default());
        manager.store.store("old").expect("seed");

        manager
            .auth_from(&mut Cursor::new("n\n"), prompt_api_key)
            .expect("declined");
        assert_eq!(manager.store.key.borrow().as_deref(), Some("old"));

        manager
            .auth_from(&mut Cursor::new("y\nnew\n"), prompt_api_key)
            .expect("replaced");
        assert_eq!(manager.store.key.borrow().as_deref(), Some("new"));
    }

    #[test]
    fn deauth_removes_after_confirmation() {
        let manager = AuthManager::with_store(MemoryStore::default());
        manager.store.store("old").expect("seed");

        manager
            .deauth_from(&mut Cursor::new("\n"))
            .expect("default is no");
        assert!(manager.store.key.borrow().is_some());

        manager
            .deauth_from(&mut Cursor::new("yes\n"))
            .expect("removed");
        assert!(manager.store.key.borrow().is_none());
    }
}
