//! Façade binding the master password, the password store and a logger.

use crate::crypto::{Encryptor, MasterKey};
use crate::error::{PassManError, StoreError};
use crate::logging::Logger;
use crate::models::SecureString;
use crate::store::PasswordStore;

pub struct PassMan {
    store: Result<PasswordStore, StoreError>,
    master_password: SecureString,
    logger: Logger,
    key: Option<MasterKey>,
}

impl PassMan {
    /// `store` may be a failed binding; the failure is reported on first use.
    pub fn new(
        store: Result<PasswordStore, StoreError>,
        master_password: SecureString,
        logger: Logger,
    ) -> Self {
        Self {
            store,
            master_password,
            logger,
            key: None,
        }
    }

    /// Derives the entry key once; later calls replace it.
    pub fn set_default_encryptor(&mut self, encryptor: Encryptor) -> Result<(), PassManError> {
        self.key = Some(encryptor.derive_key(&self.master_password)?);
        self.logger.debug("default encryptor configured");
        Ok(())
    }

    pub fn list_handles(&self) -> Result<Vec<String>, PassManError> {
        let handles = self.store()?.handles();
        self.logger.debug(format!("{} handles in store", handles.len()));
        Ok(handles)
    }

    pub fn retrieve_password(&self, handle: &str) -> Result<Option<SecureString>, PassManError> {
        let key = self.key()?;
        let Some(entry) = self.store()?.get(handle) else {
            self.logger.debug(format!("no entry for \"{handle}\""));
            return Ok(None);
        };

        let value = key
            .open(entry)
            .map_err(|source| PassManError::Decrypt {
                handle: handle.to_string(),
                source,
            })?;
        Ok(Some(value))
    }

    pub fn store_password(&mut self, handle: &str, value: &SecureString) -> Result<(), PassManError> {
        let entry = self.key()?.seal(value);
        let store = self.store_mut()?;
        store.put(handle, entry);
        store.save()?;
        self.logger.debug(format!("stored \"{handle}\""));
        Ok(())
    }

    /// Returns whether an entry was removed.
    pub fn remove_password(&mut self, handle: &str) -> Result<bool, PassManError> {
        self.key()?;
        let store = self.store_mut()?;
        let removed = store.remove(handle);
        if removed {
            store.save()?;
            self.logger.debug(format!("removed \"{handle}\""));
        }
        Ok(removed)
    }

    fn key(&self) -> Result<&MasterKey, PassManError> {
        self.key.as_ref().ok_or(PassManError::NoEncryptor)
    }

    fn store(&self) -> Result<&PasswordStore, PassManError> {
        self.store
            .as_ref()
            .map_err(|err| PassManError::StoreUnavailable(err.to_string()))
    }

    fn store_mut(&mut self) -> Result<&mut PasswordStore, PassManError> {
        self.store
            .as_mut()
            .map_err(|err| PassManError::StoreUnavailable(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto;
    use tempfile::tempdir;

    fn passman(dir: &std::path::Path) -> PassMan {
        crypto::init().unwrap();
        let store = PasswordStore::bind(dir.join("txnPassStore.dat"));
        let mut pm = PassMan::new(store, SecureString::from("hunter2"), Logger::silent());
        let mut encryptor = Encryptor::new();
        encryptor.set_salt("s1");
        pm.set_default_encryptor(encryptor).unwrap();
        pm
    }

    #[test]
    fn store_retrieve_remove() {
        let dir = tempdir().unwrap();
        let mut pm = passman(dir.path());

        assert_eq!(pm.retrieve_password("apiKey").unwrap(), None);

        pm.store_password("apiKey", &SecureString::from("secret1")).unwrap();
        let value = pm.retrieve_password("apiKey").unwrap().unwrap();
        assert_eq!(value.expose(), "secret1");
        assert_eq!(pm.list_handles().unwrap(), vec!["apiKey".to_string()]);

        assert!(pm.remove_password("apiKey").unwrap());
        assert!(!pm.remove_password("apiKey").unwrap());
        assert!(pm.list_handles().unwrap().is_empty());
    }

    #[test]
    fn values_persist_across_sessions() {
        let dir = tempdir().unwrap();
        passman(dir.path())
            .store_password("dbPass", &SecureString::from("pw"))
            .unwrap();

        let pm = passman(dir.path());
        assert_eq!(pm.retrieve_password("dbPass").unwrap().unwrap().expose(), "pw");
    }

    #[test]
    fn requires_an_encryptor() {
        let dir = tempdir().unwrap();
        let store = PasswordStore::bind(dir.path().join("txnPassStore.dat"));
        let pm = PassMan::new(store, SecureString::from("hunter2"), Logger::silent());

        assert!(matches!(
            pm.retrieve_password("apiKey"),
            Err(PassManError::NoEncryptor)
        ));
    }

    #[test]
    fn failed_binding_surfaces_on_use() {
        let dir = tempdir().unwrap();
        let store = PasswordStore::bind(dir.path());
        assert!(store.is_err());

        let mut pm = PassMan::new(store, SecureString::from("hunter2"), Logger::silent());
        let mut encryptor = Encryptor::new();
        encryptor.set_salt("s1");
        pm.set_default_encryptor(encryptor).unwrap();

        assert!(matches!(
            pm.list_handles(),
            Err(PassManError::StoreUnavailable(_))
        ));
    }
}
