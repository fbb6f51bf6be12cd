use anyhow::Result;
use tracing::debug;

use super::Storage;

/// Storage key for the persisted bearer token
pub const TOKEN_KEY: &str = "token";

/// In-memory session, reconciled with the persisted token.
///
/// `authenticated` is only ever true while a token is held.
pub struct Session {
    storage: Box<dyn Storage>,
    token: Option<String>,
    authenticated: bool,
}

impl Session {
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self {
            storage,
            token: None,
            authenticated: false,
        }
    }

    /// Read the persisted token into memory. Does not authenticate.
    pub fn load(&mut self) -> Result<Option<String>> {
        let stored = self
            .storage
            .get_item(TOKEN_KEY)?
            .filter(|t| !t.is_empty());
        debug!(found = stored.is_some(), "Persisted token checked");
        self.token = stored.clone();
        Ok(stored)
    }

    /// Hold `token` in memory and persist it.
    ///
    /// The in-memory token is set even when persisting fails.
    pub fn store_token(&mut self, token: &str) -> Result<()> {
        self.token = Some(token.to_string());
        self.storage.set_item(TOKEN_KEY, token)
    }

    /// Mark the held token as accepted by the server
    pub fn mark_authenticated(&mut self) {
        self.authenticated = self.token.is_some();
    }

    /// Drop the token from memory and storage.
    ///
    /// Memory is always cleared; the returned error only concerns storage.
    pub fn clear(&mut self) -> Result<()> {
        self.token = None;
        self.authenticated = false;
        self.storage.remove_item(TOKEN_KEY)
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Persisted token, bypassing the in-memory state
    #[cfg(test)]
    pub fn stored_token(&self) -> Result<Option<String>> {
        self.storage.get_item(TOKEN_KEY)
    }

    /// Seed the backing storage directly, bypassing the in-memory state
    #[cfg(test)]
    pub fn storage_mut(&mut self) -> &mut dyn Storage {
        &mut *self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::storage::MemoryStorage;

    #[test]
    fn test_load_empty_storage() {
        let mut session = Session::new(Box::new(MemoryStorage::default()));
        assert_eq!(session.load().expect("load"), None);
        assert!(session.token().is_none());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_load_ignores_empty_token() {
        let mut storage = MemoryStorage::default();
        storage.set_item(TOKEN_KEY, "").expect("set");
        let mut session = Session::new(Box::new(storage));
        assert_eq!(session.load().expect("load"), None);
    }

    #[test]
    fn test_store_then_clear() {
        let mut session = Session::new(Box::new(MemoryStorage::default()));
        session.store_token("abc").expect("store");
        assert_eq!(session.token(), Some("abc"));
        assert_eq!(session.stored_token().expect("read"), Some("abc".to_string()));
        assert!(!session.is_authenticated());

        session.mark_authenticated();
        assert!(session.is_authenticated());

        session.clear().expect("clear");
        assert!(session.token().is_none());
        assert!(!session.is_authenticated());
        assert_eq!(session.stored_token().expect("read"), None);
    }

    #[test]
    fn test_cannot_authenticate_without_token() {
        let mut session = Session::new(Box::new(MemoryStorage::default()));
        session.mark_authenticated();
        assert!(!session.is_authenticated());
    }
}
