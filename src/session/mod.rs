//! Session Holder
//!
//! Holds the admin credential in memory and persists it to a
//! [`KeyValueStore`] under a fixed key. The token is never validated
//! locally: a bad or expired token only shows up as failed backend calls.

mod store;

pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError, StoreResult, STORE_FILE_NAME};

/// Key the credential is stored under
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Opaque bearer token sent to the backend. Never empty.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a token. An empty string means "no credential".
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    /// The raw token, for request headers and persistence
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// In-memory credential plus its durable copy
#[derive(Debug)]
pub struct Session<S> {
    store: S,
    credential: Option<Credential>,
}

impl<S: KeyValueStore> Session<S> {
    /// Start with no credential in memory
    pub fn new(store: S) -> Self {
        Self {
            store,
            credential: None,
        }
    }

    /// Start with whatever credential was saved previously
    pub fn restore(store: S) -> StoreResult<Self> {
        let mut session = Self::new(store);
        session.credential = session.load()?;
        Ok(session)
    }

    /// Read the saved credential without touching the in-memory one
    pub fn load(&self) -> StoreResult<Option<Credential>> {
        load_credential(&self.store)
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    /// Replace the in-memory credential without persisting it.
    ///
    /// Returns `true` when this moved the session from no credential to
    /// some credential.
    pub fn set(&mut self, token: impl Into<String>) -> bool {
        let was_absent = self.credential.is_none();
        self.credential = Credential::new(token);
        was_absent && self.credential.is_some()
    }

    /// Persist the in-memory credential.
    ///
    /// Returns `false` (and writes nothing) when there is no credential.
    pub fn save(&self) -> StoreResult<bool> {
        let Some(credential) = &self.credential else {
            return Ok(false);
        };
        store_credential(&self.store, credential)?;
        Ok(true)
    }

    /// Forget the credential in memory and in the store
    pub fn clear(&mut self) -> StoreResult<()> {
        erase_credential(&self.store)?;
        self.forget();
        Ok(())
    }

    /// Drop the in-memory credential, leaving the store alone
    pub fn forget(&mut self) {
        self.credential = None;
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Saved credential in `store`, if any. An empty stored value counts as none.
pub fn load_credential<S: KeyValueStore + ?Sized>(store: &S) -> StoreResult<Option<Credential>> {
    Ok(store.get(AUTH_TOKEN_KEY)?.and_then(Credential::new))
}

pub fn store_credential<S: KeyValueStore + ?Sized>(
    store: &S,
    credential: &Credential,
) -> StoreResult<()> {
    store.set(AUTH_TOKEN_KEY, credential.expose())?;
    tracing::debug!("Credential saved");
    Ok(())
}

pub fn erase_credential<S: KeyValueStore + ?Sized>(store: &S) -> StoreResult<()> {
    store.remove(AUTH_TOKEN_KEY)?;
    tracing::debug!("Credential cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn test_credential_rejects_empty() {
        assert!(Credential::new("").is_none());
        assert_eq!(Credential::new("abc").unwrap().expose(), "abc");
        assert_eq!(
            format!("{:?}", Credential::new("secret").unwrap()),
            "Credential(***)"
        );
    }

    #[test]
    fn test_set_reports_transition() {
        let mut session = Session::new(MemoryStore::new());

        assert!(session.set("abc"));
        assert!(!session.set("abc"));
        assert!(!session.set("def"));
        assert!(!session.set(""));
        assert!(!session.is_authenticated());
        assert!(session.set("abc"));
    }

    #[test]
    fn test_save_and_restore() {
        let store = MemoryStore::new();
        let mut session = Session::new(store.clone());
        session.set("abc");
        assert!(session.save().unwrap());

        // Simulated restart
        let restored = Session::restore(store).unwrap();
        assert_eq!(restored.credential().map(Credential::expose), Some("abc"));
    }

    #[test]
    fn test_save_without_credential_writes_nothing() {
        let store = MemoryStore::new();
        let session = Session::new(store.clone());

        assert!(!session.save().unwrap());
        assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_clear() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(FileStore::new(dir.path()));
        session.set("abc");
        session.save().unwrap();

        session.clear().unwrap();
        assert!(!session.is_authenticated());

        let restored = Session::restore(FileStore::new(dir.path())).unwrap();
        assert!(restored.credential().is_none());
    }

    #[test]
    fn test_forget_keeps_saved_copy() {
        let store = MemoryStore::new();
        let mut session = Session::new(Arc::new(store.clone()));
        session.set("abc");
        session.save().unwrap();

        session.forget();
        assert!(!session.is_authenticated());
        assert_eq!(
            load_credential(&store).unwrap().as_ref().map(Credential::expose),
            Some("abc")
        );
    }

    #[test]
    fn test_empty_stored_value_is_absent() {
        let store = MemoryStore::new();
        store.set(AUTH_TOKEN_KEY, "").unwrap();

        let session = Session::restore(store).unwrap();
        assert!(!session.is_authenticated());
    }
}
