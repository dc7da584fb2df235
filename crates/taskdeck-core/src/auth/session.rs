use std::sync::{Arc, RwLock};

use anyhow::Result;
use tracing::info;

use super::TokenStore;

/// Per-process authentication state.
///
/// Two states: anonymous and authenticated. `login` and `logout` are the
/// only transitions; there is no expired or refreshing state. Expiry is
/// discovered when the server rejects a request, never locally.
///
/// The session is derived from the token store at construction. Its mutators
/// write the store first, then flip the in-memory state, so the two only
/// diverge if the store is mutated by another process.
pub struct Session {
    store: TokenStore,
    token: Option<String>,
    username: Option<String>,
}

impl Session {
    /// Seed the session from whatever the token store currently holds.
    pub fn new(store: TokenStore) -> Self {
        let (token, username) = store.get();
        Self {
            store,
            token,
            username,
        }
    }

    /// Persist the credential pair, then become authenticated.
    pub fn login(&mut self, token: &str, username: &str) -> Result<()> {
        self.store.set(token, username)?;
        self.token = Some(token.to_string());
        self.username = Some(username.to_string());
        info!(user = username, "Session authenticated");
        Ok(())
    }

    /// Clear the credential pair, then become anonymous. Idempotent.
    pub fn logout(&mut self) -> Result<()> {
        self.store.clear()?;
        self.token = None;
        self.username = None;
        info!("Session cleared");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The current user's name, if authenticated.
    pub fn user(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// The bearer token to present on requests, if authenticated.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

/// Cheaply clonable handle to the one shared `Session`.
///
/// Both the API client and the view layer consult this same instance, so a
/// request dispatched after `logout()` observes the anonymous state
/// immediately. A poisoned lock means a holder panicked mid-update; that is
/// a programming error and aborts rather than limping on.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<RwLock<Session>>,
}

impl SessionHandle {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(RwLock::new(session)),
        }
    }

    pub fn login(&self, token: &str, username: &str) -> Result<()> {
        self.inner
            .write()
            .expect("session lock poisoned")
            .login(token, username)
    }

    pub fn logout(&self) -> Result<()> {
        self.inner.write().expect("session lock poisoned").logout()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner
            .read()
            .expect("session lock poisoned")
            .is_authenticated()
    }

    pub fn user(&self) -> Option<String> {
        self.inner
            .read()
            .expect("session lock poisoned")
            .user()
            .map(str::to_string)
    }

    pub fn token(&self) -> Option<String> {
        self.inner
            .read()
            .expect("session lock poisoned")
            .token()
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static DIR_SEQ: AtomicUsize = AtomicUsize::new(0);

    fn temp_dir() -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "taskdeck-session-test-{}-{}",
            std::process::id(),
            DIR_SEQ.fetch_add(1, Ordering::SeqCst)
        ))
    }

    #[test]
    fn starts_anonymous_with_empty_store() {
        let session = Session::new(TokenStore::new(temp_dir()));
        assert!(!session.is_authenticated());
        assert_eq!(session.user(), None);
        assert_eq!(session.token(), None);
    }

    #[test]
    fn login_sets_state_and_store() {
        let dir = temp_dir();
        let store = TokenStore::new(dir.clone());
        let mut session = Session::new(store);

        session.login("abc", "alice").unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.user(), Some("alice"));
        assert_eq!(session.token(), Some("abc"));

        // the store holds exactly the pair that was logged in
        let reread = TokenStore::new(dir);
        assert_eq!(
            reread.get(),
            (Some("abc".to_string()), Some("alice".to_string()))
        );
        session.logout().unwrap();
    }

    #[test]
    fn login_then_logout_ends_anonymous_with_empty_store() {
        let dir = temp_dir();
        let mut session = Session::new(TokenStore::new(dir.clone()));

        session.login("abc", "alice").unwrap();
        session.logout().unwrap();

        assert!(!session.is_authenticated());
        assert_eq!(session.user(), None);
        assert_eq!(TokenStore::new(dir).get(), (None, None));
    }

    #[test]
    fn logout_is_idempotent() {
        let mut session = Session::new(TokenStore::new(temp_dir()));
        session.login("abc", "alice").unwrap();
        session.logout().unwrap();
        session.logout().unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(session.user(), None);
    }

    #[test]
    fn logout_without_login_does_not_error() {
        let mut session = Session::new(TokenStore::new(temp_dir()));
        session.logout().unwrap();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn reload_reproduces_authenticated_state() {
        let dir = temp_dir();
        let mut session = Session::new(TokenStore::new(dir.clone()));
        session.login("abc", "alice").unwrap();

        // a fresh session over the same store sees the same state with no
        // new login call
        let reloaded = Session::new(TokenStore::new(dir.clone()));
        assert!(reloaded.is_authenticated());
        assert_eq!(reloaded.user(), Some("alice"));
        assert_eq!(reloaded.token(), Some("abc"));

        session.logout().unwrap();
    }

    #[test]
    fn handle_shares_one_session() {
        let handle = SessionHandle::new(Session::new(TokenStore::new(temp_dir())));
        let other = handle.clone();

        handle.login("tok", "bob").unwrap();
        assert!(other.is_authenticated());
        assert_eq!(other.user(), Some("bob".to_string()));

        other.logout().unwrap();
        assert!(!handle.is_authenticated());
        assert_eq!(handle.token(), None);
    }
}
