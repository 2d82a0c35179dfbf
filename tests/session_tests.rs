//! Session lifecycle tests that need no backend: restore from the token
//! store, teardown idempotence, navigation and subscriber side effects.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use kado_admin::config::ClientConfig;
use kado_admin::identity::{
    FileTokenStore, LoginNavigator, MemoryTokenStore, SessionManager, StoredTokens, TokenStore,
};

struct CountingNavigator(AtomicUsize);

impl CountingNavigator {
    fn new() -> Arc<Self> {
        Arc::new(Self(AtomicUsize::new(0)))
    }

    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl LoginNavigator for CountingNavigator {
    fn to_login(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

fn manager_with_tokens(tokens: Option<StoredTokens>) -> Arc<SessionManager> {
    let store: Arc<dyn TokenStore> = match tokens {
        Some(t) => Arc::new(MemoryTokenStore::with_tokens(t)),
        None => Arc::new(MemoryTokenStore::new()),
    };
    SessionManager::new(&ClientConfig::default(), store).expect("session manager")
}

#[test]
fn starts_anonymous_with_empty_store() {
    let session = manager_with_tokens(None);
    assert!(!session.is_logged_in());
    assert!(session.current_token().is_none());
    assert!(session.current_user().is_none());
}

#[test]
fn restores_token_pair_without_principal() {
    let session = manager_with_tokens(Some(StoredTokens::new("T1", Some("R1".into()))));
    assert!(session.is_logged_in());
    assert_eq!(session.current_token().as_deref(), Some("T1"));
    // only the token pair survives a reload; the user record does not
    assert!(session.current_user().is_none());
}

#[test]
fn logout_clears_state_and_store_and_navigates_once() {
    let store = Arc::new(MemoryTokenStore::with_tokens(StoredTokens::new("T1", None)));
    let session =
        SessionManager::new(&ClientConfig::default(), store.clone()).expect("session manager");
    let nav = CountingNavigator::new();
    session.set_navigator(nav.clone());

    session.logout();
    assert!(!session.is_logged_in());
    assert!(session.current_token().is_none());
    assert!(store.load().is_none());
    assert_eq!(nav.count(), 1);
}

#[test]
fn logout_is_idempotent() {
    let session = manager_with_tokens(Some(StoredTokens::new("T1", None)));
    let nav = CountingNavigator::new();
    session.set_navigator(nav.clone());

    session.logout();
    session.logout();
    assert!(!session.is_logged_in());
    assert_eq!(nav.count(), 1);

    // logout while already anonymous is a complete no-op
    let anonymous = manager_with_tokens(None);
    let nav2 = CountingNavigator::new();
    anonymous.set_navigator(nav2.clone());
    anonymous.logout();
    assert_eq!(nav2.count(), 0);
}

#[test]
fn subscribers_hear_teardown() {
    let session = manager_with_tokens(Some(StoredTokens::new("T1", None)));
    let seen = Arc::new(AtomicUsize::new(0));
    let seen_in_cb = seen.clone();
    session.on_user_changed(move |principal| {
        assert!(principal.is_none());
        seen_in_cb.fetch_add(1, Ordering::SeqCst);
    });

    session.logout();
    assert_eq!(seen.load(Ordering::SeqCst), 1);
    session.logout();
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[test]
fn file_backed_session_survives_rebuild() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("session").join("tokens.json");

    let store = Arc::new(FileTokenStore::new(&path));
    store.save(&StoredTokens::new("T1", Some("R1".into())));

    let first = SessionManager::new(&ClientConfig::default(), store).expect("session manager");
    assert!(first.is_logged_in());

    // a second manager over the same file sees the same session
    let second = SessionManager::new(
        &ClientConfig::default(),
        Arc::new(FileTokenStore::new(&path)),
    )
    .expect("session manager");
    assert_eq!(second.current_token().as_deref(), Some("T1"));

    // teardown on one removes the persisted pair for the next
    second.logout();
    let third = SessionManager::new(
        &ClientConfig::default(),
        Arc::new(FileTokenStore::new(&path)),
    )
    .expect("session manager");
    assert!(!third.is_logged_in());
}

#[test]
fn rejects_invalid_base_url() {
    let cfg = ClientConfig::new("not a url");
    let err = SessionManager::new(&cfg, Arc::new(MemoryTokenStore::new()));
    assert!(err.is_err());
}
