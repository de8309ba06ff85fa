use super::store::MockCredentialStore;
use super::*;
use crate::event_bus::{
    ChannelObserver, DispatchPolicy, EventBus, EventBusError, FnObserver, ObserverError,
    USER_LOGGED_IN, USER_LOGIN_FAILED, USER_REGISTERED,
};
use crate::token::{SigningSecret, TokenError, TokenIssuer, TokenVerifier};
use std::sync::Arc;
use std::time::Duration;

fn authenticator_with(store: Arc<dyn CredentialStore>, bus: EventBus) -> Authenticator {
    let secret = Arc::new(SigningSecret::generate());
    let issuer = TokenIssuer::new(secret.clone(), Duration::from_secs(3600)).unwrap();
    let verifier = TokenVerifier::new(secret);
    Authenticator::new(store, issuer, verifier, bus)
}

fn authenticator() -> Authenticator {
    authenticator_with(Arc::new(InMemoryCredentialStore::new()), EventBus::default())
}

// ============================================================================
// Credential store
// ============================================================================

#[test]
fn test_store_register_and_verify() {
    let store = InMemoryCredentialStore::new();
    store.register("alice", "correct horse").unwrap();

    assert!(store.verify_password("alice", "correct horse").unwrap());
    assert!(!store.verify_password("alice", "battery staple").unwrap());
    assert!(!store.verify_password("nobody", "correct horse").unwrap());
    assert_eq!(store.user_count(), 1);
    assert!(store.created_at("alice").is_some());
}

#[test]
fn test_store_rejects_duplicates_and_empty_input() {
    let store = InMemoryCredentialStore::new();
    store.register("alice", "pw").unwrap();

    assert!(matches!(
        store.register("alice", "other"),
        Err(AuthError::UserExists(name)) if name == "alice"
    ));
    assert!(matches!(
        store.register("", "pw"),
        Err(AuthError::InvalidInput(_))
    ));
    assert!(matches!(
        store.register("bob", ""),
        Err(AuthError::InvalidInput(_))
    ));
}

// ============================================================================
// Authenticator
// ============================================================================

#[test]
fn test_register_login_authenticate() {
    let auth = authenticator();
    auth.register("alice", "pw").unwrap();

    let issued = auth.login("alice", "pw").unwrap();
    assert_eq!(issued.claims.sub, "alice");

    let verified = auth.authenticate(&issued.token).unwrap();
    assert_eq!(verified.subject, "alice");

    let with_scheme = format!("Bearer {}", issued.token);
    assert_eq!(auth.authenticate(&with_scheme).unwrap().subject, "alice");

    let lowercase = format!("bearer   {}", issued.token);
    assert_eq!(auth.authenticate(&lowercase).unwrap().subject, "alice");
}

#[test]
fn test_login_wrong_password() {
    let auth = authenticator();
    auth.register("alice", "pw").unwrap();

    let err = auth.login("alice", "nope").unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
    assert!(err.is_unauthenticated());
}

#[test]
fn test_authenticate_missing_and_garbage() {
    let auth = authenticator();

    assert!(matches!(
        auth.authenticate(""),
        Err(AuthError::MissingCredentials)
    ));
    for scheme_only in ["Bearer ", "Bearer", "bearer", "  BEARER\t "] {
        assert!(matches!(
            auth.authenticate(scheme_only),
            Err(AuthError::MissingCredentials)
        ));
    }

    let err = auth.authenticate("Bearer not.a.token").unwrap_err();
    assert!(matches!(err, AuthError::Token(TokenError::Malformed(_))));
    assert!(err.is_unauthenticated());
}

#[test]
fn test_token_from_other_deployment_rejected() {
    let ours = authenticator();
    let theirs = authenticator();
    theirs.register("alice", "pw").unwrap();
    let issued = theirs.login("alice", "pw").unwrap();

    assert!(matches!(
        ours.authenticate(&issued.token),
        Err(AuthError::Token(TokenError::InvalidSignature))
    ));
}

#[test]
fn test_login_uses_credential_store() {
    let mut store = MockCredentialStore::new();
    store
        .expect_verify_password()
        .times(1)
        .returning(|_, _| Ok(true));
    store.expect_register().never();

    let auth = authenticator_with(Arc::new(store), EventBus::default());
    let issued = auth.login("mocked", "whatever").unwrap();
    assert_eq!(issued.claims.sub, "mocked");
}

#[test]
fn test_store_errors_propagate() {
    let mut store = MockCredentialStore::new();
    store
        .expect_verify_password()
        .returning(|_, _| Err(AuthError::Internal("backend down".to_string())));

    let auth = authenticator_with(Arc::new(store), EventBus::default());
    let err = auth.login("alice", "pw").unwrap_err();
    assert!(matches!(err, AuthError::Internal(_)));
    assert!(!err.is_unauthenticated());
}

#[tokio::test]
async fn test_account_events_published() {
    let bus = EventBus::default();
    let (observer, mut rx) = ChannelObserver::channel();
    let observer = Arc::new(observer);
    bus.subscribe(USER_REGISTERED, &observer).unwrap();
    bus.subscribe(USER_LOGGED_IN, &observer).unwrap();
    bus.subscribe(USER_LOGIN_FAILED, &observer).unwrap();

    let auth = authenticator_with(Arc::new(InMemoryCredentialStore::new()), bus);
    auth.register("alice", "pw").unwrap();
    let _ = auth.login("alice", "wrong");
    let issued = auth.login("alice", "pw").unwrap();

    let registered = rx.recv().await.unwrap();
    assert_eq!(registered.event_type, USER_REGISTERED);
    assert_eq!(registered.payload["username"], "alice");

    let failed = rx.recv().await.unwrap();
    assert_eq!(failed.event_type, USER_LOGIN_FAILED);

    let logged_in = rx.recv().await.unwrap();
    assert_eq!(logged_in.event_type, USER_LOGGED_IN);
    assert_eq!(logged_in.payload["token_expires_at"], issued.claims.exp);
    // Tokens never travel on the bus
    assert!(!logged_in.payload.to_string().contains(&issued.token));
}

#[test]
fn test_stop_on_error_observer_fails_register() {
    let bus = EventBus::new(DispatchPolicy::StopOnError);
    let veto = Arc::new(FnObserver::new("veto", |_, _| {
        Err(ObserverError::new("welcome mail failed"))
    }));
    bus.subscribe(USER_REGISTERED, &veto).unwrap();

    let store = Arc::new(InMemoryCredentialStore::new());
    let auth = authenticator_with(store.clone(), bus);

    let err = auth.register("alice", "pw").unwrap_err();
    assert!(matches!(
        err,
        AuthError::Events(EventBusError::Observer { .. })
    ));
    // The account itself was still created
    assert_eq!(store.user_count(), 1);
}

#[test]
fn test_continue_on_error_observer_does_not_fail_login() {
    let bus = EventBus::new(DispatchPolicy::ContinueOnError);
    let broken = Arc::new(FnObserver::new("broken", |_, _| {
        Err(ObserverError::new("audit sink offline"))
    }));
    bus.subscribe(USER_LOGGED_IN, &broken).unwrap();

    let auth = authenticator_with(Arc::new(InMemoryCredentialStore::new()), bus);
    auth.register("alice", "pw").unwrap();
    assert!(auth.login("alice", "pw").is_ok());
}

#[test]
fn test_stop_on_error_keeps_rejected_login_unauthenticated() {
    let bus = EventBus::new(DispatchPolicy::StopOnError);
    let broken = Arc::new(FnObserver::new("lockout", |_, _| {
        Err(ObserverError::new("lockout service offline"))
    }));
    bus.subscribe(USER_LOGIN_FAILED, &broken).unwrap();

    let auth = authenticator_with(Arc::new(InMemoryCredentialStore::new()), bus);
    auth.register("alice", "pw").unwrap();

    let err = auth.login("alice", "wrong").unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
    assert!(err.is_unauthenticated());
}
