use std::sync::Arc;

use elidune_client::{
    models::Role,
    repository::{FileStore, KeyValueStore, MemoryStore, TOKEN_KEY},
    AppError,
};
use tempfile::TempDir;

use crate::{client, client_with, mock_service::MockService};

#[tokio::test]
async fn login_survives_reload() {
    let service = MockService::start().await;
    let admin_id = service.add_account("admin", "secret", Role::Admin).await;
    let dir = TempDir::new().unwrap();

    let first = client_with(&service, Arc::new(FileStore::new(dir.path())));
    let session = first.services.session.login("admin", "secret").await.unwrap();
    assert_eq!(session.user_id(), admin_id);
    assert!(session.is_admin());
    assert!(dir.path().join(TOKEN_KEY).exists());

    // Fresh process over the same storage
    let second = client_with(&service, Arc::new(FileStore::new(dir.path())));
    let restored = second.services.session.restore_session().unwrap();
    assert_eq!(restored, session);
    assert_eq!(second.services.session.current(), Some(session));
}

#[tokio::test]
async fn rejected_login_surfaces_service_message() {
    let service = MockService::start().await;
    service.add_account("ada", "right", Role::Member).await;
    let state = client(&service);

    let err = state.services.session.login("ada", "wrong").await.unwrap_err();
    match &err {
        AppError::Auth(e) => assert_eq!(e.message.as_deref(), Some("Invalid credentials")),
        other => panic!("expected auth error, got {:?}", other),
    }
    assert_eq!(err.user_message("Login error"), "Invalid credentials");
    assert!(state.services.session.current().is_none());
}

#[tokio::test]
async fn register_then_login_as_member() {
    let service = MockService::start().await;
    let state = client(&service);
    let session = &state.services.session;

    session.register("grace", "pw", Role::Member).await.unwrap();
    let err = session.register("grace", "pw", Role::Member).await.unwrap_err();
    assert_eq!(err.service_message(), Some("User already exists"));

    let user = session.login("grace", "pw").await.unwrap();
    assert!(user.is_member());
    assert_eq!(user.username(), "grace");
}

#[tokio::test]
async fn logout_forgets_the_credential() {
    let service = MockService::start().await;
    service.add_account("ada", "pw", Role::Member).await;
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

    let state = client_with(&service, storage.clone());
    state.services.session.login("ada", "pw").await.unwrap();
    state.services.session.logout();
    assert!(state.services.session.current().is_none());
    assert!(storage.get(TOKEN_KEY).unwrap().is_none());

    let reloaded = client_with(&service, storage);
    assert!(reloaded.services.session.restore_session().is_none());
}

#[tokio::test]
async fn expired_credential_is_discarded_on_restore() {
    let service = MockService::start().await;
    service.add_account("ada", "pw", Role::Member).await;
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    storage.set(TOKEN_KEY, &service.expired_token("ada").await).unwrap();

    let state = client_with(&service, storage.clone());
    assert!(state.services.session.restore_session().is_none());
    assert!(storage.get(TOKEN_KEY).unwrap().is_none());
}
