//! End-to-end tests of the client against an in-process catalog service

mod catalog_sync;
mod page_flows;
mod session_store;

use std::sync::Arc;

use elidune_client::{
    repository::{KeyValueStore, MemoryStore, Repository},
    AppConfig, AppState,
};

use mock_service::MockService;

/// A client wired to `service` with its own credential storage
pub fn client_with(service: &MockService, storage: Arc<dyn KeyValueStore>) -> AppState {
    let mut config = AppConfig::default();
    config.api.base_url = service.base_url();
    config.api.timeout_seconds = 5;
    let repository = Repository::new(&config.api, storage).expect("Failed to build repository");
    AppState::with_repository(config, repository)
}

pub fn client(service: &MockService) -> AppState {
    client_with(service, Arc::new(MemoryStore::new()))
}

/// A client already logged in as `username`
pub async fn logged_in(service: &MockService, username: &str, password: &str) -> AppState {
    let state = client(service);
    state
        .services
        .session
        .login(username, password)
        .await
        .expect("Login failed");
    state
}
