//! Repository layer for backing-service access and local persistence

pub mod auth;
pub mod books;
pub mod http;
pub mod storage;

use std::sync::Arc;

pub use auth::{AuthApi, AuthRepository};
pub use books::{BooksApi, BooksRepository};
pub use http::ApiClient;
pub use storage::{FileStore, KeyValueStore, MemoryStore, TOKEN_KEY};

use crate::{config::ApiConfig, error::AppResult};

/// Main repository struct holding the endpoint groups and credential storage
#[derive(Clone)]
pub struct Repository {
    pub auth: Arc<dyn AuthApi>,
    pub books: Arc<dyn BooksApi>,
    pub storage: Arc<dyn KeyValueStore>,
}

impl Repository {
    /// Create a repository talking HTTP to the configured service
    pub fn new(config: &ApiConfig, storage: Arc<dyn KeyValueStore>) -> AppResult<Self> {
        let client = ApiClient::new(config, storage.clone())?;
        Ok(Self::from_client(client, storage))
    }

    pub fn from_client(client: ApiClient, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            auth: Arc::new(AuthRepository::new(client.clone())),
            books: Arc::new(BooksRepository::new(client)),
            storage,
        }
    }

    /// Assemble from arbitrary endpoint implementations
    pub fn with_apis(
        auth: Arc<dyn AuthApi>,
        books: Arc<dyn BooksApi>,
        storage: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self { auth, books, storage }
    }
}
