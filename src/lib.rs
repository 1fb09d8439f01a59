//! Elidune Library Management Client
//!
//! Client-side core for the Elidune library catalog: the logged-in session
//! derived from the service's credential token, a synchronized copy of the
//! book catalog, and a single transient notification slot. The `views`
//! module holds the page logic that drives them.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod views;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use repository::{FileStore, KeyValueStore, Repository};
use services::Services;

/// Application state shared by every view
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<Services>,
}

impl AppState {
    /// Wire the HTTP repository and file-backed credential storage from `config`
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(config.storage.dir.clone()));
        let repository = Repository::new(&config.api, storage)?;
        Ok(Self::with_repository(config, repository))
    }

    pub fn with_repository(config: AppConfig, repository: Repository) -> Self {
        let services = Services::new(repository, config.notifications.display_duration());
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }
}
