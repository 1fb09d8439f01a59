//! Client-side state services

pub mod catalog;
pub mod notifications;
pub mod session;

use std::time::Duration;

use crate::repository::Repository;

pub use catalog::{CatalogService, CatalogSnapshot};
pub use notifications::NotificationService;
pub use session::SessionService;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub session: SessionService,
    pub catalog: CatalogService,
    pub notifications: NotificationService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, notification_display: Duration) -> Self {
        Self {
            session: SessionService::new(repository.auth.clone(), repository.storage.clone()),
            catalog: CatalogService::new(repository.books.clone()),
            notifications: NotificationService::new(notification_display),
        }
    }
}
