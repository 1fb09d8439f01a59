//! Login, registration and navbar logic

use crate::{
    models::user::{Role, Session},
    services::{NotificationService, Services, SessionService},
    views::messages,
};

#[derive(Clone)]
pub struct AuthView {
    session: SessionService,
    notifications: NotificationService,
}

impl AuthView {
    pub fn new(services: &Services) -> Self {
        Self {
            session: services.session.clone(),
            notifications: services.notifications.clone(),
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Option<Session> {
        match self.session.login(username, password).await {
            Ok(session) => {
                self.notifications.success(messages::LOGIN_SUCCESS);
                Some(session)
            }
            Err(e) => {
                tracing::debug!("Login failed: {}", e);
                self.notifications.error(e.user_message(messages::LOGIN_ERROR));
                None
            }
        }
    }

    pub async fn register(&self, username: &str, password: &str, role: Role) -> bool {
        match self.session.register(username, password, role).await {
            Ok(()) => {
                self.notifications.success(messages::REGISTER_SUCCESS);
                true
            }
            Err(e) => {
                tracing::debug!("Registration failed: {}", e);
                self.notifications.error(e.user_message(messages::REGISTER_ERROR));
                false
            }
        }
    }

    pub fn logout(&self) {
        self.session.logout();
    }
}

/// `"<role>: <username>"` for a logged-in user
pub fn navbar_label(session: Option<&Session>) -> Option<String> {
    session.map(|s| format!("{}: {}", s.role(), s.username()))
}
