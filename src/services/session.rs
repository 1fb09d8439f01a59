//! Session store: the logged-in identity derived from the persisted credential

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{LoginRequest, RegisterRequest, Role, Session},
    repository::{AuthApi, KeyValueStore, TOKEN_KEY},
};

#[derive(Clone)]
pub struct SessionService {
    auth: Arc<dyn AuthApi>,
    storage: Arc<dyn KeyValueStore>,
    state: Arc<watch::Sender<Option<Session>>>,
}

impl SessionService {
    pub fn new(auth: Arc<dyn AuthApi>, storage: Arc<dyn KeyValueStore>) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            auth,
            storage,
            state: Arc::new(state),
        }
    }

    /// Current session, if any
    pub fn current(&self) -> Option<Session> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.state.subscribe()
    }

    /// Stream of session states, starting with the current one
    pub fn changes(&self) -> WatchStream<Option<Session>> {
        WatchStream::new(self.state.subscribe())
    }

    /// Rebuild the session from the stored credential.
    ///
    /// A missing, unreadable, undecodable or expired credential yields `None`;
    /// a bad credential is also removed from storage.
    pub fn restore_session(&self) -> Option<Session> {
        let token = match self.storage.get(TOKEN_KEY) {
            Ok(Some(token)) => token,
            Ok(None) => {
                self.state.send_replace(None);
                return None;
            }
            Err(e) => {
                tracing::warn!("Could not read stored credential: {}", e);
                self.state.send_replace(None);
                return None;
            }
        };

        let session = match Session::from_token(token) {
            Ok(session) if session.is_expired_at(Utc::now()) => {
                tracing::info!("Stored credential for {} has expired", session.username());
                None
            }
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!("Ignoring stored credential: {}", e);
                None
            }
        };

        if session.is_none() {
            self.discard_credential();
        } else {
            tracing::info!("Restored session for {}", session.as_ref().map_or("", |s| s.username()));
        }
        self.state.send_replace(session.clone());
        session
    }

    /// Authenticate, persist the returned credential and publish the session
    pub async fn login(&self, username: &str, password: &str) -> AppResult<Session> {
        let credentials = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self
            .auth
            .login(&credentials)
            .await
            .map_err(AppError::into_auth)?;

        let session = Session::from_token(response.token)?;
        self.storage.set(TOKEN_KEY, session.token())?;
        tracing::info!("Logged in as {} ({})", session.username(), session.role());

        self.state.send_replace(Some(session.clone()));
        Ok(session)
    }

    /// Create an account; does not log in
    pub async fn register(&self, username: &str, password: &str, role: Role) -> AppResult<()> {
        let registration = RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
            role,
        };
        registration.validate()?;

        self.auth
            .register(&registration)
            .await
            .map_err(AppError::into_auth)?;
        tracing::info!("Registered {} as {}", username, role);
        Ok(())
    }

    /// Forget the credential and the session
    pub fn logout(&self) {
        self.discard_credential();
        if let Some(session) = self.state.send_replace(None) {
            tracing::info!("Logged out {}", session.username());
        }
    }

    fn discard_credential(&self) {
        if let Err(e) = self.storage.remove(TOKEN_KEY) {
            tracing::warn!("Could not remove stored credential: {}", e);
        }
    }
}
