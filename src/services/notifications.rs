//! Notification channel: one transient, self-expiring message

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;
use uuid::Uuid;

use crate::models::notification::{Notification, Severity};

#[derive(Clone)]
pub struct NotificationService {
    state: Arc<watch::Sender<Option<Notification>>>,
    display: Duration,
    expiry: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl NotificationService {
    pub fn new(display: Duration) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            state: Arc::new(state),
            display,
            expiry: Arc::new(Mutex::new(None)),
        }
    }

    pub fn display_duration(&self) -> Duration {
        self.display
    }

    pub fn current(&self) -> Option<Notification> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.state.subscribe()
    }

    pub fn changes(&self) -> WatchStream<Option<Notification>> {
        WatchStream::new(self.state.subscribe())
    }

    /// Replace the current notification and restart the display window.
    ///
    /// Outside a tokio runtime the notification stays until [`hide`](Self::hide)
    /// or the next `show`.
    pub fn show(&self, message: impl Into<String>, severity: Severity) -> Uuid {
        let notification = Notification::new(message, severity);
        let id = notification.id;
        tracing::debug!("Notification [{}] {}", severity, notification.message);

        // Held until the new timer is stored so the newest notification owns it
        let mut expiry = self.expiry.lock();
        self.state.send_replace(Some(notification));

        let timer = match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let state = self.state.clone();
                let display = self.display;
                Some(handle.spawn(async move {
                    tokio::time::sleep(display).await;
                    clear_if_current(&state, id);
                }))
            }
            Err(_) => {
                tracing::debug!("No runtime available, notification {} will not expire", id);
                None
            }
        };

        if let Some(previous) = std::mem::replace(&mut *expiry, timer) {
            previous.abort();
        }
        id
    }

    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.show(message, Severity::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.show(message, Severity::Error)
    }

    pub fn pending(&self, message: impl Into<String>) -> Uuid {
        self.show(message, Severity::Pending)
    }

    /// Clear immediately; idempotent
    pub fn hide(&self) {
        let mut expiry = self.expiry.lock();
        if let Some(timer) = expiry.take() {
            timer.abort();
        }
        self.state.send_if_modified(|current| current.take().is_some());
    }
}

/// Clear the slot only while it still holds notification `id`
fn clear_if_current(state: &watch::Sender<Option<Notification>>, id: Uuid) -> bool {
    state.send_if_modified(|current| match current {
        Some(notification) if notification.id == id => {
            *current = None;
            true
        }
        _ => false,
    })
}
