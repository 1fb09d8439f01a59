//! Transient user-facing notifications

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Pending,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Pending => "pending",
        };
        write!(f, "{}", label)
    }
}

/// The single active notification.
///
/// `id` identifies one `show` call; an expiry timer only clears the slot while
/// it still holds the notification it was scheduled for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            severity,
        }
    }
}
