//! Error types for the Elidune client

use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Failure reported by, or while reaching, the backing service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    /// HTTP status, absent for transport failures
    pub status: Option<StatusCode>,
    /// Message provided by the service in its error body
    pub message: Option<String>,
    /// Transport-level description, always present
    pub reason: String,
}

impl ServiceError {
    pub fn new(status: Option<StatusCode>, message: Option<String>, reason: impl Into<String>) -> Self {
        Self {
            status,
            message,
            reason: reason.into(),
        }
    }

    /// Build from a non-success response body, keeping the service message when there is one
    pub fn from_body(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(ErrorResponse::into_message);
        Self::new(Some(status), message, format!("service responded with {}", status))
    }

    pub fn is_conflict(&self) -> bool {
        self.status == Some(StatusCode::CONFLICT)
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}", message),
            None => write!(f, "{}", self.reason),
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        Self::new(e.status(), None, e.to_string())
    }
}

/// Error body returned by the backing service.
///
/// Elidune servers answer `{code, error, message}`, other backends only `{message}`
/// or `{error}`; every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub code: Option<u32>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorResponse {
    fn into_message(self) -> Option<String> {
        self.message
            .filter(|m| !m.is_empty())
            .or(self.error.filter(|e| !e.is_empty()))
    }
}

/// Main client error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Auth(ServiceError),

    #[error("Fetching books failed: {0}")]
    Fetch(ServiceError),

    #[error("Request rejected: {0}")]
    Mutation(ServiceError),

    #[error("Conflict: {0}")]
    Conflict(ServiceError),

    #[error("Invalid credential token: {0}")]
    Decode(String),

    #[error("{0}")]
    Validation(String),

    #[error("Service error: {0}")]
    Service(ServiceError),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Service(e.into())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .map(|e| match &e.message {
                Some(message) => message.to_string(),
                None => e.code.to_string(),
            })
            .collect();
        messages.sort();
        AppError::Validation(messages.join("; "))
    }
}

impl AppError {
    /// Message provided by the backing service, if any
    pub fn service_message(&self) -> Option<&str> {
        match self {
            AppError::Auth(e)
            | AppError::Fetch(e)
            | AppError::Mutation(e)
            | AppError::Conflict(e)
            | AppError::Service(e) => e.message.as_deref(),
            _ => None,
        }
    }

    /// Text shown to the user: the service message, a validation message, or `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            other => other
                .service_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
        }
    }

    /// Like [`AppError::user_message`] but prefers the transport description over `fallback`
    pub fn describe_or(&self, fallback: &str) -> String {
        if let Some(message) = self.service_message() {
            return message.to_string();
        }
        match self {
            AppError::Auth(e)
            | AppError::Fetch(e)
            | AppError::Mutation(e)
            | AppError::Conflict(e)
            | AppError::Service(e)
                if !e.reason.is_empty() =>
            {
                e.reason.clone()
            }
            AppError::Validation(msg) => msg.clone(),
            _ => fallback.to_string(),
        }
    }

    pub(crate) fn into_auth(self) -> Self {
        match self {
            AppError::Service(e) => AppError::Auth(e),
            other => other,
        }
    }

    pub(crate) fn into_fetch(self) -> Self {
        match self {
            AppError::Service(e) => AppError::Fetch(e),
            other => other,
        }
    }

    /// Classify a failed create/update/delete/borrow/return
    pub(crate) fn into_mutation(self) -> Self {
        match self {
            AppError::Service(e) if e.is_conflict() => AppError::Conflict(e),
            AppError::Service(e) => AppError::Mutation(e),
            other => other,
        }
    }
}

/// Result type alias for client operations
pub type AppResult<T> = Result<T, AppError>;
