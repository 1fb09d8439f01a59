//! Book (catalog entry) model and related request types

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Book as returned by the backing service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Server-assigned identifier
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub available: bool,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub borrowed_by: Option<String>,
}

impl Book {
    /// `available` must agree with the absence of a borrower
    pub fn is_consistent(&self) -> bool {
        self.available == self.borrowed_by.is_none()
    }

    pub fn is_borrowed_by(&self, user_id: &str) -> bool {
        self.borrowed_by.as_deref() == Some(user_id)
    }
}

/// Query string for `GET /books`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BookQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl BookQuery {
    /// Free-text search matched by the service against title or author.
    /// A missing or blank term yields the unfiltered query.
    pub fn matching(term: Option<&str>) -> Self {
        match term {
            Some(term) if !term.trim().is_empty() => Self {
                title: Some(term.to_string()),
                author: Some(term.to_string()),
            },
            _ => Self::default(),
        }
    }

    pub fn is_unfiltered(&self) -> bool {
        self.title.is_none() && self.author.is_none()
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Create book request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct CreateBook {
    #[validate(custom(function = "not_blank", message = "Title is required"))]
    pub title: String,
    #[validate(custom(function = "not_blank", message = "Author is required"))]
    pub author: String,
    #[validate(custom(function = "not_blank", message = "ISBN is required"))]
    pub isbn: String,
}

impl CreateBook {
    pub fn new(title: impl Into<String>, author: impl Into<String>, isbn: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
        }
    }
}

/// Update book request; absent fields are left untouched by the service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Validate)]
pub struct UpdateBook {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank", message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank", message = "Author cannot be empty"))]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank", message = "ISBN cannot be empty"))]
    pub isbn: Option<String>,
}

impl UpdateBook {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.isbn.is_none()
    }
}
