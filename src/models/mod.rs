//! Data models for the Elidune client

pub mod book;
pub mod notification;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookQuery, CreateBook, UpdateBook};
pub use notification::{Notification, Severity};
pub use user::{LoginRequest, RegisterRequest, Role, Session, TokenResponse, UserClaims};
