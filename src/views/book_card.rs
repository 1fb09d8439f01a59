//! Per-book display state and the actions offered to the current user.
//!
//! These rules only decide what to show; the backing service re-checks every
//! request.

use std::fmt;

use crate::models::{book::Book, user::Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    InStock,
    BorrowedByYou,
    OutOfStock,
}

impl StockStatus {
    pub fn of(book: &Book, session: Option<&Session>) -> Self {
        if book.available {
            StockStatus::InStock
        } else if session.map_or(false, |s| book.is_borrowed_by(s.user_id())) {
            StockStatus::BorrowedByYou
        } else {
            StockStatus::OutOfStock
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StockStatus::InStock => "In Stock",
            StockStatus::BorrowedByYou => "Borrowed by You",
            StockStatus::OutOfStock => "Out of Stock",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookActions {
    pub borrow: bool,
    pub return_book: bool,
    pub edit: bool,
    pub delete: bool,
}

impl BookActions {
    pub fn for_book(book: &Book, session: Option<&Session>) -> Self {
        let Some(session) = session else {
            return Self::default();
        };
        let member = session.is_member();
        let admin = session.is_admin();
        Self {
            borrow: member && book.available,
            return_book: member && !book.available && book.is_borrowed_by(session.user_id()),
            edit: admin,
            delete: admin,
        }
    }
}

/// Everything needed to render one book
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookCard {
    pub book: Book,
    pub status: StockStatus,
    pub actions: BookActions,
}

impl BookCard {
    pub fn new(book: Book, session: Option<&Session>) -> Self {
        Self {
            status: StockStatus::of(&book, session),
            actions: BookActions::for_book(&book, session),
            book,
        }
    }
}
