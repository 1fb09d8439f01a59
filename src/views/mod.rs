//! Page logic: UI gating and the operation boundary where failures become notifications

pub mod auth;
pub mod book_card;
pub mod home;

pub use auth::{navbar_label, AuthView};
pub use book_card::{BookActions, BookCard, StockStatus};
pub use home::HomeView;

pub mod messages {
    pub const LOGIN_SUCCESS: &str = "Logged in successfully";
    pub const LOGIN_ERROR: &str = "Login error";
    pub const REGISTER_SUCCESS: &str = "Registered successfully. Please login.";
    pub const REGISTER_ERROR: &str = "Registration error";

    pub const FETCH_ERROR: &str = crate::services::catalog::FETCH_FALLBACK;
    pub const ADD_SUCCESS: &str = "Book added successfully";
    pub const ADD_ERROR: &str = "Error adding book";
    pub const UPDATE_SUCCESS: &str = "Book updated successfully";
    pub const UPDATE_ERROR: &str = "Error updating book";
    pub const DELETE_SUCCESS: &str = "Book deleted successfully";
    pub const DELETE_ERROR: &str = "Error deleting book";
    pub const DELETE_CONFIRM: &str = "Are you sure you want to delete this book?";
    pub const BORROW_PENDING: &str = "Borrowing...";
    pub const BORROW_SUCCESS: &str = "Book borrowed successfully";
    pub const BORROW_ERROR: &str = "Error borrowing";
    pub const RETURN_PENDING: &str = "Returning...";
    pub const RETURN_SUCCESS: &str = "Book returned successfully";
    pub const RETURN_ERROR: &str = "Error returning";

    pub const NOT_FOUND: &str = "Book not found";
    pub const NOT_PERMITTED: &str = "You are not allowed to do that";
    pub const LOGIN_REQUIRED: &str = "Please login to view books.";
    pub const NO_BOOKS: &str = "No books available.";
    pub const NO_RESULTS: &str = "Search result is not available";
}
