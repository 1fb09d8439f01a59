//! Book catalog endpoints

use async_trait::async_trait;
use reqwest::Method;

use crate::{
    error::AppResult,
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
    repository::http::ApiClient,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BooksApi: Send + Sync {
    /// `GET /books?title=&author=`
    async fn list(&self, query: &BookQuery) -> AppResult<Vec<Book>>;

    /// `POST /books`
    async fn create(&self, book: &CreateBook) -> AppResult<Book>;

    /// `PUT /books/:id`
    async fn update(&self, id: &str, changes: &UpdateBook) -> AppResult<Book>;

    /// `DELETE /books/:id`
    async fn delete(&self, id: &str) -> AppResult<()>;

    /// `PUT /books/:id/borrow`
    async fn borrow(&self, id: &str) -> AppResult<Book>;

    /// `PUT /books/:id/return`
    async fn return_book(&self, id: &str) -> AppResult<Book>;
}

#[derive(Clone)]
pub struct BooksRepository {
    client: ApiClient,
}

impl BooksRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BooksApi for BooksRepository {
    async fn list(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let request = self.client.request(Method::GET, &["books"]).query(query);
        // A `null` body is an empty catalog
        let books: Option<Vec<Book>> = self.client.send_json(request).await?;
        Ok(books.unwrap_or_default())
    }

    async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let request = self.client.request(Method::POST, &["books"]).json(book);
        self.client.send_json(request).await
    }

    async fn update(&self, id: &str, changes: &UpdateBook) -> AppResult<Book> {
        let request = self
            .client
            .request(Method::PUT, &["books", id])
            .json(changes);
        self.client.send_json(request).await
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let request = self.client.request(Method::DELETE, &["books", id]);
        self.client.send_empty(request).await
    }

    async fn borrow(&self, id: &str) -> AppResult<Book> {
        let request = self
            .client
            .request(Method::PUT, &["books", id, "borrow"]);
        self.client.send_json(request).await
    }

    async fn return_book(&self, id: &str) -> AppResult<Book> {
        let request = self
            .client
            .request(Method::PUT, &["books", id, "return"]);
        self.client.send_json(request).await
    }
}
