//! Catalog synchronization with the backing service

use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
    repository::BooksApi,
};

/// Message recorded when a fetch fails without any description
pub const FETCH_FALLBACK: &str = "Failed to fetch books";

/// Client copy of the catalog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSnapshot {
    /// Books keyed by id, in service order
    pub books: IndexMap<String, Book>,
    pub loading: bool,
    /// Search term of the last fetch
    pub filter: Option<String>,
    /// Description of the last failed fetch
    pub error: Option<String>,
}

impl CatalogSnapshot {
    pub fn books(&self) -> Vec<Book> {
        self.books.values().cloned().collect()
    }

    pub fn get(&self, id: &str) -> Option<&Book> {
        self.books.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

#[derive(Clone)]
pub struct CatalogService {
    books: Arc<dyn BooksApi>,
    state: Arc<watch::Sender<CatalogSnapshot>>,
}

impl CatalogService {
    pub fn new(books: Arc<dyn BooksApi>) -> Self {
        let (state, _) = watch::channel(CatalogSnapshot::default());
        Self {
            books,
            state: Arc::new(state),
        }
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CatalogSnapshot> {
        self.state.subscribe()
    }

    pub fn changes(&self) -> WatchStream<CatalogSnapshot> {
        WatchStream::new(self.state.subscribe())
    }

    /// Drop the local copy, e.g. after logout
    pub fn clear(&self) {
        self.state.send_replace(CatalogSnapshot::default());
    }

    /// Replace the local copy with the service's books matching `filter`.
    ///
    /// On failure the local copy is emptied rather than left stale.
    pub async fn fetch_books(&self, filter: Option<&str>) -> AppResult<Vec<Book>> {
        let query = BookQuery::matching(filter);
        let term = query.title.clone();
        self.state.send_modify(|s| {
            s.loading = true;
            s.filter = term;
        });

        match self.books.list(&query).await {
            Ok(books) => {
                tracing::debug!("Fetched {} books", books.len());
                self.state.send_modify(|s| {
                    s.books = books.iter().map(|b| (b.id.clone(), b.clone())).collect();
                    s.loading = false;
                    s.error = None;
                });
                Ok(books)
            }
            Err(e) => {
                let e = e.into_fetch();
                tracing::warn!("Fetching books failed: {}", e);
                let description = e.describe_or(FETCH_FALLBACK);
                self.state.send_modify(|s| {
                    s.books.clear();
                    s.loading = false;
                    s.error = Some(description);
                });
                Err(e)
            }
        }
    }

    /// Create a book and place the service's copy in the local collection
    pub async fn add_book(&self, book: CreateBook) -> AppResult<Book> {
        if book.validate().is_err() {
            return Err(AppError::Validation("All fields are required".to_string()));
        }

        self.state.send_modify(|s| s.loading = true);
        let result = self.books.create(&book).await.map_err(AppError::into_mutation);
        self.state.send_modify(|s| {
            s.loading = false;
            if let Ok(created) = &result {
                s.books.insert(created.id.clone(), created.clone());
            }
        });

        let created = result?;
        tracing::info!("Added book {} ({})", created.id, created.title);
        Ok(created)
    }

    pub async fn update_book(&self, id: &str, changes: UpdateBook) -> AppResult<Book> {
        changes.validate()?;
        if changes.is_empty() {
            return Err(AppError::Validation("Nothing to update".to_string()));
        }

        let updated = self
            .books
            .update(id, &changes)
            .await
            .map_err(AppError::into_mutation)?;
        tracing::info!("Updated book {}", id);
        self.resync().await;
        Ok(updated)
    }

    /// Callers are expected to have confirmed the deletion with the user
    pub async fn delete_book(&self, id: &str) -> AppResult<()> {
        self.books.delete(id).await.map_err(AppError::into_mutation)?;
        tracing::info!("Deleted book {}", id);
        self.resync().await;
        Ok(())
    }

    /// Borrow for the current user. A book taken by someone else in the
    /// meantime fails with [`AppError::Conflict`]; it is never retried.
    pub async fn borrow_book(&self, id: &str) -> AppResult<Book> {
        let book = self.books.borrow(id).await.map_err(AppError::into_mutation)?;
        tracing::info!("Borrowed book {}", id);
        self.resync().await;
        Ok(book)
    }

    pub async fn return_book(&self, id: &str) -> AppResult<Book> {
        let book = self
            .books
            .return_book(id)
            .await
            .map_err(AppError::into_mutation)?;
        tracing::info!("Returned book {}", id);
        self.resync().await;
        Ok(book)
    }

    /// Full unfiltered refetch after a mutation. A failure is recorded in the
    /// snapshot and does not undo the mutation's result.
    async fn resync(&self) {
        if let Err(e) = self.fetch_books(None).await {
            tracing::warn!("Catalog resync failed: {}", e);
        }
    }
}
