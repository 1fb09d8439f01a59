//! Catalog page: search, admin editing, borrowing and returning

use tokio::task::JoinHandle;

use crate::{
    models::book::{Book, CreateBook, UpdateBook},
    services::{CatalogService, NotificationService, Services, SessionService},
    views::{
        book_card::{BookActions, BookCard},
        messages,
    },
};

#[derive(Clone)]
pub struct HomeView {
    session: SessionService,
    catalog: CatalogService,
    notifications: NotificationService,
}

impl HomeView {
    pub fn new(services: &Services) -> Self {
        Self {
            session: services.session.clone(),
            catalog: services.catalog.clone(),
            notifications: services.notifications.clone(),
        }
    }

    /// Keep the catalog in step with the session: fetch everything on login,
    /// drop the local copy on logout.
    pub fn follow_session(&self) -> JoinHandle<()> {
        let view = self.clone();
        let mut sessions = self.session.subscribe();
        tokio::spawn(async move {
            while sessions.changed().await.is_ok() {
                let signed_in = sessions.borrow_and_update().is_some();
                if signed_in {
                    view.refresh().await;
                } else {
                    view.catalog.clear();
                }
            }
        })
    }

    /// Cards for the current catalog, gated by the current session
    pub fn cards(&self) -> Vec<BookCard> {
        let session = self.session.current();
        self.catalog
            .snapshot()
            .books()
            .into_iter()
            .map(|book| BookCard::new(book, session.as_ref()))
            .collect()
    }

    /// Text to show instead of an empty list
    pub fn empty_message(&self) -> &'static str {
        if self.session.current().is_none() {
            messages::LOGIN_REQUIRED
        } else if self.catalog.snapshot().filter.is_some() {
            messages::NO_RESULTS
        } else {
            messages::NO_BOOKS
        }
    }

    /// Fetch the whole catalog
    pub async fn refresh(&self) -> bool {
        self.fetch(None).await
    }

    /// Search title or author; a blank query lists everything
    pub async fn search(&self, query: &str) -> bool {
        if query.trim().is_empty() {
            return self.refresh().await;
        }
        self.fetch(Some(query)).await
    }

    async fn fetch(&self, filter: Option<&str>) -> bool {
        if self.session.current().is_none() {
            self.catalog.clear();
            return false;
        }
        match self.catalog.fetch_books(filter).await {
            Ok(_) => true,
            Err(e) => {
                self.notifications.error(e.describe_or(messages::FETCH_ERROR));
                false
            }
        }
    }

    pub async fn add_book(&self, title: &str, author: &str, isbn: &str) -> Option<Book> {
        if !self.session.current().map_or(false, |s| s.is_admin()) {
            self.notifications.error(messages::NOT_PERMITTED);
            return None;
        }
        match self.catalog.add_book(CreateBook::new(title, author, isbn)).await {
            Ok(book) => {
                self.notifications.success(messages::ADD_SUCCESS);
                Some(book)
            }
            Err(e) => {
                self.notifications.error(e.user_message(messages::ADD_ERROR));
                None
            }
        }
    }

    pub async fn update_book(&self, id: &str, changes: UpdateBook) -> Option<Book> {
        self.permitted(id, |a| a.edit)?;
        match self.catalog.update_book(id, changes).await {
            Ok(book) => {
                self.notifications.success(messages::UPDATE_SUCCESS);
                self.report_resync();
                Some(book)
            }
            Err(e) => {
                self.notifications.error(e.user_message(messages::UPDATE_ERROR));
                None
            }
        }
    }

    /// Nothing is sent unless the user `confirmed` the deletion
    pub async fn delete_book(&self, id: &str, confirmed: bool) -> bool {
        if self.permitted(id, |a| a.delete).is_none() || !confirmed {
            return false;
        }
        match self.catalog.delete_book(id).await {
            Ok(()) => {
                self.notifications.success(messages::DELETE_SUCCESS);
                self.report_resync();
                true
            }
            Err(e) => {
                self.notifications.error(e.user_message(messages::DELETE_ERROR));
                false
            }
        }
    }

    pub async fn borrow(&self, id: &str) -> Option<Book> {
        self.permitted(id, |a| a.borrow)?;
        self.notifications.pending(messages::BORROW_PENDING);
        match self.catalog.borrow_book(id).await {
            Ok(book) => {
                self.notifications.success(messages::BORROW_SUCCESS);
                self.report_resync();
                Some(book)
            }
            Err(e) => {
                self.notifications.error(e.user_message(messages::BORROW_ERROR));
                None
            }
        }
    }

    pub async fn return_book(&self, id: &str) -> Option<Book> {
        self.permitted(id, |a| a.return_book)?;
        self.notifications.pending(messages::RETURN_PENDING);
        match self.catalog.return_book(id).await {
            Ok(book) => {
                self.notifications.success(messages::RETURN_SUCCESS);
                self.report_resync();
                Some(book)
            }
            Err(e) => {
                self.notifications.error(e.user_message(messages::RETURN_ERROR));
                None
            }
        }
    }

    /// The displayed book, if the current user may perform `action` on it
    fn permitted(&self, id: &str, action: impl Fn(&BookActions) -> bool) -> Option<Book> {
        let session = self.session.current();
        let Some(book) = self.catalog.snapshot().get(id).cloned() else {
            self.notifications.error(messages::NOT_FOUND);
            return None;
        };
        if !action(&BookActions::for_book(&book, session.as_ref())) {
            self.notifications.error(messages::NOT_PERMITTED);
            return None;
        }
        Some(book)
    }

    /// A failed post-mutation refetch replaces the success message
    fn report_resync(&self) {
        if let Some(error) = self.catalog.snapshot().error {
            self.notifications.error(error);
        }
    }
}
