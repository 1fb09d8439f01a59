use std::time::Duration;

use elidune_client::{
    models::{Role, Severity},
    views::{messages, navbar_label, AuthView, HomeView, StockStatus},
};

use crate::{client, logged_in, mock_service::MockService};

#[tokio::test]
async fn admin_and_member_session() {
    let service = MockService::start().await;
    service.add_account("admin", "pw", Role::Admin).await;
    service.add_account("alice", "pw", Role::Member).await;

    let admin = logged_in(&service, "admin", "pw").await;
    let admin_home = HomeView::new(&admin.services);
    assert!(admin_home.refresh().await);
    assert_eq!(admin_home.empty_message(), messages::NO_BOOKS);

    let book = admin_home.add_book("Dune", "Frank Herbert", "1").await.unwrap();
    assert_eq!(admin.services.notifications.current().unwrap().message, messages::ADD_SUCCESS);
    let cards = admin_home.cards();
    assert_eq!(cards.len(), 1);
    assert!(cards[0].actions.edit && cards[0].actions.delete);
    assert!(!cards[0].actions.borrow);

    let member = client(&service);
    let auth = AuthView::new(&member.services);
    let session = auth.login("alice", "pw").await.unwrap();
    assert_eq!(navbar_label(Some(&session)).as_deref(), Some("Member: alice"));

    let home = HomeView::new(&member.services);
    assert!(home.refresh().await);
    assert!(home.cards()[0].actions.borrow);

    home.borrow(&book.id).await.unwrap();
    let note = member.services.notifications.current().unwrap();
    assert_eq!(note.message, messages::BORROW_SUCCESS);
    assert_eq!(note.severity, Severity::Success);
    let card = &home.cards()[0];
    assert_eq!(card.status, StockStatus::BorrowedByYou);
    assert!(card.actions.return_book);

    // The admin's copy is stale until it refetches
    assert!(admin_home.refresh().await);
    assert_eq!(admin_home.cards()[0].status, StockStatus::OutOfStock);

    home.return_book(&book.id).await.unwrap();
    assert_eq!(member.services.notifications.current().unwrap().message, messages::RETURN_SUCCESS);
    assert_eq!(home.cards()[0].status, StockStatus::InStock);

    assert!(admin_home.delete_book(&book.id, true).await);
    assert!(admin_home.cards().is_empty());
}

#[tokio::test]
async fn stale_borrow_shows_conflict_notification() {
    let service = MockService::start().await;
    service.add_account("admin", "pw", Role::Admin).await;
    service.add_account("alice", "pw", Role::Member).await;
    service.add_account("bob", "pw", Role::Member).await;

    let admin = logged_in(&service, "admin", "pw").await;
    let admin_home = HomeView::new(&admin.services);
    admin_home.refresh().await;
    let book = admin_home.add_book("Emma", "Jane Austen", "2").await.unwrap();

    let alice = logged_in(&service, "alice", "pw").await;
    let bob = logged_in(&service, "bob", "pw").await;
    let alice_home = HomeView::new(&alice.services);
    let bob_home = HomeView::new(&bob.services);
    alice_home.refresh().await;
    bob_home.refresh().await;

    alice_home.borrow(&book.id).await.unwrap();
    assert!(bob_home.borrow(&book.id).await.is_none());

    let note = bob.services.notifications.current().unwrap();
    assert_eq!(note.message, "Book is not available");
    assert_eq!(note.severity, Severity::Error);
}

#[tokio::test]
async fn home_follows_login_and_logout() {
    let service = MockService::start().await;
    service.add_account("admin", "pw", Role::Admin).await;
    service.add_account("alice", "pw", Role::Member).await;
    let admin = logged_in(&service, "admin", "pw").await;
    let admin_home = HomeView::new(&admin.services);
    admin_home.refresh().await;
    admin_home.add_book("Dune", "Frank Herbert", "1").await.unwrap();

    let state = client(&service);
    let home = HomeView::new(&state.services);
    let follower = home.follow_session();
    let mut snapshots = state.services.catalog.subscribe();

    AuthView::new(&state.services).login("alice", "pw").await.unwrap();
    tokio::time::timeout(
        Duration::from_secs(5),
        snapshots.wait_for(|s| !s.loading && s.books.len() == 1),
    )
    .await
    .expect("catalog was not fetched after login")
    .unwrap();

    AuthView::new(&state.services).logout();
    tokio::time::timeout(Duration::from_secs(5), snapshots.wait_for(|s| s.is_empty()))
        .await
        .expect("catalog was not cleared after logout")
        .unwrap();
    assert_eq!(home.empty_message(), messages::LOGIN_REQUIRED);

    follower.abort();
}
