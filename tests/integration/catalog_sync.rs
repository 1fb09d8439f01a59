use elidune_client::{
    models::{CreateBook, Role, UpdateBook},
    AppError,
};
use reqwest::StatusCode;

use crate::{client, logged_in, mock_service::MockService};

async fn service_with_accounts() -> (MockService, String, String) {
    let service = MockService::start().await;
    service.add_account("admin", "pw", Role::Admin).await;
    let alice = service.add_account("alice", "pw", Role::Member).await;
    let bob = service.add_account("bob", "pw", Role::Member).await;
    (service, alice, bob)
}

#[tokio::test]
async fn added_book_is_available_on_next_fetch() {
    let (service, _, _) = service_with_accounts().await;
    let admin = logged_in(&service, "admin", "pw").await;
    let catalog = &admin.services.catalog;

    let created = catalog.add_book(CreateBook::new("X", "Y", "123")).await.unwrap();
    assert_eq!(catalog.snapshot().get(&created.id), Some(&created));

    let books = catalog.fetch_books(None).await.unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title, "X");
    assert!(books[0].available);
    assert!(books[0].borrowed_by.is_none());
}

#[tokio::test]
async fn second_borrower_gets_conflict() {
    let (service, alice_id, _) = service_with_accounts().await;
    let admin = logged_in(&service, "admin", "pw").await;
    let book = admin
        .services
        .catalog
        .add_book(CreateBook::new("Dune", "Frank Herbert", "1"))
        .await
        .unwrap();

    let alice = logged_in(&service, "alice", "pw").await;
    alice.services.catalog.borrow_book(&book.id).await.unwrap();
    let seen = alice.services.catalog.snapshot();
    let borrowed = seen.get(&book.id).unwrap();
    assert!(!borrowed.available);
    assert_eq!(borrowed.borrowed_by.as_deref(), Some(alice_id.as_str()));

    let bob = logged_in(&service, "bob", "pw").await;
    let err = bob.services.catalog.borrow_book(&book.id).await.unwrap_err();
    match err {
        AppError::Conflict(e) => {
            assert_eq!(e.status, Some(StatusCode::CONFLICT));
            assert_eq!(e.message.as_deref(), Some("Book is not available"));
        }
        other => panic!("expected conflict, got {:?}", other),
    }
}

#[tokio::test]
async fn borrow_return_cycle_keeps_availability_consistent() {
    let (service, _, _) = service_with_accounts().await;
    let admin = logged_in(&service, "admin", "pw").await;
    let book = admin
        .services
        .catalog
        .add_book(CreateBook::new("Emma", "Jane Austen", "2"))
        .await
        .unwrap();

    let alice = logged_in(&service, "alice", "pw").await;
    let catalog = &alice.services.catalog;
    catalog.fetch_books(None).await.unwrap();
    assert!(catalog.snapshot().books().iter().all(|b| b.is_consistent()));

    catalog.borrow_book(&book.id).await.unwrap();
    assert!(catalog.snapshot().books().iter().all(|b| b.is_consistent()));

    let returned = catalog.return_book(&book.id).await.unwrap();
    assert!(returned.available);
    assert!(catalog.snapshot().books().iter().all(|b| b.is_consistent()));
    assert!(service.books().await.iter().all(|b| b.is_consistent()));
}

#[tokio::test]
async fn deleted_book_is_gone_after_refetch() {
    let (service, _, _) = service_with_accounts().await;
    let admin = logged_in(&service, "admin", "pw").await;
    let catalog = &admin.services.catalog;
    let keep = catalog.add_book(CreateBook::new("Keep", "A", "1")).await.unwrap();
    let gone = catalog.add_book(CreateBook::new("Gone", "B", "2")).await.unwrap();

    catalog.delete_book(&gone.id).await.unwrap();
    assert!(catalog.snapshot().get(&gone.id).is_none());

    let books = catalog.fetch_books(None).await.unwrap();
    assert_eq!(books.iter().map(|b| b.id.as_str()).collect::<Vec<_>>(), vec![keep.id.as_str()]);
}

#[tokio::test]
async fn blank_filter_matches_unfiltered_fetch() {
    let (service, _, _) = service_with_accounts().await;
    let admin = logged_in(&service, "admin", "pw").await;
    let catalog = &admin.services.catalog;
    catalog.add_book(CreateBook::new("Dune", "Frank Herbert", "1")).await.unwrap();
    catalog.add_book(CreateBook::new("Emma", "Jane Austen", "2")).await.unwrap();

    let all = catalog.fetch_books(None).await.unwrap();
    assert_eq!(catalog.fetch_books(Some("")).await.unwrap(), all);
    assert_eq!(catalog.fetch_books(Some("   ")).await.unwrap(), all);
    assert_eq!(all.len(), 2);

    let by_author = catalog.fetch_books(Some("austen")).await.unwrap();
    assert_eq!(by_author.len(), 1);
    assert_eq!(by_author[0].title, "Emma");
    assert_eq!(catalog.snapshot().filter.as_deref(), Some("austen"));
}

#[tokio::test]
async fn update_resyncs_with_service() {
    let (service, _, _) = service_with_accounts().await;
    let admin = logged_in(&service, "admin", "pw").await;
    let catalog = &admin.services.catalog;
    let book = catalog.add_book(CreateBook::new("Dune", "Frank", "1")).await.unwrap();

    let changes = UpdateBook {
        author: Some("Frank Herbert".to_string()),
        ..Default::default()
    };
    let updated = catalog.update_book(&book.id, changes).await.unwrap();
    assert_eq!(updated.author, "Frank Herbert");
    assert_eq!(updated.title, "Dune");
    assert_eq!(catalog.snapshot().get(&book.id), Some(&updated));
}

#[tokio::test]
async fn member_mutations_are_rejected_by_service() {
    let (service, _, _) = service_with_accounts().await;
    let alice = logged_in(&service, "alice", "pw").await;

    let err = alice
        .services
        .catalog
        .add_book(CreateBook::new("X", "Y", "1"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Mutation(ref e) if e.status == Some(StatusCode::FORBIDDEN)));
    assert_eq!(err.user_message("Error adding book"), "Access denied");
}

#[tokio::test]
async fn anonymous_fetch_fails_and_empties_the_list() {
    let (service, _, _) = service_with_accounts().await;
    let state = client(&service);
    let catalog = &state.services.catalog;

    let err = catalog.fetch_books(None).await.unwrap_err();
    assert!(matches!(err, AppError::Fetch(_)));

    let snapshot = catalog.snapshot();
    assert!(snapshot.is_empty());
    assert!(!snapshot.loading);
    assert_eq!(snapshot.error.as_deref(), Some("No token, authorization denied"));
}

#[tokio::test]
async fn ids_with_reserved_characters_address_only_that_book() {
    let (service, _, _) = service_with_accounts().await;
    let admin = logged_in(&service, "admin", "pw").await;
    let catalog = &admin.services.catalog;
    let book = catalog.add_book(CreateBook::new("Dune", "Frank Herbert", "1")).await.unwrap();

    for id in [format!("{}?x=1", book.id), format!("{}/borrow", book.id), format!("{}#x", book.id)] {
        let err = catalog.delete_book(&id).await.unwrap_err();
        assert!(
            matches!(err, AppError::Mutation(ref e) if e.status == Some(StatusCode::NOT_FOUND)),
            "{} -> {:?}",
            id,
            err
        );
    }
    assert_eq!(service.books().await, vec![book]);
}
