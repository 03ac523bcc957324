//! Statistics integration tests against a live MySQL server
//!
//! The assertions compare global counts, so this binary holds a single
//! test. Cargo runs test binaries one after another, which keeps the
//! catalog suite from changing the counts mid-test.

mod common;

use home_library::models::{BookStatus, NewLoan};

use common::{add_book, services, unique};

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_lend_and_return_move_the_counts() {
    let services = services().await;
    let book_id = add_book(&services, &format!("Dune {}", unique())).await;

    let before = services.stats.get_stats().await.unwrap();

    services.loans.lend_book(NewLoan::new(book_id, "Ana")).await.unwrap();
    let lent = services.stats.get_stats().await.unwrap();

    assert_eq!(lent.active_loans, before.active_loans + 1);
    assert_eq!(
        lent.books_with_status(BookStatus::Available),
        before.books_with_status(BookStatus::Available) - 1
    );
    assert_eq!(
        lent.books_with_status(BookStatus::Loaned),
        before.books_with_status(BookStatus::Loaned) + 1
    );
    assert_eq!(lent.total_books, before.total_books);

    services.loans.return_book(book_id, None).await.unwrap();
    let returned = services.stats.get_stats().await.unwrap();

    assert_eq!(returned.active_loans, lent.active_loans - 1);
    assert_eq!(
        returned.books_with_status(BookStatus::Available),
        lent.books_with_status(BookStatus::Available) + 1
    );
    assert_eq!(
        returned.books_with_status(BookStatus::Loaned),
        lent.books_with_status(BookStatus::Loaned) - 1
    );
    assert_eq!(returned.total_books, before.total_books);
}
