//! Catalog integration tests against a live MySQL server
//!
//! Every test creates its own rows with unique names so the suite can run
//! against a shared database.

mod common;

use chrono::{Duration, Local};
use home_library::{
    models::{
        category::DEFAULT_CATEGORIES, BookFilter, BookPatch, BookStatus, LoanFilter, LoanStatus,
        NewBook, NewCategory, NewLoan,
    },
    AppError,
};

use common::{add_book, repository, services, unique};

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_bootstrap_is_idempotent() {
    let services = services().await;
    services.setup.bootstrap().await.expect("Second bootstrap failed");

    let names: Vec<String> = services
        .catalog
        .list_categories()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    for (default, _) in DEFAULT_CATEGORIES {
        assert_eq!(names.iter().filter(|n| n == default).count(), 1, "{}", default);
    }
}

#[tokio::test]
#[ignore]
async fn test_second_bootstrap_adds_no_categories() {
    let repository = repository();
    repository.schema_bootstrap().await.expect("First bootstrap failed");

    let added = repository.schema_bootstrap().await.expect("Second bootstrap failed");
    assert_eq!(added, 0);
}

#[tokio::test]
#[ignore]
async fn test_server_version() {
    let services = services().await;
    let version = services.setup.check_connection().await.unwrap();
    assert!(!version.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_list_books_by_category() {
    let services = services().await;
    let suffix = unique();

    let category_id = services
        .catalog
        .add_category(NewCategory::new(format!("Science {}", suffix), None))
        .await
        .unwrap();

    let mut book = NewBook::new(format!("Dune {}", suffix), "Frank Herbert");
    book.category_id = Some(category_id);
    let book_id = services.catalog.add_book(book).await.unwrap();

    let books = services
        .catalog
        .list_books(BookFilter::category(category_id))
        .await
        .unwrap();

    assert_eq!(books.len(), 1);
    assert_eq!(books[0].id, book_id);
    assert_eq!(books[0].status, BookStatus::Available);
    assert_eq!(books[0].category_name.as_deref(), Some(format!("Science {}", suffix).as_str()));
}

#[tokio::test]
#[ignore]
async fn test_duplicate_category_is_conflict() {
    let services = services().await;
    let name = format!("Poetry {}", unique());

    services
        .catalog
        .add_category(NewCategory::new(name.clone(), None))
        .await
        .unwrap();
    let err = services
        .catalog
        .add_category(NewCategory::new(name, None))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
#[ignore]
async fn test_duplicate_isbn_is_conflict() {
    let services = services().await;
    let isbn = unique();

    let mut first = NewBook::new(format!("First {}", isbn), "Author");
    first.isbn = Some(isbn.clone());
    services.catalog.add_book(first).await.unwrap();

    let mut second = NewBook::new(format!("Second {}", isbn), "Author");
    second.isbn = Some(isbn);
    let err = services.catalog.add_book(second).await.unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
#[ignore]
async fn test_unknown_category_is_constraint_violation() {
    let services = services().await;

    let mut book = NewBook::new(format!("Orphan {}", unique()), "Author");
    book.category_id = Some(i32::MAX);
    let err = services.catalog.add_book(book).await.unwrap_err();

    assert!(matches!(err, AppError::Constraint(_)));
}

#[tokio::test]
#[ignore]
async fn test_search_matches_case_insensitively_and_literally() {
    let services = services().await;
    let suffix = unique();
    let title = format!("Half_Price 50% {}", suffix);
    let id = add_book(&services, &title).await;

    let found = services
        .catalog
        .search_books(&format!("half_price 50% {}", suffix))
        .await
        .unwrap();
    assert_eq!(found.iter().map(|b| b.id).collect::<Vec<_>>(), vec![id]);

    // '_' and '%' are not wildcards
    let none = services
        .catalog
        .search_books(&format!("Half-Price 50x {}", suffix))
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_lend_and_return_cycle() {
    let services = services().await;
    let book_id = add_book(&services, &format!("Cycle {}", unique())).await;

    let mut loan = NewLoan::new(book_id, "Ana");
    loan.expected_return_date = Some(Local::now().date_naive() + Duration::days(14));
    let loan_id = services.loans.lend_book(loan).await.unwrap();

    let book = services.catalog.get_book(book_id).await.unwrap();
    assert_eq!(book.status, BookStatus::Loaned);

    let returned = services.loans.return_book(book_id, None).await.unwrap();
    assert_eq!(returned, loan_id);

    let book = services.catalog.get_book(book_id).await.unwrap();
    assert_eq!(book.status, BookStatus::Available);

    let loans = services.loans.list_loans(LoanFilter::Returned).await.unwrap();
    let loan = loans.iter().find(|l| l.id == loan_id).expect("Returned loan not listed");
    assert_eq!(loan.status, LoanStatus::Returned);
    assert_eq!(loan.actual_return_date, Some(Local::now().date_naive()));

    // Nothing left to return
    let err = services.loans.return_book(book_id, None).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
}

#[tokio::test]
#[ignore]
async fn test_second_lend_is_rejected() {
    let services = services().await;
    let book_id = add_book(&services, &format!("Popular {}", unique())).await;

    services.loans.lend_book(NewLoan::new(book_id, "Ana")).await.unwrap();
    let err = services
        .loans
        .lend_book(NewLoan::new(book_id, "Leo"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));

    let active = services.loans.list_loans(LoanFilter::Active).await.unwrap();
    let open: Vec<_> = active.iter().filter(|l| l.book_id == book_id).collect();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].borrower, "Ana");
}

#[tokio::test]
#[ignore]
async fn test_concurrent_lends_leave_one_active_loan() {
    let services = services().await;
    let book_id = add_book(&services, &format!("Contested {}", unique())).await;

    let (first, second) = tokio::join!(
        services.loans.lend_book(NewLoan::new(book_id, "Ana")),
        services.loans.lend_book(NewLoan::new(book_id, "Leo")),
    );
    assert_eq!([first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count(), 1);

    let active = services.loans.list_loans(LoanFilter::Active).await.unwrap();
    assert_eq!(active.iter().filter(|l| l.book_id == book_id).count(), 1);
}

#[tokio::test]
#[ignore]
async fn test_lend_lost_book_is_rejected() {
    let services = services().await;
    let book_id = add_book(&services, &format!("Mislaid {}", unique())).await;

    let patch = BookPatch {
        status: Some(BookStatus::Lost),
        ..Default::default()
    };
    services.catalog.update_book(book_id, patch).await.unwrap();

    let err = services
        .loans
        .lend_book(NewLoan::new(book_id, "Ana"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
}

#[tokio::test]
#[ignore]
async fn test_lend_missing_book_is_not_found() {
    let services = services().await;
    let err = services
        .loans
        .lend_book(NewLoan::new(i32::MAX, "Ana"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
#[ignore]
async fn test_return_without_active_loan_changes_nothing() {
    let services = services().await;
    let book_id = add_book(&services, &format!("Idle {}", unique())).await;

    let err = services.loans.return_book(book_id, None).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));

    let book = services.catalog.get_book(book_id).await.unwrap();
    assert_eq!(book.status, BookStatus::Available);
}

#[tokio::test]
#[ignore]
async fn test_delete_book_cascades_to_loans() {
    let services = services().await;
    let book_id = add_book(&services, &format!("Doomed {}", unique())).await;
    services.loans.lend_book(NewLoan::new(book_id, "Ana")).await.unwrap();

    services.catalog.delete_book(book_id).await.unwrap();

    let loans = services.loans.list_loans(LoanFilter::All).await.unwrap();
    assert!(loans.iter().all(|l| l.book_id != book_id));

    let err = services.catalog.get_book(book_id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
#[ignore]
async fn test_delete_category_uncategorizes_books() {
    let services = services().await;
    let suffix = unique();

    let category_id = services
        .catalog
        .add_category(NewCategory::new(format!("Ephemeral {}", suffix), None))
        .await
        .unwrap();
    let mut book = NewBook::new(format!("Survivor {}", suffix), "Author");
    book.category_id = Some(category_id);
    let book_id = services.catalog.add_book(book).await.unwrap();

    services.catalog.delete_category(category_id).await.unwrap();

    let book = services.catalog.get_book(book_id).await.unwrap();
    assert_eq!(book.category_id, None);
    assert_eq!(book.category_name, None);
}

#[tokio::test]
#[ignore]
async fn test_update_errors_are_distinct() {
    let services = services().await;
    let book_id = add_book(&services, &format!("Stable {}", unique())).await;

    let err = services
        .catalog
        .update_book(book_id, BookPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NoFieldsSupplied));

    let patch = BookPatch {
        pages: Some(412),
        ..Default::default()
    };
    let err = services.catalog.update_book(i32::MAX, patch).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
#[ignore]
async fn test_update_changes_only_supplied_fields() {
    let services = services().await;
    let title = format!("Patched {}", unique());
    let book_id = add_book(&services, &title).await;

    let patch = BookPatch {
        location: Some("Shelf C".into()),
        pages: Some(412),
        ..Default::default()
    };
    services.catalog.update_book(book_id, patch).await.unwrap();

    // Re-applying the same values is still a successful update
    let patch = BookPatch {
        pages: Some(412),
        ..Default::default()
    };
    services.catalog.update_book(book_id, patch).await.unwrap();

    let book = services.catalog.get_book(book_id).await.unwrap();
    assert_eq!(book.title, title);
    assert_eq!(book.location.as_deref(), Some("Shelf C"));
    assert_eq!(book.pages, Some(412));
}

#[tokio::test]
#[ignore]
async fn test_stats_are_consistent() {
    let services = services().await;
    let suffix = unique();

    let category_id = services
        .catalog
        .add_category(NewCategory::new(format!("Counted {}", suffix), None))
        .await
        .unwrap();
    let mut book = NewBook::new(format!("Tallied {}", suffix), "Author");
    book.category_id = Some(category_id);
    services.catalog.add_book(book).await.unwrap();

    let stats = services.stats.get_stats().await.unwrap();

    assert_eq!(stats.by_status.len(), BookStatus::ALL.len());
    let per_status: i64 = stats.by_status.iter().map(|(_, n)| n).sum();
    assert_eq!(per_status, stats.total_books);
    assert!(stats.overdue_loans <= stats.active_loans);

    let entry = stats
        .by_category
        .iter()
        .find(|e| e.label == format!("Counted {}", suffix))
        .expect("Category missing from stats");
    assert_eq!(entry.value, 1);
}
