//! Repository layer for database operations
//!
//! Every operation checks a connection out of the pool for its own duration
//! and hands it back on drop, whatever the exit path. Operations that write
//! more than one statement run inside a [`sqlx::Transaction`], which rolls
//! back when dropped without a commit.

pub mod books;
pub mod categories;
pub mod loans;
pub mod schema;
pub mod stats;

use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions, MySqlQueryResult};

use crate::{
    config::DatabaseConfig,
    error::{AppError, AppResult},
    models::{
        BookDetails, BookFilter, BookPatch, Category, LibraryStats, LoanDetails, LoanFilter,
        NewBook, NewCategory, NewLoan,
    },
};

/// Everything the services need from the relational store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Create missing tables and seed default categories; returns the
    /// number of categories inserted.
    async fn bootstrap(&self) -> AppResult<u64>;
    async fn server_version(&self) -> AppResult<String>;

    async fn books_create(&self, book: &NewBook) -> AppResult<i32>;
    async fn books_get(&self, id: i32) -> AppResult<BookDetails>;
    async fn books_list(&self, filter: &BookFilter) -> AppResult<Vec<BookDetails>>;
    async fn books_search(&self, term: &str) -> AppResult<Vec<BookDetails>>;
    async fn books_update(&self, id: i32, patch: &BookPatch) -> AppResult<()>;
    /// Returns the deleted book's title.
    async fn books_delete(&self, id: i32) -> AppResult<String>;

    async fn categories_create(&self, category: &NewCategory) -> AppResult<i32>;
    async fn categories_list(&self) -> AppResult<Vec<Category>>;
    async fn categories_delete(&self, id: i32) -> AppResult<()>;

    async fn loans_create(&self, loan: &NewLoan) -> AppResult<i32>;
    /// Returns the id of the loan that was closed.
    async fn loans_return(&self, book_id: i32, loan_id: Option<i32>) -> AppResult<i32>;
    async fn loans_list(&self, filter: LoanFilter) -> AppResult<Vec<LoanDetails>>;

    async fn stats(&self) -> AppResult<LibraryStats>;
}

/// MySQL-backed store
#[derive(Clone)]
pub struct Repository {
    pub pool: MySqlPool,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Build a pool that opens connections on first use, so an unreachable
    /// server surfaces as an operation error instead of a startup failure.
    pub fn connect_lazy(config: &DatabaseConfig) -> Self {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .min_connections(0)
            .connect_lazy_with(config.connect_options());
        Self::new(pool)
    }
}

/// Generated id of the row an INSERT just created.
pub(crate) fn insert_id(result: &MySqlQueryResult) -> AppResult<i32> {
    i32::try_from(result.last_insert_id())
        .map_err(|_| AppError::Internal(format!("Generated id {} out of range", result.last_insert_id())))
}

#[async_trait]
impl CatalogStore for Repository {
    async fn bootstrap(&self) -> AppResult<u64> {
        self.schema_bootstrap().await
    }

    async fn server_version(&self) -> AppResult<String> {
        self.schema_server_version().await
    }

    async fn books_create(&self, book: &NewBook) -> AppResult<i32> {
        Repository::books_create(self, book).await
    }

    async fn books_get(&self, id: i32) -> AppResult<BookDetails> {
        Repository::books_get(self, id).await
    }

    async fn books_list(&self, filter: &BookFilter) -> AppResult<Vec<BookDetails>> {
        Repository::books_list(self, filter).await
    }

    async fn books_search(&self, term: &str) -> AppResult<Vec<BookDetails>> {
        Repository::books_search(self, term).await
    }

    async fn books_update(&self, id: i32, patch: &BookPatch) -> AppResult<()> {
        Repository::books_update(self, id, patch).await
    }

    async fn books_delete(&self, id: i32) -> AppResult<String> {
        Repository::books_delete(self, id).await
    }

    async fn categories_create(&self, category: &NewCategory) -> AppResult<i32> {
        Repository::categories_create(self, category).await
    }

    async fn categories_list(&self) -> AppResult<Vec<Category>> {
        Repository::categories_list(self).await
    }

    async fn categories_delete(&self, id: i32) -> AppResult<()> {
        Repository::categories_delete(self, id).await
    }

    async fn loans_create(&self, loan: &NewLoan) -> AppResult<i32> {
        Repository::loans_create(self, loan).await
    }

    async fn loans_return(&self, book_id: i32, loan_id: Option<i32>) -> AppResult<i32> {
        Repository::loans_return(self, book_id, loan_id).await
    }

    async fn loans_list(&self, filter: LoanFilter) -> AppResult<Vec<LoanDetails>> {
        Repository::loans_list(self, filter).await
    }

    async fn stats(&self) -> AppResult<LibraryStats> {
        self.stats_collect().await
    }
}
