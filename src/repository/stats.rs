//! Read-only aggregate queries

use chrono::Local;

use super::Repository;
use crate::{
    error::AppResult,
    models::{
        stats::{complete_status_counts, LibraryStats, StatEntry},
        BookStatus,
    },
};

impl Repository {
    /// Collect all library statistics. The queries share one read
    /// transaction so the counts come from the same InnoDB snapshot.
    pub async fn stats_collect(&self) -> AppResult<LibraryStats> {
        let today = Local::now().date_naive();
        let mut tx = self.pool.begin().await?;

        let total_books: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&mut *tx)
            .await?;

        let total_categories: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&mut *tx)
            .await?;

        let active_loans: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE status = 'Loaned'")
                .fetch_one(&mut *tx)
                .await?;

        let overdue_loans: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM loans
            WHERE status IN ('Loaned', 'Overdue') AND expected_return_date < ?
            "#,
        )
        .bind(today)
        .fetch_one(&mut *tx)
        .await?;

        let by_status = sqlx::query_as::<_, (BookStatus, i64)>(
            "SELECT status, COUNT(*) FROM books GROUP BY status",
        )
        .fetch_all(&mut *tx)
        .await?;

        let by_category = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT c.name, COUNT(b.id) AS value
            FROM categories c
            LEFT JOIN books b ON c.id = b.category_id
            GROUP BY c.id, c.name
            ORDER BY value DESC, c.name
            "#,
        )
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(|(label, value)| StatEntry { label, value })
        .collect();

        tx.commit().await?;

        Ok(LibraryStats {
            total_books,
            total_categories,
            active_loans,
            overdue_loans,
            by_status: complete_status_counts(&by_status),
            by_category,
        })
    }
}
