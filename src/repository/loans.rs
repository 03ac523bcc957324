//! Loans repository for database operations

use chrono::Local;

use super::{insert_id, Repository};
use crate::{
    error::{AppError, AppResult},
    models::{BookStatus, LoanDetails, LoanFilter, NewLoan},
};

/// Statuses of a loan that has not come back yet
const ACTIVE_LOAN: &str = "status IN ('Loaned', 'Overdue')";

impl Repository {
    /// Lend a book: insert the loan and flag the book as loaned, atomically.
    ///
    /// The book row is locked for the duration of the transaction, so two
    /// concurrent lends of the same book serialize and the second one sees
    /// `Loaned`.
    pub async fn loans_create(&self, loan: &NewLoan) -> AppResult<i32> {
        let today = Local::now().date_naive();
        let mut tx = self.pool.begin().await?;

        let (title, status) = sqlx::query_as::<_, (String, BookStatus)>(
            "SELECT title, status FROM books WHERE id = ? FOR UPDATE",
        )
        .bind(loan.book_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", loan.book_id)))?;

        if status != BookStatus::Available {
            return Err(AppError::InvalidState(format!(
                "'{}' is not available (status: {})",
                title, status
            )));
        }

        // A manual status edit can leave an open loan behind an Available book
        let already_borrowed: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM loans WHERE book_id = ? AND {}",
            ACTIVE_LOAN
        ))
        .bind(loan.book_id)
        .fetch_one(&mut *tx)
        .await?;

        if already_borrowed > 0 {
            return Err(AppError::InvalidState(format!(
                "'{}' already has an open loan",
                title
            )));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO loans (book_id, borrower, loan_date, expected_return_date, status, notes)
            VALUES (?, ?, ?, ?, 'Loaned', ?)
            "#,
        )
        .bind(loan.book_id)
        .bind(&loan.borrower)
        .bind(today)
        .bind(loan.expected_return_date)
        .bind(loan.notes.as_deref())
        .execute(&mut *tx)
        .await?;
        let loan_id = insert_id(&result)?;

        sqlx::query("UPDATE books SET status = 'Loaned' WHERE id = ?")
            .bind(loan.book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!("Book '{}' lent to {} (loan {})", title, loan.borrower, loan_id);
        Ok(loan_id)
    }

    /// Close the active loan of a book and make the book available again.
    ///
    /// Without `loan_id`, the most recent active loan is closed (latest
    /// loan date, then highest id).
    pub async fn loans_return(&self, book_id: i32, loan_id: Option<i32>) -> AppResult<i32> {
        let today = Local::now().date_naive();
        let mut tx = self.pool.begin().await?;

        sqlx::query_scalar::<_, i32>("SELECT id FROM books WHERE id = ? FOR UPDATE")
            .bind(book_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))?;

        let loan_id = match loan_id {
            Some(id) => sqlx::query_scalar::<_, i32>(&format!(
                "SELECT id FROM loans WHERE id = ? AND book_id = ? AND {} FOR UPDATE",
                ACTIVE_LOAN
            ))
            .bind(id)
            .bind(book_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                AppError::InvalidState(format!("Loan {} is not an open loan of book {}", id, book_id))
            })?,
            None => sqlx::query_scalar::<_, i32>(&format!(
                r#"
                SELECT id FROM loans
                WHERE book_id = ? AND {}
                ORDER BY loan_date DESC, id DESC
                LIMIT 1
                FOR UPDATE
                "#,
                ACTIVE_LOAN
            ))
            .bind(book_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::InvalidState(format!("No open loan for book {}", book_id)))?,
        };

        sqlx::query(
            "UPDATE loans SET status = 'Returned', actual_return_date = ? WHERE id = ?",
        )
        .bind(today)
        .bind(loan_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE books SET status = 'Available' WHERE id = ?")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!("Book {} returned (loan {})", book_id, loan_id);
        Ok(loan_id)
    }

    /// List loans, newest first, with book title and author
    pub async fn loans_list(&self, filter: LoanFilter) -> AppResult<Vec<LoanDetails>> {
        let condition = match filter {
            LoanFilter::All => "1=1".to_string(),
            LoanFilter::Active => format!("l.{}", ACTIVE_LOAN),
            LoanFilter::Returned => "l.status = 'Returned'".to_string(),
            LoanFilter::Overdue => format!("l.{} AND l.expected_return_date < ?", ACTIVE_LOAN),
        };

        let query = format!(
            r#"
            SELECT l.id, l.book_id, b.title, b.author, l.borrower, l.loan_date,
                   l.expected_return_date, l.actual_return_date, l.status, l.notes
            FROM loans l
            JOIN books b ON l.book_id = b.id
            WHERE {}
            ORDER BY l.loan_date DESC, l.id DESC
            "#,
            condition
        );

        let mut builder = sqlx::query_as::<_, LoanDetails>(&query);
        if filter == LoanFilter::Overdue {
            builder = builder.bind(Local::now().date_naive());
        }

        Ok(builder.fetch_all(&self.pool).await?)
    }
}
