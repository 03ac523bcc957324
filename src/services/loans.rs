//! Loan management service

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{LoanDetails, LoanFilter, NewLoan},
    repository::CatalogStore,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Arc<dyn CatalogStore>,
}

impl LoansService {
    pub fn new(repository: Arc<dyn CatalogStore>) -> Self {
        Self { repository }
    }

    /// Lend an available book. Returns the new loan id.
    pub async fn lend_book(&self, loan: NewLoan) -> AppResult<i32> {
        self.lend_book_on(loan, Local::now().date_naive()).await
    }

    async fn lend_book_on(&self, loan: NewLoan, today: NaiveDate) -> AppResult<i32> {
        let loan = NewLoan {
            borrower: loan.borrower.trim().to_string(),
            notes: loan.notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            ..loan
        };
        loan.validate()?;

        if let Some(due) = loan.expected_return_date {
            if due < today {
                return Err(AppError::Validation(format!(
                    "Expected return date {} is in the past",
                    due
                )));
            }
        }

        self.repository.loans_create(&loan).await
    }

    /// Return a book. Without `loan_id` the book's most recent open loan is closed.
    pub async fn return_book(&self, book_id: i32, loan_id: Option<i32>) -> AppResult<i32> {
        self.repository.loans_return(book_id, loan_id).await
    }

    /// List loans, newest first
    pub async fn list_loans(&self, filter: LoanFilter) -> AppResult<Vec<LoanDetails>> {
        self.repository.loans_list(filter).await
    }
}
