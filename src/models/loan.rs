//! Loan model and related types

use chrono::NaiveDate;
use sqlx::FromRow;
use validator::Validate;

use super::enums::LoanStatus;

/// Loan with the lent book's title and author, for display
#[derive(Debug, Clone, FromRow)]
pub struct LoanDetails {
    pub id: i32,
    pub book_id: i32,
    pub title: String,
    pub author: String,
    pub borrower: String,
    pub loan_date: NaiveDate,
    pub expected_return_date: Option<NaiveDate>,
    pub actual_return_date: Option<NaiveDate>,
    pub status: LoanStatus,
    pub notes: Option<String>,
}

impl LoanDetails {
    /// Still out and past its expected return date as of `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status.is_active()
            && self
                .expected_return_date
                .map(|due| due < today)
                .unwrap_or(false)
    }
}

/// Lend request
#[derive(Debug, Clone, Validate)]
pub struct NewLoan {
    pub book_id: i32,
    #[validate(length(min = 1, max = 100, message = "Borrower name is required (max 100 characters)"))]
    pub borrower: String,
    pub expected_return_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl NewLoan {
    pub fn new(book_id: i32, borrower: impl Into<String>) -> Self {
        Self {
            book_id,
            borrower: borrower.into(),
            expected_return_date: None,
            notes: None,
        }
    }
}

/// Which loans to list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoanFilter {
    #[default]
    All,
    /// Not yet returned
    Active,
    Returned,
    /// Not yet returned and past the expected return date
    Overdue,
}
