//! Library statistics

use super::enums::BookStatus;

/// A labelled count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatEntry {
    pub label: String,
    pub value: i64,
}

#[derive(Debug, Clone)]
pub struct LibraryStats {
    pub total_books: i64,
    pub total_categories: i64,
    /// Loans with status `Loaned`
    pub active_loans: i64,
    /// Loans still out past their expected return date
    pub overdue_loans: i64,
    /// One entry per status, in `BookStatus::ALL` order, zeros included
    pub by_status: Vec<(BookStatus, i64)>,
    /// One entry per category, zeros included, largest first
    pub by_category: Vec<StatEntry>,
}

impl LibraryStats {
    pub fn books_with_status(&self, status: BookStatus) -> i64 {
        self.by_status
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}

/// Expand sparse `GROUP BY status` rows to every status.
pub fn complete_status_counts(rows: &[(BookStatus, i64)]) -> Vec<(BookStatus, i64)> {
    BookStatus::ALL
        .iter()
        .map(|status| {
            let n = rows
                .iter()
                .filter(|(s, _)| s == status)
                .map(|(_, n)| *n)
                .sum();
            (*status, n)
        })
        .collect()
}
