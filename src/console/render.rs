//! Plain-text rendering of catalog data for the console

use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{BookDetails, Category, LibraryStats, LoanDetails};

const RULE_WIDTH: usize = 72;

fn rule(c: char) -> String {
    std::iter::repeat(c).take(RULE_WIDTH).collect()
}

/// Heading followed by a rule
pub fn heading(title: &str) -> String {
    format!("\n{}\n{}", title, rule('-'))
}

pub fn books(books: &[BookDetails]) -> String {
    let mut out = format!("Books found: {}\n{}\n", books.len(), rule('-'));
    for book in books {
        let _ = writeln!(out, "  [{}] {}", book.id, book.title);
        let _ = writeln!(
            out,
            "      Author: {} | Status: {} | Category: {}",
            book.author,
            book.status,
            book.category_name.as_deref().unwrap_or("Uncategorized")
        );
        if let Some(isbn) = &book.isbn {
            let _ = writeln!(out, "      ISBN: {}", isbn);
        }
        if let Some(publisher) = &book.publisher {
            let _ = writeln!(out, "      Publisher: {}", publisher);
        }
        if let Some(year) = book.publication_year {
            let _ = writeln!(out, "      Year: {}", year);
        }
        if let Some(pages) = book.pages {
            let _ = writeln!(out, "      Pages: {}", pages);
        }
        if let Some(location) = &book.location {
            let _ = writeln!(out, "      Location: {}", location);
        }
        if let Some(notes) = &book.notes {
            let _ = writeln!(out, "      Notes: {}", notes);
        }
    }
    out
}

pub fn categories(categories: &[Category]) -> String {
    let mut out = format!("Categories: {}\n{}\n", categories.len(), rule('-'));
    for category in categories {
        let _ = writeln!(out, "  [{}] {}", category.id, category.name);
        if let Some(description) = &category.description {
            let _ = writeln!(out, "      {}", description);
        }
    }
    out
}

pub fn loans(loans: &[LoanDetails], today: NaiveDate) -> String {
    let mut out = format!("Loans found: {}\n{}\n", loans.len(), rule('-'));
    for loan in loans {
        let _ = writeln!(out, "  [{}] {} - {}", loan.id, loan.title, loan.author);
        let status = if loan.is_overdue(today) {
            format!("{} (overdue)", loan.status)
        } else {
            loan.status.to_string()
        };
        let _ = writeln!(
            out,
            "      Borrower: {} | Lent on: {} | Status: {}",
            loan.borrower, loan.loan_date, status
        );
        if let Some(due) = loan.expected_return_date {
            let _ = writeln!(out, "      Expected back: {}", due);
        }
        if let Some(returned) = loan.actual_return_date {
            let _ = writeln!(out, "      Returned on: {}", returned);
        }
        if let Some(notes) = &loan.notes {
            let _ = writeln!(out, "      Notes: {}", notes);
        }
    }
    out
}

pub fn stats(stats: &LibraryStats) -> String {
    let mut out = format!("LIBRARY STATISTICS\n{}\n", rule('='));
    let _ = writeln!(out, "Total books:      {}", stats.total_books);
    let _ = writeln!(out, "Total categories: {}", stats.total_categories);
    let _ = writeln!(out, "Active loans:     {}", stats.active_loans);
    let _ = writeln!(out, "Overdue loans:    {}", stats.overdue_loans);

    let _ = writeln!(out, "\nBooks by status:");
    for (status, count) in &stats.by_status {
        let _ = writeln!(out, "  {:<12} {}", status.to_string(), count);
    }

    let _ = writeln!(out, "\nBooks by category:");
    for entry in &stats.by_category {
        let _ = writeln!(out, "  {:<20} {}", entry.label, entry.value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{stats::complete_status_counts, BookStatus, LoanStatus, StatEntry};
    use chrono::{TimeZone, Utc};

    fn book(category: Option<&str>) -> BookDetails {
        BookDetails {
            id: 1,
            title: "Dune".into(),
            author: "Herbert".into(),
            isbn: Some("9780441013593".into()),
            publisher: None,
            publication_year: Some(1965),
            category_id: category.map(|_| 3),
            category_name: category.map(String::from),
            pages: None,
            status: BookStatus::Available,
            location: None,
            notes: None,
            registered_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_books_show_category_or_uncategorized() {
        let out = books(&[book(Some("Science"))]);
        assert!(out.starts_with("Books found: 1"));
        assert!(out.contains("[1] Dune"));
        assert!(out.contains("Category: Science"));
        assert!(out.contains("ISBN: 9780441013593"));
        assert!(out.contains("Year: 1965"));
        assert!(!out.contains("Publisher:"));

        assert!(books(&[book(None)]).contains("Category: Uncategorized"));
    }

    #[test]
    fn test_loans_flag_overdue() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let loan = LoanDetails {
            id: 9,
            book_id: 1,
            title: "Dune".into(),
            author: "Herbert".into(),
            borrower: "Ana".into(),
            loan_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            expected_return_date: NaiveDate::from_ymd_opt(2024, 2, 1),
            actual_return_date: None,
            status: LoanStatus::Loaned,
            notes: None,
        };
        let out = loans(&[loan], today);
        assert!(out.contains("Borrower: Ana | Lent on: 2024-01-01 | Status: Loaned (overdue)"));
        assert!(out.contains("Expected back: 2024-02-01"));
    }

    #[test]
    fn test_stats_lists_every_status() {
        let summary = LibraryStats {
            total_books: 2,
            total_categories: 6,
            active_loans: 1,
            overdue_loans: 0,
            by_status: complete_status_counts(&[(BookStatus::Loaned, 1), (BookStatus::Available, 1)]),
            by_category: vec![StatEntry {
                label: "Science".into(),
                value: 2,
            }],
        };
        let out = stats(&summary);
        assert!(out.contains("Total books:      2"));
        assert!(out.contains("In repair"));
        assert!(out.contains("Science"));
    }
}
