//! Schema bootstrap: tables and default categories

use super::Repository;
use crate::{error::AppResult, models::category::DEFAULT_CATEGORIES};

const CREATE_CATEGORIES: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id INT AUTO_INCREMENT PRIMARY KEY,
    name VARCHAR(100) NOT NULL UNIQUE,
    description TEXT,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
) ENGINE = InnoDB
"#;

const CREATE_BOOKS: &str = r#"
CREATE TABLE IF NOT EXISTS books (
    id INT AUTO_INCREMENT PRIMARY KEY,
    title VARCHAR(200) NOT NULL,
    author VARCHAR(200) NOT NULL,
    isbn VARCHAR(20) UNIQUE,
    publisher VARCHAR(100),
    publication_year INT,
    category_id INT,
    pages INT,
    status ENUM('Available', 'Loaned', 'Lost', 'InRepair') NOT NULL DEFAULT 'Available',
    location VARCHAR(100),
    notes TEXT,
    registered_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (category_id) REFERENCES categories(id) ON DELETE SET NULL,
    INDEX idx_books_title (title),
    INDEX idx_books_author (author),
    INDEX idx_books_status (status)
) ENGINE = InnoDB
"#;

const CREATE_LOANS: &str = r#"
CREATE TABLE IF NOT EXISTS loans (
    id INT AUTO_INCREMENT PRIMARY KEY,
    book_id INT NOT NULL,
    borrower VARCHAR(100) NOT NULL,
    loan_date DATE NOT NULL,
    expected_return_date DATE,
    actual_return_date DATE,
    status ENUM('Loaned', 'Returned', 'Overdue') NOT NULL DEFAULT 'Loaned',
    notes TEXT,
    FOREIGN KEY (book_id) REFERENCES books(id) ON DELETE CASCADE,
    INDEX idx_loans_borrower (borrower),
    INDEX idx_loans_status (status)
) ENGINE = InnoDB
"#;

/// Existing names are skipped and report 0 affected rows, so the sum of
/// affected rows is the number of categories actually added.
const SEED_CATEGORY: &str = "INSERT IGNORE INTO categories (name, description) VALUES (?, ?)";

/// Creation order respects foreign keys.
pub const TABLES: &[(&str, &str)] = &[
    ("categories", CREATE_CATEGORIES),
    ("books", CREATE_BOOKS),
    ("loans", CREATE_LOANS),
];

impl Repository {
    /// Create missing tables, then seed the default categories in one
    /// transaction. MySQL commits DDL implicitly, so only the seed rows are
    /// covered by the rollback.
    pub async fn schema_bootstrap(&self) -> AppResult<u64> {
        let mut conn = self.pool.acquire().await?;

        for (table, ddl) in TABLES {
            sqlx::query(ddl).execute(&mut *conn).await?;
            tracing::debug!("Table '{}' ready", table);
        }
        drop(conn);

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for (name, description) in DEFAULT_CATEGORIES {
            let result = sqlx::query(SEED_CATEGORY)
                .bind(*name)
                .bind(*description)
                .execute(&mut *tx)
                .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// `SELECT VERSION()`; doubles as a connectivity check.
    pub async fn schema_server_version(&self) -> AppResult<String> {
        let version: String = sqlx::query_scalar("SELECT VERSION()")
            .fetch_one(&self.pool)
            .await?;
        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_created_before_their_references() {
        let order: Vec<&str> = TABLES.iter().map(|(name, _)| *name).collect();
        assert_eq!(order, vec!["categories", "books", "loans"]);
    }

    #[test]
    fn test_referential_actions() {
        assert!(CREATE_BOOKS.contains("REFERENCES categories(id) ON DELETE SET NULL"));
        assert!(CREATE_LOANS.contains("REFERENCES books(id) ON DELETE CASCADE"));
    }

    #[test]
    fn test_seed_skips_existing_names_without_touching_them() {
        // An upsert would count matched rows as affected
        assert!(SEED_CATEGORY.starts_with("INSERT IGNORE"));
        assert!(!SEED_CATEGORY.contains("ON DUPLICATE KEY"));
    }

    #[test]
    fn test_ddl_is_idempotent() {
        for (_, ddl) in TABLES {
            assert!(ddl.trim_start().starts_with("CREATE TABLE IF NOT EXISTS"));
        }
    }
}
