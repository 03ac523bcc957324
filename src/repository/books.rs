//! Books repository for database operations

use super::{insert_id, Repository};
use crate::{
    error::{AppError, AppResult},
    models::{BookDetails, BookFilter, BookPatch, NewBook},
};

/// Book columns joined with the category name
const BOOK_SELECT: &str = r#"
    SELECT b.id, b.title, b.author, b.isbn, b.publisher, b.publication_year,
           b.category_id, c.name AS category_name, b.pages, b.status,
           b.location, b.notes, b.registered_at
    FROM books b
    LEFT JOIN categories c ON b.category_id = c.id
"#;

/// Lowercased `%term%` pattern with LIKE metacharacters escaped.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Columns touched by `patch`, in bind order.
pub fn patch_columns(patch: &BookPatch) -> Vec<&'static str> {
    let mut columns = Vec::new();

    macro_rules! add_field {
        ($field:expr, $name:expr) => {
            if $field.is_some() {
                columns.push($name);
            }
        };
    }

    add_field!(patch.title, "title");
    add_field!(patch.author, "author");
    add_field!(patch.isbn, "isbn");
    add_field!(patch.publisher, "publisher");
    add_field!(patch.publication_year, "publication_year");
    add_field!(patch.category_id, "category_id");
    add_field!(patch.pages, "pages");
    add_field!(patch.status, "status");
    add_field!(patch.location, "location");
    add_field!(patch.notes, "notes");

    columns
}

impl Repository {
    /// Insert a book and return its generated id
    pub async fn books_create(&self, book: &NewBook) -> AppResult<i32> {
        let result = sqlx::query(
            r#"
            INSERT INTO books (
                title, author, isbn, publisher, publication_year,
                category_id, pages, location, notes
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.isbn.as_deref())
        .bind(book.publisher.as_deref())
        .bind(book.publication_year)
        .bind(book.category_id)
        .bind(book.pages)
        .bind(book.location.as_deref())
        .bind(book.notes.as_deref())
        .execute(&self.pool)
        .await?;

        insert_id(&result)
    }

    /// Get book by ID
    pub async fn books_get(&self, id: i32) -> AppResult<BookDetails> {
        sqlx::query_as::<_, BookDetails>(&format!("{} WHERE b.id = ?", BOOK_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// List books ordered by title, optionally filtered by status and/or category
    pub async fn books_list(&self, filter: &BookFilter) -> AppResult<Vec<BookDetails>> {
        let mut query = format!("{} WHERE 1=1", BOOK_SELECT);
        if filter.status.is_some() {
            query.push_str(" AND b.status = ?");
        }
        if filter.category_id.is_some() {
            query.push_str(" AND b.category_id = ?");
        }
        query.push_str(" ORDER BY b.title, b.id");

        let mut builder = sqlx::query_as::<_, BookDetails>(&query);
        if let Some(status) = filter.status {
            builder = builder.bind(status.as_str());
        }
        if let Some(category_id) = filter.category_id {
            builder = builder.bind(category_id);
        }

        Ok(builder.fetch_all(&self.pool).await?)
    }

    /// Case-insensitive substring search over title, author and ISBN
    pub async fn books_search(&self, term: &str) -> AppResult<Vec<BookDetails>> {
        let pattern = like_pattern(term);

        let books = sqlx::query_as::<_, BookDetails>(&format!(
            r#"{}
            WHERE LOWER(b.title) LIKE ? OR LOWER(b.author) LIKE ? OR LOWER(b.isbn) LIKE ?
            ORDER BY b.title, b.id
            "#,
            BOOK_SELECT
        ))
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Write the `Some` fields of `patch`. The caller rejects empty patches.
    pub async fn books_update(&self, id: i32, patch: &BookPatch) -> AppResult<()> {
        let columns = patch_columns(patch);
        if columns.is_empty() {
            return Err(AppError::NoFieldsSupplied);
        }

        let mut tx = self.pool.begin().await?;

        // Lock the row so a concurrent delete cannot slip between check and write.
        sqlx::query_scalar::<_, i32>("SELECT id FROM books WHERE id = ? FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        let sets: Vec<String> = columns.iter().map(|c| format!("{} = ?", c)).collect();
        let query = format!("UPDATE books SET {} WHERE id = ?", sets.join(", "));

        let mut builder = sqlx::query(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(patch.title);
        bind_field!(patch.author);
        bind_field!(patch.isbn);
        bind_field!(patch.publisher);
        bind_field!(patch.publication_year);
        bind_field!(patch.category_id);
        bind_field!(patch.pages);
        if let Some(status) = patch.status {
            builder = builder.bind(status.as_str());
        }
        bind_field!(patch.location);
        bind_field!(patch.notes);

        builder.bind(id).execute(&mut *tx).await?;
        tx.commit().await?;

        Ok(())
    }

    /// Delete a book; its loans go with it (ON DELETE CASCADE)
    pub async fn books_delete(&self, id: i32) -> AppResult<String> {
        let mut tx = self.pool.begin().await?;

        let title = sqlx::query_scalar::<_, String>("SELECT title FROM books WHERE id = ? FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(title)
    }
}
