//! Catalog management service: books and categories

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{BookDetails, BookFilter, BookPatch, Category, NewBook, NewCategory},
    repository::CatalogStore,
};

/// Trim an optional text field; blank becomes `None`.
fn tidy(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(repository: Arc<dyn CatalogStore>) -> Self {
        Self { repository }
    }

    /// Add a book and return its id
    pub async fn add_book(&self, book: NewBook) -> AppResult<i32> {
        let book = NewBook {
            title: book.title.trim().to_string(),
            author: book.author.trim().to_string(),
            isbn: tidy(book.isbn),
            publisher: tidy(book.publisher),
            location: tidy(book.location),
            notes: tidy(book.notes),
            ..book
        };
        book.validate()?;

        let id = self.repository.books_create(&book).await?;
        tracing::info!("Book '{}' added (id {})", book.title, id);
        Ok(id)
    }

    /// Get book by ID
    pub async fn get_book(&self, id: i32) -> AppResult<BookDetails> {
        self.repository.books_get(id).await
    }

    /// List books ordered by title
    pub async fn list_books(&self, filter: BookFilter) -> AppResult<Vec<BookDetails>> {
        self.repository.books_list(&filter).await
    }

    /// Search title, author and ISBN for `term`
    pub async fn search_books(&self, term: &str) -> AppResult<Vec<BookDetails>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(AppError::Validation("Search term is required".to_string()));
        }
        self.repository.books_search(term).await
    }

    /// Apply a sparse update. An empty patch never reaches the store.
    pub async fn update_book(&self, id: i32, patch: BookPatch) -> AppResult<()> {
        if patch.is_empty() {
            return Err(AppError::NoFieldsSupplied);
        }
        patch.validate()?;

        self.repository.books_update(id, &patch).await?;
        tracing::info!("Book {} updated", id);
        Ok(())
    }

    /// Delete a book and, through the store, its loans. Returns the title.
    pub async fn delete_book(&self, id: i32) -> AppResult<String> {
        let title = self.repository.books_delete(id).await?;
        tracing::info!("Book '{}' (id {}) deleted", title, id);
        Ok(title)
    }

    /// Add a category and return its id
    pub async fn add_category(&self, category: NewCategory) -> AppResult<i32> {
        let category = NewCategory {
            name: category.name.trim().to_string(),
            description: tidy(category.description),
        };
        category.validate()?;

        let id = self.repository.categories_create(&category).await?;
        tracing::info!("Category '{}' added (id {})", category.name, id);
        Ok(id)
    }

    /// List categories ordered by name
    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.repository.categories_list().await
    }

    /// Delete a category; its books become uncategorized
    pub async fn delete_category(&self, id: i32) -> AppResult<()> {
        self.repository.categories_delete(id).await?;
        tracing::info!("Category {} deleted", id);
        Ok(())
    }
}
