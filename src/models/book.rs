//! Book model and related request types

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use validator::Validate;

use super::enums::BookStatus;

/// Book row joined with its category name
#[derive(Debug, Clone, FromRow)]
pub struct BookDetails {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub publication_year: Option<i32>,
    pub category_id: Option<i32>,
    /// `None` when the book is uncategorized
    pub category_name: Option<String>,
    pub pages: Option<i32>,
    pub status: BookStatus,
    /// Physical location (shelf, room...)
    pub location: Option<String>,
    pub notes: Option<String>,
    pub registered_at: DateTime<Utc>,
}

/// Create book request
#[derive(Debug, Clone, Default, Validate)]
pub struct NewBook {
    #[validate(length(min = 1, max = 200, message = "Title is required (max 200 characters)"))]
    pub title: String,
    #[validate(length(min = 1, max = 200, message = "Author is required (max 200 characters)"))]
    pub author: String,
    #[validate(length(max = 20, message = "ISBN must be at most 20 characters"))]
    pub isbn: Option<String>,
    #[validate(length(max = 100, message = "Publisher must be at most 100 characters"))]
    pub publisher: Option<String>,
    #[validate(range(min = 0, max = 9999, message = "Publication year must be between 0 and 9999"))]
    pub publication_year: Option<i32>,
    pub category_id: Option<i32>,
    #[validate(range(min = 1, message = "Page count must be positive"))]
    pub pages: Option<i32>,
    #[validate(length(max = 100, message = "Location must be at most 100 characters"))]
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl NewBook {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            ..Default::default()
        }
    }
}

/// Sparse book update. Only `Some` fields are written; the set of fields
/// here is the complete list of columns a caller may change.
#[derive(Debug, Clone, Default, Validate)]
pub struct BookPatch {
    #[validate(length(min = 1, max = 200, message = "Title cannot be empty (max 200 characters)"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 200, message = "Author cannot be empty (max 200 characters)"))]
    pub author: Option<String>,
    #[validate(length(max = 20, message = "ISBN must be at most 20 characters"))]
    pub isbn: Option<String>,
    #[validate(length(max = 100, message = "Publisher must be at most 100 characters"))]
    pub publisher: Option<String>,
    #[validate(range(min = 0, max = 9999, message = "Publication year must be between 0 and 9999"))]
    pub publication_year: Option<i32>,
    pub category_id: Option<i32>,
    #[validate(range(min = 1, message = "Page count must be positive"))]
    pub pages: Option<i32>,
    pub status: Option<BookStatus>,
    #[validate(length(max = 100, message = "Location must be at most 100 characters"))]
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl BookPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.isbn.is_none()
            && self.publisher.is_none()
            && self.publication_year.is_none()
            && self.category_id.is_none()
            && self.pages.is_none()
            && self.status.is_none()
            && self.location.is_none()
            && self.notes.is_none()
    }
}

/// Optional filters for listing books; all `None` lists everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub status: Option<BookStatus>,
    pub category_id: Option<i32>,
}

impl BookFilter {
    pub fn status(status: BookStatus) -> Self {
        Self {
            status: Some(status),
            category_id: None,
        }
    }

    pub fn category(category_id: i32) -> Self {
        Self {
            status: None,
            category_id: Some(category_id),
        }
    }
}
