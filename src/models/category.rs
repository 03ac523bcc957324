//! Category model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use validator::Validate;

/// Category record
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create category request
#[derive(Debug, Clone, Validate)]
pub struct NewCategory {
    #[validate(length(min = 1, max = 100, message = "Category name is required (max 100 characters)"))]
    pub name: String,
    pub description: Option<String>,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
        }
    }
}

/// Categories created on first start, inserted only when the name is absent.
pub const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("Fiction", "Novels and fiction literature"),
    ("Non-Fiction", "Informative and educational books"),
    ("Science", "Science and technology books"),
    ("History", "History books"),
    ("Biography", "Biographies and autobiographies"),
    ("Children's", "Books for children"),
];
