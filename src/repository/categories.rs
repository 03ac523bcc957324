//! Categories repository for database operations

use super::{insert_id, Repository};
use crate::{
    error::{AppError, AppResult},
    models::{Category, NewCategory},
};

impl Repository {
    /// Create a category; a duplicate name is a `Conflict`
    pub async fn categories_create(&self, category: &NewCategory) -> AppResult<i32> {
        let result = sqlx::query("INSERT INTO categories (name, description) VALUES (?, ?)")
            .bind(&category.name)
            .bind(category.description.as_deref())
            .execute(&self.pool)
            .await?;

        insert_id(&result)
    }

    /// List all categories ordered by name
    pub async fn categories_list(&self) -> AppResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, created_at FROM categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Delete a category. Books keep existing with no category (ON DELETE SET NULL).
    pub async fn categories_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Category {} not found", id)));
        }
        Ok(())
    }
}
