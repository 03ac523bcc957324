//! Statistics service

use std::sync::Arc;

use crate::{error::AppResult, models::LibraryStats, repository::CatalogStore};

#[derive(Clone)]
pub struct StatsService {
    repository: Arc<dyn CatalogStore>,
}

impl StatsService {
    pub fn new(repository: Arc<dyn CatalogStore>) -> Self {
        Self { repository }
    }

    /// Get library statistics
    pub async fn get_stats(&self) -> AppResult<LibraryStats> {
        self.repository.stats().await
    }
}
