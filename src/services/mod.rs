//! Business logic services

pub mod catalog;
pub mod loans;
pub mod setup;
pub mod stats;

use std::sync::Arc;

use crate::repository::CatalogStore;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub stats: stats::StatsService,
    pub setup: setup::SetupService,
}

impl Services {
    /// Create all services over the given store
    pub fn new(repository: Arc<dyn CatalogStore>) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone()),
            stats: stats::StatsService::new(repository.clone()),
            setup: setup::SetupService::new(repository),
        }
    }
}
