//! Store bootstrap and connectivity check

use std::sync::Arc;

use crate::{error::AppResult, repository::CatalogStore};

#[derive(Clone)]
pub struct SetupService {
    repository: Arc<dyn CatalogStore>,
}

impl SetupService {
    pub fn new(repository: Arc<dyn CatalogStore>) -> Self {
        Self { repository }
    }

    /// Create missing tables and seed default categories.
    pub async fn bootstrap(&self) -> AppResult<()> {
        let seeded = self.repository.bootstrap().await?;
        if seeded > 0 {
            tracing::info!("Library schema ready, {} default categories added", seeded);
        } else {
            tracing::info!("Library schema ready");
        }
        Ok(())
    }

    /// Bootstrap, logging instead of propagating a failure so the caller
    /// can still reach the menu. Returns whether it succeeded.
    pub async fn bootstrap_or_report(&self) -> bool {
        match self.bootstrap().await {
            Ok(()) => true,
            Err(e) => {
                e.report("Library setup");
                false
            }
        }
    }

    /// Server version string
    pub async fn check_connection(&self) -> AppResult<String> {
        let version = self.repository.server_version().await?;
        tracing::info!("Connected to MySQL {}", version);
        Ok(version)
    }
}
