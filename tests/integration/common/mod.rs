//! Shared setup for the live MySQL test binaries
//!
//! Connection settings come from the usual configuration sources
//! (`config/`, `.env`, `DB_*` variables).

#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

use chrono::Utc;
use home_library::{models::NewBook, repository::Repository, services::Services, AppConfig, AppState};

static COUNTER: AtomicU32 = AtomicU32::new(0);

/// Suffix unique across tests and runs
pub fn unique() -> String {
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{}{:03}", nanos % 1_000_000_000_000, n % 1000)
}

pub fn config() -> AppConfig {
    dotenvy::dotenv().ok();
    AppConfig::load().expect("Failed to load configuration")
}

pub fn repository() -> Repository {
    Repository::connect_lazy(&config().database)
}

/// Services over a bootstrapped schema
pub async fn services() -> Arc<Services> {
    let state = AppState::new(config());
    state
        .services
        .setup
        .bootstrap()
        .await
        .expect("Failed to bootstrap schema");
    state.services.clone()
}

pub async fn add_book(services: &Services, title: &str) -> i32 {
    services
        .catalog
        .add_book(NewBook::new(title, "Test Author"))
        .await
        .expect("Failed to add book")
}
