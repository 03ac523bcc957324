//! Home Library
//!
//! Catalog of a personal book collection kept in MySQL: books, categories
//! and loans, driven from an interactive console menu.

use std::sync::Arc;

pub mod config;
pub mod console;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared by the console and the CLI commands
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Wire services over a lazily connecting MySQL pool.
    pub fn new(config: AppConfig) -> Self {
        let repository = repository::Repository::connect_lazy(&config.database);
        Self {
            config: Arc::new(config),
            services: Arc::new(services::Services::new(Arc::new(repository))),
        }
    }
}
