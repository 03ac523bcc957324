//! Data models for Home Library

pub mod book;
pub mod category;
pub mod enums;
pub mod loan;
pub mod stats;

// Re-export commonly used types
pub use book::{BookDetails, BookFilter, BookPatch, NewBook};
pub use category::{Category, NewCategory};
pub use enums::{BookStatus, LoanStatus};
pub use loan::{LoanDetails, LoanFilter, NewLoan};
pub use stats::{LibraryStats, StatEntry};
