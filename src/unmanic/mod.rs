//! Unmanic integration: library catalog and pending task queue.

mod client;
mod types;

pub use client::{LibraryCatalogProvider, PendingTaskService, UnmanicClient};
pub use types::{FileTestResult, Library, LibraryCatalog, LibraryList};
