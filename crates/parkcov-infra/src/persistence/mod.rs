//! Persistence implementations
//!
//! This module provides file-based implementations of the repository traits.

mod file_catalog_repo;

pub use file_catalog_repo::FileCatalogRepository;
