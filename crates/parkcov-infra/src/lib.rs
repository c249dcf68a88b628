//! Infrastructure layer - tabular loaders and persistence implementations

pub mod csv_loader;
pub mod persistence;
