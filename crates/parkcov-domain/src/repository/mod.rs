//! Repository trait definitions for data persistence

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{FleetModel, ModelId, ProductRecord};
use parkcov_types::Error;

/// Persistent catalog of fleet models and products
pub trait CatalogRepository {
    /// Full fleet snapshot, ordered by display order
    fn fetch_fleet(&self) -> Result<Vec<FleetModel>, Error>;

    /// Distinct non-empty dimension-1 values, sorted
    fn fetch_dimension1_values(&self) -> Result<Vec<String>, Error>;

    /// Products filed under one dimension-1 value
    fn fetch_products_by_dimension1(&self, dimension1: &str) -> Result<Vec<ProductRecord>, Error>;

    /// Insert or replace fleet models by model id; returns how many were stored
    fn upsert_fleet(&self, models: &[FleetModel]) -> Result<usize, Error>;

    /// Delete every product whose dimension-1 value appears in the upload,
    /// then insert the upload; returns how many were stored
    fn replace_products(&self, products: &[ProductRecord]) -> Result<usize, Error>;

    /// Join keys present per dimension-1 value, across the whole catalog
    fn fetch_join_keys_by_dimension1(&self) -> Result<BTreeMap<String, BTreeSet<ModelId>>, Error>;
}
