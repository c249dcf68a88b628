//! Product ↔ fleet join on the numeric model identifier

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::model::{FleetModel, ModelId, ProductRecord};

/// Lookup from model id to the products listed for it.
///
/// Every key has at least one product. Products whose key does not parse
/// are left out of the index (they stay in whatever raw listing they came
/// from) and counted in [`JoinIndex::skipped`].
#[derive(Debug, Default)]
pub struct JoinIndex<'a> {
    by_model: BTreeMap<ModelId, Vec<&'a ProductRecord>>,
    skipped: usize,
}

impl<'a> JoinIndex<'a> {
    /// Index products by their parsed model key
    pub fn build<I>(products: I) -> Self
    where
        I: IntoIterator<Item = &'a ProductRecord>,
    {
        let mut by_model: BTreeMap<ModelId, Vec<&'a ProductRecord>> = BTreeMap::new();
        let mut skipped = 0;

        for product in products {
            match product.model_key.id() {
                Some(id) => by_model.entry(id).or_default().push(product),
                None => {
                    debug!(key = %product.model_key, "product key is not numeric, left out of join");
                    skipped += 1;
                }
            }
        }

        Self { by_model, skipped }
    }

    /// Products joined to a model (empty when the model is uncovered)
    pub fn products_for(&self, id: ModelId) -> &[&'a ProductRecord] {
        self.by_model.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Products joined to a fleet model, by its raw key
    pub fn products_for_model(&self, model: &FleetModel) -> &[&'a ProductRecord] {
        model
            .model_id
            .id()
            .map(|id| self.products_for(id))
            .unwrap_or(&[])
    }

    pub fn is_covered(&self, id: ModelId) -> bool {
        self.by_model.contains_key(&id)
    }

    /// Distinct model ids with at least one product, ascending
    pub fn covered_ids(&self) -> impl Iterator<Item = ModelId> + '_ {
        self.by_model.keys().copied()
    }

    /// Number of distinct covered ids
    pub fn len(&self) -> usize {
        self.by_model.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_model.is_empty()
    }

    /// Products dropped because their key did not parse
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Products that made it into the index
    pub fn joined_product_count(&self) -> usize {
        self.by_model.values().map(Vec::len).sum()
    }
}

/// Fleet split by whether any product joins to each model
#[derive(Debug, Clone, Default, Serialize)]
pub struct Partition<'a> {
    pub covered: Vec<&'a FleetModel>,
    pub uncovered: Vec<&'a FleetModel>,
}

impl Partition<'_> {
    pub fn total(&self) -> usize {
        self.covered.len() + self.uncovered.len()
    }
}

/// Split the fleet into covered / uncovered, preserving input order.
///
/// A model whose own id does not parse can never match and lands in
/// `uncovered`.
pub fn partition<'a>(fleet: &'a [FleetModel], index: &JoinIndex<'_>) -> Partition<'a> {
    let (covered, uncovered): (Vec<&FleetModel>, Vec<&FleetModel>) = fleet
        .iter()
        .partition(|model| model.model_id.id().is_some_and(|id| index.is_covered(id)));

    Partition { covered, uncovered }
}
