//! Views over the raw product and fleet snapshots

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::model::{priority_rank, FleetModel, ProductRecord};

/// Distinct classification values found in the product snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DimensionValues {
    /// Ladder tiers first (AA, A, B, C), then the rest alphabetically
    pub dimension1: Vec<String>,
    /// Alphabetical
    pub dimension2: Vec<String>,
}

/// Collect the distinct, non-empty dimension values
pub fn detect_dimension_values<'a, I>(products: I) -> DimensionValues
where
    I: IntoIterator<Item = &'a ProductRecord>,
{
    let mut dim1 = BTreeSet::new();
    let mut dim2 = BTreeSet::new();

    for product in products {
        if !product.dimension1.is_empty() {
            dim1.insert(product.dimension1.as_str());
        }
        if !product.dimension2.is_empty() {
            dim2.insert(product.dimension2.as_str());
        }
    }

    let mut dimension1: Vec<String> = dim1.into_iter().map(str::to_string).collect();
    // BTreeSet already gave alphabetical order; the stable sort keeps it within a rank
    dimension1.sort_by_key(|v| priority_rank(v));

    DimensionValues {
        dimension1,
        dimension2: dim2.into_iter().map(str::to_string).collect(),
    }
}

/// Distinct non-empty brands in the fleet, sorted
pub fn available_brands(fleet: &[FleetModel]) -> Vec<String> {
    fleet
        .iter()
        .filter(|m| !m.brand.is_empty())
        .map(|m| m.brand.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Drop products whose supplier code numerically equals any excluded code.
///
/// Non-numeric excluded codes never match; the raw snapshot is untouched.
pub fn exclude_suppliers<'a>(
    products: &'a [ProductRecord],
    excluded: &[String],
) -> Vec<&'a ProductRecord> {
    let excluded: Vec<f64> = excluded
        .iter()
        .filter_map(|code| code.trim().parse::<f64>().ok())
        .collect();

    if excluded.is_empty() {
        return products.iter().collect();
    }

    let kept: Vec<&ProductRecord> = products
        .iter()
        .filter(|p| {
            p.supplier_number()
                .map_or(true, |n| !excluded.contains(&n))
        })
        .collect();

    debug!(
        excluded = products.len() - kept.len(),
        "filtered products by supplier"
    );
    kept
}
