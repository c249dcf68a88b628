//! Coverage of the whole fleet per dimension-1 value
//!
//! Unlike the pivot, which works on one loaded product snapshot, this view
//! takes the set of join keys per dimension-1 value for the entire catalog.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::{FleetModel, ModelId, PRIORITY_TIERS};

/// Tier slice of a dimension-1 coverage row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierShare {
    pub tier: String,
    pub total: usize,
    pub covered: usize,
    /// Whole percent
    pub percentage: u32,
}

/// Fleet coverage for one dimension-1 value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dimension1Coverage {
    pub dimension1: String,
    pub total_models: usize,
    pub covered_models: usize,
    pub uncovered_models: usize,
    /// Whole percent
    pub percentage: u32,
    pub by_tier: Vec<TierShare>,
}

/// Ordering for dashboard rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardSort {
    /// Dimension-1 name ascending
    #[default]
    Name,
    /// Percentage descending
    Percentage,
    /// Covered count descending
    Covered,
}

/// `part / whole * 100` rounded to a whole number; 0 when `whole` is zero
pub fn round_percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

fn is_covered(model: &FleetModel, keys: &BTreeSet<ModelId>) -> bool {
    model.model_id.id().is_some_and(|id| keys.contains(&id))
}

/// One row per dimension-1 value
pub fn global_coverage(
    fleet: &[FleetModel],
    keys_by_dimension1: &BTreeMap<String, BTreeSet<ModelId>>,
    sort: DashboardSort,
) -> Vec<Dimension1Coverage> {
    let total_models = fleet.len();

    let mut rows: Vec<Dimension1Coverage> = keys_by_dimension1
        .iter()
        .map(|(dimension1, keys)| {
            let covered_models = fleet.iter().filter(|m| is_covered(m, keys)).count();

            let by_tier = PRIORITY_TIERS
                .iter()
                .map(|tier| {
                    let in_tier: Vec<&FleetModel> = fleet
                        .iter()
                        .filter(|m| m.priority_category == *tier)
                        .collect();
                    let covered = in_tier.iter().filter(|m| is_covered(m, keys)).count();
                    TierShare {
                        tier: tier.to_string(),
                        total: in_tier.len(),
                        covered,
                        percentage: round_percentage(covered, in_tier.len()),
                    }
                })
                .collect();

            Dimension1Coverage {
                dimension1: dimension1.clone(),
                total_models,
                covered_models,
                uncovered_models: total_models - covered_models,
                percentage: round_percentage(covered_models, total_models),
                by_tier,
            }
        })
        .collect();

    match sort {
        DashboardSort::Name => rows.sort_by(|a, b| a.dimension1.cmp(&b.dimension1)),
        DashboardSort::Percentage => rows.sort_by(|a, b| b.percentage.cmp(&a.percentage)),
        DashboardSort::Covered => rows.sort_by(|a, b| b.covered_models.cmp(&a.covered_models)),
    }
    rows
}
