//! Fleet (vehicle park) model entry

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::model_key::ModelKey;

/// Priority tiers in ladder order, highest first
pub const PRIORITY_TIERS: [&str; 4] = ["AA", "A", "B", "C"];

/// Tier whose models the policy engine inspects by default
pub const TOP_PRIORITY_TIER: &str = "AA";

/// One vehicle model in the fleet registry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetModel {
    /// Join key against `ProductRecord::model_key`
    pub model_id: ModelKey,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model_name: String,
    /// Secondary model label (e.g. engine or body variant)
    #[serde(default)]
    pub model_name_alt: Option<String>,
    /// First production year
    #[serde(default)]
    pub year_from: Option<i32>,
    /// Last production year
    #[serde(default)]
    pub year_to: Option<i32>,
    /// Ordinal tier label (AA / A / B / C)
    #[serde(default)]
    pub priority_category: String,
    /// Units on the road
    #[serde(default)]
    pub fleet_size: Option<u64>,
    /// Display order within a brand
    #[serde(default)]
    pub sort_order: Option<i64>,
    /// Columns the loader did not recognise, kept verbatim
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

/// Rank of a priority tier in the ladder (unknown tiers sort after all known ones)
pub fn priority_rank(tier: &str) -> usize {
    PRIORITY_TIERS
        .iter()
        .position(|t| *t == tier)
        .unwrap_or(PRIORITY_TIERS.len())
}
