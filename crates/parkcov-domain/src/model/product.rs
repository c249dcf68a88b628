//! Parts-catalog entry

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::model_key::{lenient_string, ModelKey};

/// One product listing from the parts catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Fleet model this part fits (joins to `FleetModel::model_id`)
    pub model_key: ModelKey,
    /// Primary classification label (rubro)
    #[serde(default)]
    pub dimension1: String,
    /// Secondary classification label (sub-rubro)
    #[serde(default)]
    pub dimension2: String,
    /// Supplier name or code; drives quality-tier inference
    #[serde(default, deserialize_with = "lenient_string")]
    pub supplier_code: String,
    #[serde(default)]
    pub equivalence_code: String,
    #[serde(default)]
    pub part_number: String,
    #[serde(default)]
    pub brand_of_part: String,
    #[serde(default)]
    pub description: String,
    /// Columns the loader did not recognise, kept verbatim
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl ProductRecord {
    /// Supplier code read as a number, if it is one
    pub fn supplier_number(&self) -> Option<f64> {
        let trimmed = self.supplier_code.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
    }
}
