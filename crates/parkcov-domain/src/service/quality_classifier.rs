//! Quality tier inference from supplier identifiers

use serde::{Deserialize, Serialize};

/// Substrings that mark an original-equipment supplier
const ORIGINAL_MARKERS: [&str; 2] = ["ORIGINAL", "OEM"];

/// Supplier codes and names treated as premium aftermarket
pub const PREMIUM_SUPPLIERS: [&str; 5] = ["1", "2", "BOSCH", "SKF", "VALEO"];

/// Supplier codes known to be economy lines.
///
/// Anything unrecognised is already standard, so this list is not consulted
/// by [`classify`]; it records which codes are standard on purpose.
pub const STANDARD_SUPPLIERS: [&str; 3] = ["3", "4", "GENERIC"];

/// Quality tier of a product listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QualityTier {
    Original,
    Premium,
    Standard,
}

impl QualityTier {
    pub fn label(&self) -> &'static str {
        match self {
            QualityTier::Original => "ORIGINAL",
            QualityTier::Premium => "PREMIUM",
            QualityTier::Standard => "STANDARD",
        }
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a supplier identifier. Total: every input maps to a tier.
pub fn classify(supplier: &str) -> QualityTier {
    let normalized = supplier.to_uppercase();

    if ORIGINAL_MARKERS.iter().any(|m| normalized.contains(m)) {
        return QualityTier::Original;
    }
    if PREMIUM_SUPPLIERS.contains(&normalized.as_str()) {
        return QualityTier::Premium;
    }
    QualityTier::Standard
}
