//! Coverage statistics over the covered / uncovered partition

use serde::Serialize;

use crate::model::{FleetModel, PRIORITY_TIERS};

/// Coverage of one priority tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierCoverage {
    pub tier: String,
    pub total: usize,
    pub covered: usize,
    /// One decimal, e.g. "42.9"
    pub percentage: String,
}

/// Global coverage summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total_models: usize,
    pub covered_models: usize,
    pub uncovered_models: usize,
    /// One decimal, "0.0" for an empty fleet
    pub coverage_percentage: String,
    pub total_products: usize,
    /// In ladder order
    pub by_tier: Vec<TierCoverage>,
}

impl Stats {
    pub fn tier(&self, tier: &str) -> Option<&TierCoverage> {
        self.by_tier.iter().find(|t| t.tier == tier)
    }
}

/// `part / whole * 100` with one decimal, ties rounded up; "0.0" when `whole` is zero
pub fn format_percentage(part: usize, whole: usize) -> String {
    if whole == 0 {
        return "0.0".to_string();
    }
    let (part, whole) = (part as u128, whole as u128);
    // tenths of a percent, half-up in integer arithmetic
    let tenths = (part * 2000 + whole) / (2 * whole);
    format!("{}.{}", tenths / 10, tenths % 10)
}

pub fn compute_stats(
    full_fleet: &[FleetModel],
    covered: &[&FleetModel],
    uncovered: &[&FleetModel],
    product_count: usize,
) -> Stats {
    let total_models = full_fleet.len();

    let by_tier = PRIORITY_TIERS
        .iter()
        .map(|tier| {
            let total = full_fleet
                .iter()
                .filter(|m| m.priority_category == *tier)
                .count();
            let tier_covered = covered
                .iter()
                .filter(|m| m.priority_category == *tier)
                .count();
            TierCoverage {
                tier: tier.to_string(),
                total,
                covered: tier_covered,
                percentage: format_percentage(tier_covered, total),
            }
        })
        .collect();

    Stats {
        total_models,
        covered_models: covered.len(),
        uncovered_models: uncovered.len(),
        coverage_percentage: format_percentage(covered.len(), total_models),
        total_products: product_count,
        by_tier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelKey;

    fn model(id: i64, tier: &str) -> FleetModel {
        FleetModel {
            model_id: ModelKey::from(id),
            priority_category: tier.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(1, 3), "33.3");
        assert_eq!(format_percentage(2, 3), "66.7");
        assert_eq!(format_percentage(3, 3), "100.0");
        assert_eq!(format_percentage(0, 0), "0.0");
    }

    #[test]
    fn test_format_percentage_rounds_ties_up() {
        assert_eq!(format_percentage(1, 16), "6.3");
        assert_eq!(format_percentage(3, 16), "18.8");
        assert_eq!(format_percentage(5, 16), "31.3");
        assert_eq!(format_percentage(1, 80), "1.3");
        assert_eq!(format_percentage(1, 8), "12.5");
        assert_eq!(format_percentage(0, 16), "0.0");
    }

    #[test]
    fn test_sixteen_model_fleet_rounds_up() {
        let fleet: Vec<FleetModel> = (1..=16).map(|id| model(id, "AA")).collect();
        let covered = vec![&fleet[0]];
        let uncovered: Vec<&FleetModel> = fleet[1..].iter().collect();

        let stats = compute_stats(&fleet, &covered, &uncovered, 1);
        assert_eq!(stats.coverage_percentage, "6.3");
        assert_eq!(stats.tier("AA").unwrap().percentage, "6.3");
    }

    #[test]
    fn test_empty_fleet_is_zero() {
        let stats = compute_stats(&[], &[], &[], 0);
        assert_eq!(stats.total_models, 0);
        assert_eq!(stats.coverage_percentage, "0.0");
        assert_eq!(stats.by_tier.len(), PRIORITY_TIERS.len());
        for tier in &stats.by_tier {
            assert_eq!(tier.percentage, "0.0");
        }
    }

    #[test]
    fn test_tier_breakdown() {
        let fleet = vec![model(1, "AA"), model(2, "AA"), model(3, "B"), model(4, "X")];
        let covered = vec![&fleet[0], &fleet[2]];
        let uncovered = vec![&fleet[1], &fleet[3]];

        let stats = compute_stats(&fleet, &covered, &uncovered, 12);
        assert_eq!(stats.covered_models, 2);
        assert_eq!(stats.uncovered_models, 2);
        assert_eq!(stats.coverage_percentage, "50.0");
        assert_eq!(stats.total_products, 12);

        let aa = stats.tier("AA").unwrap();
        assert_eq!((aa.total, aa.covered, aa.percentage.as_str()), (2, 1, "50.0"));
        let b = stats.tier("B").unwrap();
        assert_eq!(b.percentage, "100.0");
        let a = stats.tier("A").unwrap();
        assert_eq!((a.total, a.percentage.as_str()), (0, "0.0"));
        assert!(stats.tier("X").is_none());
    }
}
