//! Property tests for the join, pivot, statistics and policy services

use parkcov_domain::model::{FleetModel, ModelKey, ProductRecord};
use parkcov_domain::service::{
    build_pivot, classify, compute_stats, detect_dimension_values, evaluate, partition,
    select_policy_targets, ColumnLayout, JoinIndex, PivotOptions, QualityTier,
};
use proptest::prelude::*;

fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => (0i64..12).prop_map(|n| n.to_string()),
        1 => (0i64..12).prop_map(|n| format!("{}.0", n)),
        1 => Just(String::new()),
        1 => Just("N/A".to_string()),
        1 => Just("3.5".to_string()),
    ]
}

fn arb_supplier() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("1".to_string()),
        Just("bosch".to_string()),
        Just("OEM".to_string()),
        Just("3".to_string()),
        "[A-Za-z0-9 ]{0,8}",
    ]
}

fn arb_product() -> impl Strategy<Value = ProductRecord> {
    (
        arb_key(),
        prop_oneof![Just("AA"), Just("A"), Just("B"), Just("FRENOS"), Just("A|B")],
        prop_oneof![Just("Filtros"), Just("Bujias"), Just("Correas"), Just("B|C"), Just("C")],
        arb_supplier(),
    )
        .prop_map(|(key, d1, d2, supplier)| ProductRecord {
            model_key: ModelKey::new(key),
            dimension1: d1.to_string(),
            dimension2: d2.to_string(),
            supplier_code: supplier,
            ..Default::default()
        })
}

fn arb_fleet_model() -> impl Strategy<Value = FleetModel> {
    (
        arb_key(),
        prop_oneof![Just("FIAT"), Just("VW"), Just("FORD")],
        prop_oneof![Just("AA"), Just("A"), Just("B"), Just("C"), Just("")],
        prop::option::of(1980i32..2025),
        prop::option::of(0i64..20),
    )
        .prop_map(|(key, brand, tier, year_to, order)| FleetModel {
            model_name: format!("MODEL {}", key),
            model_id: ModelKey::new(key),
            brand: brand.to_string(),
            priority_category: tier.to_string(),
            year_to,
            sort_order: order,
            ..Default::default()
        })
}

fn arb_layout() -> impl Strategy<Value = ColumnLayout> {
    (any::<bool>(), any::<bool>()).prop_map(|(show_dimension1, show_dimension2)| ColumnLayout {
        show_dimension1,
        show_dimension2,
    })
}

proptest! {
    #[test]
    fn partition_is_complete_and_disjoint(
        products in prop::collection::vec(arb_product(), 0..30),
        fleet in prop::collection::vec(arb_fleet_model(), 0..20),
    ) {
        let index = JoinIndex::build(&products);
        let parts = partition(&fleet, &index);

        prop_assert_eq!(parts.covered.len() + parts.uncovered.len(), fleet.len());
        for model in &parts.covered {
            prop_assert!(!index.products_for_model(model).is_empty());
        }
        for model in &parts.uncovered {
            prop_assert!(index.products_for_model(model).is_empty());
        }
        prop_assert_eq!(index.joined_product_count() + index.skipped(), products.len());
    }

    #[test]
    fn pivot_columns_conserve_products(
        products in prop::collection::vec(arb_product(), 0..30),
        fleet in prop::collection::vec(arb_fleet_model(), 0..20),
        layout in arb_layout(),
    ) {
        let index = JoinIndex::build(&products);
        let parts = partition(&fleet, &index);
        let dims = detect_dimension_values(&products);
        let options = PivotOptions { layout, ..Default::default() };
        let pivot = build_pivot(&parts.covered, &index, &dims, &options);

        for (_, row) in pivot.rows() {
            let sum: usize = (0..pivot.columns.len()).map(|i| row.count_at(i)).sum();
            prop_assert_eq!(sum, row.total);
            for cell in &row.cells {
                prop_assert_eq!(cell.details.len(), cell.count);
            }
            // every product's dimension values are columns, so nothing is lost
            prop_assert_eq!(row.total, index.products_for(row.model_id).len());
            prop_assert_eq!(row.cells.len(), pivot.columns.len());
        }
    }

    #[test]
    fn quality_mix_counts_every_joined_product(
        products in prop::collection::vec(arb_product(), 0..30),
        fleet in prop::collection::vec(arb_fleet_model(), 0..20),
    ) {
        let index = JoinIndex::build(&products);
        let targets: Vec<&FleetModel> = fleet.iter().collect();
        let findings = evaluate(&targets, &index);

        prop_assert_eq!(findings.len(), fleet.len());
        for finding in &findings {
            let joined = finding
                .model_id
                .id()
                .map_or(0, |id| index.products_for(id).len());
            prop_assert_eq!(finding.mix.total(), joined);
            prop_assert!(!finding.actions.is_empty());
        }
        for pair in findings.windows(2) {
            prop_assert!(pair[0].status >= pair[1].status);
        }
    }

    #[test]
    fn classify_is_total_and_case_insensitive(supplier in "[A-Za-z0-9 ]{0,12}") {
        let tier = classify(&supplier);
        prop_assert!(matches!(
            tier,
            QualityTier::Original | QualityTier::Premium | QualityTier::Standard
        ));
        prop_assert_eq!(classify(&supplier.to_lowercase()), classify(&supplier.to_uppercase()));
    }

    #[test]
    fn classify_accepts_any_unicode(supplier in any::<String>()) {
        let _ = classify(&supplier);
    }

    #[test]
    fn stats_percentages_stay_in_range(
        products in prop::collection::vec(arb_product(), 0..30),
        fleet in prop::collection::vec(arb_fleet_model(), 0..20),
    ) {
        let index = JoinIndex::build(&products);
        let parts = partition(&fleet, &index);
        let stats = compute_stats(&fleet, &parts.covered, &parts.uncovered, products.len());

        let overall: f64 = stats.coverage_percentage.parse().unwrap();
        prop_assert!((0.0..=100.0).contains(&overall));
        for tier in &stats.by_tier {
            let pct: f64 = tier.percentage.parse().unwrap();
            prop_assert!((0.0..=100.0).contains(&pct));
            prop_assert!(tier.covered <= tier.total);
        }
    }

    #[test]
    fn policy_targets_match_category(
        fleet in prop::collection::vec(arb_fleet_model(), 0..20),
    ) {
        let targets = select_policy_targets(&fleet, "AA");
        prop_assert!(targets.iter().all(|m| m.priority_category == "AA"));
        prop_assert_eq!(
            targets.len(),
            fleet.iter().filter(|m| m.priority_category == "AA").count()
        );
    }
}
