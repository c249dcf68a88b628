//! Analysis Service - coverage and policy use case
//!
//! One run takes an immutable snapshot of products and fleet plus an
//! explicit options value, and derives everything from scratch:
//! 1. Drop excluded suppliers from the analysed products
//! 2. Detect dimension values and build the join index
//! 3. Partition the fleet into covered / uncovered
//! 4. Build the pivot and the statistics
//! 5. Evaluate the policy rules over the target category

use std::path::Path;

use parkcov_domain::model::{FleetModel, ProductRecord};
use parkcov_domain::repository::CatalogRepository;
use parkcov_domain::service::{
    build_pivot, compute_stats, detect_dimension_values, evaluate, exclude_suppliers,
    global_coverage, partition, select_policy_targets, ColumnLayout, DashboardSort,
    Dimension1Coverage, DimensionValues, Filter, JoinIndex, Partition, Pivot, PivotOptions,
    PolicyFinding, Stats,
};
use parkcov_infra::csv_loader;
use parkcov_types::{Error, Result};
use tracing::{debug, info};

use crate::config::Config;

/// Point-in-time copy of the two input datasets
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub products: Vec<ProductRecord>,
    pub fleet: Vec<FleetModel>,
}

impl Snapshot {
    pub fn new(products: Vec<ProductRecord>, fleet: Vec<FleetModel>) -> Self {
        Self { products, fleet }
    }

    /// Load both datasets from CSV exports
    pub fn from_csv(products_path: &Path, fleet_path: &Path) -> Result<Self> {
        for path in [products_path, fleet_path] {
            if !path.exists() {
                return Err(Error::FileNotFound(path.display().to_string()));
            }
        }
        let products = csv_loader::load_products(products_path)?;
        let fleet = csv_loader::load_fleet(fleet_path)?;
        Ok(Self { products, fleet })
    }

    /// Read the fleet and one dimension-1 slice of products from the catalog
    pub fn from_repository<R: CatalogRepository + ?Sized>(repo: &R, dimension1: &str) -> Result<Self> {
        let products = repo.fetch_products_by_dimension1(dimension1)?;
        if products.is_empty() {
            return Err(Error::InvalidInput(format!(
                "no products stored for '{}'",
                dimension1
            )));
        }
        let fleet = repo.fetch_fleet()?;
        Ok(Self { products, fleet })
    }
}

/// Options for one analysis run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    /// Column layout and category / brand filters for the pivot
    pub pivot: PivotOptions,

    /// Supplier codes dropped before indexing
    pub excluded_suppliers: Vec<String>,

    /// Priority category the policy engine inspects
    pub policy_category: String,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl AnalysisOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            pivot: PivotOptions {
                layout: ColumnLayout {
                    show_dimension1: config.show_dimension1,
                    show_dimension2: config.show_dimension2,
                },
                category: Filter::All,
                brand: Filter::All,
            },
            excluded_suppliers: config.excluded_suppliers.clone(),
            policy_category: config.policy_category.clone(),
        }
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.pivot.category = Filter::from(category);
        self
    }

    pub fn with_brand(mut self, brand: Option<String>) -> Self {
        self.pivot.brand = Filter::from(brand);
        self
    }

    pub fn with_layout(mut self, show_dimension1: bool, show_dimension2: bool) -> Self {
        self.pivot.layout = ColumnLayout {
            show_dimension1,
            show_dimension2,
        };
        self
    }

    pub fn with_excluded_suppliers(mut self, suppliers: Vec<String>) -> Self {
        self.excluded_suppliers = suppliers;
        self
    }

    pub fn with_policy_category(mut self, category: impl Into<String>) -> Self {
        self.policy_category = category.into();
        self
    }
}

/// Everything one run derives from a snapshot
#[derive(Debug)]
pub struct AnalysisReport<'a> {
    pub dimensions: DimensionValues,
    pub partition: Partition<'a>,
    pub pivot: Pivot,
    pub stats: Stats,
    pub findings: Vec<PolicyFinding>,
    /// Products left after supplier exclusion
    pub analysed_products: usize,
    /// Analysed products whose key did not parse
    pub unjoinable_products: usize,
}

/// Run the full coverage and policy analysis over a snapshot
pub fn analyze<'a>(snapshot: &'a Snapshot, options: &AnalysisOptions) -> AnalysisReport<'a> {
    let products = exclude_suppliers(&snapshot.products, &options.excluded_suppliers);
    let dimensions = detect_dimension_values(products.iter().copied());
    let index = JoinIndex::build(products.iter().copied());

    let partition = partition(&snapshot.fleet, &index);
    let pivot = build_pivot(&partition.covered, &index, &dimensions, &options.pivot);
    let stats = compute_stats(
        &snapshot.fleet,
        &partition.covered,
        &partition.uncovered,
        products.len(),
    );

    let targets = select_policy_targets(&snapshot.fleet, &options.policy_category);
    debug!(
        category = %options.policy_category,
        targets = targets.len(),
        "evaluating policy rules"
    );
    let findings = evaluate(&targets, &index);

    info!(
        fleet = snapshot.fleet.len(),
        products = products.len(),
        covered = partition.covered.len(),
        columns = pivot.columns.len(),
        "analysis complete"
    );

    AnalysisReport {
        dimensions,
        partition,
        pivot,
        stats,
        findings,
        analysed_products: products.len(),
        unjoinable_products: index.skipped(),
    }
}

/// Coverage of the stored fleet across every stored dimension-1 value
pub fn dashboard<R: CatalogRepository + ?Sized>(
    repo: &R,
    sort: DashboardSort,
) -> Result<Vec<Dimension1Coverage>> {
    let fleet = repo.fetch_fleet()?;
    let keys = repo.fetch_join_keys_by_dimension1()?;
    Ok(global_coverage(&fleet, &keys, sort))
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkcov_domain::model::ModelKey;
    use parkcov_domain::service::Status;

    fn product(key: &str, d1: &str, d2: &str, supplier: &str) -> ProductRecord {
        ProductRecord {
            model_key: ModelKey::from(key),
            dimension1: d1.to_string(),
            dimension2: d2.to_string(),
            supplier_code: supplier.to_string(),
            ..Default::default()
        }
    }

    fn model(id: i64, brand: &str, name: &str, tier: &str, year_to: i32) -> FleetModel {
        FleetModel {
            model_id: ModelKey::from(id),
            brand: brand.to_string(),
            model_name: name.to_string(),
            priority_category: tier.to_string(),
            year_to: Some(year_to),
            ..Default::default()
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot::new(
            vec![
                product("1", "AA", "Filtros", "BOSCH"),
                product("1", "AA", "Filtros", "3"),
                product("2", "B", "Bujias", "3"),
                product("abc", "AA", "Filtros", "1"),
            ],
            vec![
                model(1, "FIAT", "PALIO", "AA", 2010),
                model(2, "VW", "GOL", "A", 2012),
                model(3, "FIAT", "UNO", "AA", 1995),
            ],
        )
    }

    #[test]
    fn test_analyze_full_run() {
        let snapshot = snapshot();
        let report = analyze(&snapshot, &AnalysisOptions::default());

        assert_eq!(report.partition.covered.len(), 2);
        assert_eq!(report.partition.uncovered.len(), 1);
        assert_eq!(report.stats.coverage_percentage, "66.7");
        assert_eq!(report.analysed_products, 4);
        assert_eq!(report.unjoinable_products, 1);
        assert_eq!(report.dimensions.dimension1, vec!["AA", "B"]);
        assert_eq!(report.pivot.columns.len(), 4);

        // policy targets AA only: PALIO (modern, both tiers) and UNO (vintage, nothing)
        assert_eq!(report.findings.len(), 2);
        assert_eq!(report.findings[0].model_name, "UNO");
        assert_eq!(report.findings[0].status, Status::Critical);
        assert_eq!(report.findings[1].status, Status::Ok);
    }

    #[test]
    fn test_excluded_supplier_changes_coverage() {
        let snapshot = snapshot();
        let options = AnalysisOptions::default().with_excluded_suppliers(vec!["3".to_string()]);
        let report = analyze(&snapshot, &options);

        // GOL only had supplier 3
        assert_eq!(report.partition.covered.len(), 1);
        assert_eq!(report.analysed_products, 2);
        assert_eq!(snapshot.products.len(), 4);

        // PALIO lost its standard option
        let palio = report
            .findings
            .iter()
            .find(|f| f.model_name == "PALIO")
            .unwrap();
        assert_eq!(palio.status, Status::Warning);
    }

    #[test]
    fn test_filters_and_layout() {
        let snapshot = snapshot();
        let options = AnalysisOptions::default()
            .with_layout(true, false)
            .with_brand(Some("FIAT".to_string()));
        let report = analyze(&snapshot, &options);

        assert_eq!(report.pivot.columns, vec!["AA|ALL", "B|ALL"]);
        assert_eq!(report.pivot.brands.len(), 1);
        assert_eq!(report.pivot.model("FIAT", "PALIO").unwrap().count("AA|ALL"), 2);
        // stats ignore pivot filters
        assert_eq!(report.stats.covered_models, 2);
    }

    #[test]
    fn test_policy_category_option() {
        let snapshot = snapshot();
        let report = analyze(&snapshot, &AnalysisOptions::default().with_policy_category("A"));
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].model_name, "GOL");
    }

    #[test]
    fn test_from_csv_missing_file() {
        let err = Snapshot::from_csv(Path::new("/nonexistent/p.csv"), Path::new("/nonexistent/f.csv"))
            .unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }
}
