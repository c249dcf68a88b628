//! CSV to catalog to report pipeline

use std::fs;

use parkcov_app::app::{analyze, dashboard, AnalysisOptions, Snapshot};
use parkcov_app::export::{export_coverage, export_policy, export_uncovered};
use parkcov_app::repository::{open_annotation_store_at, open_catalog_repo_at};
use parkcov_domain::repository::CatalogRepository;
use parkcov_domain::service::{DashboardSort, Status};
use parkcov_infra::csv_loader;
use tempfile::tempdir;

const FLEET_CSV: &str = "\
IDMODELO;MODELO;MARCA;DESDE;HASTA;Clasificacion;Parque;Orden
10;PALIO;FIAT;1996;2017;AA;1200;2
11;UNO;FIAT;1984;1999;AA;900;1
12;GOL;VW;1994;2014;A;1500;1
13;FOX;VW;2003;2021;B;400;
";

const FILTERS_CSV: &str = "\
Stmvid,Nivel 1,Nivel 2,Proveedor,Numero,Descripcion
10,AA,Aceite,BOSCH,F-1,Filtro aceite
10,AA,Aire,3,F-2,Filtro aire
12,AA,Aceite,3,F-3,Filtro aceite
,AA,Aceite,3,F-4,Sin modelo
";

const SPARK_CSV: &str = "\
Stmvid,Nivel 1,Nivel 2,Proveedor,Numero,Descripcion
11,B,Bujias,4,B-1,Bujia
13,B,Bujias,OEM,B-2,Bujia original
";

#[test]
fn test_csv_snapshot_analysis_and_exports() {
    let dir = tempdir().unwrap();
    let fleet_path = dir.path().join("parque.csv");
    let products_path = dir.path().join("filtros.csv");
    fs::write(&fleet_path, FLEET_CSV).unwrap();
    fs::write(&products_path, FILTERS_CSV).unwrap();

    let snapshot = Snapshot::from_csv(&products_path, &fleet_path).unwrap();
    assert_eq!(snapshot.fleet.len(), 4);
    assert_eq!(snapshot.products.len(), 4);

    let report = analyze(&snapshot, &AnalysisOptions::default());
    assert_eq!(report.partition.covered.len(), 2);
    assert_eq!(report.partition.uncovered.len(), 2);
    assert_eq!(report.stats.coverage_percentage, "50.0");
    assert_eq!(report.stats.tier("AA").unwrap().percentage, "50.0");
    assert_eq!(report.unjoinable_products, 1);

    // UNO is vintage with nothing listed
    assert_eq!(report.findings[0].model_name, "UNO");
    assert_eq!(report.findings[0].status, Status::Critical);

    let store = open_annotation_store_at(dir.path().join("store")).unwrap();
    export_coverage(&report.pivot, store.all(), &dir.path().join("coverage.xlsx")).unwrap();
    export_policy(&report.findings, &dir.path().join("policy.xlsx")).unwrap();
    export_uncovered(&report.partition.uncovered, &dir.path().join("uncovered.xlsx")).unwrap();

    for name in ["coverage.xlsx", "policy.xlsx", "uncovered.xlsx"] {
        assert!(dir.path().join(name).exists(), "{} missing", name);
    }
}

#[test]
fn test_catalog_import_and_dashboard() {
    let dir = tempdir().unwrap();
    let repo = open_catalog_repo_at(dir.path().to_path_buf()).unwrap();

    let fleet = csv_loader::parse_fleet(FLEET_CSV).unwrap();
    assert_eq!(repo.upsert_fleet(&fleet).unwrap(), 4);
    repo.replace_products(&csv_loader::parse_products(FILTERS_CSV).unwrap())
        .unwrap();
    repo.replace_products(&csv_loader::parse_products(SPARK_CSV).unwrap())
        .unwrap();

    assert_eq!(repo.fetch_dimension1_values().unwrap(), vec!["AA", "B"]);

    let rows = dashboard(&repo, DashboardSort::Name).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].dimension1, "AA");
    assert_eq!(rows[0].covered_models, 2);
    assert_eq!(rows[0].percentage, 50);
    assert_eq!(rows[1].dimension1, "B");
    assert_eq!(rows[1].covered_models, 2);

    // snapshot from the catalog matches the B slice only
    let snapshot = Snapshot::from_repository(&repo, "B").unwrap();
    assert_eq!(snapshot.products.len(), 2);
    let report = analyze(&snapshot, &AnalysisOptions::default());
    let covered: Vec<_> = report
        .partition
        .covered
        .iter()
        .map(|m| m.model_name.as_str())
        .collect();
    // fleet comes back in display order
    assert_eq!(covered, vec!["UNO", "FOX"]);

    assert!(Snapshot::from_repository(&repo, "Z").is_err());
}

#[test]
fn test_annotations_flow_into_coverage_export() {
    let dir = tempdir().unwrap();
    let mut store = open_annotation_store_at(dir.path().to_path_buf()).unwrap();
    store.set("PALIO", "Quote from new supplier", "Purchasing").unwrap();
    store.set("UNO", "   ", "Sales").unwrap();
    assert_eq!(store.count(), 1);

    let fleet = csv_loader::parse_fleet(FLEET_CSV).unwrap();
    let products = csv_loader::parse_products(FILTERS_CSV).unwrap();
    let snapshot = Snapshot::new(products, fleet);
    let report = analyze(&snapshot, &AnalysisOptions::default());

    let path = dir.path().join("coverage.xlsx");
    export_coverage(&report.pivot, store.all(), &path).unwrap();
    assert!(path.exists());
}
