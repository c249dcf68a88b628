//! Loading CSV exports from disk

use std::fs;

use parkcov_domain::model::ModelId;
use parkcov_infra::csv_loader::{load_fleet, load_products, CsvLoaderError};
use tempfile::tempdir;

#[test]
fn test_load_windows_1252_products() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("productos.csv");

    // "Descripción" and "Bujía" encoded as Windows-1252
    let mut bytes = b"Stmvid;Nivel 1;Nivel 2;Proveedor;Descripci".to_vec();
    bytes.push(0xF3);
    bytes.extend_from_slice(b"n\r\n1001;B;Buj");
    bytes.push(0xED);
    bytes.extend_from_slice(b"as;3;Buj");
    bytes.push(0xED);
    bytes.extend_from_slice(b"a NGK\r\n");
    fs::write(&path, bytes).unwrap();

    let products = load_products(&path).unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].model_key.id(), Some(ModelId(1001)));
    assert_eq!(products[0].dimension2, "Bujías");
    assert_eq!(products[0].description, "Bujía NGK");
    assert_eq!(products[0].supplier_code, "3");
}

#[test]
fn test_load_utf8_bom_fleet() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("parque.csv");
    fs::write(
        &path,
        "\u{feff}IDMODELO,MODELO,MARCA,HASTA,Clasificación\n77,SIENA,FIAT,2016,AA\n\n",
    )
    .unwrap();

    let fleet = load_fleet(&path).unwrap();
    assert_eq!(fleet.len(), 1);
    assert_eq!(fleet[0].model_id.id(), Some(ModelId(77)));
    assert_eq!(fleet[0].priority_category, "AA");
    assert_eq!(fleet[0].year_to, Some(2016));
}

#[test]
fn test_missing_file() {
    let dir = tempdir().unwrap();
    let result = load_fleet(dir.path().join("absent.csv"));
    assert!(matches!(result, Err(CsvLoaderError::IoError(_))));
}

#[test]
fn test_loader_error_converts() {
    let err: parkcov_types::Error = CsvLoaderError::MissingColumn("Nivel 1".to_string()).into();
    assert!(matches!(err, parkcov_types::Error::CsvLoader(ref msg) if msg.contains("Nivel 1")));
}
