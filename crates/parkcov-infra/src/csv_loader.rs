//! CSV loaders for the parts catalog and the fleet registry
//!
//! Spreadsheet exports arrive as UTF-8 (with or without BOM) or as
//! Windows-1252, comma or semicolon separated. Columns are matched by
//! header name, case- and accent-insensitively; anything not recognised is
//! kept in the record's `extra` map.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use encoding_rs::WINDOWS_1252;
use parkcov_domain::model::{FleetModel, ModelKey, ProductRecord};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum CsvLoaderError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

impl From<CsvLoaderError> for parkcov_types::Error {
    fn from(e: CsvLoaderError) -> Self {
        parkcov_types::Error::CsvLoader(e.to_string())
    }
}

// Header aliases, already normalized (lowercase, no accents, single spaces)
const PRODUCT_KEY: &[&str] = &["stmvid", "model_key", "model key"];
const DIMENSION1: &[&str] = &["nivel 1", "nivel1", "dimension1", "rubro"];
const DIMENSION2: &[&str] = &["nivel 2", "nivel2", "dimension2", "subrubro", "sub-rubro"];
const SUPPLIER: &[&str] = &["proveedor", "supplier", "supplier_code"];
const EQUIVALENCE: &[&str] = &["equivalencia", "equivalence", "equivalence_code"];
const PART_NUMBER: &[&str] = &["numero", "part_number", "part number"];
const PART_BRAND: &[&str] = &["marca", "brand_of_part", "brand"];
const DESCRIPTION: &[&str] = &["descripcion", "description"];

const FLEET_ID: &[&str] = &["idmodelo", "model_id", "id modelo"];
const MODEL_NAME: &[&str] = &["modelo", "model_name", "model"];
const MODEL_NAME_ALT: &[&str] = &["modelo2", "model_name_alt"];
const FLEET_BRAND: &[&str] = &["marca", "brand"];
const YEAR_FROM: &[&str] = &["desde", "year_from"];
const YEAR_TO: &[&str] = &["hasta", "year_to"];
const CATEGORY: &[&str] = &["clasificacion", "priority_category", "category"];
const FLEET_SIZE: &[&str] = &["parque", "fleet_size"];
const NEW_ORDER: &[&str] = &["nuevo orden", "new_order"];
const ORDER: &[&str] = &["orden", "sort_order", "order"];

/// Load product records from a CSV file
///
/// Required columns: model key (Stmvid), Nivel 1, Nivel 2.
pub fn load_products<P: AsRef<Path>>(path: P) -> Result<Vec<ProductRecord>, CsvLoaderError> {
    let text = read_text(path.as_ref())?;
    let products = parse_products(&text)?;
    info!(path = %path.as_ref().display(), rows = products.len(), "loaded products");
    Ok(products)
}

/// Load fleet models from a CSV file
///
/// Required column: model id (IDMODELO).
pub fn load_fleet<P: AsRef<Path>>(path: P) -> Result<Vec<FleetModel>, CsvLoaderError> {
    let text = read_text(path.as_ref())?;
    let fleet = parse_fleet(&text)?;
    info!(path = %path.as_ref().display(), rows = fleet.len(), "loaded fleet");
    Ok(fleet)
}

/// Parse product records from CSV text
pub fn parse_products(text: &str) -> Result<Vec<ProductRecord>, CsvLoaderError> {
    let mut reader = build_reader(text);
    let columns = Columns::new(reader.headers()?);

    let key = columns.require(PRODUCT_KEY, "Stmvid")?;
    let dimension1 = columns.require(DIMENSION1, "Nivel 1")?;
    let dimension2 = columns.require(DIMENSION2, "Nivel 2")?;
    let supplier = columns.find(SUPPLIER);
    let equivalence = columns.find(EQUIVALENCE);
    let part_number = columns.find(PART_NUMBER);
    let brand = columns.find(PART_BRAND);
    let description = columns.find(DESCRIPTION);

    let known = [
        Some(key),
        Some(dimension1),
        Some(dimension2),
        supplier,
        equivalence,
        part_number,
        brand,
        description,
    ];

    let mut products = Vec::new();
    for result in reader.records() {
        let record = result?;
        if is_blank(&record) {
            continue;
        }
        products.push(ProductRecord {
            model_key: ModelKey::new(cell(&record, Some(key))),
            dimension1: cell(&record, Some(dimension1)),
            dimension2: cell(&record, Some(dimension2)),
            supplier_code: cell(&record, supplier),
            equivalence_code: cell(&record, equivalence),
            part_number: cell(&record, part_number),
            brand_of_part: cell(&record, brand),
            description: cell(&record, description),
            extra: columns.extra(&record, &known),
        });
    }

    Ok(products)
}

/// Parse fleet models from CSV text
pub fn parse_fleet(text: &str) -> Result<Vec<FleetModel>, CsvLoaderError> {
    let mut reader = build_reader(text);
    let columns = Columns::new(reader.headers()?);

    let id = columns.require(FLEET_ID, "IDMODELO")?;
    let model_name = columns.find(MODEL_NAME);
    let model_name_alt = columns.find(MODEL_NAME_ALT);
    let brand = columns.find(FLEET_BRAND);
    let year_from = columns.find(YEAR_FROM);
    let year_to = columns.find(YEAR_TO);
    let category = columns.find(CATEGORY);
    let fleet_size = columns.find(FLEET_SIZE);
    let new_order = columns.find(NEW_ORDER);
    let order = columns.find(ORDER);

    let known = [
        Some(id),
        model_name,
        model_name_alt,
        brand,
        year_from,
        year_to,
        category,
        fleet_size,
        new_order,
        order,
    ];

    let mut fleet = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        if is_blank(&record) {
            continue;
        }
        let row_num = row_idx + 2; // header is row 1

        // A non-zero "new order" overrides the original order
        let sort_order = parse_whole(&cell(&record, new_order), row_num, "new order")
            .filter(|o| *o != 0)
            .or_else(|| parse_whole(&cell(&record, order), row_num, "order"));

        fleet.push(FleetModel {
            model_id: ModelKey::new(cell(&record, Some(id))),
            brand: cell(&record, brand),
            model_name: cell(&record, model_name),
            model_name_alt: Some(cell(&record, model_name_alt)).filter(|s| !s.is_empty()),
            year_from: parse_whole(&cell(&record, year_from), row_num, "year from")
                .and_then(|y| i32::try_from(y).ok()),
            year_to: parse_whole(&cell(&record, year_to), row_num, "year to")
                .and_then(|y| i32::try_from(y).ok()),
            priority_category: cell(&record, category),
            fleet_size: parse_whole(&cell(&record, fleet_size), row_num, "fleet size")
                .and_then(|n| u64::try_from(n).ok()),
            sort_order,
            extra: columns.extra(&record, &known),
        });
    }

    Ok(fleet)
}

/// Read a file as text: UTF-8 when valid, Windows-1252 otherwise
fn read_text(path: &Path) -> Result<String, CsvLoaderError> {
    let bytes = fs::read(path)?;
    Ok(decode(&bytes))
}

fn decode(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.trim_start_matches('\u{feff}').to_string(),
        Err(_) => {
            let (decoded, _, had_errors) = WINDOWS_1252.decode(bytes);
            if had_errors {
                warn!("some characters could not be decoded from Windows-1252");
            }
            decoded.into_owned()
        }
    }
}

/// Semicolon when the header line has more semicolons than commas
fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or("");
    let semicolons = header.matches(';').count();
    let commas = header.matches(',').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

fn build_reader(text: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(sniff_delimiter(text))
        .from_reader(text.as_bytes())
}

/// Lowercase, strip accents, collapse whitespace
fn normalize_header(header: &str) -> String {
    let folded: String = header
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'Á' | 'À' => 'a',
            'é' | 'è' | 'É' | 'È' => 'e',
            'í' | 'ì' | 'Í' | 'Ì' => 'i',
            'ó' | 'ò' | 'Ó' | 'Ò' => 'o',
            'ú' | 'ù' | 'ü' | 'Ú' | 'Ù' | 'Ü' => 'u',
            'ñ' | 'Ñ' => 'n',
            other => other,
        })
        .collect();
    folded
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

struct Columns {
    raw: Vec<String>,
    normalized: Vec<String>,
}

impl Columns {
    fn new(headers: &csv::StringRecord) -> Self {
        let raw: Vec<String> = headers.iter().map(str::to_string).collect();
        let normalized = raw.iter().map(|h| normalize_header(h)).collect();
        Self { raw, normalized }
    }

    fn find(&self, aliases: &[&str]) -> Option<usize> {
        self.normalized
            .iter()
            .position(|h| aliases.contains(&h.as_str()))
    }

    fn require(&self, aliases: &[&str], display: &str) -> Result<usize, CsvLoaderError> {
        self.find(aliases)
            .ok_or_else(|| CsvLoaderError::MissingColumn(display.to_string()))
    }

    /// Non-empty cells of every unrecognised column
    fn extra(&self, record: &csv::StringRecord, known: &[Option<usize>]) -> BTreeMap<String, String> {
        record
            .iter()
            .enumerate()
            .filter(|(i, value)| !value.is_empty() && !known.contains(&Some(*i)))
            .filter_map(|(i, value)| {
                self.raw
                    .get(i)
                    .filter(|h| !h.is_empty())
                    .map(|h| (h.clone(), value.to_string()))
            })
            .collect()
    }
}

fn cell(record: &csv::StringRecord, index: Option<usize>) -> String {
    index
        .and_then(|i| record.get(i))
        .unwrap_or("")
        .to_string()
}

fn is_blank(record: &csv::StringRecord) -> bool {
    record.iter().all(str::is_empty)
}

/// Whole number from a cell ("1995", "1995.0", "1.234"); junk yields None
fn parse_whole(s: &str, row: usize, column: &str) -> Option<i64> {
    let cleaned = s.trim();
    if cleaned.is_empty() {
        return None;
    }
    let parsed = cleaned
        .parse::<i64>()
        .ok()
        .or_else(|| parse_grouped(cleaned))
        .or_else(|| {
            cleaned
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite() && n.fract() == 0.0)
                .map(|n| n as i64)
        });
    if parsed.is_none() {
        debug!(row, column, value = cleaned, "ignoring non-numeric cell");
    }
    parsed
}

/// Thousands-grouped integer such as "1.234" or "12,500,000"
fn parse_grouped(s: &str) -> Option<i64> {
    let separator = s.chars().find(|c| *c == '.' || *c == ',')?;
    let mut groups = s.split(separator);
    let head = groups.next()?;
    if head.is_empty() || head.len() > 3 || !head.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut digits = head.to_string();
    let mut grouped = false;
    for group in groups {
        if group.len() != 3 || !group.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.push_str(group);
        grouped = true;
    }
    if !grouped {
        return None;
    }
    digits.parse().ok()
}
