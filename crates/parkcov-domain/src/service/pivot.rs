//! Coverage pivot: brand → model → counts per dimension column

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{FleetModel, ModelId, ProductRecord};
use crate::service::catalog::DimensionValues;
use crate::service::join_index::JoinIndex;

/// Placeholder for a hidden dimension in a column label
pub const ALL_LABEL: &str = "ALL";

/// Sort key given to models without a display order (sorts them last)
pub const UNORDERED_SORT_KEY: i64 = 999;

/// Pass-everything-or-match-one filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Filter {
    #[default]
    All,
    Only(String),
}

impl Filter {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(wanted) => wanted == value,
        }
    }
}

impl From<Option<String>> for Filter {
    fn from(value: Option<String>) -> Self {
        value.map_or(Filter::All, Filter::Only)
    }
}

/// Which dimensions split the columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    pub show_dimension1: bool,
    pub show_dimension2: bool,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            show_dimension1: true,
            show_dimension2: true,
        }
    }
}

impl ColumnLayout {
    /// Column label a product with these dimension values falls into
    pub fn key_for(&self, dimension1: &str, dimension2: &str) -> String {
        let (d1, d2) = self.slot_for(dimension1, dimension2);
        format!("{}|{}", d1.unwrap_or(ALL_LABEL), d2.unwrap_or(ALL_LABEL))
    }

    /// Column coordinates for a product; a hidden dimension is `None`.
    /// Labels can collide when a value contains `|`, coordinates cannot.
    fn slot_for<'v>(&self, dimension1: &'v str, dimension2: &'v str) -> ColumnSlot<'v> {
        (
            self.show_dimension1.then_some(dimension1),
            self.show_dimension2.then_some(dimension2),
        )
    }

    fn slots<'v>(&self, dims: &'v DimensionValues) -> Vec<ColumnSlot<'v>> {
        match (self.show_dimension1, self.show_dimension2) {
            (true, true) => dims
                .dimension1
                .iter()
                .flat_map(|d1| dims.dimension2.iter().map(move |d2| (Some(d1.as_str()), Some(d2.as_str()))))
                .collect(),
            (true, false) => dims.dimension1.iter().map(|d1| (Some(d1.as_str()), None)).collect(),
            (false, true) => dims.dimension2.iter().map(|d2| (None, Some(d2.as_str()))).collect(),
            (false, false) => vec![(None, None)],
        }
    }

    /// Every column label, in the order the caller's value lists give
    pub fn columns(&self, dims: &DimensionValues) -> Vec<String> {
        self.slots(dims)
            .into_iter()
            .map(|(d1, d2)| format!("{}|{}", d1.unwrap_or(ALL_LABEL), d2.unwrap_or(ALL_LABEL)))
            .collect()
    }
}

type ColumnSlot<'v> = (Option<&'v str>, Option<&'v str>);

/// Everything that shapes one pivot computation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotOptions {
    pub layout: ColumnLayout,
    /// Fleet priority category filter
    pub category: Filter,
    pub brand: Filter,
}

/// One product as shown in a cell drill-down
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductDetail {
    pub equivalence_code: String,
    pub part_number: String,
    pub brand_of_part: String,
    pub supplier_code: String,
    pub dimension1: String,
    pub dimension2: String,
    pub description: String,
}

impl From<&ProductRecord> for ProductDetail {
    fn from(product: &ProductRecord) -> Self {
        Self {
            equivalence_code: product.equivalence_code.clone(),
            part_number: product.part_number.clone(),
            brand_of_part: product.brand_of_part.clone(),
            supplier_code: product.supplier_code.clone(),
            dimension1: product.dimension1.clone(),
            dimension2: product.dimension2.clone(),
            description: product.description.clone(),
        }
    }
}

/// Count and drill-down for one (model, column)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoverageCell {
    /// Label of the pivot column this cell sits under
    pub column: String,
    pub count: usize,
    pub details: Vec<ProductDetail>,
}

impl CoverageCell {
    fn push(&mut self, product: &ProductRecord) {
        self.count += 1;
        self.details.push(ProductDetail::from(product));
    }
}

/// Pivot row for one fleet model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelCoverage {
    pub model_id: ModelId,
    pub model_name: String,
    pub priority_category: String,
    pub sort_order: i64,
    /// Sum of all cell counts
    pub total: usize,
    /// One cell per pivot column, in column order
    pub cells: Vec<CoverageCell>,
}

impl ModelCoverage {
    /// Count under the first column with this label
    pub fn count(&self, column: &str) -> usize {
        self.cells
            .iter()
            .find(|c| c.column == column)
            .map_or(0, |c| c.count)
    }

    /// Count under the column at `position` in `Pivot::columns`
    pub fn count_at(&self, position: usize) -> usize {
        self.cells.get(position).map_or(0, |c| c.count)
    }
}

/// All pivot rows for one brand, ordered by sort order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandCoverage {
    pub brand: String,
    pub models: Vec<ModelCoverage>,
}

impl BrandCoverage {
    pub fn model(&self, model_name: &str) -> Option<&ModelCoverage> {
        self.models.iter().find(|m| m.model_name == model_name)
    }
}

/// Coverage pivot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Pivot {
    /// Column labels in display order
    pub columns: Vec<String>,
    pub dimension1: Vec<String>,
    pub dimension2: Vec<String>,
    /// Brands in lexicographic order
    pub brands: Vec<BrandCoverage>,
}

impl Pivot {
    pub fn brand(&self, brand: &str) -> Option<&BrandCoverage> {
        self.brands.iter().find(|b| b.brand == brand)
    }

    /// Look up one model row
    pub fn model(&self, brand: &str, model_name: &str) -> Option<&ModelCoverage> {
        self.brand(brand).and_then(|b| b.model(model_name))
    }

    /// All rows, brand by brand
    pub fn rows(&self) -> impl Iterator<Item = (&str, &ModelCoverage)> {
        self.brands
            .iter()
            .flat_map(|b| b.models.iter().map(move |m| (b.brand.as_str(), m)))
    }

    pub fn model_count(&self) -> usize {
        self.brands.iter().map(|b| b.models.len()).sum()
    }
}

/// Display order for a model; zero or missing means unordered
pub fn effective_sort_order(model: &FleetModel) -> i64 {
    model
        .sort_order
        .filter(|o| *o != 0)
        .unwrap_or(UNORDERED_SORT_KEY)
}

/// Build the coverage pivot over the covered fleet
pub fn build_pivot(
    covered: &[&FleetModel],
    index: &JoinIndex<'_>,
    dims: &DimensionValues,
    options: &PivotOptions,
) -> Pivot {
    let layout = options.layout;
    let slots = layout.slots(dims);
    let columns = layout.columns(dims);
    // first position wins if the value lists repeat a pair
    let mut positions: HashMap<ColumnSlot<'_>, usize> = HashMap::with_capacity(slots.len());
    for (position, slot) in slots.iter().enumerate() {
        positions.entry(*slot).or_insert(position);
    }

    let mut brands: BTreeMap<String, Vec<ModelCoverage>> = BTreeMap::new();

    for model in covered.iter().copied().filter(|m| {
        options.category.matches(&m.priority_category) && options.brand.matches(&m.brand)
    }) {
        let Some(model_id) = model.model_id.id() else {
            debug!(key = %model.model_id, "fleet model without numeric id skipped in pivot");
            continue;
        };

        let mut cells: Vec<CoverageCell> = columns
            .iter()
            .map(|c| CoverageCell {
                column: c.clone(),
                ..Default::default()
            })
            .collect();

        for product in index.products_for(model_id) {
            let slot = layout.slot_for(&product.dimension1, &product.dimension2);
            if let Some(&position) = positions.get(&slot) {
                cells[position].push(product);
            }
        }

        let total = cells.iter().map(|c| c.count).sum();
        let row = ModelCoverage {
            model_id,
            model_name: model.model_name.clone(),
            priority_category: model.priority_category.clone(),
            sort_order: effective_sort_order(model),
            total,
            cells,
        };

        let rows = brands.entry(model.brand.clone()).or_default();
        // Same brand and name: the later fleet row wins but keeps the first slot
        match rows.iter_mut().find(|r| r.model_name == row.model_name) {
            Some(existing) => {
                debug!(brand = %model.brand, model = %row.model_name, "duplicate model name replaced");
                *existing = row;
            }
            None => rows.push(row),
        }
    }

    let brands = brands
        .into_iter()
        .map(|(brand, mut models)| {
            models.sort_by_key(|m| m.sort_order);
            BrandCoverage { brand, models }
        })
        .collect();

    Pivot {
        columns,
        dimension1: dims.dimension1.clone(),
        dimension2: dims.dimension2.clone(),
        brands,
    }
}
