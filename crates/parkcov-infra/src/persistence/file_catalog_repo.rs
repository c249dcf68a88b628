//! File-based catalog repository implementation

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use parkcov_domain::model::{FleetModel, ModelId, ProductRecord};
use parkcov_domain::repository::CatalogRepository;
use parkcov_domain::service::pivot::effective_sort_order;
use parkcov_types::{Error, Result, StoreError};

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    fleet: Vec<FleetModel>,
    #[serde(default)]
    products: Vec<ProductRecord>,
}

/// File-based implementation of CatalogRepository
///
/// Keeps the whole catalog in `catalog.json` under the store directory and
/// rewrites it after every mutation.
pub struct FileCatalogRepository {
    store_path: PathBuf,
    document: RefCell<CatalogDocument>,
}

impl FileCatalogRepository {
    /// Create or load a catalog repository
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join("catalog.json");

        let document = if store_path.exists() {
            let file = File::open(&store_path)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader).map_err(|e| {
                StoreError::Corrupted(format!("{}: {}", store_path.display(), e))
            })?
        } else {
            CatalogDocument::default()
        };

        Ok(Self {
            store_path,
            document: RefCell::new(document),
        })
    }

    /// Save store to disk
    fn persist(&self) -> Result<()> {
        let file = File::create(&self.store_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &*self.document.borrow())?;
        Ok(())
    }

    pub fn fleet_count(&self) -> usize {
        self.document.borrow().fleet.len()
    }

    pub fn product_count(&self) -> usize {
        self.document.borrow().products.len()
    }
}

impl CatalogRepository for FileCatalogRepository {
    fn fetch_fleet(&self) -> Result<Vec<FleetModel>> {
        let mut fleet = self.document.borrow().fleet.clone();
        // stable: unordered models keep insertion order, after the ordered ones
        fleet.sort_by_key(effective_sort_order);
        Ok(fleet)
    }

    fn fetch_dimension1_values(&self) -> Result<Vec<String>> {
        let values: BTreeSet<String> = self
            .document
            .borrow()
            .products
            .iter()
            .filter(|p| !p.dimension1.is_empty())
            .map(|p| p.dimension1.clone())
            .collect();
        Ok(values.into_iter().collect())
    }

    fn fetch_products_by_dimension1(&self, dimension1: &str) -> Result<Vec<ProductRecord>> {
        Ok(self
            .document
            .borrow()
            .products
            .iter()
            .filter(|p| p.dimension1 == dimension1)
            .cloned()
            .collect())
    }

    fn upsert_fleet(&self, models: &[FleetModel]) -> Result<usize> {
        let mut stored = 0;
        {
            let mut doc = self.document.borrow_mut();
            for model in models {
                let Some(id) = model.model_id.id() else {
                    warn!(model_id = %model.model_id, "skipping fleet model without numeric id");
                    continue;
                };
                match doc.fleet.iter_mut().find(|m| m.model_id.id() == Some(id)) {
                    Some(existing) => *existing = model.clone(),
                    None => doc.fleet.push(model.clone()),
                }
                stored += 1;
            }
        }
        self.persist()?;
        info!(stored, "fleet upserted");
        Ok(stored)
    }

    fn replace_products(&self, products: &[ProductRecord]) -> Result<usize> {
        let replaced: BTreeSet<&str> = products
            .iter()
            .map(|p| p.dimension1.as_str())
            .filter(|d| !d.is_empty())
            .collect();
        if replaced.is_empty() && !products.is_empty() {
            return Err(Error::InvalidInput(
                "uploaded products carry no dimension-1 value".to_string(),
            ));
        }

        {
            let mut doc = self.document.borrow_mut();
            let before = doc.products.len();
            doc.products
                .retain(|p| !replaced.contains(p.dimension1.as_str()));
            info!(
                removed = before - doc.products.len(),
                rubros = replaced.len(),
                "cleared products for uploaded dimension-1 values"
            );
            doc.products.extend(products.iter().cloned());
        }
        self.persist()?;
        Ok(products.len())
    }

    fn fetch_join_keys_by_dimension1(&self) -> Result<BTreeMap<String, BTreeSet<ModelId>>> {
        let mut keys: BTreeMap<String, BTreeSet<ModelId>> = BTreeMap::new();
        for product in &self.document.borrow().products {
            if product.dimension1.is_empty() {
                continue;
            }
            if let Some(id) = product.model_key.id() {
                keys.entry(product.dimension1.clone()).or_default().insert(id);
            }
        }
        Ok(keys)
    }
}
