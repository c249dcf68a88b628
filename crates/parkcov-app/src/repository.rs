//! Repository adapters for persistence layer

use std::path::PathBuf;

use parkcov_infra::persistence::FileCatalogRepository;
use parkcov_store::AnnotationStore;
use parkcov_types::Result;

use crate::config::Config;

/// Open file-based catalog repository
pub fn open_catalog_repo(config: &Config) -> Result<FileCatalogRepository> {
    let store_dir = config.store_dir()?;
    FileCatalogRepository::open(store_dir)
}

/// Open annotation store
pub fn open_annotation_store(config: &Config) -> Result<AnnotationStore> {
    let store_dir = config.store_dir()?;
    AnnotationStore::open(store_dir)
}

/// Open catalog repository at a custom directory
pub fn open_catalog_repo_at(store_dir: PathBuf) -> Result<FileCatalogRepository> {
    FileCatalogRepository::open(store_dir)
}

/// Open annotation store at a custom directory
pub fn open_annotation_store_at(store_dir: PathBuf) -> Result<AnnotationStore> {
    AnnotationStore::open(store_dir)
}
