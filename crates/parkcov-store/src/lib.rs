//! Persistent store for free-text model annotations
//!
//! Keys are fleet model names, the same names the coverage pivot shows, so
//! the reporting layer can join a note onto each pivot row.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use parkcov_types::{Annotation, Result, StoreError};
use tracing::info;

/// Persistent store for annotations keyed by model name
pub struct AnnotationStore {
    store_path: PathBuf,
    annotations: BTreeMap<String, Annotation>,
}

impl AnnotationStore {
    /// Create or load an annotation store
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join("annotations.json");

        let annotations = if store_path.exists() {
            let file = File::open(&store_path)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader).map_err(|e| {
                StoreError::Corrupted(format!("{}: {}", store_path.display(), e))
            })?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            store_path,
            annotations,
        })
    }

    /// Save store to disk
    fn save(&self) -> Result<()> {
        let file = File::create(&self.store_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.annotations)?;
        Ok(())
    }

    /// Save a note for a model, dated today.
    ///
    /// Blank text removes the note instead. Returns the stored annotation.
    pub fn set(&mut self, model_name: &str, text: &str, team: &str) -> Result<Option<Annotation>> {
        self.set_on(model_name, text, team, Local::now().date_naive())
    }

    /// Same as [`AnnotationStore::set`] with an explicit date
    pub fn set_on(
        &mut self,
        model_name: &str,
        text: &str,
        team: &str,
        date: NaiveDate,
    ) -> Result<Option<Annotation>> {
        if text.trim().is_empty() {
            self.remove(model_name)?;
            return Ok(None);
        }

        let annotation = Annotation {
            text: text.to_string(),
            team: team.to_string(),
            date,
        };
        self.annotations
            .insert(model_name.to_string(), annotation.clone());
        self.save()?;
        info!(model = model_name, team, "annotation saved");
        Ok(Some(annotation))
    }

    /// Remove a note; returns whether one existed
    pub fn remove(&mut self, model_name: &str) -> Result<bool> {
        let removed = self.annotations.remove(model_name).is_some();
        if removed {
            self.save()?;
        }
        Ok(removed)
    }

    pub fn get(&self, model_name: &str) -> Option<&Annotation> {
        self.annotations.get(model_name)
    }

    /// All notes, sorted by model name
    pub fn all(&self) -> &BTreeMap<String, Annotation> {
        &self.annotations
    }

    pub fn count(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}
