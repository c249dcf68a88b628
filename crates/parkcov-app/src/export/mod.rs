//! Spreadsheet export

pub mod excel;

pub use excel::{export_annotations, export_coverage, export_policy, export_uncovered};
