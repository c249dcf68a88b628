//! Use cases

pub mod analysis_service;

pub use analysis_service::{analyze, dashboard, AnalysisOptions, AnalysisReport, Snapshot};
