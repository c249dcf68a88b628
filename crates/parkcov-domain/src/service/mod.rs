//! Domain services
//!
//! All services are pure: they borrow an immutable snapshot and return
//! fresh values, so any of them can be re-run on every filter change.

pub mod catalog;
pub mod dashboard;
pub mod join_index;
pub mod pivot;
pub mod policy;
pub mod quality_classifier;
pub mod stats;

pub use catalog::{available_brands, detect_dimension_values, exclude_suppliers, DimensionValues};
pub use dashboard::{global_coverage, DashboardSort, Dimension1Coverage};
pub use join_index::{partition, JoinIndex, Partition};
pub use pivot::{build_pivot, ColumnLayout, Filter, Pivot, PivotOptions};
pub use policy::{evaluate, filter_by_segment, select_policy_targets, AgeSegment, PolicyFinding, Status};
pub use quality_classifier::{classify, QualityTier};
pub use stats::{compute_stats, Stats};
