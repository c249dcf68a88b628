//! Domain model types

pub mod fleet;
pub mod model_key;
pub mod product;

pub use fleet::{priority_rank, FleetModel, PRIORITY_TIERS, TOP_PRIORITY_TIER};
pub use model_key::{ModelId, ModelKey};
pub use product::ProductRecord;
