//! Domain layer for parts-catalog / fleet coverage analysis
//!
//! Everything under [`service`] is a pure function of an immutable snapshot
//! of products and fleet models. Loading and persisting those snapshots is
//! the job of the repository traits in [`repository`].

pub mod model;
pub mod repository;
pub mod service;
