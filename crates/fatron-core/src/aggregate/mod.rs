//! Aggregation and TRON reclassification.

mod engine;
pub mod tables;

pub use engine::{AggregationEngine, AggregationResult};
pub use tables::{ClassificationTables, DEFAULT_TABLES};
