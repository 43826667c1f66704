//! Evaluation driving, aggregation, and the layout data model
//!
//! This module contains:
//! - The captured-interface data model and JSON record loading
//! - The multi-resolution evaluator producing one metric row per resolution
//! - Cross-domain aggregation: best-grid selection, statistics, correlation,
//!   and the compressibility-hypothesis regression

/// Cross-domain aggregation over evaluation tables
pub mod aggregate;
/// Multi-resolution evaluation of layout records
pub mod evaluator;
/// Layout record data model and JSON loading
pub mod record;

pub use aggregate::{AggregateSummary, BestGridRecord, aggregate};
pub use evaluator::{EvalConfig, EvaluationTable, Evaluator, MetricRow, MetricSet};
pub use record::{Component, LayoutRecord};
