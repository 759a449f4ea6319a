//! Phase 1: The Cartographer (Rate Ingest)
//!
//! Turns a day's pair quotes into a log-space rate graph.

mod graph;
mod history;
mod snapshot;

pub use graph::{BuildReport, EdgeData, RateGraph};
pub use history::RateHistory;
pub use snapshot::{usable_rate, RateIssue, RateSnapshot};
