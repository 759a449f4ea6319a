//! Phase 3: The Scanner
//!
//! Runs the brain over one day's snapshot, and over a whole rate history.

mod daily;
mod historical;

pub use daily::{DailyScanner, DetectionResult, ScannerSettings};
pub use historical::{DayOutcome, HistoricalScan, ScanSummary};
