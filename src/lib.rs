//! fxarb - currency arbitrage detection over daily rate snapshots
//!
//! Pipeline per day: snapshot -> log-space graph -> Bellman-Ford negative
//! cycle -> validated cycle -> profit check -> [`DetectionResult`].

pub mod brain;
pub mod cartographer;
pub mod config;
pub mod currency;
pub mod error;
pub mod scanner;

pub use brain::{ArbitrageCycle, ProfitAnalysis};
pub use cartographer::{RateGraph, RateHistory, RateSnapshot};
pub use config::Config;
pub use currency::Currency;
pub use error::FxError;
pub use scanner::{DailyScanner, DetectionResult, HistoricalScan, ScannerSettings};
