//! Phase 2: The Brain
//!
//! Responsible for:
//! - Finding negative cycles (arbitrage opportunities) using Bellman-Ford
//! - Rejecting cycles that do not exist in the graph
//! - Filtering out noise-level profits

mod bellman_ford;
mod cycle;
mod filter;

pub use bellman_ford::{extract_cycle, Detection, NegativeCycleDetector};
pub use cycle::{ArbitrageCycle, CycleDefect};
pub use filter::{ConversionLeg, ProfitAnalysis, ProfitFilter, DEFAULT_EPSILON, DEFAULT_NOTIONAL};
