//! Daily Scanner
//!
//! Step 3.1: One day, every candidate source
//!
//! Builds the day's graph, then tries each candidate source currency in
//! order: detect -> extract -> validate -> price. The first cycle that clears
//! the profit filter wins and the rest of the day is skipped.

use tracing::{debug, info, warn};

use crate::brain::{extract_cycle, Detection, NegativeCycleDetector, ProfitAnalysis, ProfitFilter};
use crate::brain::{DEFAULT_EPSILON, DEFAULT_NOTIONAL};
use crate::cartographer::{BuildReport, RateGraph, RateSnapshot};
use crate::currency::{default_universe, Currency};

/// How many edges to dump at debug level per day
const GRAPH_PREVIEW_EDGES: usize = 10;

/// Outcome for one day
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionResult {
    NoArbitrage,
    Arbitrage(ProfitAnalysis),
}

impl DetectionResult {
    pub fn is_arbitrage(&self) -> bool {
        matches!(self, DetectionResult::Arbitrage(_))
    }

    pub fn opportunity(&self) -> Option<&ProfitAnalysis> {
        match self {
            DetectionResult::Arbitrage(analysis) => Some(analysis),
            DetectionResult::NoArbitrage => None,
        }
    }
}

/// Scanner inputs that stay fixed across days
#[derive(Debug, Clone)]
pub struct ScannerSettings {
    /// Sources to try, in order. Empty means every currency in the day's
    /// graph, in the order it was first quoted.
    pub currencies: Vec<Currency>,
    pub notional: f64,
    pub epsilon: f64,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            currencies: default_universe(),
            notional: DEFAULT_NOTIONAL,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

pub struct DailyScanner {
    currencies: Vec<Currency>,
    filter: ProfitFilter,
}

impl DailyScanner {
    pub fn new(settings: ScannerSettings) -> Self {
        Self {
            currencies: settings.currencies,
            filter: ProfitFilter::new(settings.notional, settings.epsilon),
        }
    }

    pub fn filter(&self) -> &ProfitFilter {
        &self.filter
    }

    pub fn scan(&self, snapshot: &RateSnapshot) -> DetectionResult {
        self.scan_with_report(snapshot).0
    }

    /// Like [`scan`](Self::scan), also returning what the graph build skipped
    pub fn scan_with_report(&self, snapshot: &RateSnapshot) -> (DetectionResult, BuildReport) {
        let (graph, report) = RateGraph::from_snapshot(snapshot);
        graph.log_preview(GRAPH_PREVIEW_EDGES);
        (self.scan_graph(&graph), report)
    }

    pub fn scan_graph(&self, graph: &RateGraph) -> DetectionResult {
        if graph.is_empty() {
            debug!("Empty graph, nothing to scan");
            return DetectionResult::NoArbitrage;
        }

        for source in self.candidates(graph) {
            if let Some(analysis) = self.try_source(graph, source) {
                info!(
                    "Arbitrage from {}: {} | {:.4} -> {:.4} ({:+.4}%)",
                    source,
                    analysis.cycle.format_path(),
                    analysis.notional,
                    analysis.final_amount,
                    analysis.profit_percent
                );
                return DetectionResult::Arbitrage(analysis);
            }
        }

        DetectionResult::NoArbitrage
    }

    fn candidates(&self, graph: &RateGraph) -> Vec<Currency> {
        if self.currencies.is_empty() {
            graph.currencies()
        } else {
            self.currencies.clone()
        }
    }

    fn try_source(&self, graph: &RateGraph, source: Currency) -> Option<ProfitAnalysis> {
        let detector = NegativeCycleDetector::new(graph);

        let (node, predecessors) = match detector.detect(source) {
            Detection::SourceNotInGraph => {
                debug!("{}: not quoted, skipping", source);
                return None;
            }
            Detection::NoNegativeCycle => {
                debug!("{}: no negative cycle reachable", source);
                return None;
            }
            Detection::NegativeCycleAt { node, predecessors } => (node, predecessors),
        };

        let Some(cycle) = extract_cycle(graph, node, &predecessors) else {
            warn!("{}: predecessor walk did not close a loop, discarding", source);
            return None;
        };

        if let Err(defect) = cycle.validate(graph) {
            warn!(
                "{}: reconstructed cycle {} rejected: {}",
                source,
                cycle.format_path(),
                defect
            );
            return None;
        }

        // Enter the loop at the source when it lies on it
        let cycle = cycle.rotated_to(source).unwrap_or(cycle);

        match self.filter.analyze(&cycle, graph) {
            Ok(analysis) if analysis.is_profitable => Some(analysis),
            Ok(analysis) => {
                debug!(
                    "{}: {} returns {:.6}x, below threshold",
                    source,
                    cycle.format_path(),
                    analysis.return_multiplier()
                );
                None
            }
            Err(defect) => {
                warn!("{}: could not price {}: {}", source, cycle.format_path(), defect);
                None
            }
        }
    }
}

impl Default for DailyScanner {
    fn default() -> Self {
        Self::new(ScannerSettings::default())
    }
}
