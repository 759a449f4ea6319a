//! Graph Construction - Log-Space Edition
//!
//! Every observed pair becomes two directed edges:
//! - base -> quote with weight -ln(rate)
//! - quote -> base with weight +ln(rate)
//!
//! Both weights come from the same ln() call, so they are exact negations.
//! Compounding rates along a cycle becomes summing weights, and a profitable
//! cycle is a negative-weight cycle.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::snapshot::{usable_rate, RateIssue, RateSnapshot};
use crate::currency::{parse_pair, Currency};

/// Edge data in the rate graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeData {
    /// -ln(rate) in the direction of travel
    pub weight: f64,
    /// True for the quote -> base side of an observation
    pub inverted: bool,
}

impl EdgeData {
    /// Units of `to` received per unit of `from`
    pub fn rate(&self) -> f64 {
        (-self.weight).exp()
    }
}

/// What happened while building a day's graph
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub inserted: usize,
    pub missing: usize,
    pub invalid: usize,
    pub warnings: Vec<String>,
}

impl BuildReport {
    fn record(&mut self, pair: &str, issue: RateIssue) {
        if issue.is_missing() {
            debug!("Skipping {}: no quote", pair);
            self.missing += 1;
        } else {
            warn!("Skipping {}: {}", pair, issue);
            self.invalid += 1;
            self.warnings.push(format!("{}: {}", pair, issue));
        }
    }
}

/// Directed log-space rate graph for one day
#[derive(Debug, Clone)]
pub struct RateGraph {
    pub graph: DiGraph<Currency, EdgeData>,
    pub currency_to_node: HashMap<Currency, NodeIndex>,
}

impl RateGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            currency_to_node: HashMap::new(),
        }
    }

    /// Build the graph for one day. Bad observations are skipped and reported,
    /// never fatal.
    pub fn from_snapshot(snapshot: &RateSnapshot) -> (Self, BuildReport) {
        let mut graph = Self::new();
        let mut report = BuildReport::default();

        for (pair, rate) in snapshot {
            let outcome = parse_pair(pair)
                .map_err(RateIssue::BadPair)
                .and_then(|(base, quote)| graph.add_rate(base, quote, *rate));

            match outcome {
                Ok(()) => report.inserted += 1,
                Err(issue) => report.record(pair, issue),
            }
        }

        info!(
            "Graph built: {} Nodes, {} Edges ({} pairs, {} missing, {} invalid)",
            graph.node_count(),
            graph.edge_count(),
            report.inserted,
            report.missing,
            report.invalid
        );

        (graph, report)
    }

    /// Insert both directions of an observation. A later observation of the
    /// same ordered pair replaces the earlier edges.
    pub fn add_rate(
        &mut self,
        base: Currency,
        quote: Currency,
        rate: Option<f64>,
    ) -> Result<(), RateIssue> {
        let rate = usable_rate(rate)?;
        let log_rate = rate.ln();

        let base_node = self.get_or_create_node(base);
        let quote_node = self.get_or_create_node(quote);

        self.graph.update_edge(
            base_node,
            quote_node,
            EdgeData {
                weight: -log_rate,
                inverted: false,
            },
        );
        self.graph.update_edge(
            quote_node,
            base_node,
            EdgeData {
                weight: log_rate,
                inverted: true,
            },
        );

        Ok(())
    }

    fn get_or_create_node(&mut self, currency: Currency) -> NodeIndex {
        if let Some(&node) = self.currency_to_node.get(&currency) {
            return node;
        }

        let node = self.graph.add_node(currency);
        self.currency_to_node.insert(currency, node);
        node
    }

    pub fn get_node(&self, currency: Currency) -> Option<NodeIndex> {
        self.currency_to_node.get(&currency).copied()
    }

    pub fn get_currency(&self, node: NodeIndex) -> Option<Currency> {
        self.graph.node_weight(node).copied()
    }

    /// Currencies in insertion order
    pub fn currencies(&self) -> Vec<Currency> {
        self.graph.node_weights().copied().collect()
    }

    pub fn edge(&self, from: Currency, to: Currency) -> Option<&EdgeData> {
        let from = self.get_node(from)?;
        let to = self.get_node(to)?;
        let edge = self.graph.find_edge(from, to)?;
        self.graph.edge_weight(edge)
    }

    pub fn has_edge(&self, from: Currency, to: Currency) -> bool {
        self.edge(from, to).is_some()
    }

    pub fn weight(&self, from: Currency, to: Currency) -> Option<f64> {
        self.edge(from, to).map(|e| e.weight)
    }

    pub fn rate(&self, from: Currency, to: Currency) -> Option<f64> {
        self.edge(from, to).map(EdgeData::rate)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Dump the first `limit` edges at debug level
    pub fn log_preview(&self, limit: usize) {
        debug!("Graph edges and weights (first {}):", limit);
        for edge in self.graph.edge_references().take(limit) {
            let from = self.graph[edge.source()];
            let to = self.graph[edge.target()];
            debug!("  {} -> {}: {:.6}", from, to, edge.weight().weight);
        }
    }
}

impl Default for RateGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cur(code: &str) -> Currency {
        code.parse().unwrap()
    }

    fn snapshot(entries: &[(&str, Option<f64>)]) -> RateSnapshot {
        entries
            .iter()
            .map(|(pair, rate)| (pair.to_string(), *rate))
            .collect()
    }

    #[test]
    fn test_round_trip_rates() {
        let rates = [("USDEUR", 0.9213), ("GBPUSD", 1.2711), ("USDJPY", 151.37)];
        let (graph, report) = RateGraph::from_snapshot(&snapshot(&[
            ("USDEUR", Some(rates[0].1)),
            ("GBPUSD", Some(rates[1].1)),
            ("USDJPY", Some(rates[2].1)),
        ]));
        assert_eq!(report.inserted, 3);

        for (pair, rate) in rates {
            let (base, quote) = parse_pair(pair).unwrap();
            let recovered = graph.rate(base, quote).unwrap();
            assert!(
                ((recovered - rate) / rate).abs() < 1e-9,
                "{}: expected {}, got {}",
                pair,
                rate,
                recovered
            );
        }
    }

    #[test]
    fn test_antisymmetric_weights() {
        let (graph, _) = RateGraph::from_snapshot(&snapshot(&[
            ("USDEUR", Some(0.95)),
            ("EURGBP", Some(1.0526)),
            ("GBPUSD", Some(1.05)),
        ]));

        for (a, b) in [("USD", "EUR"), ("EUR", "GBP"), ("GBP", "USD")] {
            let forward = graph.weight(cur(a), cur(b)).unwrap();
            let backward = graph.weight(cur(b), cur(a)).unwrap();
            assert_eq!(forward, -backward, "{}/{} weights not negated", a, b);
        }
    }

    #[test]
    fn test_skips_missing_and_invalid() {
        let (graph, report) = RateGraph::from_snapshot(&snapshot(&[
            ("USDEUR", Some(0.95)),
            ("EURGBP", None),
            ("GBPUSD", Some(f64::NAN)),
            ("USDCHF", Some(0.0)),
            ("CHFJPY", Some(-1.5)),
            ("BOGUS", Some(1.0)),
            ("EURCHF=X", Some(0.97)),
        ]));

        assert_eq!(report.inserted, 2);
        assert_eq!(report.missing, 2);
        assert_eq!(report.invalid, 3);
        assert_eq!(report.warnings.len(), 3);

        assert_eq!(graph.edge_count(), 4);
        assert!(graph.has_edge(cur("USD"), cur("EUR")));
        assert!(graph.has_edge(cur("CHF"), cur("EUR")));
        assert!(!graph.has_edge(cur("EUR"), cur("GBP")));
        assert!(graph.get_node(cur("JPY")).is_none());
    }

    #[test]
    fn test_later_observation_replaces_pair() {
        let mut graph = RateGraph::new();
        graph.add_rate(cur("USD"), cur("EUR"), Some(0.95)).unwrap();
        graph.add_rate(cur("EUR"), cur("USD"), Some(1.0 / 0.96)).unwrap();

        assert_eq!(graph.edge_count(), 2);
        let rate = graph.rate(cur("USD"), cur("EUR")).unwrap();
        assert!((rate - 0.96).abs() < 1e-12);
        assert_eq!(
            graph.weight(cur("USD"), cur("EUR")).unwrap(),
            -graph.weight(cur("EUR"), cur("USD")).unwrap()
        );
    }

    #[test]
    fn test_empty_snapshot() {
        let (graph, report) = RateGraph::from_snapshot(&RateSnapshot::new());
        assert!(graph.is_empty());
        assert_eq!(report.inserted, 0);
    }
}
