//! Bellman-Ford Negative Cycle Detection
//!
//! Step 2.1: The Pathfinder
//!
//! Classic |V|-1 relaxation passes from a source, then one more pass: any
//! edge that still relaxes sits on, or downstream of, a negative cycle.
//! The predecessor links are then walked back to recover that cycle.
//!
//! An update must beat the current distance by more than
//! `RELAXATION_TOLERANCE`. Without it, rounding in `(d + w) - w` makes
//! zero-weight there-and-back pairs look negative once distances go below
//! zero, and those phantom loops can hide the real cycle.

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use tracing::debug;

use super::ArbitrageCycle;
use crate::cartographer::RateGraph;
use crate::currency::Currency;

/// Minimum improvement, in log space, for an edge to relax
pub const RELAXATION_TOLERANCE: f64 = 1e-12;

/// Outcome of a single-source run
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    /// Source currency has no quotes that day
    SourceNotInGraph,
    /// No negative cycle reachable from the source
    NoNegativeCycle,
    /// `node` is on, or reachable from, a negative cycle. The predecessor map
    /// (indexed by node index) is the evidence.
    NegativeCycleAt {
        node: NodeIndex,
        predecessors: Vec<Option<NodeIndex>>,
    },
}

pub struct NegativeCycleDetector<'a> {
    graph: &'a RateGraph,
}

impl<'a> NegativeCycleDetector<'a> {
    pub fn new(graph: &'a RateGraph) -> Self {
        Self { graph }
    }

    pub fn detect(&self, source: Currency) -> Detection {
        let Some(source_node) = self.graph.get_node(source) else {
            return Detection::SourceNotInGraph;
        };

        let graph = &self.graph.graph;
        let node_count = graph.node_count();

        let mut distance = vec![f64::INFINITY; node_count];
        let mut predecessors: Vec<Option<NodeIndex>> = vec![None; node_count];
        distance[source_node.index()] = 0.0;

        for pass in 0..node_count.saturating_sub(1) {
            let mut changed = false;

            for edge in graph.edge_references() {
                let (u, v) = (edge.source().index(), edge.target().index());
                if !distance[u].is_finite() {
                    continue;
                }

                let candidate = distance[u] + edge.weight().weight;
                if candidate < distance[v] - RELAXATION_TOLERANCE {
                    distance[v] = candidate;
                    predecessors[v] = Some(edge.source());
                    changed = true;
                }
            }

            // Converged early, so the check pass cannot find anything either
            if !changed {
                debug!("{}: converged after {} passes", source, pass + 1);
                return Detection::NoNegativeCycle;
            }
        }

        for edge in graph.edge_references() {
            let (u, v) = (edge.source().index(), edge.target().index());
            if distance[u].is_finite()
                && distance[u] + edge.weight().weight < distance[v] - RELAXATION_TOLERANCE
            {
                return Detection::NegativeCycleAt {
                    node: edge.target(),
                    predecessors,
                };
            }
        }

        Detection::NoNegativeCycle
    }
}

/// Walk predecessor links back from `node` until a node repeats, and return
/// the loop in conversion order (closed: first == last).
///
/// `None` when the walk runs out of predecessors before looping, or the map
/// refers to nodes the graph does not have.
pub fn extract_cycle(
    graph: &RateGraph,
    node: NodeIndex,
    predecessors: &[Option<NodeIndex>],
) -> Option<ArbitrageCycle> {
    let mut seen = vec![false; predecessors.len()];
    let mut walk: Vec<NodeIndex> = Vec::new();
    let mut current = node;

    while !*seen.get(current.index())? {
        seen[current.index()] = true;
        walk.push(current);
        current = (*predecessors.get(current.index())?)?;
    }

    let first = walk.iter().position(|&n| n == current)?;
    let mut nodes = walk.split_off(first);
    nodes.push(current);

    // Predecessor order is backwards in time
    nodes.reverse();

    let path = nodes
        .into_iter()
        .map(|n| graph.get_currency(n))
        .collect::<Option<Vec<_>>>()?;

    Some(ArbitrageCycle::new(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartographer::RateSnapshot;

    fn cur(code: &str) -> Currency {
        code.parse().unwrap()
    }

    fn graph_of(entries: &[(&str, f64)]) -> RateGraph {
        let snapshot: RateSnapshot = entries
            .iter()
            .map(|(pair, rate)| (pair.to_string(), Some(*rate)))
            .collect();
        RateGraph::from_snapshot(&snapshot).0
    }

    #[test]
    fn test_detects_known_cycle() {
        let graph = graph_of(&[("USDEUR", 0.95), ("EURGBP", 1.0526), ("GBPUSD", 1.05)]);
        let detector = NegativeCycleDetector::new(&graph);

        let Detection::NegativeCycleAt { node, predecessors } = detector.detect(cur("USD")) else {
            panic!("expected a negative cycle");
        };

        let cycle = extract_cycle(&graph, node, &predecessors).expect("cycle");
        assert!(cycle.validate(&graph).is_ok());

        let rotated = cycle.rotated_to(cur("USD")).expect("USD on cycle");
        let expected: Vec<Currency> = ["USD", "EUR", "GBP", "USD"].iter().map(|c| cur(c)).collect();
        assert_eq!(rotated.path, expected);
    }

    #[test]
    fn test_hub_quotes_have_no_cycle() {
        // Every pair goes through USD, so the only cycles are the zero-weight
        // there-and-back ones
        let graph = graph_of(&[
            ("USDEUR", 0.9213),
            ("GBPUSD", 1.2711),
            ("USDJPY", 151.37),
            ("USDCHF", 0.8812),
        ]);
        let detector = NegativeCycleDetector::new(&graph);
        assert_eq!(detector.detect(cur("USD")), Detection::NoNegativeCycle);

        let pair = graph_of(&[("USDEUR", 0.95)]);
        let detector = NegativeCycleDetector::new(&pair);
        assert_eq!(detector.detect(cur("USD")), Detection::NoNegativeCycle);
        assert_eq!(detector.detect(cur("EUR")), Detection::NoNegativeCycle);
    }

    #[test]
    fn test_consistent_cross_rates_have_no_cycle() {
        let graph = graph_of(&[
            ("USDEUR", 0.9),
            ("EURGBP", 0.85),
            ("USDGBP", 0.9 * 0.85),
            ("USDJPY", 150.0),
            ("EURJPY", 150.0 / 0.9),
        ]);
        let detector = NegativeCycleDetector::new(&graph);

        for source in ["USD", "EUR", "GBP", "JPY"] {
            assert_eq!(
                detector.detect(cur(source)),
                Detection::NoNegativeCycle,
                "phantom cycle from {}",
                source
            );
        }
    }

    #[test]
    fn test_unknown_source() {
        let graph = graph_of(&[("USDEUR", 0.95)]);
        let detector = NegativeCycleDetector::new(&graph);
        assert_eq!(detector.detect(cur("CHF")), Detection::SourceNotInGraph);
    }

    #[test]
    fn test_unreachable_cycle_not_reported() {
        // USD/EUR is an island; the profitable triangle lives elsewhere
        let graph = graph_of(&[
            ("USDEUR", 0.95),
            ("CHFJPY", 160.0),
            ("JPYCAD", 0.0095),
            ("CADCHF", 0.70),
        ]);
        let detector = NegativeCycleDetector::new(&graph);

        assert_eq!(detector.detect(cur("USD")), Detection::NoNegativeCycle);
        assert!(matches!(
            detector.detect(cur("CHF")),
            Detection::NegativeCycleAt { .. }
        ));
    }

    #[test]
    fn test_walk_dead_end_yields_none() {
        let graph = graph_of(&[("USDEUR", 0.95), ("EURGBP", 1.0526)]);
        let usd = graph.get_node(cur("USD")).unwrap();
        let eur = graph.get_node(cur("EUR")).unwrap();
        let gbp = graph.get_node(cur("GBP")).unwrap();

        let mut predecessors = vec![None; graph.node_count()];
        predecessors[eur.index()] = Some(usd);
        predecessors[gbp.index()] = Some(eur);

        assert!(extract_cycle(&graph, gbp, &predecessors).is_none());
    }

    #[test]
    fn test_synthetic_mismatch_rejected_by_validation() {
        // Only USD<->EUR and EUR<->GBP are quoted: no GBP -> USD edge
        let graph = graph_of(&[("USDEUR", 0.95), ("EURGBP", 1.0526)]);
        let usd = graph.get_node(cur("USD")).unwrap();
        let eur = graph.get_node(cur("EUR")).unwrap();
        let gbp = graph.get_node(cur("GBP")).unwrap();

        // Claims GBP -> USD was relaxed, which the graph cannot support
        let mut predecessors = vec![None; graph.node_count()];
        predecessors[eur.index()] = Some(usd);
        predecessors[gbp.index()] = Some(eur);
        predecessors[usd.index()] = Some(gbp);

        let cycle = extract_cycle(&graph, usd, &predecessors).expect("walk loops");
        assert_eq!(cycle.hop_count(), 3);
        assert!(cycle.validate(&graph).is_err());
    }
}
