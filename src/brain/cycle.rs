//! Arbitrage cycles and their validation

use std::collections::HashSet;
use thiserror::Error;

use crate::cartographer::RateGraph;
use crate::currency::Currency;

/// Why a candidate cycle was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CycleDefect {
    #[error("cycle has {0} entries, need at least 3")]
    TooShort(usize),

    #[error("cycle does not return to its starting currency")]
    NotClosed,

    #[error("no rate for {from} -> {to}")]
    MissingEdge { from: Currency, to: Currency },
}

/// A closed walk of conversions: `path[0] == path[last]`, in the order the
/// conversions are performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArbitrageCycle {
    pub path: Vec<Currency>,
}

impl ArbitrageCycle {
    pub fn new(path: Vec<Currency>) -> Self {
        Self { path }
    }

    pub fn start(&self) -> Option<Currency> {
        self.path.first().copied()
    }

    pub fn hop_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn contains(&self, currency: Currency) -> bool {
        self.path.contains(&currency)
    }

    /// Consecutive (from, to) conversions
    pub fn legs(&self) -> impl Iterator<Item = (Currency, Currency)> + '_ {
        self.path.windows(2).map(|w| (w[0], w[1]))
    }

    pub fn unique_currency_count(&self) -> usize {
        let unique: HashSet<_> = self.path.iter().collect();
        unique.len()
    }

    /// Structural checks plus: every consecutive pair must be an edge of
    /// the graph the cycle was reconstructed from.
    pub fn validate(&self, graph: &RateGraph) -> Result<(), CycleDefect> {
        if self.path.len() < 3 {
            return Err(CycleDefect::TooShort(self.path.len()));
        }

        if self.path.first() != self.path.last() {
            return Err(CycleDefect::NotClosed);
        }

        for (from, to) in self.legs() {
            if !graph.has_edge(from, to) {
                return Err(CycleDefect::MissingEdge { from, to });
            }
        }

        Ok(())
    }

    /// Same cycle, entered at `currency` instead. `None` if it is not on the
    /// cycle.
    pub fn rotated_to(&self, currency: Currency) -> Option<Self> {
        if self.path.len() < 2 || self.path.first() != self.path.last() {
            return None;
        }

        let open = &self.path[..self.path.len() - 1];
        let idx = open.iter().position(|&c| c == currency)?;

        let mut path: Vec<Currency> = open[idx..].iter().chain(&open[..idx]).copied().collect();
        path.push(currency);

        Some(Self { path })
    }

    pub fn format_path(&self) -> String {
        self.path
            .iter()
            .map(Currency::as_str)
            .collect::<Vec<_>>()
            .join(" → ")
    }
}
