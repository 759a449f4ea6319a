//! Profit Filter
//!
//! Step 2.2: The Filter
//!
//! Replays a validated cycle in rate space, starting from a notional amount
//! of the first currency, and filters out "profit" that is only
//! floating-point noise.

use console::style;

use super::{ArbitrageCycle, CycleDefect};
use crate::cartographer::RateGraph;
use crate::currency::Currency;

/// Default starting amount, in units of the cycle's first currency
pub const DEFAULT_NOTIONAL: f64 = 100.0;

/// Minimum absolute gain on the notional before a cycle counts as arbitrage
pub const DEFAULT_EPSILON: f64 = 0.001;

/// One conversion along the cycle
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionLeg {
    pub from: Currency,
    pub to: Currency,
    pub rate: f64,
    /// Running amount after this conversion, in units of `to`
    pub amount: f64,
}

/// Result of replaying a cycle
#[derive(Debug, Clone, PartialEq)]
pub struct ProfitAnalysis {
    pub cycle: ArbitrageCycle,
    pub legs: Vec<ConversionLeg>,
    pub notional: f64,
    pub final_amount: f64,
    pub profit: f64,
    pub profit_percent: f64,
    pub is_profitable: bool,
}

impl ProfitAnalysis {
    /// Compounded rate over the whole cycle
    pub fn return_multiplier(&self) -> f64 {
        self.final_amount / self.notional
    }

    /// Print each conversion and the total, the way an analyst would walk it
    pub fn print_conversions(&self) {
        let Some(start) = self.cycle.start() else {
            return;
        };

        println!("Starting with {:.2} {}", self.notional, start);
        for leg in &self.legs {
            println!(
                "  Convert {} to {}: {:.2} {} (rate: {:.4})",
                leg.from, leg.to, leg.amount, leg.to, leg.rate
            );
        }

        let total = format!(
            "Total profit: {:.2} {} ({:.2}%)",
            self.profit, start, self.profit_percent
        );
        if self.is_profitable {
            println!("{}", style(total).green().bold());
        } else {
            println!("{}", style(total).dim());
        }
    }
}

/// Profit calculator and noise filter
#[derive(Debug, Clone, Copy)]
pub struct ProfitFilter {
    notional: f64,
    epsilon: f64,
}

impl ProfitFilter {
    pub fn new(notional: f64, epsilon: f64) -> Self {
        Self { notional, epsilon }
    }

    pub fn notional(&self) -> f64 {
        self.notional
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Compound the rates of every edge on the cycle. Edges are read back out
    /// of the graph, so a cycle that is not in the graph is an error value.
    pub fn analyze(
        &self,
        cycle: &ArbitrageCycle,
        graph: &RateGraph,
    ) -> Result<ProfitAnalysis, CycleDefect> {
        let mut amount = self.notional;
        let mut legs = Vec::with_capacity(cycle.hop_count());

        for (from, to) in cycle.legs() {
            let edge = graph
                .edge(from, to)
                .ok_or(CycleDefect::MissingEdge { from, to })?;

            let rate = edge.rate();
            amount *= rate;
            legs.push(ConversionLeg {
                from,
                to,
                rate,
                amount,
            });
        }

        let profit = amount - self.notional;
        let profit_percent = profit / self.notional * 100.0;

        Ok(ProfitAnalysis {
            cycle: cycle.clone(),
            legs,
            notional: self.notional,
            final_amount: amount,
            profit,
            profit_percent,
            is_profitable: self.is_profitable(amount),
        })
    }

    /// Strictly more than `notional + epsilon` back
    pub fn is_profitable(&self, final_amount: f64) -> bool {
        final_amount - self.notional > self.epsilon
    }
}

impl Default for ProfitFilter {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIONAL, DEFAULT_EPSILON)
    }
}
