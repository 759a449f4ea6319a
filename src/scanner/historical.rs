//! Historical Scan
//!
//! Step 3.2: Walk the rate history one day at a time, oldest first, and
//! optionally stop at the first day with arbitrage.

use chrono::NaiveDate;
use tracing::info;

use super::{DailyScanner, DetectionResult};
use crate::cartographer::{BuildReport, RateHistory};

/// What a single day produced
#[derive(Debug, Clone)]
pub struct DayOutcome {
    pub date: NaiveDate,
    pub result: DetectionResult,
    pub build: BuildReport,
}

#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    pub days_scanned: usize,
    pub invalid_rates: usize,
    /// Days with arbitrage, in date order
    pub hits: Vec<DayOutcome>,
    pub stopped_early: bool,
}

impl ScanSummary {
    pub fn first_hit(&self) -> Option<&DayOutcome> {
        self.hits.first()
    }

    pub fn found_arbitrage(&self) -> bool {
        !self.hits.is_empty()
    }
}

pub struct HistoricalScan<'a> {
    scanner: &'a DailyScanner,
    stop_on_first: bool,
}

impl<'a> HistoricalScan<'a> {
    pub fn new(scanner: &'a DailyScanner, stop_on_first: bool) -> Self {
        Self {
            scanner,
            stop_on_first,
        }
    }

    pub fn run(&self, history: &RateHistory) -> ScanSummary {
        self.run_with(history, |_| {})
    }

    /// Scan every day, calling `on_day` after each one
    pub fn run_with<F>(&self, history: &RateHistory, mut on_day: F) -> ScanSummary
    where
        F: FnMut(&DayOutcome),
    {
        let mut summary = ScanSummary::default();

        for (date, snapshot) in history.iter() {
            let (result, build) = self.scanner.scan_with_report(snapshot);
            let outcome = DayOutcome {
                date: *date,
                result,
                build,
            };

            summary.days_scanned += 1;
            summary.invalid_rates += outcome.build.invalid;
            on_day(&outcome);

            if outcome.result.is_arbitrage() {
                info!("Arbitrage opportunity found on {}", outcome.date);
                summary.hits.push(outcome);

                if self.stop_on_first {
                    info!("Stopping search at first opportunity");
                    summary.stopped_early = true;
                    break;
                }
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartographer::RateSnapshot;
    use crate::scanner::ScannerSettings;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn quiet() -> RateSnapshot {
        [("USDEUR".to_string(), Some(0.95)), ("EURGBP".to_string(), None)]
            .into_iter()
            .collect()
    }

    fn profitable() -> RateSnapshot {
        [
            ("USDEUR".to_string(), Some(0.95)),
            ("EURGBP".to_string(), Some(1.0526)),
            ("GBPUSD".to_string(), Some(1.05)),
            ("USDCHF".to_string(), Some(-1.0)),
        ]
        .into_iter()
        .collect()
    }

    fn history() -> RateHistory {
        let mut history = RateHistory::new();
        history.insert(day("2024-01-02"), quiet());
        history.insert(day("2024-01-03"), profitable());
        history.insert(day("2024-01-04"), quiet());
        history.insert(day("2024-01-05"), profitable());
        history
    }

    fn scanner() -> DailyScanner {
        DailyScanner::new(ScannerSettings {
            currencies: ["USD", "EUR", "GBP"].iter().map(|c| c.parse().unwrap()).collect(),
            ..ScannerSettings::default()
        })
    }

    #[test]
    fn test_stops_on_first_hit() {
        let scanner = scanner();
        let summary = HistoricalScan::new(&scanner, true).run(&history());

        assert_eq!(summary.days_scanned, 2);
        assert!(summary.stopped_early);
        assert_eq!(summary.hits.len(), 1);
        assert_eq!(summary.first_hit().unwrap().date, day("2024-01-03"));
        assert_eq!(summary.invalid_rates, 1);
    }

    #[test]
    fn test_scans_all_days() {
        let scanner = scanner();
        let mut seen = Vec::new();
        let summary = HistoricalScan::new(&scanner, false)
            .run_with(&history(), |outcome| seen.push(outcome.date));

        assert_eq!(summary.days_scanned, 4);
        assert!(!summary.stopped_early);
        assert_eq!(summary.hits.len(), 2);
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[0], day("2024-01-02"));
    }

    #[test]
    fn test_empty_history() {
        let scanner = scanner();
        let summary = HistoricalScan::new(&scanner, true).run(&RateHistory::new());
        assert_eq!(summary.days_scanned, 0);
        assert!(!summary.found_arbitrage());
    }
}
