//! Daily rate history
//!
//! A date-ordered series of snapshots, read from a JSON file of the form
//! `{"2024-01-02": {"USDEUR=X": 0.95, "EURGBP=X": null}, ...}`.

use chrono::NaiveDate;
use eyre::{eyre, Result, WrapErr};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use tracing::info;

use super::snapshot::{usable_rate, RateIssue, RateSnapshot};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default)]
pub struct RateHistory {
    days: BTreeMap<NaiveDate, RateSnapshot>,
}

impl RateHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, RateSnapshot> =
            serde_json::from_str(json).wrap_err("Failed to parse rate history JSON")?;

        let mut history = Self::new();
        for (date, snapshot) in raw {
            let day = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
                .map_err(|e| eyre!("Invalid date {:?} in rate history: {}", date, e))?;
            history.insert(day, snapshot);
        }

        Ok(history)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read rate history {}", path.display()))?;
        let history = Self::from_json_str(&content)?;

        info!(
            "Loaded {} days, {} pairs from {}",
            history.len(),
            history.pair_codes().len(),
            path.display()
        );

        Ok(history)
    }

    pub fn insert(&mut self, date: NaiveDate, snapshot: RateSnapshot) {
        self.days.insert(date, snapshot);
    }

    pub fn get(&self, date: NaiveDate) -> Option<&RateSnapshot> {
        self.days.get(&date)
    }

    /// Days in ascending date order
    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &RateSnapshot)> {
        self.days.iter()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.days.keys().copied().collect()
    }

    /// Every pair code seen on any day
    pub fn pair_codes(&self) -> BTreeSet<String> {
        self.days
            .values()
            .flat_map(|snapshot| snapshot.keys().cloned())
            .collect()
    }

    /// Remove pairs that never carry a quote on any day. Returns how many
    /// were dropped.
    pub fn drop_empty_pairs(&mut self) -> usize {
        let quoted: BTreeSet<String> = self
            .days
            .values()
            .flat_map(|snapshot| {
                snapshot
                    .iter()
                    .filter(|(_, rate)| !matches!(usable_rate(**rate), Err(RateIssue::Missing)))
                    .map(|(pair, _)| pair.clone())
            })
            .collect();

        let empty: Vec<String> = self
            .pair_codes()
            .into_iter()
            .filter(|pair| !quoted.contains(pair))
            .collect();

        for snapshot in self.days.values_mut() {
            for pair in &empty {
                snapshot.remove(pair);
            }
        }

        empty.len()
    }

    /// Restrict to an inclusive date window. Open ends are unbounded.
    pub fn within(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        let days = self
            .days
            .iter()
            .filter(|(day, _)| start.map_or(true, |s| **day >= s))
            .filter(|(day, _)| end.map_or(true, |e| **day <= e))
            .map(|(day, snapshot)| (*day, snapshot.clone()))
            .collect();

        Self { days }
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
