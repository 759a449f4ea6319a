//! Configuration for fxarb
//!
//! Everything the scan needs that used to be ambient: the candidate currency
//! universe, the notional and noise threshold, the rate file and the date
//! window.

use chrono::NaiveDate;
use eyre::{eyre, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::Path;

use crate::brain::{DEFAULT_EPSILON, DEFAULT_NOTIONAL};
use crate::currency::{default_universe, pair_codes, Currency};
use crate::scanner::ScannerSettings;

const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================
// MAIN CONFIGURATION
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // ========== Universe ==========
    /// Candidate source currencies, tried in this order each day.
    /// Empty = every currency quoted that day.
    pub currencies: Vec<Currency>,

    // ========== Profit Thresholds ==========
    /// Starting amount for replaying a cycle
    pub notional: f64,

    /// Minimum absolute gain on the notional to call it arbitrage
    pub epsilon: f64,

    // ========== Data ==========
    /// JSON rate history, one snapshot per date
    pub rates_path: String,

    /// First date to scan (inclusive)
    pub start_date: Option<NaiveDate>,

    /// Last date to scan (inclusive)
    pub end_date: Option<NaiveDate>,

    // ========== Run Behaviour ==========
    /// Stop at the first day with arbitrage
    pub stop_on_first: bool,

    /// Print each conversion of a found cycle
    pub show_legs: bool,
}

impl Config {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        Ok(Self {
            currencies: match env::var("FX_CURRENCIES") {
                Ok(list) => parse_currency_list(&list)?,
                Err(_) => defaults.currencies,
            },
            notional: env::var("FX_NOTIONAL")
                .unwrap_or_else(|_| DEFAULT_NOTIONAL.to_string())
                .parse()
                .unwrap_or(DEFAULT_NOTIONAL),
            epsilon: env::var("FX_EPSILON")
                .unwrap_or_else(|_| DEFAULT_EPSILON.to_string())
                .parse()
                .unwrap_or(DEFAULT_EPSILON),
            rates_path: env::var("FX_RATES_PATH").unwrap_or(defaults.rates_path),
            start_date: parse_env_date("FX_START_DATE")?,
            end_date: parse_env_date("FX_END_DATE")?,
            stop_on_first: env::var("FX_STOP_ON_FIRST")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            show_legs: env::var("FX_SHOW_LEGS")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
        })
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !self.notional.is_finite() || self.notional <= 0.0 {
            return Err(eyre!(
                "FX_NOTIONAL must be a positive amount (currently {})",
                self.notional
            ));
        }

        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(eyre!(
                "FX_EPSILON must be zero or positive (currently {})",
                self.epsilon
            ));
        }

        let unique: HashSet<_> = self.currencies.iter().collect();
        if unique.len() != self.currencies.len() {
            return Err(eyre!("FX_CURRENCIES lists a currency more than once"));
        }

        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(eyre!(
                    "FX_START_DATE {} is after FX_END_DATE {}",
                    start,
                    end
                ));
            }
        }

        if self.rates_path.trim().is_empty() {
            return Err(eyre!("FX_RATES_PATH is empty"));
        }

        Ok(())
    }

    pub fn scanner_settings(&self) -> ScannerSettings {
        ScannerSettings {
            currencies: self.currencies.clone(),
            notional: self.notional,
            epsilon: self.epsilon,
        }
    }

    /// Every ordered pair over the configured universe, e.g. for requesting
    /// quotes from a data provider
    pub fn pair_codes(&self) -> Vec<String> {
        pair_codes(&self.currencies)
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        let window = match (self.start_date, self.end_date) {
            (None, None) => "all dates".to_string(),
            (start, end) => format!(
                "{} .. {}",
                start.map_or("start".to_string(), |d| d.to_string()),
                end.map_or("end".to_string(), |d| d.to_string())
            ),
        };

        println!("╔════════════════════════════════════════════════════════════╗");
        println!("║                 FXARB - CONFIGURATION                      ║");
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ UNIVERSE                                                   ║");
        println!("║ • Currencies:      {:^40} ║", self.currencies.len());
        println!("║ • Ordered Pairs:   {:^40} ║", self.pair_codes().len());
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ PROFIT THRESHOLDS                                          ║");
        println!("║ • Notional:        {:<40.2} ║", self.notional);
        println!("║ • Epsilon:         {:<40} ║", self.epsilon);
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ DATA                                                       ║");
        println!("║ • Rates File:      {:^40} ║", truncate(&self.rates_path, 40));
        println!("║ • Window:          {:^40} ║", window);
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ RUN                                                        ║");
        println!("║ • Stop On First:   {:^40} ║",
            if self.stop_on_first { "✓ Yes" } else { "✗ Scan all days" }
        );
        println!("║ • Show Legs:       {:^40} ║",
            if self.show_legs { "✓ Enabled" } else { "✗ Disabled" }
        );
        println!("╚════════════════════════════════════════════════════════════╝");
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currencies: default_universe(),
            notional: DEFAULT_NOTIONAL,
            epsilon: DEFAULT_EPSILON,
            rates_path: "./data/rates.json".to_string(),
            start_date: None,
            end_date: None,
            stop_on_first: true,
            show_legs: true,
        }
    }
}

/// Parse `USD,EUR, gbp` into currencies
pub fn parse_currency_list(list: &str) -> Result<Vec<Currency>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<Currency>().map_err(|e| eyre!(e)))
        .collect()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| eyre!("Invalid date {:?} (expected YYYY-MM-DD): {}", s, e))
}

fn parse_env_date(key: &str) -> Result<Option<NaiveDate>> {
    env::var(key).ok().map(|s| parse_date(&s)).transpose()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let tail: String = s.chars().rev().take(max - 3).collect::<Vec<_>>().into_iter().rev().collect();
    format!("...{}", tail)
}

// ============================================
// TESTS
// ============================================
