//! Diagnostic tool - Check configuration and rate file
//!
//! Run with: cargo run --bin diagnose

use std::env;
use std::path::Path;

use fxarb::{Config, RateHistory};

fn main() {
    println!("🔍 FXARB DIAGNOSTIC CHECK\n");

    dotenvy::dotenv().ok();

    println!("═══════════════════════════════════════════════════");
    println!("                  CONFIGURATION                     ");
    println!("═══════════════════════════════════════════════════\n");

    let checks = [
        ("FX_RATES_PATH", "./data/rates.json", "Daily rate history (JSON)"),
        ("FX_CURRENCIES", "35-currency default universe", "Candidate source currencies"),
        ("FX_NOTIONAL", "100", "Starting amount per cycle"),
        ("FX_EPSILON", "0.001", "Minimum gain to count as arbitrage"),
        ("FX_START_DATE", "(none)", "First date scanned"),
        ("FX_END_DATE", "(none)", "Last date scanned"),
        ("FX_STOP_ON_FIRST", "true", "Stop at first opportunity?"),
        ("FX_SHOW_LEGS", "true", "Print each conversion?"),
    ];

    for (key, default, desc) in checks {
        let value = env::var(key).unwrap_or_else(|_| default.to_string());
        let is_default = env::var(key).is_err();
        let marker = if is_default { "(default)" } else { "(from .env)" };
        println!("  {}: {} {}", key, value, marker);
        println!("    └─ {}\n", desc);
    }

    println!("═══════════════════════════════════════════════════");
    println!("                   VALIDATION                       ");
    println!("═══════════════════════════════════════════════════\n");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            println!("  ❌ Could not load configuration: {}", e);
            return;
        }
    };

    match config.validate() {
        Ok(()) => println!("  ✅ Configuration is valid"),
        Err(e) => println!("  ❌ {}", e),
    }

    println!("  Currencies: {}", config.currencies.len());
    println!("  Ordered pairs in universe: {}", config.pair_codes().len());

    println!("\n═══════════════════════════════════════════════════");
    println!("                   RATE FILE                        ");
    println!("═══════════════════════════════════════════════════\n");

    if !Path::new(&config.rates_path).exists() {
        println!("  ❌ {} not found", config.rates_path);
        println!("     Export daily closes as {{\"YYYY-MM-DD\": {{\"USDEUR=X\": 0.92, ...}}}}");
        println!("\n✅ Diagnostic complete!\n");
        return;
    }

    match RateHistory::from_file(&config.rates_path) {
        Ok(mut history) => {
            let pairs = history.pair_codes().len();
            let dropped = history.drop_empty_pairs();
            let dates = history.dates();

            println!("  ✅ {} days, {} pairs", history.len(), pairs);
            if let (Some(first), Some(last)) = (dates.first(), dates.last()) {
                println!("     Range: {} → {}", first, last);
            }
            if dropped > 0 {
                println!("  ⚠️  {} pairs never quoted on any day", dropped);
            }
        }
        Err(e) => println!("  ❌ Could not read rate file: {:#}", e),
    }

    println!("\n✅ Diagnostic complete!\n");
}
