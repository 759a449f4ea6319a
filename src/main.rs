//! fxarb - Historical Currency Arbitrage Scanner
//!
//! Run with: cargo run -- --rates data/rates.json
//!
//! Loads a daily rate history, then checks each day for a conversion cycle
//! that returns more than it started with.

use clap::Parser;
use color_eyre::eyre::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fxarb::config::{parse_currency_list, parse_date};
use fxarb::scanner::DayOutcome;
use fxarb::{Config, DailyScanner, HistoricalScan, RateHistory};

#[derive(Debug, Parser)]
#[command(name = "fxarb", version, about = "Scan historical FX rates for arbitrage cycles")]
struct Args {
    /// TOML config file (otherwise FX_* environment variables / .env)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON rate history, overrides the configured path
    #[arg(short, long)]
    rates: Option<PathBuf>,

    /// Comma-separated candidate currencies, overrides the configured list
    #[arg(long)]
    currencies: Option<String>,

    /// First date to scan (YYYY-MM-DD)
    #[arg(long)]
    start: Option<String>,

    /// Last date to scan (YYYY-MM-DD)
    #[arg(long)]
    end: Option<String>,

    /// Keep scanning after the first day with arbitrage
    #[arg(long)]
    all_days: bool,
}

fn print_banner() {
    println!();
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!(
        "{}",
        style(" 💱 FXARB - Historical Currency Arbitrage Scanner").cyan().bold()
    );
    println!(
        "{}",
        style("    Log-space graph | Bellman-Ford | Noise-filtered profit").cyan()
    );
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!();
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };

    if let Some(rates) = &args.rates {
        config.rates_path = rates.display().to_string();
    }
    if let Some(list) = &args.currencies {
        config.currencies = parse_currency_list(list)?;
    }
    if let Some(start) = &args.start {
        config.start_date = Some(parse_date(start)?);
    }
    if let Some(end) = &args.end {
        config.end_date = Some(parse_date(end)?);
    }
    if args.all_days {
        config.stop_on_first = false;
    }

    Ok(config)
}

fn print_hit(outcome: &DayOutcome, show_legs: bool) {
    let Some(analysis) = outcome.result.opportunity() else {
        return;
    };

    println!();
    println!(
        "{} Arbitrage opportunity found on {}!",
        style("💰").green(),
        style(outcome.date).bold()
    );
    println!("   Path: {}", style(analysis.cycle.format_path()).cyan());
    println!(
        "   Return: {:.6}x ({:+.4}%)",
        analysis.return_multiplier(),
        analysis.profit_percent
    );

    if show_legs {
        println!();
        analysis.print_conversions();
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fxarb=info".parse()?),
        )
        .init();

    let args = Args::parse();

    print_banner();

    let config = load_config(&args)?;

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        return Err(e);
    }

    config.print_summary();
    println!();

    // =============================================
    // PHASE 1: THE CARTOGRAPHER
    // =============================================
    println!(
        "{}",
        style("═══ PHASE 1: THE CARTOGRAPHER ═══").blue().bold()
    );
    println!();

    println!("{}", style("Step 1.1: Loading rate history...").blue());
    let start = Instant::now();

    let mut history = RateHistory::from_file(&config.rates_path)?;
    let dropped = history.drop_empty_pairs();
    let history = history.within(config.start_date, config.end_date);

    println!(
        "{} Loaded {} days, {} pairs in {:?}",
        style("✓").green(),
        history.len(),
        history.pair_codes().len(),
        start.elapsed()
    );
    if dropped > 0 {
        println!("   Dropped {} pairs with no quotes on any day", dropped);
    }

    // =============================================
    // PHASE 2 + 3: THE BRAIN, DAY BY DAY
    // =============================================
    println!();
    println!(
        "{}",
        style("═══ PHASE 2: THE BRAIN ═══").magenta().bold()
    );
    println!();
    println!(
        "{}",
        style("Step 2.1: Running Bellman-Ford over each day...").magenta()
    );

    let start = Instant::now();
    let scanner = DailyScanner::new(config.scanner_settings());
    let scan = HistoricalScan::new(&scanner, config.stop_on_first);

    let progress = ProgressBar::new(history.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{bar:40.magenta}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let summary = scan.run_with(&history, |outcome| {
        progress.set_message(outcome.date.to_string());
        progress.inc(1);
        if outcome.result.is_arbitrage() {
            progress.suspend(|| print_hit(outcome, config.show_legs));
        }
    });
    progress.finish_and_clear();

    println!(
        "{} Scanned {} days in {:?}",
        style("✓").green(),
        summary.days_scanned,
        start.elapsed()
    );

    // =============================================
    // SUMMARY
    // =============================================
    println!();
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").green()
    );
    println!("{}", style(" ✅ SCAN COMPLETE").green().bold());
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").green()
    );
    println!();
    println!("Summary:");
    println!("  • Days scanned: {} of {}", summary.days_scanned, history.len());
    println!("  • Days with arbitrage: {}", summary.hits.len());
    println!("  • Invalid rates skipped: {}", summary.invalid_rates);
    if let Some(first) = summary.first_hit() {
        println!("  • First opportunity: {}", first.date);
    }
    if summary.stopped_early {
        println!("  • Stopped at first opportunity (pass --all-days to continue)");
    }
    println!();

    if !summary.found_arbitrage() {
        println!(
            "{}",
            style("No arbitrage opportunities found in the scanned window.").yellow()
        );
    }

    Ok(())
}
