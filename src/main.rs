use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;

use ict_scanner::analysis::filters::{filter_by_min_confidence, filter_by_session};
use ict_scanner::{ANALYSIS, AnalysisConfig, Cli, Signal, SignalStats, load_market_data, run_analysis};

fn load_config(args: &Cli) -> Result<AnalysisConfig> {
    match &args.config {
        Some(path) => {
            let file = File::open(path)
                .context(format!("Failed to open config file: {}", path.display()))?;
            let config = serde_json::from_reader(BufReader::new(file))
                .context(format!("Failed to parse config file: {}", path.display()))?;
            Ok(config)
        }
        None => Ok(ANALYSIS),
    }
}

fn main() -> Result<()> {
    // A. Init Logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    // C. Data Loading
    let config = load_config(&args)?;
    let market = load_market_data(&args.data_dir, &args.symbol)?;

    // D. Scan
    let signals = run_analysis(&market, &config, args.trace)
        .context(format!("Scan of {} rejected", market.name))?;

    let mut selected: Vec<&Signal> = signals.iter().collect();
    if let Some(min) = args.min_confidence {
        selected = filter_by_min_confidence(selected, min);
    }
    if let Some(session) = args.session {
        selected = filter_by_session(selected, session);
    }

    // E. Output: one JSON object per line, then a summary
    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for signal in &selected {
        serde_json::to_writer(&mut out, signal).context("Failed to serialize signal")?;
        writeln!(out)?;
    }
    out.flush()?;

    let stats = SignalStats::from_signals(&signals);
    log::info!(
        "{}: {} signals ({} printed), by direction {:?}, by session {:?}",
        market.name,
        stats.total,
        selected.len(),
        stats.by_direction,
        stats.by_session
    );
    for (pattern, count) in stats.patterns_by_count() {
        log::info!("  {}: {}", pattern, count);
    }

    Ok(())
}
