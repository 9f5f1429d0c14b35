#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::type_complexity)]

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod errors;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use analysis::{RuleEngine, SignalStats, run_analysis};
pub use config::{ANALYSIS, AnalysisConfig, TraceLevel};
pub use data::{MarketData, load_market_data};
pub use domain::{Candle, Confidence, Session, SignalDirection, Timeframe};
pub use errors::{SeriesErrorKind, ValidationError};
pub use models::{OhlcvTimeSeries, PatternKind, Signal};

// CLI argument parsing
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding <SYMBOL>_<TF>.csv files
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Instrument prefix of the csv files, e.g. GBPUSD
    #[arg(long, default_value = "GBPUSD")]
    pub symbol: String,

    /// JSON file overriding parts of the analysis configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// off | signals | bars
    #[arg(long, default_value_t = TraceLevel::Off)]
    pub trace: TraceLevel,

    /// Only print signals at or above this confidence (e.g. "HIGH", "very high")
    #[arg(long)]
    pub min_confidence: Option<Confidence>,

    /// Only print signals from this session (e.g. "london", "new york")
    #[arg(long)]
    pub session: Option<Session>,
}
