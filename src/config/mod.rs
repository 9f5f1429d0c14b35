//! Configuration module for the scanner.

pub mod analysis;
pub mod trace;

// Re-export commonly used items
pub use analysis::{ANALYSIS, AnalysisConfig, DetectorSettings, SweepWindows, ZoneSettings};
pub use trace::TraceLevel;
