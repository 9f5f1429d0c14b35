// Data models for the scanner
// Series, derived features and the records the analysis passes hand to each other

pub mod context;
pub mod features;
pub mod session_extremes;
pub mod signal;
pub mod timeseries;
pub mod zones;

// Re-export key types for convenience
pub use context::{EvaluationContext, StructureBreak, SweepEvidence, ZoneTouch};
pub use features::{AnalyzedSeries, BarFeatures, FeatureColumns, FvgGap};
pub use session_extremes::{SessionExtremes, SessionRange};
pub use signal::{PatternKind, Signal};
pub use timeseries::OhlcvTimeSeries;
pub use zones::{FvgZone, ZoneRegistry};
