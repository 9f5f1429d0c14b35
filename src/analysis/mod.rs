// Feature detection, session aggregation, per-bar context and pattern matching
pub mod context;
pub mod detectors;
pub mod filters;
pub mod pipeline;
pub mod rules;
pub mod sessions;

// Re-export commonly used types
pub use context::ContextAssembler;
pub use detectors::analyze_series;
pub use filters::SignalStats;
pub use pipeline::{assemble_signal, run_analysis};
pub use rules::{PatternMatch, PatternRule, RULES, RuleEngine};
pub use sessions::{SessionAggregator, aggregate_session_extremes};
