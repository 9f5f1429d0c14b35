//! Structured errors for malformed input and configuration.

use thiserror::Error;

use crate::domain::Timeframe;

/// Which candle invariant a series broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SeriesErrorKind {
    #[error("column lengths differ")]
    ColumnLengthMismatch,
    #[error("timestamp is not strictly greater than the previous one")]
    NonMonotonicTimestamp,
    #[error("negative volume")]
    NegativeVolume,
    #[error("high/low do not contain open/close")]
    OhlcInvariant,
    #[error("non-finite price or volume")]
    NonFinitePrice,
}

/// Reasons the scanner refuses to start a run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{timeframe} series rejected at bar {index}: {kind}")]
    Series {
        timeframe: Timeframe,
        index: usize,
        kind: SeriesErrorKind,
    },
    #[error("no {0} series supplied (base resolution is required)")]
    MissingBase(Timeframe),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ValidationError {
    pub fn series(timeframe: Timeframe, index: usize, kind: SeriesErrorKind) -> Self {
        ValidationError::Series {
            timeframe,
            index,
            kind,
        }
    }
}
