use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::domain::{Confidence, Session, SignalDirection, Timeframe, Trend};

/// The pattern catalogue. Display names are the labels carried on emitted signals.
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum PatternKind {
    #[strum(to_string = "Sweep + FVG + CISD")]
    SweepFvgCisd,
    #[strum(to_string = "Double Sweep")]
    DoubleSweep,
    #[strum(to_string = "Session Open Liquidity Grab")]
    SessionOpenLiquidityGrab,
    #[strum(to_string = "BOS after Sweep")]
    BosAfterSweep,
    #[strum(to_string = "Asia/Frankfurt Context")]
    AsiaFrankfurtContext,
}

impl PatternKind {
    pub fn confidence(self) -> Confidence {
        match self {
            PatternKind::DoubleSweep => Confidence::VeryHigh,
            PatternKind::SweepFvgCisd
            | PatternKind::SessionOpenLiquidityGrab
            | PatternKind::BosAfterSweep => Confidence::High,
            PatternKind::AsiaFrankfurtContext => Confidence::MediumHigh,
        }
    }
}

/// One emitted trading signal. Immutable once pushed to the output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub timestamp_ms: i64,
    /// UTC, `%Y-%m-%d %H:%M`
    pub datetime: String,
    pub session: Session,
    pub pattern: PatternKind,
    pub direction: SignalDirection,
    pub confidence: Confidence,
    pub reason: String,
    pub trend_h4: Trend,
    pub trend_d1: Trend,
    /// Timeframes whose evidence fired the pattern, finest first
    pub contributing_timeframes: Vec<Timeframe>,
    /// e.g. "sweep=H4, fvg=D1, trend H4/D1=up/down"
    pub timeframes: String,
    /// Close of the base bar
    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn pattern_labels_and_tiers() {
        assert_eq!(PatternKind::SweepFvgCisd.to_string(), "Sweep + FVG + CISD");
        assert_eq!(
            PatternKind::from_str("double sweep").ok(),
            Some(PatternKind::DoubleSweep)
        );
        assert_eq!(PatternKind::DoubleSweep.confidence(), Confidence::VeryHigh);
        assert_eq!(PatternKind::BosAfterSweep.confidence(), Confidence::High);
        assert_eq!(
            PatternKind::AsiaFrankfurtContext.confidence(),
            Confidence::MediumHigh
        );
    }
}
