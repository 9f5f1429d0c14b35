//! Small direction/label enums shared by detectors, the rule engine and signals.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Which way a fair-value gap points.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, Display)]
pub enum FvgDirection {
    #[strum(serialize = "up")]
    Up,
    #[strum(serialize = "down")]
    Down,
}

/// The side of the book a sweep took liquidity from.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, Display)]
pub enum SweepSide {
    #[strum(serialize = "high")]
    High,
    #[strum(serialize = "low")]
    Low,
}

impl SweepSide {
    /// Liquidity taken below the market is a long setup, above is a short.
    pub fn signal_direction(self) -> SignalDirection {
        match self {
            SweepSide::Low => SignalDirection::Buy,
            SweepSide::High => SignalDirection::Sell,
        }
    }
}

/// SMA trend label. `Unknown` while the SMA has too little history.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize, Display)]
pub enum Trend {
    #[strum(serialize = "up")]
    Up,
    #[strum(serialize = "down")]
    Down,
    #[default]
    #[strum(serialize = "unknown")]
    Unknown,
}

impl Trend {
    /// A low-side sweep wants an up trend, a high-side sweep wants a down trend.
    /// Unknown never confirms.
    pub fn confirms(self, side: SweepSide) -> bool {
        matches!(
            (self, side),
            (Trend::Up, SweepSide::Low) | (Trend::Down, SweepSide::High)
        )
    }
}

/// Break-of-structure direction (close beyond the prior rolling extreme).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, Display)]
pub enum BosDirection {
    #[strum(serialize = "bullish")]
    Bullish,
    #[strum(serialize = "bearish")]
    Bearish,
}

impl BosDirection {
    pub fn signal_direction(self) -> SignalDirection {
        match self {
            BosDirection::Bullish => SignalDirection::Buy,
            BosDirection::Bearish => SignalDirection::Sell,
        }
    }
}

#[derive(
    Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum SignalDirection {
    #[strum(serialize = "BUY", ascii_case_insensitive)]
    Buy,
    #[strum(serialize = "SELL", ascii_case_insensitive)]
    Sell,
}

/// Confidence tier attached to a pattern. Ordered weakest to strongest.
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
pub enum Confidence {
    #[strum(serialize = "MEDIUM-HIGH", ascii_case_insensitive)]
    MediumHigh,
    #[strum(serialize = "HIGH", ascii_case_insensitive)]
    High,
    #[strum(serialize = "VERY HIGH", ascii_case_insensitive)]
    VeryHigh,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn trend_gate_matches_sweep_side() {
        assert!(Trend::Up.confirms(SweepSide::Low));
        assert!(Trend::Down.confirms(SweepSide::High));
        assert!(!Trend::Up.confirms(SweepSide::High));
        assert!(!Trend::Unknown.confirms(SweepSide::Low));
        assert!(!Trend::Unknown.confirms(SweepSide::High));
    }

    #[test]
    fn confidence_tiers_are_ordered() {
        assert!(Confidence::VeryHigh > Confidence::High);
        assert!(Confidence::High > Confidence::MediumHigh);
        assert_eq!(Confidence::from_str("very high").ok(), Some(Confidence::VeryHigh));
        assert_eq!(Confidence::VeryHigh.to_string(), "VERY HIGH");
    }

    #[test]
    fn sweep_side_maps_to_trade_direction() {
        assert_eq!(SweepSide::Low.signal_direction(), SignalDirection::Buy);
        assert_eq!(SweepSide::High.signal_direction(), SignalDirection::Sell);
        assert_eq!(BosDirection::Bearish.signal_direction(), SignalDirection::Sell);
    }
}
