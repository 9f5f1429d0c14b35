use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::utils::TimeUtils;

/// The five resolutions the scanner works with.
///
/// Variant order is finest to coarsest, so `Ord` (and any `BTreeMap` keyed by
/// timeframe) walks them in that order.
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
pub enum Timeframe {
    #[strum(to_string = "M1", serialize = "1m")]
    M1,
    #[strum(to_string = "M15", serialize = "15m")]
    M15,
    #[strum(to_string = "H4", serialize = "4h")]
    H4,
    #[strum(to_string = "D1", serialize = "1d")]
    D1,
    #[strum(to_string = "W1", serialize = "1w")]
    W1,
}

impl Timeframe {
    /// Bars are evaluated on this resolution
    pub const BASE: Timeframe = Timeframe::M15;
    /// Auxiliary fine resolution (sweeps only)
    pub const FINE: Timeframe = Timeframe::M1;
    /// Coarser timeframes feeding the zone registry and as-of lookups
    pub const HIGHER: [Timeframe; 3] = [Timeframe::H4, Timeframe::D1, Timeframe::W1];

    pub fn interval_ms(self) -> i64 {
        match self {
            Timeframe::M1 => TimeUtils::MS_IN_MIN,
            Timeframe::M15 => TimeUtils::MS_IN_15_MIN,
            Timeframe::H4 => TimeUtils::MS_IN_4_H,
            Timeframe::D1 => TimeUtils::MS_IN_D,
            Timeframe::W1 => TimeUtils::MS_IN_W,
        }
    }

    /// Binance-style shorthand (e.g. `15m`, `4h`).
    pub fn label(self) -> &'static str {
        TimeUtils::interval_to_string(self.interval_ms())
    }

    pub fn is_higher(self) -> bool {
        Self::HIGHER.contains(&self)
    }

    /// Sweeps sourced here skip the H4 trend gate (treated as reversals).
    pub fn bypasses_trend_gate(self) -> bool {
        matches!(self, Timeframe::W1 | Timeframe::FINE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn parses_names_and_labels() {
        assert_eq!(Timeframe::from_str("M15").ok(), Some(Timeframe::M15));
        assert_eq!(Timeframe::from_str("h4").ok(), Some(Timeframe::H4));
        assert_eq!(Timeframe::from_str("1w").ok(), Some(Timeframe::W1));
        assert!(Timeframe::from_str("H1").is_err());
        assert_eq!(Timeframe::D1.to_string(), "D1");
        assert_eq!(Timeframe::H4.label(), "4h");
    }

    #[test]
    fn ordering_is_finest_first() {
        assert!(Timeframe::M1 < Timeframe::M15);
        assert!(Timeframe::D1 < Timeframe::W1);
        assert!(Timeframe::W1.bypasses_trend_gate());
        assert!(Timeframe::M1.bypasses_trend_gate());
        assert!(!Timeframe::H4.bypasses_trend_gate());
        assert!(!Timeframe::BASE.is_higher());
    }
}
