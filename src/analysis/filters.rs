//! Post-scan helpers for slicing and counting signals.
//!
//! Filters take any iterator of signal references, so they chain:
//! `filter_by_session(filter_by_pattern(&signals, kind), session)`.

use std::collections::BTreeMap;

use itertools::Itertools;
use serde::Serialize;

use crate::domain::{Confidence, Session, SignalDirection, Timeframe};
use crate::models::{PatternKind, Signal};

pub fn filter_by_pattern<'a>(
    signals: impl IntoIterator<Item = &'a Signal>,
    pattern: PatternKind,
) -> Vec<&'a Signal> {
    signals.into_iter().filter(|s| s.pattern == pattern).collect()
}

pub fn filter_by_session<'a>(
    signals: impl IntoIterator<Item = &'a Signal>,
    session: Session,
) -> Vec<&'a Signal> {
    signals.into_iter().filter(|s| s.session == session).collect()
}

/// Signals at or above the given tier.
pub fn filter_by_min_confidence<'a>(
    signals: impl IntoIterator<Item = &'a Signal>,
    min: Confidence,
) -> Vec<&'a Signal> {
    signals.into_iter().filter(|s| s.confidence >= min).collect()
}

pub fn filter_by_timeframe<'a>(
    signals: impl IntoIterator<Item = &'a Signal>,
    timeframe: Timeframe,
) -> Vec<&'a Signal> {
    signals
        .into_iter()
        .filter(|s| s.contributing_timeframes.contains(&timeframe))
        .collect()
}

pub fn filter_by_direction<'a>(
    signals: impl IntoIterator<Item = &'a Signal>,
    direction: SignalDirection,
) -> Vec<&'a Signal> {
    signals.into_iter().filter(|s| s.direction == direction).collect()
}

/// Signal counts per pattern, session and direction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SignalStats {
    pub total: usize,
    pub by_pattern: BTreeMap<PatternKind, usize>,
    pub by_session: BTreeMap<Session, usize>,
    pub by_direction: BTreeMap<String, usize>,
}

impl SignalStats {
    pub fn from_signals(signals: &[Signal]) -> Self {
        Self {
            total: signals.len(),
            by_pattern: signals.iter().map(|s| s.pattern).counts().into_iter().collect(),
            by_session: signals.iter().map(|s| s.session).counts().into_iter().collect(),
            by_direction: signals
                .iter()
                .map(|s| s.direction.to_string())
                .counts()
                .into_iter()
                .collect(),
        }
    }

    /// Patterns ordered by count, busiest first (ties by catalogue order).
    pub fn patterns_by_count(&self) -> Vec<(PatternKind, usize)> {
        self.by_pattern
            .iter()
            .map(|(&kind, &count)| (kind, count))
            .sorted_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Trend;

    fn signal(pattern: PatternKind, session: Session, direction: SignalDirection) -> Signal {
        Signal {
            timestamp_ms: 0,
            datetime: String::new(),
            session,
            pattern,
            direction,
            confidence: pattern.confidence(),
            reason: String::new(),
            trend_h4: Trend::Up,
            trend_d1: Trend::Down,
            contributing_timeframes: vec![Timeframe::M15, Timeframe::H4],
            timeframes: String::new(),
            price: 1.0,
        }
    }

    fn sample() -> Vec<Signal> {
        vec![
            signal(PatternKind::DoubleSweep, Session::London, SignalDirection::Buy),
            signal(PatternKind::SweepFvgCisd, Session::London, SignalDirection::Sell),
            signal(PatternKind::AsiaFrankfurtContext, Session::NewYork, SignalDirection::Buy),
            signal(PatternKind::DoubleSweep, Session::Asia, SignalDirection::Buy),
        ]
    }

    #[test]
    fn filters_select_matching_signals() {
        let signals = sample();
        assert_eq!(filter_by_pattern(&signals, PatternKind::DoubleSweep).len(), 2);
        assert_eq!(filter_by_session(&signals, Session::London).len(), 2);
        assert_eq!(filter_by_direction(&signals, SignalDirection::Sell).len(), 1);
        assert_eq!(filter_by_timeframe(&signals, Timeframe::H4).len(), 4);
        assert!(filter_by_timeframe(&signals, Timeframe::W1).is_empty());

        let chained = filter_by_session(
            filter_by_pattern(&signals, PatternKind::DoubleSweep),
            Session::Asia,
        );
        assert_eq!(chained.len(), 1);
    }

    #[test]
    fn confidence_filter_is_inclusive() {
        let signals = sample();
        assert_eq!(filter_by_min_confidence(&signals, Confidence::VeryHigh).len(), 2);
        assert_eq!(filter_by_min_confidence(&signals, Confidence::High).len(), 3);
        assert_eq!(filter_by_min_confidence(&signals, Confidence::MediumHigh).len(), 4);
    }

    #[test]
    fn stats_count_each_dimension() {
        let stats = SignalStats::from_signals(&sample());
        assert_eq!(stats.total, 4);
        assert_eq!(stats.by_pattern[&PatternKind::DoubleSweep], 2);
        assert_eq!(stats.by_session[&Session::NewYork], 1);
        assert_eq!(stats.by_direction["BUY"], 3);
        assert_eq!(
            stats.patterns_by_count()[0],
            (PatternKind::DoubleSweep, 2)
        );
        assert_eq!(SignalStats::from_signals(&[]), SignalStats::default());
    }
}
