use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};

use crate::domain::Session;

/// Running high/low of one session on one session day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionRange {
    pub high: f64,
    pub low: f64,
}

impl SessionRange {
    pub fn new(high: f64, low: f64) -> Self {
        Self { high, low }
    }

    /// Extend the range with a bar. High never falls, low never rises.
    pub fn extend(&mut self, high: f64, low: f64) {
        self.high = self.high.max(high);
        self.low = self.low.min(low);
    }

    pub fn merge(self, other: SessionRange) -> SessionRange {
        SessionRange {
            high: self.high.max(other.high),
            low: self.low.min(other.low),
        }
    }
}

/// (session day, session) -> running range, filled by the session aggregator.
#[derive(Debug, Clone, Default)]
pub struct SessionExtremes {
    ranges: BTreeMap<(NaiveDate, Session), SessionRange>,
}

impl SessionExtremes {
    pub fn fold(&mut self, day: NaiveDate, session: Session, high: f64, low: f64) {
        self.ranges
            .entry((day, session))
            .and_modify(|range| range.extend(high, low))
            .or_insert_with(|| SessionRange::new(high, low));
    }

    pub fn get(&self, day: NaiveDate, session: Session) -> Option<SessionRange> {
        self.ranges.get(&(day, session)).copied()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Combined range of several sessions, all read from one day: `day` when any of
    /// them has a record there, else the day before. Days are never mixed.
    pub fn merged(&self, day: NaiveDate, sessions: &[Session]) -> Option<SessionRange> {
        let on = |d: NaiveDate| {
            sessions
                .iter()
                .filter_map(|&session| self.get(d, session))
                .reduce(SessionRange::merge)
        };
        on(day).or_else(|| on(previous_day(day)?))
    }

    /// Both sessions' ranges from the same day: `day` if it has both, else the day before.
    pub fn pair_on_same_day(
        &self,
        day: NaiveDate,
        first: Session,
        second: Session,
    ) -> Option<(SessionRange, SessionRange)> {
        let on = |d: NaiveDate| Some((self.get(d, first)?, self.get(d, second)?));
        on(day).or_else(|| on(previous_day(day)?))
    }
}

fn previous_day(day: NaiveDate) -> Option<NaiveDate> {
    day.checked_sub_days(Days::new(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, d).unwrap()
    }

    #[test]
    fn fold_is_monotone() {
        let mut extremes = SessionExtremes::default();
        extremes.fold(day(5), Session::Asia, 101.0, 99.0);
        extremes.fold(day(5), Session::Asia, 100.5, 99.5);
        extremes.fold(day(5), Session::Asia, 102.0, 98.0);
        assert_eq!(
            extremes.get(day(5), Session::Asia),
            Some(SessionRange::new(102.0, 98.0))
        );
        assert_eq!(extremes.len(), 1);
    }

    #[test]
    fn merged_combines_sessions() {
        let mut extremes = SessionExtremes::default();
        extremes.fold(day(5), Session::Asia, 101.0, 99.0);
        extremes.fold(day(5), Session::Frankfurt, 103.0, 100.0);
        let merged = extremes
            .merged(day(5), &[Session::Asia, Session::Frankfurt])
            .unwrap();
        assert_eq!(merged, SessionRange::new(103.0, 99.0));
        assert_eq!(extremes.merged(day(5), &[]), None);
    }

    #[test]
    fn merged_reads_a_single_day() {
        let mut extremes = SessionExtremes::default();
        extremes.fold(day(4), Session::Asia, 90.0, 80.0);
        extremes.fold(day(4), Session::Frankfurt, 120.0, 70.0);
        extremes.fold(day(5), Session::Asia, 101.0, 99.0);

        // Day 5 has Asia only: yesterday's Frankfurt must not leak in
        let london = extremes
            .merged(day(5), &[Session::Asia, Session::Frankfurt])
            .unwrap();
        assert_eq!(london, SessionRange::new(101.0, 99.0));

        // Nothing on day 6: the whole set comes from day 5
        let next = extremes
            .merged(day(6), &[Session::Asia, Session::Frankfurt])
            .unwrap();
        assert_eq!(next, SessionRange::new(101.0, 99.0));

        assert_eq!(extremes.merged(day(7), &[Session::Asia]), None);
    }

    #[test]
    fn pair_requires_both_sessions_on_one_day() {
        let mut extremes = SessionExtremes::default();
        extremes.fold(day(4), Session::Asia, 101.0, 99.0);
        extremes.fold(day(4), Session::Frankfurt, 102.0, 100.0);
        extremes.fold(day(5), Session::Asia, 105.0, 103.0);
        // Day 5 has no Frankfurt yet, so day 4's pair is used
        let (asia, frankfurt) = extremes
            .pair_on_same_day(day(5), Session::Asia, Session::Frankfurt)
            .unwrap();
        assert_eq!(asia.high, 101.0);
        assert_eq!(frankfurt.high, 102.0);
    }
}
