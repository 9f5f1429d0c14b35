use crate::domain::SessionCalendar;
use crate::models::{OhlcvTimeSeries, SessionExtremes};

/// Running session extremes over the base series. Bars are folded in forward
/// order and never past the bar being queried, so a lookup at bar `idx` only
/// sees ranges built from bars `0..=idx`.
pub struct SessionAggregator<'a> {
    series: &'a OhlcvTimeSeries,
    calendar: &'a SessionCalendar,
    extremes: SessionExtremes,
    folded: usize,
}

impl<'a> SessionAggregator<'a> {
    pub fn new(series: &'a OhlcvTimeSeries, calendar: &'a SessionCalendar) -> Self {
        Self {
            series,
            calendar,
            extremes: SessionExtremes::default(),
            folded: 0,
        }
    }

    /// Fold every bar up to and including `idx`. Stepping backwards restarts the pass.
    /// Bars with no session are ignored.
    pub fn advance_to(&mut self, idx: usize) -> &SessionExtremes {
        let target = (idx + 1).min(self.series.klines());
        if self.folded > target {
            self.extremes = SessionExtremes::default();
            self.folded = 0;
        }
        while self.folded < target {
            let i = self.folded;
            if let Some(slot) = self.calendar.resolve(self.series.timestamps_ms[i]) {
                self.extremes.fold(
                    slot.day,
                    slot.session,
                    self.series.high_prices[i],
                    self.series.low_prices[i],
                );
            }
            self.folded += 1;
        }
        &self.extremes
    }

    pub fn extremes(&self) -> &SessionExtremes {
        &self.extremes
    }
}

/// Fold the whole base series in one forward pass.
pub fn aggregate_session_extremes(
    series: &OhlcvTimeSeries,
    calendar: &SessionCalendar,
) -> SessionExtremes {
    let mut aggregator = SessionAggregator::new(series, calendar);
    if let Some(last) = series.klines().checked_sub(1) {
        aggregator.advance_to(last);
    }
    aggregator.extremes
}
