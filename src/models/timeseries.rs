use serde::{Deserialize, Serialize};

use crate::domain::{Candle, Timeframe};
use crate::errors::{SeriesErrorKind, ValidationError};

// ============================================================================
// OhlcvTimeSeries: Raw candle columns for one timeframe
// ============================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OhlcvTimeSeries {
    pub timeframe: Timeframe,

    // Open time of each candle, ms since epoch (UTC), strictly ascending
    pub timestamps_ms: Vec<i64>,

    // Prices
    pub open_prices: Vec<f64>,
    pub high_prices: Vec<f64>,
    pub low_prices: Vec<f64>,
    pub close_prices: Vec<f64>,

    pub volumes: Vec<f64>,
}

impl OhlcvTimeSeries {
    pub fn new(timeframe: Timeframe) -> Self {
        Self {
            timeframe,
            timestamps_ms: Vec::new(),
            open_prices: Vec::new(),
            high_prices: Vec::new(),
            low_prices: Vec::new(),
            close_prices: Vec::new(),
            volumes: Vec::new(),
        }
    }

    pub fn from_candles(timeframe: Timeframe, candles: &[Candle]) -> Self {
        let mut series = Self::new(timeframe);
        for candle in candles {
            series.push(candle);
        }
        series
    }

    pub fn push(&mut self, candle: &Candle) {
        self.timestamps_ms.push(candle.timestamp_ms);
        self.open_prices.push(candle.open_price);
        self.high_prices.push(candle.high_price);
        self.low_prices.push(candle.low_price);
        self.close_prices.push(candle.close_price);
        self.volumes.push(candle.volume);
    }

    pub fn get_candle(&self, idx: usize) -> Candle {
        Candle::new(
            self.timestamps_ms[idx],
            self.open_prices[idx],
            self.high_prices[idx],
            self.low_prices[idx],
            self.close_prices[idx],
            self.volumes[idx],
        )
    }

    pub fn klines(&self) -> usize {
        self.timestamps_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps_ms.is_empty()
    }

    /// As-of lookup: index of the latest candle whose timestamp is <= `timestamp_ms`.
    pub fn index_at_or_before(&self, timestamp_ms: i64) -> Option<usize> {
        // partition_point relies on the ascending-timestamp invariant
        let after = self.timestamps_ms.partition_point(|&ts| ts <= timestamp_ms);
        after.checked_sub(1)
    }

    /// Reject the series if any column is missing data or any candle breaks an invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let n = self.timestamps_ms.len();
        let lengths = [
            self.open_prices.len(),
            self.high_prices.len(),
            self.low_prices.len(),
            self.close_prices.len(),
            self.volumes.len(),
        ];
        if let Some(short) = lengths.iter().copied().filter(|&len| len != n).min() {
            return Err(ValidationError::series(
                self.timeframe,
                short.min(n),
                SeriesErrorKind::ColumnLengthMismatch,
            ));
        }

        for idx in 0..n {
            let candle = self.get_candle(idx);
            let kind = if !candle.prices_finite() {
                Some(SeriesErrorKind::NonFinitePrice)
            } else if candle.volume < 0.0 {
                Some(SeriesErrorKind::NegativeVolume)
            } else if !candle.wicks_contain_body() {
                Some(SeriesErrorKind::OhlcInvariant)
            } else if idx > 0 && self.timestamps_ms[idx] <= self.timestamps_ms[idx - 1] {
                Some(SeriesErrorKind::NonMonotonicTimestamp)
            } else {
                None
            };

            if let Some(kind) = kind {
                return Err(ValidationError::series(self.timeframe, idx, kind));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(timestamps: &[i64]) -> OhlcvTimeSeries {
        let candles: Vec<Candle> = timestamps
            .iter()
            .map(|&ts| Candle::new(ts, 100.0, 101.0, 99.0, 100.5, 1.0))
            .collect();
        OhlcvTimeSeries::from_candles(Timeframe::H4, &candles)
    }

    #[test]
    fn as_of_lookup_finds_latest_preceding() {
        let ts = series(&[10, 20, 30]);
        assert_eq!(ts.index_at_or_before(5), None);
        assert_eq!(ts.index_at_or_before(10), Some(0));
        assert_eq!(ts.index_at_or_before(29), Some(1));
        assert_eq!(ts.index_at_or_before(30), Some(2));
        assert_eq!(ts.index_at_or_before(1_000), Some(2));
    }

    #[test]
    fn validate_accepts_clean_series() {
        assert!(series(&[1, 2, 3]).validate().is_ok());
        assert!(OhlcvTimeSeries::new(Timeframe::D1).validate().is_ok());
    }

    #[test]
    fn validate_rejects_duplicate_timestamp() {
        let err = series(&[1, 2, 2]).validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::series(Timeframe::H4, 2, SeriesErrorKind::NonMonotonicTimestamp)
        );
    }

    #[test]
    fn validate_rejects_negative_volume() {
        let mut ts = series(&[1, 2, 3]);
        ts.volumes[1] = -5.0;
        let err = ts.validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::series(Timeframe::H4, 1, SeriesErrorKind::NegativeVolume)
        );
    }

    #[test]
    fn validate_rejects_missing_column_data() {
        let mut ts = series(&[1, 2, 3]);
        ts.close_prices.pop();
        let err = ts.validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::series(Timeframe::H4, 2, SeriesErrorKind::ColumnLengthMismatch)
        );
    }

    #[test]
    fn validate_rejects_high_below_open() {
        let mut ts = series(&[1, 2, 3]);
        ts.high_prices[0] = 99.5;
        let err = ts.validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::series(Timeframe::H4, 0, SeriesErrorKind::OhlcInvariant)
        );
    }
}
