//! Derived per-bar feature columns attached to a candle series.

use crate::domain::{BosDirection, FvgDirection, SweepSide, Timeframe, Trend};
use crate::models::OhlcvTimeSeries;

/// A three-candle gap found at some bar, with its price bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FvgGap {
    pub direction: FvgDirection,
    pub price_low: f64,
    pub price_high: f64,
}

/// One column per detector, each `klines()` long.
/// `Option` marks bars where the detector had too little history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureColumns {
    pub fvg: Vec<Option<FvgGap>>,
    pub sweep_high: Vec<bool>,
    pub sweep_low: Vec<bool>,
    pub sma: Vec<Option<f64>>,
    pub trend: Vec<Trend>,
    pub cisd: Vec<Option<bool>>,
    pub local_high: Vec<Option<f64>>,
    pub local_low: Vec<Option<f64>>,
    pub bos: Vec<Option<BosDirection>>,
    pub double_sweep_high: Vec<bool>,
    pub double_sweep_low: Vec<bool>,
}

/// Snapshot of every feature for a single bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarFeatures {
    pub sweep_high: bool,
    pub sweep_low: bool,
    pub trend: Trend,
    pub cisd: Option<bool>,
    pub bos: Option<BosDirection>,
    pub double_sweep_high: bool,
    pub double_sweep_low: bool,
}

impl BarFeatures {
    /// High side wins when a bar is both the window high and the window low.
    pub fn sweep(&self) -> Option<SweepSide> {
        side_of(self.sweep_high, self.sweep_low)
    }

    pub fn double_sweep(&self) -> Option<SweepSide> {
        side_of(self.double_sweep_high, self.double_sweep_low)
    }
}

fn side_of(high: bool, low: bool) -> Option<SweepSide> {
    if high {
        Some(SweepSide::High)
    } else if low {
        Some(SweepSide::Low)
    } else {
        None
    }
}

/// A series together with its detector output.
#[derive(Debug, Clone)]
pub struct AnalyzedSeries {
    pub series: OhlcvTimeSeries,
    pub features: FeatureColumns,
}

impl AnalyzedSeries {
    pub fn timeframe(&self) -> Timeframe {
        self.series.timeframe
    }

    pub fn klines(&self) -> usize {
        self.series.klines()
    }

    pub fn bar(&self, idx: usize) -> BarFeatures {
        let f = &self.features;
        BarFeatures {
            sweep_high: f.sweep_high[idx],
            sweep_low: f.sweep_low[idx],
            trend: f.trend[idx],
            cisd: f.cisd[idx],
            bos: f.bos[idx],
            double_sweep_high: f.double_sweep_high[idx],
            double_sweep_low: f.double_sweep_low[idx],
        }
    }

    /// Features of the latest bar at or before `timestamp_ms` (as-of join).
    pub fn as_of(&self, timestamp_ms: i64) -> Option<BarFeatures> {
        self.series
            .index_at_or_before(timestamp_ms)
            .map(|idx| self.bar(idx))
    }
}
