//! Analysis and computation configuration

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::domain::{Session, SessionCalendar, SessionWindow, Timeframe};
use crate::errors::ValidationError;

/// Trailing window (in bars) used by the sweep detector on each timeframe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepWindows {
    pub m1: usize,
    pub m15: usize,
    pub h4: usize,
    pub d1: usize,
    pub w1: usize,
}

impl SweepWindows {
    pub fn for_timeframe(&self, timeframe: Timeframe) -> usize {
        match timeframe {
            Timeframe::M1 => self.m1,
            Timeframe::M15 => self.m15,
            Timeframe::H4 => self.h4,
            Timeframe::D1 => self.d1,
            Timeframe::W1 => self.w1,
        }
    }
}

/// Window sizes and thresholds for the feature detectors
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorSettings {
    pub sweep_windows: SweepWindows,
    // SMA period for the trend label
    pub trend_period: usize,
    // Consolidation detector: range over `cisd_window` bars must be below
    // `cisd_range_ratio` of the window's mean close
    pub cisd_window: usize,
    pub cisd_range_ratio: f64,
    // Prior bars (current excluded) forming the rolling high/low for structure breaks
    pub bos_lookback: usize,
    pub double_sweep_window: usize,
    pub double_sweep_min_count: usize,
}

/// FVG zone lifecycle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneSettings {
    // When false a zone stays open forever and can be "tested" again and again.
    // When true the first bar that touches it consumes it.
    pub consume_on_touch: bool,
}

/// The Master Analysis Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub detectors: DetectorSettings,
    pub zones: ZoneSettings,
    // Session windows in UTC. The wrap-around window is the catch-all.
    pub sessions: Cow<'static, [SessionWindow]>,
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig {
    detectors: DetectorSettings {
        sweep_windows: SweepWindows {
            m1: 30,
            m15: 20,
            h4: 20,
            d1: 20,
            w1: 10,
        },
        trend_period: 20,
        cisd_window: 10,
        cisd_range_ratio: 0.005,
        bos_lookback: 20,
        double_sweep_window: 10,
        double_sweep_min_count: 2,
    },

    zones: ZoneSettings {
        consume_on_touch: false,
    },

    sessions: Cow::Borrowed(&[
        SessionWindow::new(Session::Frankfurt, 9, 10),
        SessionWindow::new(Session::London, 10, 15),
        SessionWindow::new(Session::NewYork, 15, 21),
        SessionWindow::new(Session::Asia, 21, 9),
    ]),
};

impl Default for SweepWindows {
    fn default() -> Self {
        ANALYSIS.detectors.sweep_windows
    }
}

impl Default for DetectorSettings {
    fn default() -> Self {
        ANALYSIS.detectors
    }
}

impl Default for ZoneSettings {
    fn default() -> Self {
        ANALYSIS.zones
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        ANALYSIS
    }
}

impl AnalysisConfig {
    /// Check windows/thresholds and build the session calendar.
    pub fn validate(&self) -> Result<SessionCalendar, ValidationError> {
        let d = &self.detectors;
        let windows = [
            ("sweep_windows.m1", d.sweep_windows.m1),
            ("sweep_windows.m15", d.sweep_windows.m15),
            ("sweep_windows.h4", d.sweep_windows.h4),
            ("sweep_windows.d1", d.sweep_windows.d1),
            ("sweep_windows.w1", d.sweep_windows.w1),
            ("trend_period", d.trend_period),
            ("cisd_window", d.cisd_window),
            ("bos_lookback", d.bos_lookback),
            ("double_sweep_window", d.double_sweep_window),
            ("double_sweep_min_count", d.double_sweep_min_count),
        ];
        if let Some((name, _)) = windows.iter().find(|(_, w)| *w == 0) {
            return Err(ValidationError::Config(format!("{name} must be at least 1")));
        }
        if !(d.cisd_range_ratio.is_finite() && d.cisd_range_ratio > 0.0) {
            return Err(ValidationError::Config(format!(
                "cisd_range_ratio must be positive, got {}",
                d.cisd_range_ratio
            )));
        }

        SessionCalendar::new(self.sessions.to_vec())
    }
}
