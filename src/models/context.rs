//! The per-bar evaluation snapshot handed to the rule engine.

use chrono::NaiveDate;

use crate::domain::{BosDirection, FvgDirection, Session, SweepSide, Timeframe, Trend};

/// A sweep (single or double) and the timeframe it was seen on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepEvidence {
    pub timeframe: Timeframe,
    pub side: SweepSide,
}

/// The FVG zone a bar traded into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneTouch {
    pub timeframe: Timeframe,
    pub direction: FvgDirection,
    pub price_low: f64,
    pub price_high: f64,
}

/// A structure break and the timeframe it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureBreak {
    pub timeframe: Timeframe,
    pub direction: BosDirection,
}

/// Everything known about one base bar. Built, evaluated, dropped.
///
/// Higher-timeframe fields hold the latest candle at or before the bar; they are
/// `None`/`Unknown` when that timeframe has no such candle yet.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationContext {
    pub bar_index: usize,
    pub timestamp_ms: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub session: Session,
    pub session_day: NaiveDate,

    // Same-bar (base) features
    pub sweep_m15: Option<SweepSide>,
    pub cisd: Option<bool>,

    // As-of features
    pub sweep_m1: Option<SweepSide>,
    pub sweep_h4: Option<SweepSide>,
    pub sweep_d1: Option<SweepSide>,
    pub sweep_w1: Option<SweepSide>,
    pub trend_h4: Trend,
    pub trend_d1: Trend,
    pub trend_w1: Trend,
    pub bos_h4: Option<BosDirection>,
    pub bos_d1: Option<BosDirection>,
    pub bos_w1: Option<BosDirection>,

    /// Strongest sweep found, before the trend gate
    pub dominant_sweep: Option<SweepEvidence>,
    /// Dominant sweep that also passed the H4 trend gate
    pub sweep_detected: bool,
    pub double_sweep: Option<SweepEvidence>,
    pub structure_break: Option<StructureBreak>,
    pub fvg_touch: Option<ZoneTouch>,
    pub session_sweep: Option<SweepSide>,
    pub early_session_context: bool,
}

impl EvaluationContext {
    pub fn fvg_tested(&self) -> bool {
        self.fvg_touch.is_some()
    }

    /// Undefined consolidation state (short history) counts as not detected
    pub fn cisd_detected(&self) -> bool {
        self.cisd == Some(true)
    }

    pub fn double_sweep_detected(&self) -> bool {
        self.double_sweep.is_some()
    }

    pub fn bos_detected(&self) -> bool {
        self.structure_break.is_some()
    }

    pub fn session_swept(&self) -> bool {
        self.session_sweep.is_some()
    }

    /// Side of the sweep that passed the trend gate
    pub fn confirmed_sweep(&self) -> Option<SweepEvidence> {
        self.dominant_sweep.filter(|_| self.sweep_detected)
    }
}
