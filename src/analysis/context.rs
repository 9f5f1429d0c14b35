//! Fuses same-bar, as-of and session features into one `EvaluationContext` per base bar.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::analysis::sessions::SessionAggregator;
use crate::domain::{Session, SessionCalendar, SweepSide, Timeframe};
use crate::errors::ValidationError;
use crate::models::{
    AnalyzedSeries, BarFeatures, EvaluationContext, SessionExtremes, StructureBreak,
    SweepEvidence, ZoneRegistry, ZoneTouch,
};

// Sweep sources, strongest first. Base is read same-bar, the rest as-of.
const SWEEP_PRIORITY: [Timeframe; 5] = [
    Timeframe::W1,
    Timeframe::D1,
    Timeframe::H4,
    Timeframe::M15,
    Timeframe::M1,
];

const BOS_PRIORITY: [Timeframe; 3] = [Timeframe::H4, Timeframe::D1, Timeframe::W1];

pub struct ContextAssembler<'a> {
    base: &'a AnalyzedSeries,
    series: &'a BTreeMap<Timeframe, AnalyzedSeries>,
    calendar: &'a SessionCalendar,
    sessions: SessionAggregator<'a>,
    zones: ZoneRegistry,
}

/// Features of every timeframe as seen from one base bar.
struct Snapshot {
    bars: BTreeMap<Timeframe, BarFeatures>,
}

impl Snapshot {
    fn get(&self, timeframe: Timeframe) -> Option<&BarFeatures> {
        self.bars.get(&timeframe)
    }

    fn sweep(&self, timeframe: Timeframe) -> Option<SweepSide> {
        self.get(timeframe).and_then(BarFeatures::sweep)
    }
}

impl<'a> ContextAssembler<'a> {
    pub fn new(
        series: &'a BTreeMap<Timeframe, AnalyzedSeries>,
        calendar: &'a SessionCalendar,
        zones: ZoneRegistry,
    ) -> Result<Self, ValidationError> {
        let base = series
            .get(&Timeframe::BASE)
            .ok_or(ValidationError::MissingBase(Timeframe::BASE))?;
        Ok(Self {
            base,
            series,
            calendar,
            sessions: SessionAggregator::new(&base.series, calendar),
            zones,
        })
    }

    /// Session ranges folded so far.
    pub fn extremes(&self) -> &SessionExtremes {
        self.sessions.extremes()
    }

    /// Build the context for base bar `idx`. None when the bar falls in no session.
    pub fn assemble(&mut self, idx: usize) -> Option<EvaluationContext> {
        let analyzed = self.base;
        let base = &analyzed.series;
        let timestamp_ms = base.timestamps_ms[idx];
        let slot = self.calendar.resolve(timestamp_ms)?;
        self.sessions.advance_to(idx);

        let snapshot = self.snapshot(idx, timestamp_ms);
        let high = base.high_prices[idx];
        let low = base.low_prices[idx];

        let trend_of = |tf: Timeframe| snapshot.get(tf).map(|b| b.trend).unwrap_or_default();
        let bos_of = |tf: Timeframe| snapshot.get(tf).and_then(|b| b.bos);
        let trend_h4 = trend_of(Timeframe::H4);

        let dominant_sweep = SWEEP_PRIORITY.iter().find_map(|&timeframe| {
            snapshot
                .sweep(timeframe)
                .map(|side| SweepEvidence { timeframe, side })
        });
        let sweep_detected = dominant_sweep.is_some_and(|sweep| {
            sweep.timeframe.bypasses_trend_gate() || trend_h4.confirms(sweep.side)
        });

        let double_sweep = [Timeframe::BASE, Timeframe::H4]
            .into_iter()
            .find_map(|timeframe| {
                snapshot
                    .get(timeframe)
                    .and_then(BarFeatures::double_sweep)
                    .map(|side| SweepEvidence { timeframe, side })
            });

        let structure_break = BOS_PRIORITY.into_iter().find_map(|timeframe| {
            bos_of(timeframe).map(|direction| StructureBreak {
                timeframe,
                direction,
            })
        });

        let fvg_touch = self.zones.touch(low, high, timestamp_ms).map(|zone| ZoneTouch {
            timeframe: zone.timeframe,
            direction: zone.direction,
            price_low: zone.price_low,
            price_high: zone.price_high,
        });

        Some(EvaluationContext {
            bar_index: idx,
            timestamp_ms,
            open: base.open_prices[idx],
            high,
            low,
            close: base.close_prices[idx],
            session: slot.session,
            session_day: slot.day,
            sweep_m15: snapshot.sweep(Timeframe::M15),
            cisd: snapshot.get(Timeframe::BASE).and_then(|b| b.cisd),
            sweep_m1: snapshot.sweep(Timeframe::M1),
            sweep_h4: snapshot.sweep(Timeframe::H4),
            sweep_d1: snapshot.sweep(Timeframe::D1),
            sweep_w1: snapshot.sweep(Timeframe::W1),
            trend_h4,
            trend_d1: trend_of(Timeframe::D1),
            trend_w1: trend_of(Timeframe::W1),
            bos_h4: bos_of(Timeframe::H4),
            bos_d1: bos_of(Timeframe::D1),
            bos_w1: bos_of(Timeframe::W1),
            dominant_sweep,
            sweep_detected,
            double_sweep,
            structure_break,
            fvg_touch,
            session_sweep: self.session_sweep(slot.session, slot.day, high, low),
            early_session_context: self.early_session_context(slot.session, slot.day),
        })
    }

    // Base features come from the same bar, every other timeframe from its latest
    // candle at or before the bar.
    fn snapshot(&self, idx: usize, timestamp_ms: i64) -> Snapshot {
        let bars = self
            .series
            .iter()
            .filter_map(|(&timeframe, analyzed)| {
                let features = if timeframe == Timeframe::BASE {
                    Some(analyzed.bar(idx))
                } else {
                    analyzed.as_of(timestamp_ms)
                };
                features.map(|f| (timeframe, f))
            })
            .collect();
        Snapshot { bars }
    }

    /// Did this bar trade beyond the combined range of the sessions it targets?
    fn session_sweep(
        &self,
        session: Session,
        day: NaiveDate,
        high: f64,
        low: f64,
    ) -> Option<SweepSide> {
        let prior = self.extremes().merged(day, session.sweep_targets())?;
        if high > prior.high {
            Some(SweepSide::High)
        } else if low < prior.low {
            Some(SweepSide::Low)
        } else {
            None
        }
    }

    /// London/New York bars where Frankfurt already took out an Asia extreme.
    fn early_session_context(&self, session: Session, day: NaiveDate) -> bool {
        if !session.is_main_session() {
            return false;
        }
        self.extremes()
            .pair_on_same_day(day, Session::Asia, Session::Frankfurt)
            .is_some_and(|(asia, frankfurt)| {
                frankfurt.high > asia.high || frankfurt.low < asia.low
            })
    }
}
