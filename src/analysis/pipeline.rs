//! One scan: validate, detect, aggregate, then evaluate every base bar in order.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::analysis::context::ContextAssembler;
use crate::analysis::detectors::analyze_series;
use crate::analysis::rules::{PatternMatch, RuleEngine};
use crate::config::{AnalysisConfig, TraceLevel};
use crate::data::MarketData;
use crate::domain::Timeframe;
use crate::errors::ValidationError;
use crate::models::{AnalyzedSeries, EvaluationContext, Signal, ZoneRegistry};
use crate::utils::time_utils::epoch_ms_to_utc;

/// Run the full scan over `market`. Malformed input on any timeframe aborts before
/// any pass runs; otherwise the result is the (possibly empty) signal list in bar order.
pub fn run_analysis(
    market: &MarketData,
    config: &AnalysisConfig,
    trace: TraceLevel,
) -> Result<Vec<Signal>, ValidationError> {
    let calendar = config.validate()?;
    market.validate()?;

    // Timeframes are independent, so detectors run in parallel. BTreeMap keeps the order.
    let analyzed: BTreeMap<Timeframe, AnalyzedSeries> = market
        .series()
        .par_iter()
        .map(|(&timeframe, series)| (timeframe, analyze_series(series.clone(), &config.detectors)))
        .collect();

    let base = analyzed
        .get(&Timeframe::BASE)
        .ok_or(ValidationError::MissingBase(Timeframe::BASE))?;

    let zones = ZoneRegistry::from_series(analyzed.values(), config.zones.consume_on_touch);
    let zone_count = zones.len();
    let zones_by_timeframe = zones.count_by_timeframe();

    let mut assembler = ContextAssembler::new(&analyzed, &calendar, zones)?;
    let engine = RuleEngine::default();

    let mut signals = Vec::new();
    let mut skipped = 0usize;
    for idx in 0..base.klines() {
        let Some(ctx) = assembler.assemble(idx) else {
            skipped += 1;
            continue;
        };
        if trace.bars() {
            log::debug!("{:?}", ctx);
        }
        if let Some(hit) = engine.evaluate(&ctx) {
            let signal = assemble_signal(&ctx, hit);
            if trace.signals() {
                log::info!(
                    "{} {} {} [{}] {}",
                    signal.datetime,
                    signal.direction,
                    signal.pattern,
                    signal.confidence,
                    signal.reason
                );
            }
            signals.push(signal);
        }
    }

    log::info!(
        "{}: {} {} bars evaluated ({} outside sessions), {} FVG zones {:?}, {} session ranges, {} signals",
        market.name,
        base.klines(),
        Timeframe::BASE,
        skipped,
        zone_count,
        zones_by_timeframe,
        assembler.extremes().len(),
        signals.len()
    );

    Ok(signals)
}

/// Package a rule match with the bar's context.
pub fn assemble_signal(ctx: &EvaluationContext, hit: PatternMatch) -> Signal {
    Signal {
        timestamp_ms: ctx.timestamp_ms,
        datetime: epoch_ms_to_utc(ctx.timestamp_ms),
        session: ctx.session,
        pattern: hit.kind,
        direction: hit.direction,
        confidence: hit.kind.confidence(),
        reason: hit.reason,
        trend_h4: ctx.trend_h4,
        trend_d1: ctx.trend_d1,
        contributing_timeframes: hit.contributing_timeframes,
        timeframes: evidence_summary(ctx),
        price: ctx.close,
    }
}

/// Which timeframe supplied each piece of evidence, e.g. `sweep=H4, fvg=D1, trend H4/D1=up/down`.
fn evidence_summary(ctx: &EvaluationContext) -> String {
    let mut parts = Vec::new();
    if let Some(sweep) = ctx.dominant_sweep {
        parts.push(format!("sweep={}", sweep.timeframe));
    }
    if let Some(double) = ctx.double_sweep {
        parts.push(format!("double_sweep={}", double.timeframe));
    }
    if let Some(zone) = ctx.fvg_touch {
        parts.push(format!("fvg={}", zone.timeframe));
    }
    if let Some(bos) = ctx.structure_break {
        parts.push(format!("bos={}", bos.timeframe));
    }
    parts.push(format!("trend H4/D1={}/{}", ctx.trend_h4, ctx.trend_d1));
    parts.join(", ")
}
