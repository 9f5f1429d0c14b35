//! Ordered pattern catalogue. The first rule that fires owns the bar.

use crate::domain::{SignalDirection, Timeframe};
use crate::models::{EvaluationContext, PatternKind};

/// A pattern predicate paired with the way it derives a trade direction.
pub struct PatternRule {
    pub kind: PatternKind,
    pub fires: fn(&EvaluationContext) -> bool,
    pub direction: fn(&EvaluationContext) -> Option<SignalDirection>,
}

/// Rules in evaluation order.
///
/// Double Sweep sits ahead of Sweep + FVG + CISD so that a bar matching both is
/// reported as the stronger (VERY HIGH) pattern.
pub static RULES: [PatternRule; 5] = [
    PatternRule {
        kind: PatternKind::DoubleSweep,
        fires: |ctx| ctx.double_sweep_detected() && (ctx.fvg_tested() || ctx.cisd_detected()),
        direction: |ctx| ctx.double_sweep.map(|s| s.side.signal_direction()),
    },
    PatternRule {
        kind: PatternKind::SweepFvgCisd,
        fires: |ctx| ctx.sweep_detected && ctx.fvg_tested() && ctx.cisd_detected(),
        direction: |ctx| ctx.confirmed_sweep().map(|s| s.side.signal_direction()),
    },
    PatternRule {
        kind: PatternKind::SessionOpenLiquidityGrab,
        fires: |ctx| ctx.session_swept() && ctx.fvg_tested() && ctx.cisd_detected(),
        direction: |ctx| ctx.session_sweep.map(|side| side.signal_direction()),
    },
    PatternRule {
        kind: PatternKind::BosAfterSweep,
        fires: |ctx| {
            ctx.sweep_detected && ctx.bos_detected() && (ctx.fvg_tested() || ctx.cisd_detected())
        },
        // Direction follows the break, not the sweep
        direction: |ctx| ctx.structure_break.map(|b| b.direction.signal_direction()),
    },
    PatternRule {
        kind: PatternKind::AsiaFrankfurtContext,
        fires: |ctx| {
            ctx.early_session_context
                && ctx.session.is_main_session()
                && ctx.session_swept()
                && ctx.fvg_tested()
        },
        direction: |ctx| ctx.session_sweep.map(|side| side.signal_direction()),
    },
];

/// The winning rule for one bar.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternMatch {
    pub kind: PatternKind,
    pub direction: SignalDirection,
    pub reason: String,
    pub contributing_timeframes: Vec<Timeframe>,
}

pub struct RuleEngine {
    rules: &'static [PatternRule],
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self { rules: &RULES }
    }
}

impl RuleEngine {
    pub fn rules(&self) -> &'static [PatternRule] {
        self.rules
    }

    /// First matching rule, or None. A rule that fires without a resolvable direction
    /// does not match.
    pub fn evaluate(&self, ctx: &EvaluationContext) -> Option<PatternMatch> {
        self.rules.iter().find_map(|rule| {
            if !(rule.fires)(ctx) {
                return None;
            }
            let direction = (rule.direction)(ctx)?;
            Some(PatternMatch {
                kind: rule.kind,
                direction,
                reason: reason(rule.kind, ctx),
                contributing_timeframes: contributing_timeframes(rule.kind, ctx),
            })
        })
    }
}

fn reason(kind: PatternKind, ctx: &EvaluationContext) -> String {
    let fvg = ctx
        .fvg_touch
        .map(|z| format!("{} FVG {} zone tested", z.timeframe, z.direction));
    let cisd = ctx.cisd_detected().then(|| "consolidation (CISD)".to_string());
    let supporting = |parts: [Option<String>; 2]| -> String {
        parts.into_iter().flatten().collect::<Vec<_>>().join(" + ")
    };

    match kind {
        PatternKind::DoubleSweep => match ctx.double_sweep {
            Some(s) => format!(
                "{} double sweep of {} liquidity, {}",
                s.timeframe,
                s.side,
                supporting([fvg, cisd])
            ),
            None => String::new(),
        },
        PatternKind::SweepFvgCisd => match ctx.confirmed_sweep() {
            Some(s) => format!(
                "{} {} sweep, {}",
                s.timeframe,
                s.side,
                supporting([fvg, cisd])
            ),
            None => String::new(),
        },
        PatternKind::SessionOpenLiquidityGrab => format!(
            "{} took out {} {}, {}",
            ctx.session,
            session_targets(ctx),
            side_label(ctx),
            supporting([fvg, cisd])
        ),
        PatternKind::BosAfterSweep => match (ctx.confirmed_sweep(), ctx.structure_break) {
            (Some(s), Some(b)) => format!(
                "{} {} sweep then {} {} break of structure, {}",
                s.timeframe,
                s.side,
                b.timeframe,
                b.direction,
                supporting([fvg, cisd])
            ),
            _ => String::new(),
        },
        PatternKind::AsiaFrankfurtContext => format!(
            "Frankfurt broke the Asia range, {} took out {} {}, {}",
            ctx.session,
            session_targets(ctx),
            side_label(ctx),
            supporting([fvg, None])
        ),
    }
}

fn session_targets(ctx: &EvaluationContext) -> String {
    ctx.session
        .sweep_targets()
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join("/")
}

fn side_label(ctx: &EvaluationContext) -> String {
    ctx.session_sweep
        .map(|side| side.to_string())
        .unwrap_or_else(|| "range".to_string())
}

/// Timeframes whose evidence the pattern relied on, finest first, no repeats.
fn contributing_timeframes(kind: PatternKind, ctx: &EvaluationContext) -> Vec<Timeframe> {
    let sweep = ctx.confirmed_sweep().map(|s| s.timeframe);
    let double = ctx.double_sweep.map(|s| s.timeframe);
    let fvg = ctx.fvg_touch.map(|z| z.timeframe);
    let cisd = ctx.cisd_detected().then_some(Timeframe::BASE);
    let session = ctx.session_swept().then_some(Timeframe::BASE);
    let bos = ctx.structure_break.map(|b| b.timeframe);

    let evidence: Vec<Option<Timeframe>> = match kind {
        PatternKind::DoubleSweep => vec![double, fvg, cisd],
        PatternKind::SweepFvgCisd => vec![sweep, fvg, cisd],
        PatternKind::SessionOpenLiquidityGrab => vec![session, fvg, cisd],
        PatternKind::BosAfterSweep => vec![sweep, bos, fvg, cisd],
        PatternKind::AsiaFrankfurtContext => vec![session, fvg],
    };

    let mut timeframes: Vec<Timeframe> = evidence.into_iter().flatten().collect();
    timeframes.sort();
    timeframes.dedup();
    timeframes
}
