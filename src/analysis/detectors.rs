//! Per-timeframe feature detectors.
//!
//! Every detector is a pure function of the candle columns and returns a new column,
//! one entry per bar. Nothing here looks at other timeframes.

use crate::config::DetectorSettings;
use crate::domain::{BosDirection, FvgDirection, Trend};
use crate::models::{AnalyzedSeries, FeatureColumns, FvgGap, OhlcvTimeSeries};
use crate::utils::maths_utils::{get_max, get_min, rolling_max, rolling_mean, rolling_min, trailing_window};

/// Three-candle gaps. Bar `i` compares itself with bar `i - 2`.
pub fn detect_fvg(highs: &[f64], lows: &[f64]) -> Vec<Option<FvgGap>> {
    (0..highs.len())
        .map(|i| {
            if i < 2 {
                return None;
            }
            if lows[i] > highs[i - 2] {
                Some(FvgGap {
                    direction: FvgDirection::Up,
                    price_low: highs[i - 2],
                    price_high: lows[i],
                })
            } else if highs[i] < lows[i - 2] {
                Some(FvgGap {
                    direction: FvgDirection::Down,
                    price_low: highs[i],
                    price_high: lows[i - 2],
                })
            } else {
                None
            }
        })
        .collect()
}

/// A bar sweeps when its high (low) equals the trailing-window max (min), itself included.
/// Ties all flag. The first bars use whatever history exists.
pub fn detect_sweeps(highs: &[f64], lows: &[f64], window: usize) -> (Vec<bool>, Vec<bool>) {
    let max_highs = rolling_max(highs, window);
    let min_lows = rolling_min(lows, window);

    let sweep_high = highs.iter().zip(&max_highs).map(|(h, m)| h == m).collect();
    let sweep_low = lows.iter().zip(&min_lows).map(|(l, m)| l == m).collect();
    (sweep_high, sweep_low)
}

/// SMA of close over `period` bars (current bar included) and the resulting label.
/// Bars without a full period are `Trend::Unknown`.
pub fn detect_trend(closes: &[f64], period: usize) -> (Vec<Option<f64>>, Vec<Trend>) {
    let sma = rolling_mean(closes, period);
    let trend = closes
        .iter()
        .zip(&sma)
        .map(|(&close, sma)| match sma {
            Some(avg) if close > *avg => Trend::Up,
            Some(_) => Trend::Down,
            None => Trend::Unknown,
        })
        .collect();
    (sma, trend)
}

/// Low-volatility consolidation: the window's high-low range is below `ratio` of its
/// mean close. Undefined until a full window exists.
pub fn detect_cisd(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    window: usize,
    ratio: f64,
) -> Vec<Option<bool>> {
    let mean_close = rolling_mean(closes, window);
    (0..highs.len())
        .map(|i| {
            let mean = mean_close[i]?;
            let span = trailing_window(i, window);
            let range = get_max(&highs[span.clone()]) - get_min(&lows[span]);
            Some(range < mean * ratio)
        })
        .collect()
}

/// Rolling high/low of the `lookback` bars before `i` (bar `i` excluded), and whether
/// the close broke out of it.
pub fn detect_bos(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    lookback: usize,
) -> (Vec<Option<f64>>, Vec<Option<f64>>, Vec<Option<BosDirection>>) {
    let n = closes.len();
    let mut local_high = Vec::with_capacity(n);
    let mut local_low = Vec::with_capacity(n);
    let mut bos = Vec::with_capacity(n);

    for i in 0..n {
        if i < lookback {
            local_high.push(None);
            local_low.push(None);
            bos.push(None);
            continue;
        }
        let prior = i - lookback..i;
        let high = get_max(&highs[prior.clone()]);
        let low = get_min(&lows[prior]);

        let direction = if closes[i] > high {
            Some(BosDirection::Bullish)
        } else if closes[i] < low {
            Some(BosDirection::Bearish)
        } else {
            None
        };

        local_high.push(Some(high));
        local_low.push(Some(low));
        bos.push(direction);
    }

    (local_high, local_low, bos)
}

/// Repeated sweeps: at least `min_count` sweep flags inside the trailing window.
/// Each side is counted independently.
pub fn detect_double_sweep(
    sweep_high: &[bool],
    sweep_low: &[bool],
    window: usize,
    min_count: usize,
) -> (Vec<bool>, Vec<bool>) {
    let repeated = |flags: &[bool]| -> Vec<bool> {
        (0..flags.len())
            .map(|i| flags[trailing_window(i, window)].iter().filter(|&&f| f).count() >= min_count)
            .collect()
    };
    (repeated(sweep_high), repeated(sweep_low))
}

/// Run every detector over one series.
pub fn analyze_series(series: OhlcvTimeSeries, settings: &DetectorSettings) -> AnalyzedSeries {
    let highs = &series.high_prices;
    let lows = &series.low_prices;
    let closes = &series.close_prices;

    let sweep_window = settings.sweep_windows.for_timeframe(series.timeframe);
    let (sweep_high, sweep_low) = detect_sweeps(highs, lows, sweep_window);
    let (sma, trend) = detect_trend(closes, settings.trend_period);
    let (local_high, local_low, bos) = detect_bos(highs, lows, closes, settings.bos_lookback);
    let (double_sweep_high, double_sweep_low) = detect_double_sweep(
        &sweep_high,
        &sweep_low,
        settings.double_sweep_window,
        settings.double_sweep_min_count,
    );

    let features = FeatureColumns {
        fvg: detect_fvg(highs, lows),
        sweep_high,
        sweep_low,
        sma,
        trend,
        cisd: detect_cisd(
            highs,
            lows,
            closes,
            settings.cisd_window,
            settings.cisd_range_ratio,
        ),
        local_high,
        local_low,
        bos,
        double_sweep_high,
        double_sweep_low,
    };

    log::debug!(
        "{}: {} bars, {} gaps, {} high sweeps, {} low sweeps",
        series.timeframe,
        series.klines(),
        features.fvg.iter().flatten().count(),
        features.sweep_high.iter().filter(|&&f| f).count(),
        features.sweep_low.iter().filter(|&&f| f).count(),
    );

    AnalyzedSeries { series, features }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ANALYSIS;
    use crate::domain::{Candle, Timeframe};

    #[test]
    fn up_gap_records_zone_bounds() {
        let highs = [100.0, 104.0, 112.0];
        let lows = [95.0, 99.0, 110.0];
        let gaps = detect_fvg(&highs, &lows);
        assert_eq!(gaps[0], None);
        assert_eq!(gaps[1], None);
        assert_eq!(
            gaps[2],
            Some(FvgGap {
                direction: FvgDirection::Up,
                price_low: 100.0,
                price_high: 110.0,
            })
        );
    }

    #[test]
    fn down_gap_records_zone_bounds() {
        let highs = [120.0, 115.0, 105.0];
        let lows = [110.0, 104.0, 100.0];
        let gaps = detect_fvg(&highs, &lows);
        assert_eq!(
            gaps[2],
            Some(FvgGap {
                direction: FvgDirection::Down,
                price_low: 105.0,
                price_high: 110.0,
            })
        );
    }

    #[test]
    fn touching_candles_are_not_a_gap() {
        // low[2] == high[0]: no positive gap
        let gaps = detect_fvg(&[100.0, 101.0, 102.0], &[99.0, 99.5, 100.0]);
        assert_eq!(gaps[2], None);
    }

    #[test]
    fn sweep_flags_ties_and_partial_windows() {
        let highs = [5.0, 3.0, 5.0, 4.0, 6.0];
        let lows = [1.0, 2.0, 1.0, 3.0, 2.0];
        let (sweep_high, sweep_low) = detect_sweeps(&highs, &lows, 3);
        assert_eq!(sweep_high, vec![true, false, true, false, true]);
        assert_eq!(sweep_low, vec![true, false, true, false, false]);
    }

    #[test]
    fn sweep_window_of_one_flags_every_bar() {
        let highs = [3.0, 1.0, 2.0];
        let lows = [1.0, 0.5, 1.5];
        let (sweep_high, sweep_low) = detect_sweeps(&highs, &lows, 1);
        assert!(sweep_high.iter().all(|&f| f));
        assert!(sweep_low.iter().all(|&f| f));
    }

    #[test]
    fn trend_is_unknown_until_period_filled() {
        let closes: Vec<f64> = (0..25).map(|i| 100.0 + i as f64).collect();
        let (sma, trend) = detect_trend(&closes, 20);
        assert!(trend[..19].iter().all(|&t| t == Trend::Unknown));
        assert!(sma[18].is_none());
        assert_eq!(sma[19], Some(109.5));
        assert_eq!(trend[19], Trend::Up);

        let falling: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let (_, trend) = detect_trend(&falling, 20);
        assert_eq!(trend[19], Trend::Down);
    }

    #[test]
    fn cisd_flags_tight_ranges_only() {
        let highs = [100.1, 100.2, 100.1, 103.0];
        let lows = [99.9, 99.8, 99.9, 99.0];
        let closes = [100.0, 100.0, 100.0, 102.0];
        let cisd = detect_cisd(&highs, &lows, &closes, 3, 0.005);
        assert_eq!(cisd[0], None);
        assert_eq!(cisd[1], None);
        // range 0.4 < 100 * 0.005
        assert_eq!(cisd[2], Some(true));
        assert_eq!(cisd[3], Some(false));
    }

    #[test]
    fn bos_uses_prior_bars_only() {
        let highs = [10.0, 11.0, 12.0, 13.0];
        let lows = [9.0, 10.0, 11.0, 8.0];
        let closes = [9.5, 10.5, 11.5, 8.5];
        let (local_high, local_low, bos) = detect_bos(&highs, &lows, &closes, 2);
        assert_eq!(local_high[1], None);
        assert_eq!(local_high[2], Some(11.0));
        assert_eq!(local_low[3], Some(10.0));
        assert_eq!(bos[2], Some(BosDirection::Bullish));
        assert_eq!(bos[3], Some(BosDirection::Bearish));
    }

    #[test]
    fn double_sweep_counts_within_window() {
        // Bars 3 and 7 (1-based) inside a 10-bar window ending at bar 10
        let mut sweep_high = vec![false; 10];
        sweep_high[2] = true;
        sweep_high[6] = true;
        let sweep_low = vec![false; 10];
        let (double_high, double_low) = detect_double_sweep(&sweep_high, &sweep_low, 10, 2);
        assert!(double_high[9]);
        assert!(!double_high[5]);
        assert!(double_low.iter().all(|&f| !f));

        // One more bar and bar 3 drops out of a 5-bar window
        let (double_high, _) = detect_double_sweep(&sweep_high, &sweep_low, 5, 2);
        assert!(double_high[6]);
        assert!(!double_high[7]);
    }

    #[test]
    fn analyze_series_fills_every_column() {
        let candles: Vec<Candle> = (0..30)
            .map(|i| {
                let p = 100.0 + i as f64;
                Candle::new(i * 900_000, p, p + 1.0, p - 1.0, p + 0.5, 10.0)
            })
            .collect();
        let series = OhlcvTimeSeries::from_candles(Timeframe::M15, &candles);
        let analyzed = analyze_series(series, &ANALYSIS.detectors);
        let f = &analyzed.features;
        for len in [
            f.fvg.len(),
            f.sweep_high.len(),
            f.trend.len(),
            f.cisd.len(),
            f.bos.len(),
            f.double_sweep_low.len(),
        ] {
            assert_eq!(len, 30);
        }
        // Steady climb: every bar is a new high and the trend is up once defined
        assert!(f.sweep_high.iter().all(|&s| s));
        assert_eq!(f.trend[29], Trend::Up);
        assert!(f.fvg.iter().all(|g| g.is_none_or(|g| g.direction == FvgDirection::Up)));
    }
}
