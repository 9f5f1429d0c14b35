use std::collections::BTreeMap;

use crate::domain::{FvgDirection, Timeframe};
use crate::models::AnalyzedSeries;
use crate::utils::maths_utils::ranges_overlap;

/// An open fair-value-gap zone from a higher timeframe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FvgZone {
    pub timeframe: Timeframe,
    pub direction: FvgDirection,
    pub price_low: f64,
    pub price_high: f64,
    /// Timestamp of the third candle of the gap pattern
    pub created_at_ms: i64,
}

impl FvgZone {
    /// Inclusive overlap with a candle's [low, high]
    pub fn overlaps(&self, price_low: f64, price_high: f64) -> bool {
        ranges_overlap((self.price_low, self.price_high), (price_low, price_high))
    }
}

/// All FVG zones collected from the higher timeframes, in ascending creation order.
///
/// Zones are never removed by default. With `consume_on_touch` the first touching bar
/// retires the zone; retired zones are skipped by later queries.
#[derive(Debug, Clone, Default)]
pub struct ZoneRegistry {
    zones: Vec<FvgZone>,
    consumed: Vec<bool>,
    consume_on_touch: bool,
}

impl ZoneRegistry {
    pub fn new(mut zones: Vec<FvgZone>, consume_on_touch: bool) -> Self {
        // Stable sort keeps insertion order among same-time, same-timeframe zones
        zones.sort_by_key(|z| (z.created_at_ms, z.timeframe));
        let consumed = vec![false; zones.len()];
        Self {
            zones,
            consumed,
            consume_on_touch,
        }
    }

    /// Collect every gap flagged on the higher-timeframe series among `series`.
    /// Base and fine timeframes never contribute zones.
    pub fn from_series<'a>(
        series: impl IntoIterator<Item = &'a AnalyzedSeries>,
        consume_on_touch: bool,
    ) -> Self {
        let zones = series
            .into_iter()
            .filter(|analyzed| analyzed.timeframe().is_higher())
            .flat_map(|analyzed| {
                analyzed
                    .features
                    .fvg
                    .iter()
                    .enumerate()
                    .filter_map(move |(idx, gap)| {
                        gap.map(|gap| FvgZone {
                            timeframe: analyzed.timeframe(),
                            direction: gap.direction,
                            price_low: gap.price_low,
                            price_high: gap.price_high,
                            created_at_ms: analyzed.series.timestamps_ms[idx],
                        })
                    })
            })
            .collect();
        Self::new(zones, consume_on_touch)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn count_by_timeframe(&self) -> BTreeMap<Timeframe, usize> {
        let mut counts = BTreeMap::new();
        for zone in &self.zones {
            *counts.entry(zone.timeframe).or_insert(0) += 1;
        }
        counts
    }

    // Zones with created_at <= as_of form a prefix of the sorted list
    fn first_hit(&self, price_low: f64, price_high: f64, as_of_ms: i64) -> Option<usize> {
        let end = self.zones.partition_point(|z| z.created_at_ms <= as_of_ms);
        (0..end).find(|&i| !self.consumed[i] && self.zones[i].overlaps(price_low, price_high))
    }

    /// Does [price_low, price_high] overlap any open zone created at or before `as_of_ms`?
    pub fn touches(&self, price_low: f64, price_high: f64, as_of_ms: i64) -> bool {
        self.first_hit(price_low, price_high, as_of_ms).is_some()
    }

    /// First (oldest) open zone touched by the range. Consumes it when configured to.
    pub fn touch(&mut self, price_low: f64, price_high: f64, as_of_ms: i64) -> Option<FvgZone> {
        let idx = self.first_hit(price_low, price_high, as_of_ms)?;
        if self.consume_on_touch {
            self.consumed[idx] = true;
        }
        Some(self.zones[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::detectors::analyze_series;
    use crate::config::ANALYSIS;
    use crate::domain::Candle;
    use crate::models::OhlcvTimeSeries;

    // 2024-08-05 00:00:00 UTC
    const MONDAY_MS: i64 = 1_722_816_000_000;

    /// Bar 2's low (110) sits above bar 0's high (100): an up gap [100, 110].
    fn gapped(timeframe: Timeframe) -> AnalyzedSeries {
        let step = timeframe.interval_ms();
        let candles = [
            Candle::new(MONDAY_MS, 95.0, 100.0, 90.0, 98.0, 1.0),
            Candle::new(MONDAY_MS + step, 99.0, 115.0, 99.0, 112.0, 1.0),
            Candle::new(MONDAY_MS + 2 * step, 112.0, 120.0, 110.0, 118.0, 1.0),
        ];
        analyze_series(
            OhlcvTimeSeries::from_candles(timeframe, &candles),
            &ANALYSIS.detectors,
        )
    }

    fn zone(timeframe: Timeframe, low: f64, high: f64, created_at_ms: i64) -> FvgZone {
        FvgZone {
            timeframe,
            direction: FvgDirection::Up,
            price_low: low,
            price_high: high,
            created_at_ms,
        }
    }

    #[test]
    fn zone_touches_its_own_range() {
        let registry = ZoneRegistry::new(vec![zone(Timeframe::H4, 100.0, 110.0, 0)], false);
        assert!(registry.touches(100.0, 110.0, 0));
        assert!(registry.touches(105.0, 108.0, 10));
        assert!(registry.touches(90.0, 100.0, 10));
    }

    #[test]
    fn disjoint_range_does_not_touch() {
        let registry = ZoneRegistry::new(
            vec![
                zone(Timeframe::H4, 100.0, 110.0, 0),
                zone(Timeframe::D1, 120.0, 130.0, 0),
            ],
            false,
        );
        assert!(!registry.touches(111.0, 119.0, 10));
        assert!(!registry.touches(131.0, 140.0, 10));
    }

    #[test]
    fn future_zones_are_invisible() {
        let registry = ZoneRegistry::new(vec![zone(Timeframe::H4, 100.0, 110.0, 50)], false);
        assert!(!registry.touches(105.0, 106.0, 49));
        assert!(registry.touches(105.0, 106.0, 50));
    }

    #[test]
    fn oldest_zone_wins() {
        let mut registry = ZoneRegistry::new(
            vec![
                zone(Timeframe::H4, 100.0, 110.0, 20),
                zone(Timeframe::W1, 95.0, 105.0, 10),
            ],
            false,
        );
        let hit = registry.touch(101.0, 102.0, 30).unwrap();
        assert_eq!(hit.timeframe, Timeframe::W1);
    }

    #[test]
    fn zones_stay_open_unless_consumption_enabled() {
        let mut open = ZoneRegistry::new(vec![zone(Timeframe::H4, 100.0, 110.0, 0)], false);
        assert!(open.touch(105.0, 106.0, 1).is_some());
        assert!(open.touch(105.0, 106.0, 2).is_some());

        let mut consuming = ZoneRegistry::new(vec![zone(Timeframe::H4, 100.0, 110.0, 0)], true);
        assert!(consuming.touch(105.0, 106.0, 1).is_some());
        assert!(consuming.touch(105.0, 106.0, 2).is_none());
        assert!(!consuming.touches(105.0, 106.0, 3));
    }

    #[test]
    fn registry_built_from_detected_gaps() {
        let h4 = gapped(Timeframe::H4);
        let m15 = gapped(Timeframe::M15);
        let m1 = gapped(Timeframe::M1);
        let registry = ZoneRegistry::from_series([&m1, &m15, &h4], false);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.count_by_timeframe().get(&Timeframe::H4), Some(&1));

        let created_at = h4.series.timestamps_ms[2];
        assert!(!registry.touches(105.0, 108.0, created_at - 1));
        assert!(registry.touches(105.0, 108.0, created_at));
        assert!(registry.touches(105.0, 108.0, created_at + Timeframe::H4.interval_ms()));

        let mut registry = registry;
        let zone = registry.touch(105.0, 108.0, created_at).unwrap();
        assert_eq!(zone.direction, FvgDirection::Up);
        assert_eq!((zone.price_low, zone.price_high), (100.0, 110.0));
        assert_eq!(zone.created_at_ms, created_at);
    }
}
