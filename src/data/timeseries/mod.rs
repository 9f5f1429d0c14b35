pub mod csv_file;

use std::collections::BTreeMap;

use crate::domain::Timeframe;
use crate::errors::ValidationError;
use crate::models::OhlcvTimeSeries;

/// Every timeframe loaded for one instrument. Immutable input to a scan.
#[derive(Debug, Default, Clone)]
pub struct MarketData {
    pub name: String, // Metadata e.g. "GBPUSD"
    series: BTreeMap<Timeframe, OhlcvTimeSeries>,
}

impl MarketData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            series: BTreeMap::new(),
        }
    }

    /// Add (or replace) the series for its timeframe.
    pub fn insert(&mut self, series: OhlcvTimeSeries) -> Option<OhlcvTimeSeries> {
        self.series.insert(series.timeframe, series)
    }

    pub fn with_series(mut self, series: OhlcvTimeSeries) -> Self {
        self.insert(series);
        self
    }

    pub fn get(&self, timeframe: Timeframe) -> Option<&OhlcvTimeSeries> {
        self.series.get(&timeframe)
    }

    pub fn series(&self) -> &BTreeMap<Timeframe, OhlcvTimeSeries> {
        &self.series
    }

    pub fn timeframes(&self) -> impl Iterator<Item = Timeframe> + '_ {
        self.series.keys().copied()
    }

    /// The base series must be present and every supplied series must be well formed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.series.contains_key(&Timeframe::BASE) {
            return Err(ValidationError::MissingBase(Timeframe::BASE));
        }
        self.series.values().try_for_each(OhlcvTimeSeries::validate)
    }
}
