use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use strum::IntoEnumIterator;

use crate::data::timeseries::MarketData;
use crate::domain::{Candle, Timeframe};
use crate::models::OhlcvTimeSeries;

/// One row of a `Datetime,Open,High,Low,Close,Volume` export.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Date", alias = "Timestamp", alias = "datetime")]
    #[serde(rename = "Datetime")]
    datetime: String,
    #[serde(rename = "Open", alias = "open")]
    open: f64,
    #[serde(rename = "High", alias = "high")]
    high: f64,
    #[serde(rename = "Low", alias = "low")]
    low: f64,
    #[serde(rename = "Close", alias = "close")]
    close: f64,
    #[serde(rename = "Volume", alias = "volume", default)]
    volume: f64,
}

/// Parse a timestamp cell into epoch ms (UTC).
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM[:SS][+HH:MM]`, a bare date, or epoch seconds/ms.
pub fn parse_datetime_ms(cell: &str) -> Option<i64> {
    let cell = cell.trim();

    if let Ok(epoch) = cell.parse::<i64>() {
        // 13+ digits: already milliseconds
        return Some(if epoch.unsigned_abs() >= 1_000_000_000_000 {
            epoch
        } else {
            epoch * 1000
        });
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(cell) {
        return Some(dt.timestamp_millis());
    }
    for format in ["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%z"] {
        if let Ok(dt) = DateTime::parse_from_str(cell, format) {
            return Some(dt.timestamp_millis());
        }
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cell, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(cell, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Read one timeframe from CSV. Rows are kept in file order; ordering problems are
/// left for `OhlcvTimeSeries::validate` to report.
pub fn load_series_from_csv(path: &Path, timeframe: Timeframe) -> Result<OhlcvTimeSeries> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .context(format!("Failed to open csv file: {}", path.display()))?;

    let mut series = OhlcvTimeSeries::new(timeframe);
    for (line, row) in reader.deserialize::<CsvRow>().enumerate() {
        let row = row.context(format!("Bad row {} in {}", line + 1, path.display()))?;
        let timestamp_ms = parse_datetime_ms(&row.datetime).ok_or_else(|| {
            anyhow!(
                "Unparseable datetime '{}' at row {} in {}",
                row.datetime,
                line + 1,
                path.display()
            )
        })?;
        series.push(&Candle::new(
            timestamp_ms,
            row.open,
            row.high,
            row.low,
            row.close,
            row.volume,
        ));
    }
    Ok(series)
}

/// `<dir>/<SYMBOL>_<TF>.csv`, e.g. `data/GBPUSD_M15.csv`
pub fn series_path(dir: &Path, symbol: &str, timeframe: Timeframe) -> PathBuf {
    dir.join(format!("{}_{}.csv", symbol, timeframe))
}

/// The timeframe's file if present, trying `GBPUSD_M15.csv` then `GBPUSD_15m.csv`.
fn find_series_file(dir: &Path, symbol: &str, timeframe: Timeframe) -> Option<PathBuf> {
    [
        series_path(dir, symbol, timeframe),
        dir.join(format!("{}_{}.csv", symbol, timeframe.label())),
    ]
    .into_iter()
    .find(|path| path.exists())
}

/// Load every timeframe file present for `symbol`. Missing non-base files are skipped.
pub fn load_market_data(dir: &Path, symbol: &str) -> Result<MarketData> {
    let mut data = MarketData::new(symbol);
    for timeframe in Timeframe::iter() {
        let Some(path) = find_series_file(dir, symbol, timeframe) else {
            let expected = series_path(dir, symbol, timeframe);
            if timeframe == Timeframe::BASE {
                return Err(anyhow!(
                    "Base timeframe file not found: {}",
                    expected.display()
                ));
            }
            log::info!("No {} data for {} ({} not found)", timeframe, symbol, expected.display());
            continue;
        };
        let series = load_series_from_csv(&path, timeframe)?;
        log::info!(
            "Loaded {} {} candles for {} from {}",
            series.klines(),
            timeframe,
            symbol,
            path.display()
        );
        data.insert(series);
    }
    Ok(data)
}
