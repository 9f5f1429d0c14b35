use chrono::{DateTime, NaiveDate, Timelike};

pub struct TimeUtils;

impl TimeUtils {
    pub const MS_IN_S: i64 = 1000;
    pub const MS_IN_MIN: i64 = Self::MS_IN_S * 60;
    pub const MS_IN_15_MIN: i64 = Self::MS_IN_S * 60 * 15;
    pub const MS_IN_H: i64 = Self::MS_IN_MIN * 60;
    pub const MS_IN_4_H: i64 = Self::MS_IN_MIN * 60 * 4;
    pub const MS_IN_D: i64 = Self::MS_IN_H * 24;
    pub const MS_IN_W: i64 = Self::MS_IN_D * 7;
    pub const STANDARD_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

    /// Convert interval in milliseconds to a Binance-style shorthand (e.g. `15m`, `4h`).
    pub fn interval_to_string(interval_ms: i64) -> &'static str {
        match interval_ms {
            Self::MS_IN_MIN => "1m",
            Self::MS_IN_15_MIN => "15m",
            Self::MS_IN_H => "1h",
            Self::MS_IN_4_H => "4h",
            Self::MS_IN_D => "1d",
            Self::MS_IN_W => "1w",
            _ => "unknown",
        }
    }
}

pub const MINUTES_IN_DAY: u32 = 24 * 60;

/// UTC calendar date and minute-of-day for an epoch-ms timestamp.
/// None only for timestamps chrono cannot represent.
pub fn utc_date_and_minute(epoch_ms: i64) -> Option<(NaiveDate, u32)> {
    let dt = DateTime::from_timestamp_millis(epoch_ms)?;
    let minute = dt.hour() * 60 + dt.minute();
    Some((dt.date_naive(), minute))
}

pub fn epoch_ms_to_utc(epoch_ms: i64) -> String {
    // Used for display purposes
    match DateTime::from_timestamp_millis(epoch_ms) {
        Some(dt) => dt.format(TimeUtils::STANDARD_TIME_FORMAT).to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minute_of_day() {
        // 2024-08-05 10:15 UTC
        let ts = 1_722_816_000_000 + 10 * TimeUtils::MS_IN_H + 15 * TimeUtils::MS_IN_MIN;
        let (date, minute) = utc_date_and_minute(ts).unwrap();
        assert_eq!(date.to_string(), "2024-08-05");
        assert_eq!(minute, 615);
        assert_eq!(epoch_ms_to_utc(ts), "2024-08-05 10:15");
    }
}
