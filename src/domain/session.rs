//! Named intraday trading sessions and the calendar that maps a timestamp onto one.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::errors::ValidationError;
use crate::utils::time_utils::{MINUTES_IN_DAY, utc_date_and_minute};

#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Session {
    Asia,
    Frankfurt,
    London,
    #[strum(to_string = "New York", serialize = "new_york", serialize = "NewYork")]
    NewYork,
}

impl Session {
    /// Earlier sessions whose range this session may sweep.
    pub fn sweep_targets(self) -> &'static [Session] {
        match self {
            Session::Asia => &[],
            Session::Frankfurt => &[Session::Asia],
            Session::London => &[Session::Asia, Session::Frankfurt],
            Session::NewYork => &[Session::London],
        }
    }

    /// Sessions that can carry the Asia/Frankfurt context pattern.
    pub fn is_main_session(self) -> bool {
        matches!(self, Session::London | Session::NewYork)
    }
}

/// One time-of-day window, in minutes after UTC midnight. `end_minute` is exclusive.
/// A window with `start_minute > end_minute` wraps midnight.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SessionWindow {
    pub session: Session,
    pub start_minute: u32,
    pub end_minute: u32,
}

impl SessionWindow {
    pub const fn new(session: Session, start_hour: u32, end_hour: u32) -> Self {
        Self {
            session,
            start_minute: start_hour * 60,
            end_minute: end_hour * 60,
        }
    }

    pub fn wraps(&self) -> bool {
        self.start_minute > self.end_minute
    }

    pub fn contains(&self, minute: u32) -> bool {
        if self.wraps() {
            minute >= self.start_minute || minute < self.end_minute
        } else {
            minute >= self.start_minute && minute < self.end_minute
        }
    }
}

/// The session a bar falls in, plus the session day it is accounted to.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct SessionSlot {
    pub session: Session,
    pub day: NaiveDate,
}

/// Ordered set of session windows. Regular windows are tried in order, first match
/// wins. The single wrap-around window (if any) catches every other time of day.
#[derive(Clone, Debug)]
pub struct SessionCalendar {
    windows: Vec<SessionWindow>,
}

impl SessionCalendar {
    pub fn new(windows: Vec<SessionWindow>) -> Result<Self, ValidationError> {
        if windows.is_empty() {
            return Err(ValidationError::Config(
                "session calendar has no windows".to_string(),
            ));
        }

        for w in &windows {
            if w.start_minute >= MINUTES_IN_DAY || w.end_minute > MINUTES_IN_DAY {
                return Err(ValidationError::Config(format!(
                    "session {} has bounds outside one day ({}..{})",
                    w.session, w.start_minute, w.end_minute
                )));
            }
            if w.start_minute == w.end_minute {
                return Err(ValidationError::Config(format!(
                    "session {} has an empty window",
                    w.session
                )));
            }
        }

        let wrapping = windows.iter().filter(|w| w.wraps()).count();
        if wrapping > 1 {
            return Err(ValidationError::Config(format!(
                "session calendar has {} wrap-around windows (at most 1 allowed)",
                wrapping
            )));
        }

        // Regular windows must not overlap each other
        let regular: Vec<&SessionWindow> = windows.iter().filter(|w| !w.wraps()).collect();
        for (i, a) in regular.iter().enumerate() {
            for b in regular.iter().skip(i + 1) {
                if a.start_minute < b.end_minute && b.start_minute < a.end_minute {
                    return Err(ValidationError::Config(format!(
                        "sessions {} and {} overlap",
                        a.session, b.session
                    )));
                }
            }
        }

        Ok(Self { windows })
    }

    pub fn windows(&self) -> &[SessionWindow] {
        &self.windows
    }

    fn wrap_window(&self) -> Option<&SessionWindow> {
        self.windows.iter().find(|w| w.wraps())
    }

    /// Resolve the session (by time of day only) for a timestamp.
    pub fn session_at(&self, timestamp_ms: i64) -> Option<Session> {
        self.resolve(timestamp_ms).map(|slot| slot.session)
    }

    /// Resolve session and session day. Bars of the wrap-around window at or after its
    /// start time are accounted to the following calendar day, so the overnight session
    /// shares a key with the sessions that follow it.
    pub fn resolve(&self, timestamp_ms: i64) -> Option<SessionSlot> {
        let (date, minute) = utc_date_and_minute(timestamp_ms)?;

        if let Some(w) = self
            .windows
            .iter()
            .find(|w| !w.wraps() && w.contains(minute))
        {
            return Some(SessionSlot {
                session: w.session,
                day: date,
            });
        }

        let wrap = self.wrap_window()?;
        let day = if minute >= wrap.start_minute {
            date.checked_add_days(Days::new(1))?
        } else {
            date
        };
        Some(SessionSlot {
            session: wrap.session,
            day,
        })
    }
}

impl Default for SessionCalendar {
    fn default() -> Self {
        Self {
            windows: crate::config::ANALYSIS.sessions.to_vec(),
        }
    }
}
