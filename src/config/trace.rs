//! Per-run diagnostics level.
//!
//! Passed explicitly into `run_analysis`; there is no process-wide debug switch.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TraceLevel {
    /// Only the end-of-run summary
    #[default]
    Off,
    /// Log every emitted signal
    Signals,
    /// Also dump every evaluated bar context
    Bars,
}

impl TraceLevel {
    pub fn signals(self) -> bool {
        self >= TraceLevel::Signals
    }

    pub fn bars(self) -> bool {
        self >= TraceLevel::Bars
    }
}
