use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid progress status: {0}")]
pub struct StatusParseError(pub String);

//
// ─── PROGRESS STATUS ──────────────────────────────────────────────────────────
//

/// Where a learner stands on a single module.
///
/// Any transition between the three values is allowed; a module can be marked
/// `Completed` without ever being `InProgress`, and a reset moves it straight
/// back to `NotStarted`.
///
/// The serialized form matches the strings stored in a progress blob:
/// `"notStarted"`, `"inProgress"`, `"completed"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProgressStatus {
    /// Implicit status of any module absent from a record.
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl ProgressStatus {
    pub const ALL: [ProgressStatus; 3] = [
        ProgressStatus::NotStarted,
        ProgressStatus::InProgress,
        ProgressStatus::Completed,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProgressStatus::NotStarted => "notStarted",
            ProgressStatus::InProgress => "inProgress",
            ProgressStatus::Completed => "completed",
        }
    }

    #[must_use]
    pub fn is_completed(self) -> bool {
        matches!(self, ProgressStatus::Completed)
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProgressStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| StatusParseError(s.to_owned()))
    }
}
