use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::model::course::Module;
use crate::model::ids::ModuleId;
use crate::model::progress::ProgressRecord;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid gating policy: {0} (expected `open` or `sequential`)")]
pub struct GatingPolicyParseError(pub String);

/// Decides whether a learner may open a module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GatingPolicy {
    /// Every module is available regardless of progress.
    #[default]
    Open,
    /// A module unlocks once every module before it is completed.
    Sequential,
}

impl GatingPolicy {
    /// Whether `module` is available given `record` and the course order in
    /// `modules`.
    ///
    /// Under `Sequential`, a module id not listed in `modules` is unavailable.
    #[must_use]
    pub fn is_available(
        self,
        record: &ProgressRecord,
        module: &ModuleId,
        modules: &[Module],
    ) -> bool {
        match self {
            GatingPolicy::Open => true,
            GatingPolicy::Sequential => {
                let Some(position) = modules.iter().position(|m| m.id() == module) else {
                    return false;
                };
                modules[..position]
                    .iter()
                    .all(|m| record.status_of(m.id()).is_completed())
            }
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GatingPolicy::Open => "open",
            GatingPolicy::Sequential => "sequential",
        }
    }
}

impl fmt::Display for GatingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GatingPolicy {
    type Err = GatingPolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "sequential" => Ok(Self::Sequential),
            _ => Err(GatingPolicyParseError(s.to_owned())),
        }
    }
}
