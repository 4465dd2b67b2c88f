use std::collections::BTreeMap;

use crate::model::course::Module;
use crate::model::ids::ModuleId;
use crate::model::status::ProgressStatus;

/// Per-course mapping from module id to learner status.
///
/// A module id absent from the record is `NotStarted`, and `NotStarted` is
/// never stored explicitly, so two records describing the same progress always
/// compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressRecord {
    entries: BTreeMap<ModuleId, ProgressStatus>,
}

impl ProgressRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Status of `module`, defaulting to `NotStarted`.
    #[must_use]
    pub fn status_of(&self, module: &ModuleId) -> ProgressStatus {
        self.entries.get(module).copied().unwrap_or_default()
    }

    /// Overwrite the status of `module`. Setting `NotStarted` drops the entry.
    pub fn set(&mut self, module: ModuleId, status: ProgressStatus) {
        match status {
            ProgressStatus::NotStarted => {
                self.entries.remove(&module);
            }
            other => {
                self.entries.insert(module, other);
            }
        }
    }

    #[must_use]
    pub fn with(mut self, module: ModuleId, status: ProgressStatus) -> Self {
        self.set(module, status);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Explicitly recorded entries, ordered by module id.
    pub fn iter(&self) -> impl Iterator<Item = (&ModuleId, ProgressStatus)> {
        self.entries.iter().map(|(id, status)| (id, *status))
    }

    #[must_use]
    pub fn completed_count(&self, modules: &[Module]) -> usize {
        modules
            .iter()
            .filter(|m| self.status_of(m.id()).is_completed())
            .count()
    }

    /// Share of `modules` marked completed, rounded half-up to a whole percent.
    ///
    /// An empty module list is 0%.
    #[must_use]
    pub fn completion_percentage(&self, modules: &[Module]) -> u8 {
        let total = modules.len();
        if total == 0 {
            return 0;
        }
        let completed = self.completed_count(modules);
        // completed <= total, so the quotient is at most 100.
        let pct = (200 * completed + total) / (2 * total);
        u8::try_from(pct).unwrap_or(100)
    }

    /// First module in `modules` order that is not completed.
    #[must_use]
    pub fn next_recommended<'a>(&self, modules: &'a [Module]) -> Option<&'a Module> {
        modules
            .iter()
            .find(|m| !self.status_of(m.id()).is_completed())
    }
}

impl FromIterator<(ModuleId, ProgressStatus)> for ProgressRecord {
    fn from_iter<I: IntoIterator<Item = (ModuleId, ProgressStatus)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (module, status) in iter {
            record.set(module, status);
        }
        record
    }
}
