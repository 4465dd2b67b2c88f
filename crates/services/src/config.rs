use lesson_core::model::GatingPolicy;

/// Runtime knobs for progress tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressConfig {
    pub gating: GatingPolicy,
}

impl ProgressConfig {
    #[must_use]
    pub fn with_gating(gating: GatingPolicy) -> Self {
        Self { gating }
    }
}
