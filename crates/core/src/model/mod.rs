mod course;
mod gating;
mod ids;
mod progress;
mod status;

pub use course::{Course, CourseError, Module};
pub use gating::{GatingPolicy, GatingPolicyParseError};
pub use ids::{CourseId, IdError, KEY_SEPARATOR, ModuleId};
pub use progress::ProgressRecord;
pub use status::{ProgressStatus, StatusParseError};
