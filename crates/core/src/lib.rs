#![forbid(unsafe_code)]

pub mod lesson;
pub mod model;
pub mod optics;

pub use lesson::{Calculator, LessonKind, UnknownLesson, catalog};
