//! Shared error types for the services crate.

use thiserror::Error;

use lesson_core::UnknownLesson;
use lesson_core::model::{CourseError, CourseId};
use storage::sqlite::SqliteInitError;

/// Errors emitted by `CourseCatalogService`.
///
/// Progress operations never fail; only catalog lookups do.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("unknown course: {0}")]
    UnknownCourse(CourseId),
    #[error(transparent)]
    Lesson(#[from] UnknownLesson),
    #[error(transparent)]
    Course(#[from] CourseError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
