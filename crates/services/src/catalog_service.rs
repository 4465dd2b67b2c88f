use lesson_core::model::{Course, CourseId};
use lesson_core::{LessonKind, catalog};

use crate::error::CatalogError;
use crate::progress_service::{CourseOverview, ProgressService};

/// Resolves catalog courses and lessons and builds their progress overviews.
#[derive(Clone)]
pub struct CourseCatalogService {
    courses: Vec<Course>,
    progress: ProgressService,
}

impl CourseCatalogService {
    /// Load the static catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Course` if a built-in course definition is invalid.
    pub fn new(progress: ProgressService) -> Result<Self, CatalogError> {
        Ok(Self {
            courses: catalog::courses()?,
            progress,
        })
    }

    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// # Errors
    ///
    /// Returns `CatalogError::UnknownCourse` if no course has this id.
    pub fn course(&self, id: &CourseId) -> Result<&Course, CatalogError> {
        self.courses
            .iter()
            .find(|course| course.id() == id)
            .ok_or_else(|| CatalogError::UnknownCourse(id.clone()))
    }

    /// Resolve a lesson component from its string id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Lesson` for ids outside the lesson table.
    pub fn lesson(&self, id: &str) -> Result<LessonKind, CatalogError> {
        Ok(id.parse::<LessonKind>()?)
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressService {
        &self.progress
    }

    /// Progress overview for a catalog course.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownCourse` if no course has this id.
    pub async fn overview(&self, id: &CourseId) -> Result<CourseOverview, CatalogError> {
        let course = self.course(id)?;
        Ok(self.progress.course_overview(course.id(), course.modules()).await)
    }

    /// Overviews for every catalog course, in catalog order.
    pub async fn overviews(&self) -> Vec<(String, CourseOverview)> {
        let mut out = Vec::with_capacity(self.courses.len());
        for course in &self.courses {
            let overview = self
                .progress
                .course_overview(course.id(), course.modules())
                .await;
            out.push((course.name().to_owned(), overview));
        }
        out
    }
}
