use std::collections::HashSet;

use thiserror::Error;

use crate::model::ids::{CourseId, IdError, ModuleId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course name cannot be empty")]
    EmptyName,

    #[error("module name cannot be empty")]
    EmptyModuleName,

    #[error(transparent)]
    InvalidId(#[from] IdError),

    #[error("course {course} lists module {module} more than once")]
    DuplicateModule { course: CourseId, module: ModuleId },
}

//
// ─── MODULE ────────────────────────────────────────────────────────────────────
//

/// Static descriptor of a single lesson unit.
///
/// Modules are defined by the page that renders a course and are never
/// persisted; only their ids show up in a progress record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    id: ModuleId,
    name: String,
    icon: String,
    description: String,
}

impl Module {
    /// Build a module descriptor.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyModuleName` if `name` is blank.
    pub fn new(
        id: ModuleId,
        name: impl Into<String>,
        icon: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, CourseError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(CourseError::EmptyModuleName);
        }
        Ok(Self {
            id,
            name,
            icon: icon.into(),
            description: description.into(),
        })
    }

    #[must_use]
    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn icon(&self) -> &str {
        &self.icon
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

/// An ordered collection of modules sharing one progress record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: CourseId,
    name: String,
    modules: Vec<Module>,
}

impl Course {
    /// # Errors
    ///
    /// Returns `CourseError::EmptyName` for a blank name, or
    /// `CourseError::DuplicateModule` when two modules share an id.
    pub fn new(
        id: CourseId,
        name: impl Into<String>,
        modules: Vec<Module>,
    ) -> Result<Self, CourseError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(CourseError::EmptyName);
        }

        let mut seen = HashSet::with_capacity(modules.len());
        for module in &modules {
            if !seen.insert(module.id()) {
                return Err(CourseError::DuplicateModule {
                    course: id,
                    module: module.id().clone(),
                });
            }
        }

        Ok(Self { id, name, modules })
    }

    #[must_use]
    pub fn id(&self) -> &CourseId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    #[must_use]
    pub fn module(&self, id: &ModuleId) -> Option<&Module> {
        self.modules.iter().find(|m| m.id() == id)
    }
}
