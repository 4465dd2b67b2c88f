//! Fixed set of lesson components and the static course catalog built from them.

use std::str::FromStr;

use thiserror::Error;

use crate::model::{Course, CourseError, CourseId, Module, ModuleId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown lesson: {0}")]
pub struct UnknownLesson(pub String);

/// Calculator a lesson derives its interactive values from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Calculator {
    DepthOfField,
    ExposureValue,
    Mtf,
}

/// Every lesson component the application can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LessonKind {
    CameraBasics,
    Exposure,
    LensOptics,
    Composition,
    Lighting,
    ColorTheory,
    DepthOfField,
    GearAdvisor,
    PortraitAssistant,
    Techniques,
    Quiz,
}

struct LessonEntry {
    kind: LessonKind,
    id: &'static str,
    name: &'static str,
    icon: &'static str,
    description: &'static str,
    calculator: Option<Calculator>,
}

static LESSONS: [LessonEntry; 11] = [
    LessonEntry {
        kind: LessonKind::CameraBasics,
        id: "camera",
        name: "Camera Basics",
        icon: "📷",
        description: "Parts of a camera and how light reaches the sensor.",
        calculator: None,
    },
    LessonEntry {
        kind: LessonKind::Exposure,
        id: "exposure",
        name: "Exposure Triangle",
        icon: "☀️",
        description: "Aperture, shutter speed and ISO working together.",
        calculator: Some(Calculator::ExposureValue),
    },
    LessonEntry {
        kind: LessonKind::LensOptics,
        id: "lens",
        name: "Lens Optics",
        icon: "🔍",
        description: "Focal length, sharpness and diffraction.",
        calculator: Some(Calculator::Mtf),
    },
    LessonEntry {
        kind: LessonKind::Composition,
        id: "composition",
        name: "Composition",
        icon: "🖼️",
        description: "Rule of thirds, leading lines and framing.",
        calculator: None,
    },
    LessonEntry {
        kind: LessonKind::Lighting,
        id: "lighting",
        name: "Lighting Lab",
        icon: "💡",
        description: "Key, fill and rim light placement.",
        calculator: None,
    },
    LessonEntry {
        kind: LessonKind::ColorTheory,
        id: "color",
        name: "Color Theory",
        icon: "🎨",
        description: "Color harmony and white balance.",
        calculator: None,
    },
    LessonEntry {
        kind: LessonKind::DepthOfField,
        id: "dof",
        name: "Depth of Field",
        icon: "🎯",
        description: "How aperture, distance and focal length shape focus.",
        calculator: Some(Calculator::DepthOfField),
    },
    LessonEntry {
        kind: LessonKind::GearAdvisor,
        id: "gear",
        name: "Gear Advisor",
        icon: "🎒",
        description: "Choosing bodies and lenses for your style.",
        calculator: None,
    },
    LessonEntry {
        kind: LessonKind::PortraitAssistant,
        id: "portrait",
        name: "Portrait Assistant",
        icon: "🧑",
        description: "Posing, lens choice and background separation.",
        calculator: Some(Calculator::DepthOfField),
    },
    LessonEntry {
        kind: LessonKind::Techniques,
        id: "techniques",
        name: "Techniques",
        icon: "🌀",
        description: "Long exposure, panning and bracketing.",
        calculator: Some(Calculator::ExposureValue),
    },
    LessonEntry {
        kind: LessonKind::Quiz,
        id: "quiz",
        name: "Quiz",
        icon: "❓",
        description: "Check what you have learned.",
        calculator: None,
    },
];

impl LessonKind {
    pub const ALL: [LessonKind; 11] = [
        LessonKind::CameraBasics,
        LessonKind::Exposure,
        LessonKind::LensOptics,
        LessonKind::Composition,
        LessonKind::Lighting,
        LessonKind::ColorTheory,
        LessonKind::DepthOfField,
        LessonKind::GearAdvisor,
        LessonKind::PortraitAssistant,
        LessonKind::Techniques,
        LessonKind::Quiz,
    ];

    fn entry(self) -> &'static LessonEntry {
        // LESSONS is declared in the same order as the enum.
        &LESSONS[self as usize]
    }

    #[must_use]
    pub fn id(self) -> &'static str {
        self.entry().id
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        self.entry().name
    }

    #[must_use]
    pub fn calculator(self) -> Option<Calculator> {
        self.entry().calculator
    }

    /// Module descriptor used when this lesson is part of a course.
    ///
    /// # Errors
    ///
    /// Returns `CourseError` if the static entry fails validation.
    pub fn module(self) -> Result<Module, CourseError> {
        let entry = self.entry();
        let id = ModuleId::new(entry.id)?;
        Module::new(id, entry.name, entry.icon, entry.description)
    }
}

impl FromStr for LessonKind {
    type Err = UnknownLesson;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LESSONS
            .iter()
            .find(|entry| entry.id == s)
            .map(|entry| entry.kind)
            .ok_or_else(|| UnknownLesson(s.to_owned()))
    }
}

/// Course definitions shipped with the application.
pub mod catalog {
    use super::{Course, CourseError, CourseId, LessonKind};

    const COURSES: [(&str, &str, &[LessonKind]); 3] = [
        (
            "basics",
            "Photography Basics",
            &[
                LessonKind::CameraBasics,
                LessonKind::Exposure,
                LessonKind::LensOptics,
            ],
        ),
        (
            "creative",
            "Creative Vision",
            &[
                LessonKind::Composition,
                LessonKind::Lighting,
                LessonKind::ColorTheory,
                LessonKind::DepthOfField,
            ],
        ),
        (
            "gear",
            "Gear & Technique",
            &[
                LessonKind::GearAdvisor,
                LessonKind::PortraitAssistant,
                LessonKind::Techniques,
                LessonKind::Quiz,
            ],
        ),
    ];

    fn build(id: &str, name: &str, lessons: &[LessonKind]) -> Result<Course, CourseError> {
        let id = CourseId::new(id)?;
        let modules = lessons
            .iter()
            .map(|lesson| lesson.module())
            .collect::<Result<Vec<_>, _>>()?;
        Course::new(id, name, modules)
    }

    /// All catalog courses, in display order.
    ///
    /// # Errors
    ///
    /// Returns `CourseError` if a static course definition is invalid.
    pub fn courses() -> Result<Vec<Course>, CourseError> {
        COURSES
            .iter()
            .map(|(id, name, lessons)| build(id, name, lessons))
            .collect()
    }

    /// Look up a catalog course by id.
    ///
    /// # Errors
    ///
    /// Returns `CourseError` if the static course definition is invalid.
    pub fn course(id: &CourseId) -> Result<Option<Course>, CourseError> {
        COURSES
            .iter()
            .find(|(raw, _, _)| *raw == id.as_str())
            .map(|(raw, name, lessons)| build(raw, name, lessons))
            .transpose()
    }
}
