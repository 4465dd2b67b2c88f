use clap::{Args, Parser, Subcommand};
use lesson_core::model::{CourseId, GatingPolicy, ModuleId, ProgressStatus};
use lesson_core::optics::{FULL_FRAME_COC_MM, GREEN_LIGHT_NM};

/// Track photography course progress and try the lesson calculators.
#[derive(Parser, Debug)]
#[command(name = "photo-learn")]
#[command(version)]
pub struct Cli {
    /// SQLite database holding progress records
    #[arg(long = "db", global = true, default_value = "sqlite://dev.sqlite3", env = "PHOTO_LEARN_DB_URL")]
    pub db_url: String,

    /// Module unlocking policy: `open` or `sequential`
    #[arg(long, global = true, default_value = "open", env = "PHOTO_LEARN_GATING")]
    pub gating: GatingPolicy,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List catalog courses with their completion
    Courses,
    /// Show per-module progress for a course
    Show { course: CourseId },
    /// Set the status of one module (`notStarted`, `inProgress`, `completed`)
    Set {
        course: CourseId,
        module: ModuleId,
        status: ProgressStatus,
    },
    /// Print the next recommended module of a course
    Next { course: CourseId },
    /// Forget all progress recorded for a course
    Reset { course: CourseId },
    /// Describe a lesson component and the calculator it uses
    Lesson { id: String },
    /// Depth of field for a focal length, aperture and subject distance
    Dof(DofArgs),
    /// Exposure value normalised to ISO 100
    Ev(EvArgs),
    /// Diffraction-limited MTF curve for an aperture
    Mtf(MtfArgs),
}

impl Command {
    #[must_use]
    pub fn needs_storage(&self) -> bool {
        !matches!(self, Command::Dof(_) | Command::Ev(_) | Command::Mtf(_))
    }
}

#[derive(Args, Debug)]
pub struct DofArgs {
    /// Focal length in mm
    #[arg(long)]
    pub focal: f64,
    /// f-number
    #[arg(long)]
    pub aperture: f64,
    /// Subject distance in metres
    #[arg(long)]
    pub distance: f64,
    /// Circle of confusion in mm
    #[arg(long, default_value_t = FULL_FRAME_COC_MM)]
    pub coc: f64,
}

#[derive(Args, Debug)]
pub struct EvArgs {
    /// f-number
    #[arg(long)]
    pub aperture: f64,
    /// Shutter time in seconds
    #[arg(long)]
    pub shutter: f64,
    #[arg(long, default_value_t = 100.0)]
    pub iso: f64,
}

#[derive(Args, Debug)]
pub struct MtfArgs {
    /// f-number
    #[arg(long)]
    pub aperture: f64,
    /// Wavelength in nm
    #[arg(long, default_value_t = GREEN_LIGHT_NM)]
    pub wavelength: f64,
    /// Highest spatial frequency to sample, in line pairs per mm
    #[arg(long, default_value_t = 200.0)]
    pub max_lp: f64,
    #[arg(long, default_value_t = 11)]
    pub samples: usize,
}
