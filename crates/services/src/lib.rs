#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog_service;
pub mod config;
pub mod error;
pub mod progress_service;

pub use app_services::AppServices;
pub use catalog_service::CourseCatalogService;
pub use config::ProgressConfig;
pub use error::{AppServicesError, CatalogError};
pub use progress_service::{CourseOverview, ModuleOverview, ProgressService};
