use std::sync::Arc;

use storage::repository::Storage;

use crate::catalog_service::CourseCatalogService;
use crate::config::ProgressConfig;
use crate::error::AppServicesError;
use crate::progress_service::ProgressService;

/// Assembles app-facing services over a single storage backend.
#[derive(Clone)]
pub struct AppServices {
    progress: Arc<ProgressService>,
    catalog: Arc<CourseCatalogService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or catalog loading fails.
    pub async fn new_sqlite(db_url: &str, config: ProgressConfig) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(&storage, config)
    }

    /// Build services over an existing storage handle.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the built-in catalog is invalid.
    pub fn from_storage(storage: &Storage, config: ProgressConfig) -> Result<Self, AppServicesError> {
        let progress = ProgressService::new(Arc::clone(&storage.progress), config);
        let catalog = CourseCatalogService::new(progress.clone())?;

        Ok(Self {
            progress: Arc::new(progress),
            catalog: Arc::new(catalog),
        })
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CourseCatalogService> {
        Arc::clone(&self.catalog)
    }
}
