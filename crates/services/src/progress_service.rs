use std::sync::Arc;

use lesson_core::model::{
    CourseId, GatingPolicy, Module, ModuleId, ProgressRecord, ProgressStatus,
};
use serde::Serialize;
use storage::codec;
use storage::repository::{ProgressStore, StorageError, progress_key};
use tracing::{debug, warn};

use crate::config::ProgressConfig;

/// Display state of one module on a course page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleOverview {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub status: ProgressStatus,
    pub available: bool,
}

/// Everything a course page needs to render progress in one read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseOverview {
    pub course_id: String,
    pub completion: u8,
    pub next_module: Option<String>,
    pub modules: Vec<ModuleOverview>,
}

/// Tracks per-course module progress on top of a [`ProgressStore`].
///
/// Every operation is fail-open: storage and decoding failures are logged
/// and degrade to "no progress recorded" instead of reaching the caller.
#[derive(Clone)]
pub struct ProgressService {
    store: Arc<dyn ProgressStore>,
    gating: GatingPolicy,
}

impl ProgressService {
    #[must_use]
    pub fn new(store: Arc<dyn ProgressStore>, config: ProgressConfig) -> Self {
        Self {
            store,
            gating: config.gating,
        }
    }

    #[must_use]
    pub fn gating(&self) -> GatingPolicy {
        self.gating
    }

    /// Load the record for `course`.
    ///
    /// Missing, unreadable, or corrupt blobs all yield an empty record.
    pub async fn get_user_progress(&self, course: &CourseId) -> ProgressRecord {
        self.load(course).await.unwrap_or_else(|err| {
            warn!(%course, error = %err, "progress read failed; treating as empty");
            ProgressRecord::new()
        })
    }

    /// Set `module`'s status in `course` and persist the merged record.
    ///
    /// Returns the merged record even when the write fails, so callers can keep
    /// showing what the learner just did. If the stored record cannot be read,
    /// nothing is written: storage keeps what it has.
    pub async fn update_user_progress(
        &self,
        course: &CourseId,
        module: &ModuleId,
        status: ProgressStatus,
    ) -> ProgressRecord {
        match self.load(course).await {
            Ok(mut record) => {
                record.set(module.clone(), status);
                self.persist(course, &record).await;
                debug!(%course, %module, %status, "updated progress");
                record
            }
            Err(err) => {
                warn!(%course, %module, error = %err, "progress read failed; write skipped");
                ProgressRecord::new().with(module.clone(), status)
            }
        }
    }

    /// Percentage (0–100) of `modules` completed in `course`.
    pub async fn calculate_course_completion(&self, course: &CourseId, modules: &[Module]) -> u8 {
        if modules.is_empty() {
            return 0;
        }
        self.get_user_progress(course)
            .await
            .completion_percentage(modules)
    }

    /// Whether `module` may be opened under the configured gating policy.
    pub async fn is_module_available(
        &self,
        course: &CourseId,
        module: &ModuleId,
        modules: &[Module],
    ) -> bool {
        if self.gating == GatingPolicy::Open {
            return true;
        }
        let record = self.get_user_progress(course).await;
        self.gating.is_available(&record, module, modules)
    }

    /// First module in `modules` order that is not completed, if any.
    pub async fn get_next_recommended_module(
        &self,
        course: &CourseId,
        modules: &[Module],
    ) -> Option<ModuleId> {
        self.get_user_progress(course)
            .await
            .next_recommended(modules)
            .map(|m| m.id().clone())
    }

    /// Delete every recorded status for `course`.
    pub async fn reset_course_progress(&self, course: &CourseId) {
        let key = progress_key(course);
        match self.store.remove(&key).await {
            Ok(()) => debug!(%course, "reset progress"),
            Err(err) => warn!(%course, error = %err, "progress reset failed; ignoring"),
        }
    }

    /// Status, availability, completion and next module for a course page.
    pub async fn course_overview(&self, course: &CourseId, modules: &[Module]) -> CourseOverview {
        let record = self.get_user_progress(course).await;
        let modules_view = modules
            .iter()
            .map(|m| ModuleOverview {
                id: m.id().to_string(),
                name: m.name().to_owned(),
                icon: m.icon().to_owned(),
                status: record.status_of(m.id()),
                available: self.gating.is_available(&record, m.id(), modules),
            })
            .collect();

        CourseOverview {
            course_id: course.to_string(),
            completion: record.completion_percentage(modules),
            next_module: record.next_recommended(modules).map(|m| m.id().to_string()),
            modules: modules_view,
        }
    }

    /// Read and decode the stored record. A corrupt blob decodes to an empty
    /// record so the next update replaces it; only store failures are errors.
    async fn load(&self, course: &CourseId) -> Result<ProgressRecord, StorageError> {
        let Some(blob) = self.store.read(&progress_key(course)).await? else {
            return Ok(ProgressRecord::new());
        };

        match codec::decode(&blob) {
            Ok(record) => {
                debug!(%course, entries = record.len(), "loaded progress");
                Ok(record)
            }
            Err(err) => {
                warn!(%course, error = %err, "corrupt progress blob; treating as empty");
                Ok(ProgressRecord::new())
            }
        }
    }

    async fn persist(&self, course: &CourseId, record: &ProgressRecord) {
        let key = progress_key(course);
        let blob = match codec::encode(record) {
            Ok(blob) => blob,
            Err(err) => {
                warn!(%course, error = %err, "progress encode failed; write skipped");
                return;
            }
        };
        if let Err(err) = self.store.write(&key, &blob).await {
            warn!(%course, error = %err, "progress write failed; ignoring");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use storage::repository::InMemoryRepository;

    struct UnavailableStore;

    #[async_trait]
    impl ProgressStore for UnavailableStore {
        async fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disabled".into()))
        }

        async fn write(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".into()))
        }

        async fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disabled".into()))
        }
    }

    /// In-memory store that can be told to fail its next read.
    #[derive(Default)]
    struct LockedOnceStore {
        inner: InMemoryRepository,
        fail_next_read: AtomicBool,
    }

    impl LockedOnceStore {
        fn fail_next_read(&self) {
            self.fail_next_read.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl ProgressStore for LockedOnceStore {
        async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
            if self.fail_next_read.swap(false, Ordering::SeqCst) {
                return Err(StorageError::Connection("database is locked".into()));
            }
            self.inner.read(key).await
        }

        async fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.inner.write(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key).await
        }
    }

    fn course() -> CourseId {
        CourseId::new("basics").unwrap()
    }

    fn id(raw: &str) -> ModuleId {
        ModuleId::new(raw).unwrap()
    }

    fn modules() -> Vec<Module> {
        ["camera", "exposure", "lens"]
            .into_iter()
            .map(|raw| Module::new(id(raw), raw, "📷", "").unwrap())
            .collect()
    }

    fn service(store: Arc<dyn ProgressStore>) -> ProgressService {
        ProgressService::new(store, ProgressConfig::default())
    }

    #[tokio::test]
    async fn update_then_read_reflects_every_status() {
        let svc = service(Arc::new(InMemoryRepository::new()));
        for status in ProgressStatus::ALL {
            svc.update_user_progress(&course(), &id("lens"), status).await;
            let record = svc.get_user_progress(&course()).await;
            assert_eq!(record.status_of(&id("lens")), status);
        }
    }

    #[tokio::test]
    async fn update_is_idempotent() {
        let svc = service(Arc::new(InMemoryRepository::new()));
        let once = svc
            .update_user_progress(&course(), &id("camera"), ProgressStatus::Completed)
            .await;
        let twice = svc
            .update_user_progress(&course(), &id("camera"), ProgressStatus::Completed)
            .await;
        assert_eq!(once, twice);
        assert_eq!(svc.get_user_progress(&course()).await, once);
    }

    #[tokio::test]
    async fn reset_clears_the_record() {
        let svc = service(Arc::new(InMemoryRepository::new()));
        svc.update_user_progress(&course(), &id("camera"), ProgressStatus::Completed)
            .await;
        svc.reset_course_progress(&course()).await;
        assert!(svc.get_user_progress(&course()).await.is_empty());
    }

    #[tokio::test]
    async fn courses_are_isolated() {
        let svc = service(Arc::new(InMemoryRepository::new()));
        let other = CourseId::new("creative").unwrap();
        svc.update_user_progress(&course(), &id("camera"), ProgressStatus::Completed)
            .await;
        assert!(svc.get_user_progress(&other).await.is_empty());

        svc.reset_course_progress(&other).await;
        assert_eq!(svc.get_user_progress(&course()).await.len(), 1);
    }

    #[tokio::test]
    async fn corrupt_blob_reads_as_empty() {
        let store = InMemoryRepository::new();
        store
            .write(&progress_key(&course()), "{not json")
            .await
            .unwrap();
        let svc = service(Arc::new(store));
        assert!(svc.get_user_progress(&course()).await.is_empty());

        // The next update overwrites the corrupt blob with a valid one.
        svc.update_user_progress(&course(), &id("camera"), ProgressStatus::InProgress)
            .await;
        assert_eq!(
            svc.get_user_progress(&course()).await.status_of(&id("camera")),
            ProgressStatus::InProgress
        );
    }

    #[tokio::test]
    async fn unavailable_store_fails_open() {
        let svc = service(Arc::new(UnavailableStore));
        assert!(svc.get_user_progress(&course()).await.is_empty());

        let merged = svc
            .update_user_progress(&course(), &id("camera"), ProgressStatus::Completed)
            .await;
        assert_eq!(merged.status_of(&id("camera")), ProgressStatus::Completed);

        svc.reset_course_progress(&course()).await;
        assert_eq!(svc.calculate_course_completion(&course(), &modules()).await, 0);
        assert_eq!(
            svc.get_next_recommended_module(&course(), &modules()).await,
            Some(id("camera"))
        );
    }

    #[tokio::test]
    async fn failed_read_does_not_overwrite_stored_progress() {
        let store = Arc::new(LockedOnceStore::default());
        let svc = service(store.clone());
        svc.update_user_progress(&course(), &id("camera"), ProgressStatus::Completed)
            .await;
        svc.update_user_progress(&course(), &id("exposure"), ProgressStatus::Completed)
            .await;

        store.fail_next_read();
        let merged = svc
            .update_user_progress(&course(), &id("lens"), ProgressStatus::InProgress)
            .await;
        assert_eq!(merged.status_of(&id("lens")), ProgressStatus::InProgress);

        let stored = svc.get_user_progress(&course()).await;
        assert_eq!(stored.len(), 2);
        assert_eq!(stored.status_of(&id("camera")), ProgressStatus::Completed);
        assert_eq!(stored.status_of(&id("exposure")), ProgressStatus::Completed);
        assert_eq!(stored.status_of(&id("lens")), ProgressStatus::NotStarted);

        // Once reads recover, updates merge into the stored record again.
        svc.update_user_progress(&course(), &id("lens"), ProgressStatus::InProgress)
            .await;
        assert_eq!(svc.get_user_progress(&course()).await.len(), 3);
    }

    #[tokio::test]
    async fn completion_of_empty_module_list_is_zero() {
        let svc = service(Arc::new(InMemoryRepository::new()));
        assert_eq!(svc.calculate_course_completion(&course(), &[]).await, 0);
        assert!(svc.get_next_recommended_module(&course(), &[]).await.is_none());
    }

    #[tokio::test]
    async fn open_gating_makes_every_module_available() {
        let svc = service(Arc::new(InMemoryRepository::new()));
        assert_eq!(svc.gating(), GatingPolicy::Open);
        for m in modules() {
            assert!(svc.is_module_available(&course(), m.id(), &modules()).await);
        }
    }

    #[tokio::test]
    async fn sequential_gating_unlocks_in_order() {
        let svc = ProgressService::new(
            Arc::new(InMemoryRepository::new()),
            ProgressConfig::with_gating(GatingPolicy::Sequential),
        );
        let mods = modules();
        assert!(svc.is_module_available(&course(), &id("camera"), &mods).await);
        assert!(!svc.is_module_available(&course(), &id("exposure"), &mods).await);

        svc.update_user_progress(&course(), &id("camera"), ProgressStatus::Completed)
            .await;
        assert!(svc.is_module_available(&course(), &id("exposure"), &mods).await);
        assert!(!svc.is_module_available(&course(), &id("lens"), &mods).await);
    }

    #[tokio::test]
    async fn overview_combines_status_and_availability() {
        let svc = ProgressService::new(
            Arc::new(InMemoryRepository::new()),
            ProgressConfig::with_gating(GatingPolicy::Sequential),
        );
        svc.update_user_progress(&course(), &id("camera"), ProgressStatus::Completed)
            .await;
        svc.update_user_progress(&course(), &id("exposure"), ProgressStatus::InProgress)
            .await;

        let overview = svc.course_overview(&course(), &modules()).await;
        assert_eq!(overview.completion, 33);
        assert_eq!(overview.next_module.as_deref(), Some("exposure"));
        let states: Vec<_> = overview
            .modules
            .iter()
            .map(|m| (m.id.as_str(), m.status, m.available))
            .collect();
        assert_eq!(
            states,
            vec![
                ("camera", ProgressStatus::Completed, true),
                ("exposure", ProgressStatus::InProgress, true),
                ("lens", ProgressStatus::NotStarted, false),
            ]
        );

        let json = serde_json::to_value(&overview).unwrap();
        assert_eq!(json["modules"][1]["status"], "inProgress");
    }
}
