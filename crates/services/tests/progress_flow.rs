use lesson_core::model::{CourseId, ModuleId, ProgressStatus};
use services::{AppServices, ProgressConfig};

#[tokio::test]
async fn basics_course_progresses_to_completion() {
    let app = AppServices::new_sqlite(
        "sqlite:file:memdb_progress_flow?mode=memory&cache=shared",
        ProgressConfig::default(),
    )
    .await
    .expect("bootstrap services");
    let progress = app.progress();
    let catalog = app.catalog();

    let basics = CourseId::new("basics").unwrap();
    let modules = catalog.course(&basics).expect("basics course").modules().to_vec();

    assert_eq!(progress.calculate_course_completion(&basics, &modules).await, 0);
    assert_eq!(
        progress.get_next_recommended_module(&basics, &modules).await,
        Some(ModuleId::new("camera").unwrap())
    );

    progress
        .update_user_progress(&basics, &ModuleId::new("camera").unwrap(), ProgressStatus::Completed)
        .await;
    assert_eq!(progress.calculate_course_completion(&basics, &modules).await, 33);
    assert_eq!(
        progress.get_next_recommended_module(&basics, &modules).await,
        Some(ModuleId::new("exposure").unwrap())
    );

    for id in ["exposure", "lens"] {
        progress
            .update_user_progress(&basics, &ModuleId::new(id).unwrap(), ProgressStatus::Completed)
            .await;
    }
    assert_eq!(progress.calculate_course_completion(&basics, &modules).await, 100);
    assert!(progress.get_next_recommended_module(&basics, &modules).await.is_none());

    progress.reset_course_progress(&basics).await;
    assert!(progress.get_user_progress(&basics).await.is_empty());
    assert_eq!(progress.calculate_course_completion(&basics, &modules).await, 0);
}

#[tokio::test]
async fn progress_survives_reopening_the_database() {
    let url = "sqlite:file:memdb_progress_reopen?mode=memory&cache=shared";
    let course = CourseId::new("gear").unwrap();
    let quiz = ModuleId::new("quiz").unwrap();

    let first = AppServices::new_sqlite(url, ProgressConfig::default())
        .await
        .expect("first open");
    first
        .progress()
        .update_user_progress(&course, &quiz, ProgressStatus::InProgress)
        .await;

    let second = AppServices::new_sqlite(url, ProgressConfig::default())
        .await
        .expect("second open");
    let record = second.progress().get_user_progress(&course).await;
    assert_eq!(record.status_of(&quiz), ProgressStatus::InProgress);
    drop(first);
}
