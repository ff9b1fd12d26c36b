//! Work unit provider over real files: ordering, skipping, terminal states.

use vetting_core::domain::{DomainError, WorkUnitKind};
use vetting_core::port::ProgressTracker;
use vetting_core::AppError;
use vetting_integration_tests::{reviewer, tracker, write_pipeline_file};

#[tokio::test]
async fn test_skips_done_and_locked_files() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["a.cands.astrom", "b.cands.astrom", "c.cands.astrom"] {
        write_pipeline_file(dir.path(), name, &[2, 3, 1]);
    }
    tracker(dir.path(), "other").lock("b.cands.astrom").await.unwrap();
    tracker(dir.path(), "other").mark_done("c.cands.astrom").await.unwrap();

    let provider = reviewer(dir.path(), "me", WorkUnitKind::Candidates);
    let unit = provider.get_workunit().await.unwrap();

    assert_eq!(unit.filename(), "a.cands.astrom");
    assert_eq!(unit.item_count(), 3);
    assert_eq!(unit.data().observations().len(), 3);
    assert_eq!(
        provider
            .progress_tracker()
            .lock_owner("a.cands.astrom")
            .await
            .unwrap(),
        Some("me".to_string())
    );
}

#[tokio::test]
async fn test_reals_unit_from_file() {
    let dir = tempfile::tempdir().unwrap();
    write_pipeline_file(dir.path(), "field.cands.astrom", &[2, 3, 1]);

    let unit = reviewer(dir.path(), "me", WorkUnitKind::Reals)
        .get_workunit()
        .await
        .unwrap();

    assert_eq!(unit.kind(), WorkUnitKind::Reals);
    assert_eq!(unit.item_count(), 6);
    assert_eq!(unit.data().sys_header().get("RMIN").unwrap(), "0.5");
}

#[tokio::test]
async fn test_everything_done_or_locked_is_no_available_work() {
    let dir = tempfile::tempdir().unwrap();
    write_pipeline_file(dir.path(), "a.cands.astrom", &[1]);
    write_pipeline_file(dir.path(), "b.cands.astrom", &[1]);
    tracker(dir.path(), "other").mark_done("a.cands.astrom").await.unwrap();
    tracker(dir.path(), "other").lock("b.cands.astrom").await.unwrap();

    let err = reviewer(dir.path(), "me", WorkUnitKind::Candidates)
        .get_workunit()
        .await
        .unwrap_err();
    assert!(err.is_no_available_work());
}

#[tokio::test]
async fn test_markers_and_other_tasks_are_not_candidates() {
    let dir = tempfile::tempdir().unwrap();
    write_pipeline_file(dir.path(), "a.reals.astrom", &[1]);
    tracker(dir.path(), "other").mark_done("x.cands.astrom").await.unwrap();

    let err = reviewer(dir.path(), "me", WorkUnitKind::Candidates)
        .get_workunit()
        .await
        .unwrap_err();
    assert!(err.is_no_available_work());
}

#[tokio::test]
async fn test_malformed_file_is_surfaced_and_unlocked() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("bad.cands.astrom"), "not json").unwrap();

    let provider = reviewer(dir.path(), "me", WorkUnitKind::Candidates);
    let err = provider.get_workunit().await.unwrap_err();

    assert!(matches!(err, AppError::Parse(_)));
    assert_eq!(
        provider
            .progress_tracker()
            .lock_owner("bad.cands.astrom")
            .await
            .unwrap(),
        None
    );
}

#[tokio::test]
async fn test_empty_file_is_domain_error_not_missing_work() {
    let dir = tempfile::tempdir().unwrap();
    write_pipeline_file(dir.path(), "empty.cands.astrom", &[]);

    let err = reviewer(dir.path(), "me", WorkUnitKind::Reals)
        .get_workunit()
        .await
        .unwrap_err();

    assert!(!err.is_no_available_work());
    assert!(matches!(
        err,
        AppError::Domain(DomainError::EmptyCollection(_))
    ));
}
