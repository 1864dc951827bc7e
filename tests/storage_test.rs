use chrono::{TimeZone, Utc};
use reqforge::runtime::storage::{
    InMemoryStatusLog, MAGIC_EPOCH_SECS, StatusLog, StatusUpdate,
};

#[tokio::test]
async fn test_history_carries_idem_values_forward() {
    let log = InMemoryStatusLog::new();
    let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let t1 = Utc.with_ymd_and_hms(2024, 3, 1, 12, 5, 0).unwrap();
    let t2 = Utc.with_ymd_and_hms(2024, 3, 1, 12, 10, 0).unwrap();

    log.add_record(
        101,
        StatusUpdate::default().status("Received").minor("Job accepted").date(t0).source("JobManager"),
    )
    .await
    .expect("add_record failed");
    log.add_record(
        101,
        StatusUpdate::default().minor("Matched").date(t1).source("Matcher"),
    )
    .await
    .expect("add_record failed");
    log.add_record(
        101,
        StatusUpdate::default().status("Running").application("step 1").date(t2).source("JobWrapper"),
    )
    .await
    .expect("add_record failed");

    let history = log.job_history(101).await.expect("job_history failed");
    assert_eq!(history.len(), 3);

    // First record: application status never set yet renders as Unknown
    assert_eq!(history[0].status, "Received");
    assert_eq!(history[0].minor_status, "Job accepted");
    assert_eq!(history[0].application_status, "Unknown");

    // Second record keeps the previous major status
    assert_eq!(history[1].status, "Received");
    assert_eq!(history[1].minor_status, "Matched");

    // Third record updates status and application, keeps the minor one
    assert_eq!(history[2].status, "Running");
    assert_eq!(history[2].minor_status, "Matched");
    assert_eq!(history[2].application_status, "step 1");
    assert_eq!(history[2].source, "JobWrapper");
}

#[tokio::test]
async fn test_history_orders_by_time_order() {
    let log = InMemoryStatusLog::new();
    let early = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
    let late = Utc.with_ymd_and_hms(2024, 3, 1, 11, 0, 0).unwrap();

    // Inserted out of order
    log.add_record(7, StatusUpdate::default().status("Running").date(late).source("Wrapper"))
        .await
        .expect("add_record failed");
    log.add_record(7, StatusUpdate::default().status("Received").date(early).source("Manager"))
        .await
        .expect("add_record failed");

    let history = log.job_history(7).await.expect("job_history failed");
    assert_eq!(history[0].status, "Received");
    assert_eq!(history[1].status, "Running");
    assert!(history[0].time_order < history[1].time_order);
}

#[tokio::test]
async fn test_time_order_is_offset_from_magic_epoch() {
    let log = InMemoryStatusLog::new();
    let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    log.add_record(3, StatusUpdate::default().status("Received").date(date).source("Manager"))
        .await
        .expect("add_record failed");

    let history = log.job_history(3).await.expect("job_history failed");
    let expected = date.timestamp() as f64 - MAGIC_EPOCH_SECS as f64;
    assert_eq!(history[0].time_order, expected);
    assert_eq!(history[0].status_time, date);
}

#[tokio::test]
async fn test_timestamps_restore_absolute_epoch_seconds() {
    let log = InMemoryStatusLog::new();
    let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let t1 = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();

    log.add_record(11, StatusUpdate::default().status("Received").date(t0).source("Manager"))
        .await
        .expect("add_record failed");
    log.add_record(11, StatusUpdate::default().status("Done").date(t1).source("Wrapper"))
        .await
        .expect("add_record failed");

    let stamps = log.timestamps(11).await.expect("timestamps failed");
    assert_eq!(stamps.by_status["Received"], t0.timestamp() as f64);
    assert_eq!(stamps.by_status["Done"], t1.timestamp() as f64);
    assert_eq!(stamps.last_time, Some(t1));
}

#[tokio::test]
async fn test_application_status_is_truncated() {
    let log = InMemoryStatusLog::new();
    let long_status = "x".repeat(300);

    log.add_record(
        13,
        StatusUpdate::default().status("Running").application(&long_status).source("Wrapper"),
    )
    .await
    .expect("add_record failed");

    let history = log.job_history(13).await.expect("job_history failed");
    assert_eq!(history[0].application_status.len(), 255);
}

#[tokio::test]
async fn test_unknown_job_is_an_error() {
    let log = InMemoryStatusLog::new();
    assert!(log.job_history(999).await.is_err());
    assert!(log.timestamps(999).await.is_err());
}

#[tokio::test]
async fn test_delete_job_removes_history() {
    let log = InMemoryStatusLog::new();
    log.add_record(21, StatusUpdate::default().status("Received").source("Manager"))
        .await
        .expect("add_record failed");

    log.delete_job(21).await.expect("delete_job failed");
    assert!(log.job_history(21).await.is_err());

    // Deleting an unknown job is a no-op
    log.delete_job(21).await.expect("delete_job failed");
}
