//! End-to-end coverage of the interview scheduling workflow against a
//! real Postgres instance. Skipped when DATABASE_URL is not set.

use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use internlink_backend::dto::interview_dto::SchedulePayload;
use internlink_backend::error::Error;
use internlink_backend::models::interview::{InterviewStatus, InterviewType};
use internlink_backend::services::interview_service::InterviewService;

async fn test_pool() -> Option<PgPool> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping interview flow test");
        return None;
    };
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("connect to test database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");
    Some(pool)
}

async fn seed_user(pool: &PgPool, role: &str) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO users (id, first_name, last_name, email, role)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(id)
    .bind("Test")
    .bind(role)
    .bind(format!("{}_{}@example.com", role, id))
    .bind(role)
    .execute(pool)
    .await
    .expect("seed user");
    id
}

async fn seed_application(pool: &PgPool, recruiter: Uuid, student: Uuid) -> Uuid {
    let opportunity = Uuid::new_v4();
    sqlx::query("INSERT INTO opportunities (id, organization, title) VALUES ($1, $2, $3)")
        .bind(opportunity)
        .bind(recruiter)
        .bind("Backend Intern")
        .execute(pool)
        .await
        .expect("seed opportunity");

    let application = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO applications (id, opportunity_id, student_id, status) VALUES ($1, $2, $3, 'Applied')",
    )
    .bind(application)
    .bind(opportunity)
    .bind(student)
    .execute(pool)
    .await
    .expect("seed application");
    application
}

fn schedule_payload(application: Uuid, candidate: Uuid, date: &str, time: &str) -> SchedulePayload {
    SchedulePayload {
        application_id: application,
        candidate_id: candidate,
        date: date.to_string(),
        time: time.to_string(),
        duration: None,
        interview_type: None,
        location: None,
        meeting_link: None,
        notes: None,
    }
}

async fn interview_count(pool: &PgPool, application: Uuid) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM interviews WHERE application_id = $1")
        .bind(application)
        .fetch_one(pool)
        .await
        .expect("count interviews")
}

async fn event_rows(pool: &PgPool, application: Uuid) -> Vec<(NaiveDate, String)> {
    sqlx::query_as(
        "SELECT date, time FROM events WHERE related_kind = 'Application' AND related_id = $1",
    )
    .bind(application)
    .fetch_all(pool)
    .await
    .expect("fetch events")
}

#[tokio::test]
async fn schedule_writes_exactly_one_interview_and_two_events() {
    let Some(pool) = test_pool().await else { return };
    let service = InterviewService::new(pool.clone());

    let recruiter = seed_user(&pool, "recruiter").await;
    let student = seed_user(&pool, "student").await;
    let application = seed_application(&pool, recruiter, student).await;

    let outcome = service
        .schedule(
            recruiter,
            schedule_payload(application, student, "2024-03-15", "14:00"),
        )
        .await
        .expect("schedule");
    assert!(outcome.created);
    assert_eq!(outcome.interview.duration, 60);
    assert_eq!(outcome.interview.interview_type, InterviewType::Technical);
    assert_eq!(outcome.interview.status, InterviewStatus::Scheduled);
    assert_eq!(outcome.interview.location, "Video Call");
    assert_eq!(outcome.interview.position, "Backend Intern");

    assert_eq!(interview_count(&pool, application).await, 1);

    let status: String = sqlx::query_scalar("SELECT status FROM applications WHERE id = $1")
        .bind(application)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status, "Interview");

    let events = event_rows(&pool, application).await;
    assert_eq!(events.len(), 2);
    let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    for (date, time) in &events {
        assert_eq!(*date, expected);
        assert_eq!(time, "14:00");
    }
}

#[tokio::test]
async fn schedule_replay_returns_existing_interview() {
    let Some(pool) = test_pool().await else { return };
    let service = InterviewService::new(pool.clone());

    let recruiter = seed_user(&pool, "recruiter").await;
    let student = seed_user(&pool, "student").await;
    let application = seed_application(&pool, recruiter, student).await;

    let first = service
        .schedule(
            recruiter,
            schedule_payload(application, student, "2024-03-15", "14:00"),
        )
        .await
        .expect("first schedule");
    let replay = service
        .schedule(
            recruiter,
            schedule_payload(application, student, "2024-03-15", "14:00"),
        )
        .await
        .expect("replayed schedule");

    assert!(first.created);
    assert!(!replay.created);
    assert_eq!(first.interview.id, replay.interview.id);
    assert_eq!(interview_count(&pool, application).await, 1);
    assert_eq!(event_rows(&pool, application).await.len(), 2);
}

#[tokio::test]
async fn schedule_by_non_owner_fails_with_zero_writes() {
    let Some(pool) = test_pool().await else { return };
    let service = InterviewService::new(pool.clone());

    let owner = seed_user(&pool, "recruiter").await;
    let other_recruiter = seed_user(&pool, "recruiter").await;
    let student = seed_user(&pool, "student").await;
    let application = seed_application(&pool, owner, student).await;

    let err = service
        .schedule(
            other_recruiter,
            schedule_payload(application, student, "2024-03-15", "14:00"),
        )
        .await
        .expect_err("non-owner must be rejected");
    assert!(matches!(err, Error::Forbidden(_)));

    assert_eq!(interview_count(&pool, application).await, 0);
    assert!(event_rows(&pool, application).await.is_empty());

    let status: String = sqlx::query_scalar("SELECT status FROM applications WHERE id = $1")
        .bind(application)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status, "Applied");
}

#[tokio::test]
async fn schedule_missing_application_is_not_found() {
    let Some(pool) = test_pool().await else { return };
    let service = InterviewService::new(pool.clone());

    let recruiter = seed_user(&pool, "recruiter").await;
    let student = seed_user(&pool, "student").await;

    let err = service
        .schedule(
            recruiter,
            schedule_payload(Uuid::new_v4(), student, "2024-03-15", "14:00"),
        )
        .await
        .expect_err("unknown application");
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn update_status_allows_both_sides_and_rejects_third_parties() {
    let Some(pool) = test_pool().await else { return };
    let service = InterviewService::new(pool.clone());

    let recruiter = seed_user(&pool, "recruiter").await;
    let student = seed_user(&pool, "student").await;
    let stranger = seed_user(&pool, "student").await;
    let application = seed_application(&pool, recruiter, student).await;

    let interview = service
        .schedule(
            recruiter,
            schedule_payload(application, student, "2024-03-15", "14:00"),
        )
        .await
        .unwrap()
        .interview;

    let updated = service
        .update_status(interview.id, recruiter, InterviewStatus::Confirmed)
        .await
        .expect("recruiter updates status");
    assert_eq!(updated.status, InterviewStatus::Confirmed);

    let updated = service
        .update_status(interview.id, student, InterviewStatus::Completed)
        .await
        .expect("candidate updates status");
    assert_eq!(updated.status, InterviewStatus::Completed);

    let err = service
        .update_status(interview.id, stranger, InterviewStatus::Cancelled)
        .await
        .expect_err("third party rejected");
    assert!(matches!(err, Error::Forbidden(_)));
}

#[tokio::test]
async fn reschedule_is_recruiter_only_and_moves_sibling_events() {
    let Some(pool) = test_pool().await else { return };
    let service = InterviewService::new(pool.clone());

    let recruiter = seed_user(&pool, "recruiter").await;
    let student = seed_user(&pool, "student").await;
    let application = seed_application(&pool, recruiter, student).await;

    let first = service
        .schedule(
            recruiter,
            schedule_payload(application, student, "2024-03-15", "14:00"),
        )
        .await
        .unwrap()
        .interview;
    // Second interview on the same application; its calendar entries
    // share the application link.
    let _second = service
        .schedule(
            recruiter,
            schedule_payload(application, student, "2024-03-18", "16:00"),
        )
        .await
        .unwrap()
        .interview;
    assert_eq!(event_rows(&pool, application).await.len(), 4);

    let err = service
        .reschedule(first.id, student, "2024-03-20", "10:00")
        .await
        .expect_err("candidate cannot reschedule");
    assert!(matches!(err, Error::Forbidden(_)));

    let rescheduled = service
        .reschedule(first.id, recruiter, "2024-03-20", "10:00")
        .await
        .expect("recruiter reschedules");
    assert_eq!(rescheduled.status, InterviewStatus::Rescheduled);
    assert_eq!(rescheduled.date, "2024-03-20");

    // Event matching is by application, so the second interview's
    // calendar entries move too. Documented behavior.
    let events = event_rows(&pool, application).await;
    assert_eq!(events.len(), 4);
    let expected = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
    for (date, time) in &events {
        assert_eq!(*date, expected);
        assert_eq!(time, "10:00");
    }
}
