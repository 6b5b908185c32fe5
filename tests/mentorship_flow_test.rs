//! Mentorship request and program flows against a real Postgres
//! instance. Skipped when DATABASE_URL is not set.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use internlink_backend::dto::mentorship_dto::CreateProgramPayload;
use internlink_backend::error::Error;
use internlink_backend::models::mentorship::MentorshipStatus;
use internlink_backend::services::mentorship_service::MentorshipService;

async fn test_pool() -> Option<PgPool> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping mentorship flow test");
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

fn program_payload(max_participants: i64) -> CreateProgramPayload {
    CreateProgramPayload {
        title: Some("Rust Mentorship".to_string()),
        description: Some("Eight weeks of systems programming".to_string()),
        duration: Some("8 weeks".to_string()),
        skills_offered: Some(vec!["Rust".to_string()]),
        max_participants: Some(max_participants),
        requirements: None,
    }
}

async fn application_count(pool: &PgPool, program_id: Uuid) -> i64 {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM mentorships WHERE application_details->>'program_id' = $1",
    )
    .bind(program_id.to_string())
    .fetch_one(pool)
    .await
    .expect("count applications")
}

#[tokio::test]
async fn program_capacity_is_tracked_but_not_enforced() {
    let Some(pool) = test_pool().await else { return };
    let service = MentorshipService::new(pool.clone());

    let mentor = seed_user(&pool, "recruiter").await;
    let first_student = seed_user(&pool, "student").await;
    let second_student = seed_user(&pool, "student").await;

    let payload = program_payload(1);
    let program = service
        .create_program(
            mentor,
            payload.clone(),
            payload.title.clone().unwrap(),
            payload.description.clone().unwrap(),
            payload.duration.clone().unwrap(),
        )
        .await
        .expect("create program");
    let details = program.program_details.as_ref().expect("program details");
    assert!(details.is_program);
    assert_eq!(details.max_participants, 1);

    let first = service
        .apply_to_program(first_student, program.id, None)
        .await
        .expect("first application");
    assert_eq!(first.status, MentorshipStatus::Pending);

    service
        .update_status(first.id, mentor, MentorshipStatus::Accepted)
        .await
        .expect("accept first application");

    // The program is now full; a further application still goes through.
    let second = service
        .apply_to_program(second_student, program.id, Some("Late entry".to_string()))
        .await
        .expect("application past capacity");
    assert_eq!(second.status, MentorshipStatus::Pending);
    assert_eq!(application_count(&pool, program.id).await, 2);
}

#[tokio::test]
async fn repeat_program_application_is_rejected() {
    let Some(pool) = test_pool().await else { return };
    let service = MentorshipService::new(pool.clone());

    let mentor = seed_user(&pool, "recruiter").await;
    let student = seed_user(&pool, "student").await;

    let payload = program_payload(10);
    let program = service
        .create_program(
            mentor,
            payload.clone(),
            payload.title.clone().unwrap(),
            payload.description.clone().unwrap(),
            payload.duration.clone().unwrap(),
        )
        .await
        .expect("create program");

    service
        .apply_to_program(student, program.id, None)
        .await
        .expect("first application");
    let err = service
        .apply_to_program(student, program.id, None)
        .await
        .expect_err("second application must be rejected");
    assert!(matches!(err, Error::BadRequest(_)));
    assert_eq!(application_count(&pool, program.id).await, 1);
}

#[tokio::test]
async fn apply_to_plain_mentorship_is_not_found() {
    let Some(pool) = test_pool().await else { return };
    let service = MentorshipService::new(pool.clone());

    let mentor = seed_user(&pool, "recruiter").await;
    let student = seed_user(&pool, "student").await;
    let other_student = seed_user(&pool, "student").await;

    // A plain request row is not a program, even though it has an id.
    let request = service
        .request(student, mentor, "Looking for guidance".to_string(), None)
        .await
        .expect("mentorship request");

    let err = service
        .apply_to_program(other_student, request.id, None)
        .await
        .expect_err("plain mentorship is not applyable");
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn duplicate_open_request_is_rejected() {
    let Some(pool) = test_pool().await else { return };
    let service = MentorshipService::new(pool.clone());

    let mentor = seed_user(&pool, "recruiter").await;
    let student = seed_user(&pool, "student").await;

    service
        .request(student, mentor, "First request".to_string(), None)
        .await
        .expect("first request");
    let err = service
        .request(student, mentor, "Second request".to_string(), None)
        .await
        .expect_err("open duplicate must be rejected");
    assert!(matches!(err, Error::BadRequest(_)));

    let err = service
        .request(student, seed_user(&pool, "student").await, "Hi".to_string(), None)
        .await
        .expect_err("students are not mentors");
    assert!(matches!(err, Error::NotFound(_)));
}
