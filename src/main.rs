use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use internlink_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware::{auth, cors, rate_limit},
    routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let api = Router::new()
        .route(
            "/api/interviews/schedule",
            post(routes::interviews::schedule_interview),
        )
        .route(
            "/api/interviews/recruiter",
            get(routes::interviews::list_recruiter_interviews),
        )
        .route(
            "/api/interviews/student",
            get(routes::interviews::list_student_interviews),
        )
        .route(
            "/api/interviews/:id/status",
            put(routes::interviews::update_interview_status),
        )
        .route(
            "/api/interviews/:id/reschedule",
            put(routes::interviews::reschedule_interview),
        )
        .route("/api/events", post(routes::events::create_event))
        .route(
            "/api/events/recruiter",
            get(routes::events::list_recruiter_events),
        )
        .route(
            "/api/events/student",
            get(routes::events::list_student_events),
        )
        .route(
            "/api/events/:id",
            put(routes::events::update_event).delete(routes::events::delete_event),
        )
        .route(
            "/api/mentorship/mentors",
            get(routes::mentorship::list_mentors),
        )
        .route("/api/mentorship", get(routes::mentorship::list_mentorships))
        .route(
            "/api/mentorship/my",
            get(routes::mentorship::list_my_mentorships),
        )
        .route(
            "/api/mentorship/request",
            post(routes::mentorship::request_mentorship),
        )
        .route(
            "/api/mentorship/:id/status",
            put(routes::mentorship::update_mentorship_status),
        )
        .route(
            "/api/mentorship/programs",
            get(routes::mentorship::list_programs).post(routes::mentorship::create_program),
        )
        .route(
            "/api/mentorship/programs/:program_id/apply",
            post(routes::mentorship::apply_to_program),
        )
        .route(
            "/api/mentorship/statistics",
            get(routes::mentorship::statistics),
        )
        .route("/api/mentorship/recent", get(routes::mentorship::recent))
        .route(
            "/api/resume",
            get(routes::resume::list_resumes).post(routes::resume::create_resume),
        )
        .route("/api/resume/upload", post(routes::resume::upload_resume))
        .route(
            "/api/resume/:id",
            get(routes::resume::get_resume)
                .put(routes::resume::update_resume)
                .delete(routes::resume::delete_resume),
        )
        .layer(axum::middleware::from_fn(auth::require_bearer_auth))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::new_rps_state(config.api_rps),
            rate_limit::rps_middleware,
        ));

    let app = base_routes
        .merge(api)
        .with_state(app_state)
        .layer(cors::permissive_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
