use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::event_dto::{CreateEventPayload, EventResponse, UpdateEventPayload},
    error::{Error, Result},
    middleware::auth::AuthUser,
    models::user::{ROLE_RECRUITER, ROLE_STUDENT},
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventPayload,
    responses(
        (status = 201, description = "Event created", body = Json<EventResponse>),
        (status = 400, description = "Invalid payload or unknown related type")
    )
)]
#[axum::debug_handler]
pub async fn create_event(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateEventPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let event = state.event_service.create(user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(EventResponse::from(event))))
}

#[utoipa::path(
    get,
    path = "/api/events/recruiter",
    responses(
        (status = 200, description = "Recruiter's events ordered by date and time"),
        (status = 403, description = "Not a recruiter")
    )
)]
#[axum::debug_handler]
pub async fn list_recruiter_events(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    if !user.has_role(ROLE_RECRUITER) {
        return Err(Error::Forbidden("Unauthorized".to_string()));
    }
    let events = state.event_service.list_for_owner(user.id).await?;
    let response: Vec<EventResponse> = events.into_iter().map(Into::into).collect();
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/events/student",
    responses(
        (status = 200, description = "Student's events ordered by date and time"),
        (status = 403, description = "Not a student")
    )
)]
#[axum::debug_handler]
pub async fn list_student_events(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    if !user.has_role(ROLE_STUDENT) {
        return Err(Error::Forbidden("Unauthorized".to_string()));
    }
    let events = state.event_service.list_for_owner(user.id).await?;
    let response: Vec<EventResponse> = events.into_iter().map(Into::into).collect();
    Ok(Json(response))
}

#[utoipa::path(
    put,
    path = "/api/events/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    request_body = UpdateEventPayload,
    responses(
        (status = 200, description = "Event updated", body = Json<EventResponse>),
        (status = 403, description = "Caller does not own the event"),
        (status = 404, description = "Event not found")
    )
)]
#[axum::debug_handler]
pub async fn update_event(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEventPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let event = state.event_service.update(id, user.id, payload).await?;
    Ok(Json(EventResponse::from(event)))
}

#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event deleted"),
        (status = 403, description = "Caller does not own the event"),
        (status = 404, description = "Event not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_event(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.event_service.delete(id, user.id).await?;
    Ok(Json(json!({ "message": "Event deleted successfully" })))
}
