use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::interview_dto::{
        InterviewResponse, ReschedulePayload, SchedulePayload, UpdateInterviewStatusPayload,
    },
    error::{Error, Result},
    middleware::auth::AuthUser,
    models::user::{ROLE_RECRUITER, ROLE_STUDENT},
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/interviews/schedule",
    request_body = SchedulePayload,
    responses(
        (status = 201, description = "Interview scheduled", body = Json<InterviewResponse>),
        (status = 200, description = "Identical schedule call matched an existing interview"),
        (status = 403, description = "Not a recruiter, or not the opportunity owner"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn schedule_interview(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<SchedulePayload>,
) -> Result<impl IntoResponse> {
    if !user.has_role(ROLE_RECRUITER) {
        return Err(Error::Forbidden(
            "Only recruiters can schedule interviews".to_string(),
        ));
    }
    payload.validate()?;
    let outcome = state.interview_service.schedule(user.id, payload).await?;
    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(InterviewResponse::from(outcome.interview))))
}

#[utoipa::path(
    get,
    path = "/api/interviews/recruiter",
    responses(
        (status = 200, description = "Recruiter's interviews ordered by date and time"),
        (status = 403, description = "Not a recruiter")
    )
)]
#[axum::debug_handler]
pub async fn list_recruiter_interviews(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    if !user.has_role(ROLE_RECRUITER) {
        return Err(Error::Forbidden("Unauthorized".to_string()));
    }
    let interviews = state.interview_service.list_for_recruiter(user.id).await?;
    let response: Vec<InterviewResponse> = interviews
        .into_iter()
        .map(InterviewResponse::for_recruiter_list)
        .collect();
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/interviews/student",
    responses(
        (status = 200, description = "Student's interviews ordered by date and time"),
        (status = 403, description = "Not a student")
    )
)]
#[axum::debug_handler]
pub async fn list_student_interviews(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    if !user.has_role(ROLE_STUDENT) {
        return Err(Error::Forbidden("Unauthorized".to_string()));
    }
    let interviews = state.interview_service.list_for_candidate(user.id).await?;
    let response: Vec<InterviewResponse> = interviews
        .into_iter()
        .map(InterviewResponse::for_student_list)
        .collect();
    Ok(Json(response))
}

#[utoipa::path(
    put,
    path = "/api/interviews/{id}/status",
    params(("id" = Uuid, Path, description = "Interview ID")),
    request_body = UpdateInterviewStatusPayload,
    responses(
        (status = 200, description = "Status updated", body = Json<InterviewResponse>),
        (status = 403, description = "Caller is neither the recruiter nor the candidate"),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn update_interview_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInterviewStatusPayload>,
) -> Result<impl IntoResponse> {
    let interview = state
        .interview_service
        .update_status(id, user.id, payload.status)
        .await?;
    Ok(Json(InterviewResponse::from(interview)))
}

#[utoipa::path(
    put,
    path = "/api/interviews/{id}/reschedule",
    params(("id" = Uuid, Path, description = "Interview ID")),
    request_body = ReschedulePayload,
    responses(
        (status = 200, description = "Interview and linked calendar entries moved", body = Json<InterviewResponse>),
        (status = 403, description = "Caller is not the interview's recruiter"),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn reschedule_interview(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReschedulePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let interview = state
        .interview_service
        .reschedule(id, user.id, &payload.date, &payload.time)
        .await?;
    Ok(Json(InterviewResponse::from(interview)))
}
