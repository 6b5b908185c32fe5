use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{
    dto::mentorship_dto::{
        ApplyProgramPayload, CreateProgramPayload, MentorSummary, MentorsQuery, MentorsResponse,
        MentorshipListQuery, MentorshipListResponse, MentorshipResponse, MentorshipStatistics,
        Pagination, ProgramsQuery, ProgramsResponse, RecentQuery, RequestMentorshipPayload,
        UpdateMentorshipStatusPayload,
    },
    error::{Error, Result},
    middleware::auth::AuthUser,
    models::mentorship::MentorshipStatus,
    models::user::{ROLE_RECRUITER, ROLE_STUDENT},
    AppState,
};

pub async fn list_mentors(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthUser>,
    Query(query): Query<MentorsQuery>,
) -> Result<impl IntoResponse> {
    let page = state.mentorship_service.list_mentors(query).await?;
    let pagination = Pagination::new(page.total, page.page, page.limit);
    let mentors: Vec<MentorSummary> = page.items.into_iter().map(Into::into).collect();
    Ok(Json(MentorsResponse {
        mentors,
        pagination,
    }))
}

pub async fn list_mentorships(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    let mentorships = state.mentorship_service.list_for_user(user.id).await?;
    let total = mentorships.len() as i64;
    let mentorships: Vec<MentorshipResponse> = mentorships.into_iter().map(Into::into).collect();
    Ok(Json(MentorshipListResponse {
        mentorships,
        pagination: Pagination::new(total, 1, total.max(1)),
    }))
}

pub async fn list_my_mentorships(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<MentorshipListQuery>,
) -> Result<impl IntoResponse> {
    let page = state
        .mentorship_service
        .list_my(user.id, &user.role, query)
        .await?;
    let pagination = Pagination::new(page.total, page.page, page.limit);
    let mentorships: Vec<MentorshipResponse> = page.items.into_iter().map(Into::into).collect();
    Ok(Json(MentorshipListResponse {
        mentorships,
        pagination,
    }))
}

pub async fn request_mentorship(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<RequestMentorshipPayload>,
) -> Result<impl IntoResponse> {
    if !user.has_role(ROLE_STUDENT) {
        return Err(Error::Forbidden(
            "Only students can request mentorship".to_string(),
        ));
    }
    let (Some(mentor_id), Some(message)) = (payload.mentor_id, payload.message) else {
        return Err(Error::BadRequest(
            "Mentor ID and message are required".to_string(),
        ));
    };
    let mentorship = state
        .mentorship_service
        .request(user.id, mentor_id, message, payload.topic)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(MentorshipResponse::from(mentorship)),
    ))
}

pub async fn update_mentorship_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMentorshipStatusPayload>,
) -> Result<impl IntoResponse> {
    // Only the two decision states are accepted here; a request cannot
    // be moved back to pending.
    let status = match payload.status.as_deref() {
        Some("accepted") => MentorshipStatus::Accepted,
        Some("rejected") => MentorshipStatus::Rejected,
        _ => return Err(Error::BadRequest("Valid status is required".to_string())),
    };
    let mentorship = state
        .mentorship_service
        .update_status(id, user.id, status)
        .await?;
    Ok(Json(MentorshipResponse::from(mentorship)))
}

pub async fn create_program(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateProgramPayload>,
) -> Result<impl IntoResponse> {
    if !user.has_role(ROLE_RECRUITER) {
        return Err(Error::Forbidden(
            "Only recruiters can create mentorship programs".to_string(),
        ));
    }
    let (Some(title), Some(description), Some(duration)) = (
        payload.title.clone(),
        payload.description.clone(),
        payload.duration.clone(),
    ) else {
        return Err(Error::BadRequest(
            "Title, description, and duration are required".to_string(),
        ));
    };
    let program = state
        .mentorship_service
        .create_program(user.id, payload, title, description, duration)
        .await?;
    Ok((StatusCode::CREATED, Json(MentorshipResponse::from(program))))
}

pub async fn list_programs(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthUser>,
    Query(query): Query<ProgramsQuery>,
) -> Result<impl IntoResponse> {
    let page = state.mentorship_service.list_programs(query).await?;
    let pagination = Pagination::new(page.total, page.page, page.limit);
    let programs: Vec<MentorshipResponse> = page.items.into_iter().map(Into::into).collect();
    Ok(Json(ProgramsResponse {
        programs,
        pagination,
    }))
}

pub async fn apply_to_program(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(program_id): Path<Uuid>,
    Json(payload): Json<ApplyProgramPayload>,
) -> Result<impl IntoResponse> {
    if !user.has_role(ROLE_STUDENT) {
        return Err(Error::Forbidden(
            "Only students can apply to programs".to_string(),
        ));
    }
    let application = state
        .mentorship_service
        .apply_to_program(user.id, program_id, payload.message)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(MentorshipResponse::from(application)),
    ))
}

pub async fn statistics(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    if !user.has_role(ROLE_RECRUITER) {
        return Err(Error::Forbidden("Not authorized".to_string()));
    }
    let stats = state.mentorship_service.statistics(user.id).await?;
    Ok(Json(MentorshipStatistics {
        total_requests: stats.total,
        pending_requests: stats.pending,
        accepted_requests: stats.accepted,
        rejected_requests: stats.rejected,
        active_mentees: stats.active_mentees,
        active_programs: stats.active_programs,
        recent_requests: stats.recent.into_iter().map(Into::into).collect(),
    }))
}

pub async fn recent(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<RecentQuery>,
) -> Result<impl IntoResponse> {
    let recent = state
        .mentorship_service
        .recent_for_user(user.id, &user.role, query.limit.unwrap_or(5))
        .await?;
    let response: Vec<MentorshipResponse> = recent.into_iter().map(Into::into).collect();
    Ok(Json(response))
}
