use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    dto::resume_dto::{CreateResumePayload, UpdateResumePayload},
    error::{Error, Result},
    middleware::auth::AuthUser,
    services::resume_service::{is_allowed_mime_type, MAX_FILE_BYTES},
    AppState,
};

pub async fn list_resumes(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    let resumes = state.resume_service.list_for_user(user.id).await?;
    Ok(Json(resumes))
}

pub async fn get_resume(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let resume = state.resume_service.get_owned(id, user.id).await?;
    Ok(Json(resume))
}

pub async fn upload_resume(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("resume") {
            continue;
        }
        let mime = field
            .content_type()
            .map(|value| value.to_string())
            .unwrap_or_default();
        if !is_allowed_mime_type(&mime) {
            return Err(Error::BadRequest(
                "Invalid file type. Only PDF, DOC, and DOCX files are allowed.".to_string(),
            ));
        }
        let filename = field
            .file_name()
            .map(|name| name.to_string())
            .unwrap_or_else(|| "resume".to_string());
        let bytes = field.bytes().await?;
        if bytes.len() > MAX_FILE_BYTES {
            return Err(Error::BadRequest(
                "File exceeds the 5MB upload limit".to_string(),
            ));
        }
        let resume = state
            .resume_service
            .create_from_upload(user.id, &filename, &bytes)
            .await?;
        return Ok((StatusCode::CREATED, Json(resume)));
    }
    Err(Error::BadRequest("No file uploaded".to_string()))
}

pub async fn create_resume(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateResumePayload>,
) -> Result<impl IntoResponse> {
    let resume = state.resume_service.create(user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(resume)))
}

pub async fn update_resume(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateResumePayload>,
) -> Result<impl IntoResponse> {
    let resume = state.resume_service.update(id, user.id, payload).await?;
    Ok(Json(resume))
}

pub async fn delete_resume(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.resume_service.delete(id, user.id).await?;
    Ok(Json(json!({ "message": "Resume deleted successfully" })))
}
