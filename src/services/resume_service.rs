use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::Value as JsonValue;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::dto::resume_dto::{CreateResumePayload, UpdateResumePayload};
use crate::error::{Error, Result};
use crate::models::resume::{PersonalInfo, Resume};

pub const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_MIME_TYPES: [&str; 3] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

pub fn is_allowed_mime_type(mime: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mime)
}

/// Strips the extension from an uploaded filename to use as the resume
/// title.
pub fn title_from_filename(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => filename.to_string(),
    }
}

#[derive(Clone)]
pub struct ResumeService {
    pool: PgPool,
}

impl ResumeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Resume>> {
        let resumes = sqlx::query_as::<_, Resume>(
            "SELECT * FROM resumes WHERE user_id = $1 ORDER BY last_updated DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(resumes)
    }

    pub async fn get_owned(&self, id: Uuid, user_id: Uuid) -> Result<Resume> {
        let resume = sqlx::query_as::<_, Resume>("SELECT * FROM resumes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Resume not found".to_string()))?;
        if resume.user_id != user_id {
            return Err(Error::Forbidden("Unauthorized".to_string()));
        }
        Ok(resume)
    }

    pub async fn create(&self, user_id: Uuid, payload: CreateResumePayload) -> Result<Resume> {
        let personal_info = payload
            .personal_info
            .map(|info| info.sanitized())
            .unwrap_or_default();

        let resume = sqlx::query_as::<_, Resume>(
            r#"
            INSERT INTO resumes (user_id, title, personal_info, education, experience, skills, projects, certifications)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(payload.title.unwrap_or_else(|| "My Resume".to_string()))
        .bind(Json(personal_info))
        .bind(payload.education.unwrap_or_else(|| JsonValue::Array(vec![])))
        .bind(payload.experience.unwrap_or_else(|| JsonValue::Array(vec![])))
        .bind(payload.skills.unwrap_or_else(|| JsonValue::Array(vec![])))
        .bind(payload.projects.unwrap_or_else(|| JsonValue::Array(vec![])))
        .bind(payload.certifications.unwrap_or_else(|| JsonValue::Array(vec![])))
        .fetch_one(&self.pool)
        .await?;

        Ok(resume)
    }

    /// Creates a resume entry from an uploaded file, stored base64-encoded
    /// with placeholder personal info for the user to fill in.
    pub async fn create_from_upload(
        &self,
        user_id: Uuid,
        filename: &str,
        bytes: &[u8],
    ) -> Result<Resume> {
        let resume = sqlx::query_as::<_, Resume>(
            r#"
            INSERT INTO resumes (user_id, title, file_data, personal_info)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(title_from_filename(filename))
        .bind(BASE64.encode(bytes))
        .bind(Json(PersonalInfo::default()))
        .fetch_one(&self.pool)
        .await?;

        info!(resume_id = %resume.id, size = bytes.len(), "Resume file uploaded");
        Ok(resume)
    }

    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        payload: UpdateResumePayload,
    ) -> Result<Resume> {
        let current = self.get_owned(id, user_id).await?;

        let personal_info = match payload.personal_info {
            Some(incoming) => incoming.merge_into(current.personal_info.0),
            None => current.personal_info.0,
        };

        let resume = sqlx::query_as::<_, Resume>(
            r#"
            UPDATE resumes
            SET
                title = COALESCE($2, title),
                personal_info = $3,
                education = COALESCE($4, education),
                experience = COALESCE($5, experience),
                skills = COALESCE($6, skills),
                projects = COALESCE($7, projects),
                certifications = COALESCE($8, certifications),
                last_updated = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.title)
        .bind(Json(personal_info))
        .bind(&payload.education)
        .bind(&payload.experience)
        .bind(&payload.skills)
        .bind(&payload.projects)
        .bind(&payload.certifications)
        .fetch_one(&self.pool)
        .await?;

        Ok(resume)
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<()> {
        self.get_owned(id, user_id).await?;
        sqlx::query("DELETE FROM resumes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        info!(resume_id = %id, "Resume deleted");
        Ok(())
    }
}
