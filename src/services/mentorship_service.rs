use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::dto::mentorship_dto::{CreateProgramPayload, MentorsQuery, MentorshipListQuery, ProgramsQuery};
use crate::error::{Error, Result};
use crate::models::mentorship::{
    ApplicationDetails, MentorshipStatus, MentorshipWithRefs, ProgramDetails,
};
use crate::models::user::{User, ROLE_RECRUITER, ROLE_STUDENT};

#[derive(Clone)]
pub struct MentorshipService {
    pool: PgPool,
}

const MAX_PAGE: i64 = 100_000;

/// Clamps caller-supplied paging values and derives the row offset.
/// The page ceiling keeps `(page - 1) * limit` far from i64 overflow.
fn page_window(page: Option<i64>, limit: Option<i64>) -> (i64, i64, i64) {
    let page = page.unwrap_or(1).clamp(1, MAX_PAGE);
    let limit = limit.unwrap_or(10).clamp(1, 100);
    (page, limit, (page - 1) * limit)
}

/// Which side of a mentorship the caller sits on, from the token role.
/// Roles are compared case-insensitively, matching the route gates.
fn side_column(role: &str) -> &'static str {
    if role.eq_ignore_ascii_case(ROLE_STUDENT) {
        "m.student_id"
    } else {
        "m.mentor_id"
    }
}

pub struct MentorPage {
    pub items: Vec<User>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

pub struct MentorshipPage {
    pub items: Vec<MentorshipWithRefs>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

const MENTORSHIP_SELECT: &str = r#"
    SELECT
        m.id, m.mentor_id, m.student_id, m.message, m.topic, m.status,
        m.program_details, m.application_details, m.created_at, m.updated_at,
        u.first_name AS mentor_first_name,
        u.last_name AS mentor_last_name,
        u.organization AS mentor_organization,
        u.job_title AS mentor_job_title,
        u.avatar AS mentor_avatar,
        s.first_name AS student_first_name,
        s.last_name AS student_last_name,
        s.avatar AS student_avatar
    FROM mentorships m
    JOIN users u ON u.id = m.mentor_id
    LEFT JOIN users s ON s.id = m.student_id
"#;

impl MentorshipService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_mentors(&self, query: MentorsQuery) -> Result<MentorPage> {
        let (page, limit, offset) = page_window(query.page, query.limit);

        let skills: Option<Vec<String>> = query.skills.map(|raw| {
            raw.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });
        let skills = skills.filter(|list| !list.is_empty());
        let organization = query.organization.map(|org| format!("%{}%", org));

        let mut filters = vec![format!("role = '{}'", ROLE_RECRUITER)];
        let mut idx = 0;
        if skills.is_some() {
            idx += 1;
            filters.push(format!("skills && ${}", idx));
        }
        if organization.is_some() {
            idx += 1;
            filters.push(format!("organization ILIKE ${}", idx));
        }
        match query.experience.as_deref() {
            Some("senior") => filters.push("years_of_experience >= 5".to_string()),
            Some("mid") => {
                filters.push("years_of_experience >= 3 AND years_of_experience < 5".to_string())
            }
            Some("junior") => filters.push("years_of_experience < 3".to_string()),
            _ => {}
        }
        let where_clause = format!("WHERE {}", filters.join(" AND "));

        let items_sql = format!(
            "SELECT * FROM users {} ORDER BY last_active DESC NULLS LAST LIMIT ${} OFFSET ${}",
            where_clause,
            idx + 1,
            idx + 2
        );
        let total_sql = format!("SELECT COUNT(*) FROM users {}", where_clause);

        let mut items_statement = sqlx::query_as::<_, User>(&items_sql);
        if let Some(list) = &skills {
            items_statement = items_statement.bind(list.clone());
        }
        if let Some(org) = &organization {
            items_statement = items_statement.bind(org.clone());
        }
        let items = items_statement
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let mut total_statement = sqlx::query_scalar::<_, i64>(&total_sql);
        if let Some(list) = &skills {
            total_statement = total_statement.bind(list.clone());
        }
        if let Some(org) = &organization {
            total_statement = total_statement.bind(org.clone());
        }
        let total = total_statement.fetch_one(&self.pool).await?;

        Ok(MentorPage {
            items,
            total,
            page,
            limit,
        })
    }

    /// All mentorships the user participates in, either side.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<MentorshipWithRefs>> {
        let query = format!(
            "{} WHERE m.mentor_id = $1 OR m.student_id = $1 ORDER BY m.created_at DESC",
            MENTORSHIP_SELECT
        );
        let mentorships = sqlx::query_as::<_, MentorshipWithRefs>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(mentorships)
    }

    pub async fn list_my(
        &self,
        user_id: Uuid,
        role: &str,
        query: MentorshipListQuery,
    ) -> Result<MentorshipPage> {
        let (page, limit, offset) = page_window(query.page, query.limit);
        let side = side_column(role);
        // Unknown status values are ignored rather than rejected.
        let status: Option<MentorshipStatus> =
            query.status.as_deref().and_then(|s| s.parse().ok());

        let mut where_clause = format!("WHERE {} = $1", side);
        if status.is_some() {
            where_clause.push_str(" AND m.status = $2");
        }
        let (limit_idx, offset_idx) = if status.is_some() { (3, 4) } else { (2, 3) };

        let items_sql = format!(
            "{} {} ORDER BY m.created_at DESC LIMIT ${} OFFSET ${}",
            MENTORSHIP_SELECT, where_clause, limit_idx, offset_idx
        );
        let total_sql = format!(
            "SELECT COUNT(*) FROM mentorships m {}",
            where_clause
        );

        let mut items_statement =
            sqlx::query_as::<_, MentorshipWithRefs>(&items_sql).bind(user_id);
        if let Some(status) = status {
            items_statement = items_statement.bind(status);
        }
        let items = items_statement
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let mut total_statement = sqlx::query_scalar::<_, i64>(&total_sql).bind(user_id);
        if let Some(status) = status {
            total_statement = total_statement.bind(status);
        }
        let total = total_statement.fetch_one(&self.pool).await?;

        Ok(MentorshipPage {
            items,
            total,
            page,
            limit,
        })
    }

    pub async fn request(
        &self,
        student_id: Uuid,
        mentor_id: Uuid,
        message: String,
        topic: Option<String>,
    ) -> Result<MentorshipWithRefs> {
        let mentor = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(mentor_id)
            .fetch_optional(&self.pool)
            .await?;
        let Some(mentor) = mentor.filter(|user| user.role == ROLE_RECRUITER) else {
            return Err(Error::NotFound("Invalid mentor".to_string()));
        };

        let existing = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM mentorships
            WHERE mentor_id = $1 AND student_id = $2 AND status IN ('pending', 'accepted')
            "#,
        )
        .bind(mentor.id)
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;
        if existing.is_some() {
            return Err(Error::BadRequest(
                "Mentorship request already exists".to_string(),
            ));
        }

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO mentorships (mentor_id, student_id, message, topic, status)
            VALUES ($1, $2, $3, $4, 'pending')
            RETURNING id
            "#,
        )
        .bind(mentor.id)
        .bind(student_id)
        .bind(&message)
        .bind(topic.unwrap_or_else(|| "General Mentorship".to_string()))
        .fetch_one(&self.pool)
        .await?;

        info!(mentorship_id = %id, mentor = %mentor.id, student = %student_id, "Mentorship requested");
        self.get_with_refs(id).await
    }

    /// Mentor accepts or rejects a pending request.
    pub async fn update_status(
        &self,
        id: Uuid,
        mentor_id: Uuid,
        status: MentorshipStatus,
    ) -> Result<MentorshipWithRefs> {
        let owner = sqlx::query_scalar::<_, Uuid>("SELECT mentor_id FROM mentorships WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Mentorship request not found".to_string()))?;
        if owner != mentor_id {
            return Err(Error::Forbidden("Unauthorized".to_string()));
        }

        sqlx::query("UPDATE mentorships SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        self.get_with_refs(id).await
    }

    pub async fn create_program(
        &self,
        mentor_id: Uuid,
        payload: CreateProgramPayload,
        title: String,
        description: String,
        duration: String,
    ) -> Result<MentorshipWithRefs> {
        let details = ProgramDetails {
            duration,
            skills_offered: payload.skills_offered.unwrap_or_default(),
            max_participants: payload.max_participants.unwrap_or(10),
            requirements: payload.requirements.unwrap_or_default(),
            current_participants: 0,
            is_program: true,
        };

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO mentorships (mentor_id, student_id, message, topic, status, program_details)
            VALUES ($1, NULL, $2, $3, 'accepted', $4)
            RETURNING id
            "#,
        )
        .bind(mentor_id)
        .bind(&description)
        .bind(&title)
        .bind(Json(details))
        .fetch_one(&self.pool)
        .await?;

        info!(program_id = %id, mentor = %mentor_id, "Mentorship program created");
        self.get_with_refs(id).await
    }

    pub async fn list_programs(&self, query: ProgramsQuery) -> Result<MentorshipPage> {
        let (page, limit, offset) = page_window(query.page, query.limit);

        let skills: Option<Vec<String>> = query
            .skills
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|list| !list.is_empty());

        let mut where_clause = String::from(
            "WHERE (m.program_details->>'is_program')::boolean IS TRUE AND m.status = 'accepted'",
        );
        if skills.is_some() {
            where_clause.push_str(" AND m.program_details->'skills_offered' ?| $1");
        }
        let (limit_idx, offset_idx) = if skills.is_some() { (2, 3) } else { (1, 2) };

        let items_sql = format!(
            "{} {} ORDER BY m.created_at DESC LIMIT ${} OFFSET ${}",
            MENTORSHIP_SELECT, where_clause, limit_idx, offset_idx
        );
        let total_sql = format!("SELECT COUNT(*) FROM mentorships m {}", where_clause);

        let mut items_statement = sqlx::query_as::<_, MentorshipWithRefs>(&items_sql);
        if let Some(list) = &skills {
            items_statement = items_statement.bind(list.clone());
        }
        let items = items_statement
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let mut total_statement = sqlx::query_scalar::<_, i64>(&total_sql);
        if let Some(list) = &skills {
            total_statement = total_statement.bind(list.clone());
        }
        let total = total_statement.fetch_one(&self.pool).await?;

        Ok(MentorshipPage {
            items,
            total,
            page,
            limit,
        })
    }

    pub async fn apply_to_program(
        &self,
        student_id: Uuid,
        program_id: Uuid,
        message: Option<String>,
    ) -> Result<MentorshipWithRefs> {
        let program = self.get_with_refs(program_id).await.map_err(|err| match err {
            Error::NotFound(_) => Error::NotFound("Program not found".to_string()),
            other => other,
        })?;
        let Some(details) = program.program_details.as_ref().filter(|d| d.is_program) else {
            return Err(Error::NotFound("Program not found".to_string()));
        };

        let existing = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM mentorships
            WHERE mentor_id = $1 AND student_id = $2
              AND application_details->>'program_id' = $3
            "#,
        )
        .bind(program.mentor_id)
        .bind(student_id)
        .bind(program_id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        if existing.is_some() {
            return Err(Error::BadRequest(
                "You have already applied to this program".to_string(),
            ));
        }

        // Capacity is tracked on the program but deliberately not
        // enforced here; see DESIGN.md.
        let accepted = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM mentorships
            WHERE mentor_id = $1 AND status = 'accepted'
              AND application_details->>'program_id' = $2
            "#,
        )
        .bind(program.mentor_id)
        .bind(program_id.to_string())
        .fetch_one(&self.pool)
        .await?;
        if accepted >= details.max_participants {
            warn!(program_id = %program_id, accepted, max = details.max_participants,
                "Program over capacity; application still accepted");
        }

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO mentorships (mentor_id, student_id, message, topic, status, application_details)
            VALUES ($1, $2, $3, $4, 'pending', $5)
            RETURNING id
            "#,
        )
        .bind(program.mentor_id)
        .bind(student_id)
        .bind(message.unwrap_or_else(|| "Application to mentorship program".to_string()))
        .bind(format!("Application for: {}", program.topic))
        .bind(Json(ApplicationDetails {
            program_id,
            applied_at: Utc::now(),
        }))
        .fetch_one(&self.pool)
        .await?;

        self.get_with_refs(id).await
    }

    pub async fn statistics(&self, mentor_id: Uuid) -> Result<MentorshipStats> {
        let total = self.count_by_mentor(mentor_id, None).await?;
        let pending = self
            .count_by_mentor(mentor_id, Some(MentorshipStatus::Pending))
            .await?;
        let accepted = self
            .count_by_mentor(mentor_id, Some(MentorshipStatus::Accepted))
            .await?;
        let rejected = self
            .count_by_mentor(mentor_id, Some(MentorshipStatus::Rejected))
            .await?;

        let active_programs = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM mentorships
            WHERE mentor_id = $1 AND (program_details->>'is_program')::boolean IS TRUE
            "#,
        )
        .bind(mentor_id)
        .fetch_one(&self.pool)
        .await?;

        let recent_sql = format!(
            "{} WHERE m.mentor_id = $1 ORDER BY m.created_at DESC LIMIT 5",
            MENTORSHIP_SELECT
        );
        let recent = sqlx::query_as::<_, MentorshipWithRefs>(&recent_sql)
            .bind(mentor_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(MentorshipStats {
            total,
            pending,
            accepted,
            rejected,
            active_mentees: accepted,
            active_programs,
            recent,
        })
    }

    pub async fn recent_for_user(
        &self,
        user_id: Uuid,
        role: &str,
        limit: i64,
    ) -> Result<Vec<MentorshipWithRefs>> {
        let side = side_column(role);
        let sql = format!(
            "{} WHERE {} = $1 ORDER BY m.created_at DESC LIMIT $2",
            MENTORSHIP_SELECT, side
        );
        let recent = sqlx::query_as::<_, MentorshipWithRefs>(&sql)
            .bind(user_id)
            .bind(limit.clamp(1, 50))
            .fetch_all(&self.pool)
            .await?;
        Ok(recent)
    }

    async fn count_by_mentor(
        &self,
        mentor_id: Uuid,
        status: Option<MentorshipStatus>,
    ) -> Result<i64> {
        let count = match status {
            Some(status) => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM mentorships WHERE mentor_id = $1 AND status = $2",
                )
                .bind(mentor_id)
                .bind(status)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM mentorships WHERE mentor_id = $1",
                )
                .bind(mentor_id)
                .fetch_one(&self.pool)
                .await?
            }
        };
        Ok(count)
    }

    async fn get_with_refs(&self, id: Uuid) -> Result<MentorshipWithRefs> {
        let sql = format!("{} WHERE m.id = $1", MENTORSHIP_SELECT);
        let mentorship = sqlx::query_as::<_, MentorshipWithRefs>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Mentorship request not found".to_string()))?;
        Ok(mentorship)
    }
}

pub struct MentorshipStats {
    pub total: i64,
    pub pending: i64,
    pub accepted: i64,
    pub rejected: i64,
    pub active_mentees: i64,
    pub active_programs: i64,
    pub recent: Vec<MentorshipWithRefs>,
}
