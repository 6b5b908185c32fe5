use sha2::{Digest, Sha256};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::dto::interview_dto::SchedulePayload;
use crate::error::{Error, Result};
use crate::models::application::STATUS_INTERVIEW;
use crate::models::event::EVENT_TYPE_INTERVIEW;
use crate::models::event::EventLink;
use crate::models::interview::{Interview, InterviewStatus, InterviewType, InterviewWithRefs};
use crate::utils::time::{combine, format_date, normalize_date, parse_time};

/// Key that makes schedule() retries safe: two calls with the same
/// application, candidate, date and time land on the same interview row.
pub fn idempotency_key(application_id: Uuid, candidate_id: Uuid, date: &str, time: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}:{}:{}:{}", application_id, candidate_id, date, time).as_bytes());
    hex::encode(hasher.finalize())
}

/// Application row with the fields the scheduling preconditions need.
#[derive(Debug, Clone, sqlx::FromRow)]
struct ApplicationContext {
    id: Uuid,
    status: String,
    opportunity_id: Uuid,
    organization: Uuid,
    opportunity_title: String,
    student_first_name: String,
    student_last_name: String,
}

#[derive(Debug)]
pub struct ScheduleOutcome {
    pub interview: InterviewWithRefs,
    /// False when the idempotency key matched an existing interview.
    pub created: bool,
}

#[derive(Clone)]
pub struct InterviewService {
    pool: PgPool,
}

const PROJECTION_SELECT: &str = r#"
    SELECT
        i.id, i.application_id, i.candidate_id, i.recruiter_id, i.opportunity_id,
        i.date, i.time, i.duration, i.interview_type, i.status, i.location,
        i.meeting_link, i.notes, i.created_at, i.updated_at,
        c.first_name AS candidate_first_name,
        c.last_name AS candidate_last_name,
        c.email AS candidate_email,
        r.first_name AS recruiter_first_name,
        r.last_name AS recruiter_last_name,
        o.title AS position
    FROM interviews i
    JOIN users c ON c.id = i.candidate_id
    JOIN users r ON r.id = i.recruiter_id
    JOIN opportunities o ON o.id = i.opportunity_id
"#;

impl InterviewService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Schedules an interview: one interview row, the application status
    /// sync, and a calendar entry for each participant, all inside a
    /// single transaction. A replay with identical arguments returns the
    /// interview scheduled by the first call.
    pub async fn schedule(&self, recruiter_id: Uuid, payload: SchedulePayload) -> Result<ScheduleOutcome> {
        let context = sqlx::query_as::<_, ApplicationContext>(
            r#"
            SELECT
                a.id, a.status,
                o.id AS opportunity_id, o.organization, o.title AS opportunity_title,
                s.first_name AS student_first_name, s.last_name AS student_last_name
            FROM applications a
            JOIN opportunities o ON o.id = a.opportunity_id
            JOIN users s ON s.id = a.student_id
            WHERE a.id = $1
            "#,
        )
        .bind(payload.application_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;

        // The recruiter must own the opportunity this application targets.
        // Checked once here; the relation is never re-verified later.
        if context.organization != recruiter_id {
            return Err(Error::Forbidden("Unauthorized".to_string()));
        }

        let event_date = normalize_date(&payload.date)?;
        let time_of_day = parse_time(&payload.time)?;
        let date = format_date(event_date);
        let time = time_of_day.format("%H:%M").to_string();

        let key = idempotency_key(payload.application_id, payload.candidate_id, &date, &time);
        if let Some(existing) = self.find_by_idempotency_key(&key).await? {
            info!(interview_id = %existing.id, "Schedule replay matched existing interview");
            return Ok(ScheduleOutcome {
                interview: self.get_with_refs(existing.id).await?,
                created: false,
            });
        }

        let duration = payload.duration.unwrap_or(60);
        let interview_type = payload.interview_type.unwrap_or_default();
        let location = payload
            .location
            .clone()
            .unwrap_or_else(|| "Video Call".to_string());

        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_as::<_, Interview>(
            r#"
            INSERT INTO interviews (
                application_id, candidate_id, recruiter_id, opportunity_id,
                date, time, duration, interview_type, location, meeting_link, notes,
                idempotency_key
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (idempotency_key) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(payload.application_id)
        .bind(payload.candidate_id)
        .bind(recruiter_id)
        .bind(context.opportunity_id)
        .bind(&date)
        .bind(&time)
        .bind(duration)
        .bind(interview_type)
        .bind(&location)
        .bind(&payload.meeting_link)
        .bind(&payload.notes)
        .bind(&key)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(interview) = inserted else {
            // Lost a race with a concurrent identical call.
            tx.rollback().await?;
            let existing = self
                .find_by_idempotency_key(&key)
                .await?
                .ok_or_else(|| Error::Internal("Interview vanished after conflict".to_string()))?;
            return Ok(ScheduleOutcome {
                interview: self.get_with_refs(existing.id).await?,
                created: false,
            });
        };

        if context.status != STATUS_INTERVIEW {
            let interview_at = combine(event_date, time_of_day);
            sqlx::query(
                r#"
                UPDATE applications
                SET status = $2, interview_date = $3, updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(context.id)
            .bind(STATUS_INTERVIEW)
            .bind(interview_at)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                INSERT INTO application_activities (application_id, activity_type, description)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(context.id)
            .bind("Interview Scheduled")
            .bind(format!(
                "{} interview scheduled for {} at {}",
                interview_type, date, time
            ))
            .execute(&mut *tx)
            .await?;
        }

        let link = EventLink::Application(payload.application_id);
        let candidate_name = format!(
            "{} {}",
            context.student_first_name, context.student_last_name
        );

        // Recruiter's calendar entry.
        self.insert_interview_event(
            &mut tx,
            recruiter_id,
            &format!("Interview: {}", candidate_name),
            event_date,
            &time,
            &format!("{} interview for {}", interview_type, context.opportunity_title),
            &location,
            link,
        )
        .await?;

        // Candidate's calendar entry.
        self.insert_interview_event(
            &mut tx,
            payload.candidate_id,
            &format!("Interview: {}", context.opportunity_title),
            event_date,
            &time,
            &format!("{} interview with recruiter", interview_type),
            &location,
            link,
        )
        .await?;

        tx.commit().await?;

        info!(interview_id = %interview.id, application_id = %context.id, "Interview scheduled");

        Ok(ScheduleOutcome {
            interview: self.get_with_refs(interview.id).await?,
            created: true,
        })
    }

    #[allow(clippy::too_many_arguments)]
    async fn insert_interview_event(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        owner_id: Uuid,
        title: &str,
        date: chrono::NaiveDate,
        time: &str,
        description: &str,
        location: &str,
        link: EventLink,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO events (user_id, title, date, time, event_type, description, location, related_kind, related_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(owner_id)
        .bind(title)
        .bind(date)
        .bind(time)
        .bind(EVENT_TYPE_INTERVIEW)
        .bind(description)
        .bind(location)
        .bind(link.kind())
        .bind(link.id())
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn find_by_idempotency_key(&self, key: &str) -> Result<Option<Interview>> {
        let interview =
            sqlx::query_as::<_, Interview>("SELECT * FROM interviews WHERE idempotency_key = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(interview)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Interview> {
        let interview = sqlx::query_as::<_, Interview>("SELECT * FROM interviews WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Interview not found".to_string()))?;
        Ok(interview)
    }

    pub async fn get_with_refs(&self, id: Uuid) -> Result<InterviewWithRefs> {
        let query = format!("{} WHERE i.id = $1", PROJECTION_SELECT);
        let interview = sqlx::query_as::<_, InterviewWithRefs>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Interview not found".to_string()))?;
        Ok(interview)
    }

    pub async fn list_for_recruiter(&self, recruiter_id: Uuid) -> Result<Vec<InterviewWithRefs>> {
        let query = format!(
            "{} WHERE i.recruiter_id = $1 ORDER BY i.date ASC, i.time ASC",
            PROJECTION_SELECT
        );
        let interviews = sqlx::query_as::<_, InterviewWithRefs>(&query)
            .bind(recruiter_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(interviews)
    }

    pub async fn list_for_candidate(&self, candidate_id: Uuid) -> Result<Vec<InterviewWithRefs>> {
        let query = format!(
            "{} WHERE i.candidate_id = $1 ORDER BY i.date ASC, i.time ASC",
            PROJECTION_SELECT
        );
        let interviews = sqlx::query_as::<_, InterviewWithRefs>(&query)
            .bind(candidate_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(interviews)
    }

    /// Status change by either side of the interview.
    pub async fn update_status(
        &self,
        id: Uuid,
        acting_user: Uuid,
        status: InterviewStatus,
    ) -> Result<InterviewWithRefs> {
        let interview = self.get_by_id(id).await?;
        if acting_user != interview.recruiter_id && acting_user != interview.candidate_id {
            return Err(Error::Forbidden("Unauthorized".to_string()));
        }

        sqlx::query("UPDATE interviews SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        self.get_with_refs(id).await
    }

    /// Moves the interview and every "Interview" calendar entry linked to
    /// its application. Matching is by application, not by interview id:
    /// if an application carries two interviews, rescheduling one moves
    /// the other's calendar entries too. Documented source behavior; see
    /// DESIGN.md before changing.
    pub async fn reschedule(
        &self,
        id: Uuid,
        acting_user: Uuid,
        date: &str,
        time: &str,
    ) -> Result<InterviewWithRefs> {
        let interview = self.get_by_id(id).await?;
        if acting_user != interview.recruiter_id {
            return Err(Error::Forbidden(
                "Only recruiters can reschedule interviews".to_string(),
            ));
        }

        let event_date = normalize_date(date)?;
        let time_of_day = parse_time(time)?;
        let date = format_date(event_date);
        let time = time_of_day.format("%H:%M").to_string();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE interviews
            SET date = $2, time = $3, status = $4, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&date)
        .bind(&time)
        .bind(InterviewStatus::Rescheduled)
        .execute(&mut *tx)
        .await?;

        let link = EventLink::Application(interview.application_id);
        let moved = sqlx::query(
            r#"
            UPDATE events
            SET date = $3, time = $4, updated_at = NOW()
            WHERE related_kind = $1 AND related_id = $2 AND event_type = $5
            "#,
        )
        .bind(link.kind())
        .bind(link.id())
        .bind(event_date)
        .bind(&time)
        .bind(EVENT_TYPE_INTERVIEW)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            interview_id = %id,
            events_moved = moved.rows_affected(),
            "Interview rescheduled"
        );

        self.get_with_refs(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idempotency_key_is_deterministic() {
        let application = Uuid::new_v4();
        let candidate = Uuid::new_v4();
        let a = idempotency_key(application, candidate, "2024-03-15", "14:00");
        let b = idempotency_key(application, candidate, "2024-03-15", "14:00");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn idempotency_key_varies_with_every_input() {
        let application = Uuid::new_v4();
        let candidate = Uuid::new_v4();
        let base = idempotency_key(application, candidate, "2024-03-15", "14:00");
        assert_ne!(
            base,
            idempotency_key(application, candidate, "2024-03-15", "15:00")
        );
        assert_ne!(
            base,
            idempotency_key(application, candidate, "2024-03-16", "14:00")
        );
        assert_ne!(
            base,
            idempotency_key(application, Uuid::new_v4(), "2024-03-15", "14:00")
        );
        assert_ne!(
            base,
            idempotency_key(Uuid::new_v4(), candidate, "2024-03-15", "14:00")
        );
    }

    #[test]
    fn default_interview_type_labels_the_activity() {
        let interview_type = InterviewType::default();
        let description = format!(
            "{} interview scheduled for {} at {}",
            interview_type, "2024-03-15", "14:00"
        );
        assert_eq!(
            description,
            "Technical interview scheduled for 2024-03-15 at 14:00"
        );
    }
}
