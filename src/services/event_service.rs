use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::dto::event_dto::{CreateEventPayload, UpdateEventPayload};
use crate::error::{Error, Result};
use crate::models::event::{Event, EventLink, EVENT_TYPE_OTHER};
use crate::utils::time::normalize_date;

#[derive(Clone)]
pub struct EventService {
    pool: PgPool,
}

impl EventService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, owner_id: Uuid, payload: CreateEventPayload) -> Result<Event> {
        // Callers send free-form date strings; only the calendar date is
        // kept so the entry never shifts a day under timezone conversion.
        let date = normalize_date(&payload.date)?;
        let link = match (payload.related_to, payload.related_type.as_deref()) {
            (None, _) => None,
            (Some(id), Some(kind)) => Some(EventLink::parse(kind, id).ok_or_else(|| {
                Error::BadRequest(format!("Unknown related type: {}", kind))
            })?),
            (Some(_), None) => {
                return Err(Error::BadRequest(
                    "relatedType is required when relatedTo is set".to_string(),
                ))
            }
        };

        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (user_id, title, date, time, event_type, description, location, status, related_kind, related_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(&payload.title)
        .bind(date)
        .bind(&payload.time)
        .bind(payload.event_type.as_deref().unwrap_or(EVENT_TYPE_OTHER))
        .bind(&payload.description)
        .bind(&payload.location)
        .bind(payload.status.unwrap_or_default())
        .bind(link.map(|l| l.kind()))
        .bind(link.map(|l| l.id()))
        .fetch_one(&self.pool)
        .await?;

        info!(event_id = %event.id, owner = %owner_id, "Event created");
        Ok(event)
    }

    pub async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT * FROM events
            WHERE user_id = $1
            ORDER BY date ASC, time ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }

    pub async fn get_owned(&self, id: Uuid, owner_id: Uuid) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Event not found".to_string()))?;
        if event.user_id != owner_id {
            return Err(Error::Forbidden("Unauthorized".to_string()));
        }
        Ok(event)
    }

    pub async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        payload: UpdateEventPayload,
    ) -> Result<Event> {
        self.get_owned(id, owner_id).await?;

        let date = match payload.date.as_deref() {
            Some(raw) => Some(normalize_date(raw)?),
            None => None,
        };

        let event = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET
                title = COALESCE($2, title),
                date = COALESCE($3, date),
                time = COALESCE($4, time),
                event_type = COALESCE($5, event_type),
                description = COALESCE($6, description),
                location = COALESCE($7, location),
                status = COALESCE($8, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.title)
        .bind(date)
        .bind(&payload.time)
        .bind(&payload.event_type)
        .bind(&payload.description)
        .bind(&payload.location)
        .bind(payload.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    pub async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<()> {
        self.get_owned(id, owner_id).await?;
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        info!(event_id = %id, "Event deleted");
        Ok(())
    }
}
