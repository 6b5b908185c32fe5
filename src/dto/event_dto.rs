use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::event::{Event, EventStatus};
use crate::utils::time::format_date;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventPayload {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub date: String,
    #[validate(length(min = 1))]
    pub time: String,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub related_to: Option<Uuid>,
    pub related_type: Option<String>,
    pub status: Option<EventStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateEventPayload {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub status: Option<EventStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: Uuid,
    pub title: String,
    /// Always serialized as `YYYY-MM-DD`.
    pub date: String,
    pub time: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub status: EventStatus,
    pub related_to: Option<Uuid>,
    pub related_type: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        let link = event.link();
        Self {
            id: event.id,
            title: event.title,
            date: format_date(event.date),
            time: event.time,
            event_type: event.event_type,
            description: event.description,
            location: event.location,
            status: event.status,
            related_to: link.map(|l| l.id()),
            related_type: link.map(|l| l.kind().to_string()),
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn response_serializes_date_only() {
        let event = Event {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Interview: Ada Lovelace".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            time: "14:00".into(),
            event_type: "Interview".into(),
            description: None,
            location: Some("Video Call".into()),
            status: EventStatus::Upcoming,
            related_kind: Some("Application".into()),
            related_id: Some(Uuid::new_v4()),
            created_at: None,
            updated_at: None,
        };
        let response = EventResponse::from(event.clone());
        assert_eq!(response.date, "2024-03-15");
        assert_eq!(response.related_type.as_deref(), Some("Application"));
        assert_eq!(response.related_to, event.related_id);

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["status"], serde_json::json!("Upcoming"));
        assert!(value.get("relatedTo").is_some());
    }
}
