use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const EVENT_TYPE_INTERVIEW: &str = "Interview";
pub const EVENT_TYPE_OTHER: &str = "Other";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_status")]
pub enum EventStatus {
    Upcoming,
    Completed,
}

impl Default for EventStatus {
    fn default() -> Self {
        EventStatus::Upcoming
    }
}

/// Typed link from a calendar event to the entity it was created for.
/// Only applications are linked today; adding a variant forces every
/// match site to handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id")]
pub enum EventLink {
    Application(Uuid),
}

impl EventLink {
    pub const KIND_APPLICATION: &'static str = "Application";

    pub fn kind(&self) -> &'static str {
        match self {
            EventLink::Application(_) => Self::KIND_APPLICATION,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            EventLink::Application(id) => *id,
        }
    }

    /// Rebuilds the link from its two storage columns. Both must be
    /// present together (enforced by a table constraint).
    pub fn from_columns(kind: Option<&str>, id: Option<Uuid>) -> Option<Self> {
        match (kind, id) {
            (Some(Self::KIND_APPLICATION), Some(id)) => Some(EventLink::Application(id)),
            _ => None,
        }
    }

    pub fn parse(kind: &str, id: Uuid) -> Option<Self> {
        Self::from_columns(Some(kind), Some(id))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub time: String,
    pub event_type: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub status: EventStatus,
    pub related_kind: Option<String>,
    pub related_id: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Event {
    pub fn link(&self) -> Option<EventLink> {
        EventLink::from_columns(self.related_kind.as_deref(), self.related_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_roundtrips_through_columns() {
        let id = Uuid::new_v4();
        let link = EventLink::Application(id);
        assert_eq!(link.kind(), "Application");
        assert_eq!(
            EventLink::from_columns(Some(link.kind()), Some(link.id())),
            Some(link)
        );
    }

    #[test]
    fn link_requires_both_columns() {
        assert_eq!(EventLink::from_columns(Some("Application"), None), None);
        assert_eq!(EventLink::from_columns(None, Some(Uuid::new_v4())), None);
    }

    #[test]
    fn unknown_kind_yields_no_link() {
        assert_eq!(
            EventLink::from_columns(Some("Opportunity"), Some(Uuid::new_v4())),
            None
        );
    }
}
