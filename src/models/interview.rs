use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "interview_type")]
pub enum InterviewType {
    Screening,
    Technical,
    #[serde(rename = "HR Round")]
    #[sqlx(rename = "HR Round")]
    HrRound,
    #[serde(rename = "Final Round")]
    #[sqlx(rename = "Final Round")]
    FinalRound,
}

impl Default for InterviewType {
    fn default() -> Self {
        InterviewType::Technical
    }
}

impl std::fmt::Display for InterviewType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            InterviewType::Screening => "Screening",
            InterviewType::Technical => "Technical",
            InterviewType::HrRound => "HR Round",
            InterviewType::FinalRound => "Final Round",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "interview_status")]
pub enum InterviewStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    Rescheduled,
}

impl Default for InterviewStatus {
    fn default() -> Self {
        InterviewStatus::Scheduled
    }
}

/// An interview is created only through the scheduling workflow and is
/// never deleted; status updates and reschedules mutate it in place.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Interview {
    pub id: Uuid,
    pub application_id: Uuid,
    pub candidate_id: Uuid,
    pub recruiter_id: Uuid,
    pub opportunity_id: Uuid,
    pub date: String,
    pub time: String,
    pub duration: i32,
    pub interview_type: InterviewType,
    pub status: InterviewStatus,
    pub location: String,
    pub meeting_link: Option<String>,
    pub notes: Option<String>,
    pub idempotency_key: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Interview joined with the names the flattened API projection needs.
#[derive(Debug, Clone, FromRow)]
pub struct InterviewWithRefs {
    pub id: Uuid,
    pub application_id: Uuid,
    pub candidate_id: Uuid,
    pub recruiter_id: Uuid,
    pub opportunity_id: Uuid,
    pub date: String,
    pub time: String,
    pub duration: i32,
    pub interview_type: InterviewType,
    pub status: InterviewStatus,
    pub location: String,
    pub meeting_link: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub candidate_first_name: String,
    pub candidate_last_name: String,
    pub candidate_email: String,
    pub recruiter_first_name: String,
    pub recruiter_last_name: String,
    pub position: String,
}
