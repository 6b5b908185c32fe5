use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::interview::{InterviewStatus, InterviewType, InterviewWithRefs};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePayload {
    pub application_id: Uuid,
    pub candidate_id: Uuid,
    #[validate(length(min = 1))]
    pub date: String,
    #[validate(length(min = 1))]
    pub time: String,
    pub duration: Option<i32>,
    #[serde(rename = "type")]
    pub interview_type: Option<InterviewType>,
    pub location: Option<String>,
    pub meeting_link: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateInterviewStatusPayload {
    pub status: InterviewStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReschedulePayload {
    #[validate(length(min = 1))]
    pub date: String,
    #[validate(length(min = 1))]
    pub time: String,
}

/// Flattened interview projection: related names resolved and inlined,
/// internal ids renamed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewResponse {
    pub id: Uuid,
    pub application_id: Uuid,
    pub candidate_id: Uuid,
    pub candidate_name: String,
    pub candidate_email: String,
    pub position: String,
    pub recruiter_id: Uuid,
    pub recruiter_name: String,
    pub date: String,
    pub time: String,
    pub duration: i32,
    #[serde(rename = "type")]
    pub interview_type: InterviewType,
    pub status: InterviewStatus,
    pub location: String,
    pub meeting_link: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<InterviewWithRefs> for InterviewResponse {
    fn from(row: InterviewWithRefs) -> Self {
        let candidate_name = format!("{} {}", row.candidate_first_name, row.candidate_last_name);
        let recruiter_name = format!("{} {}", row.recruiter_first_name, row.recruiter_last_name);
        Self {
            id: row.id,
            application_id: row.application_id,
            candidate_id: row.candidate_id,
            candidate_name,
            candidate_email: row.candidate_email,
            position: row.position,
            recruiter_id: row.recruiter_id,
            recruiter_name,
            date: row.date,
            time: row.time,
            duration: row.duration,
            interview_type: row.interview_type,
            status: row.status,
            location: row.location,
            meeting_link: row.meeting_link,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl InterviewResponse {
    /// List projection for the recruiter's own view; their name slot is
    /// left empty, matching the platform's list contract.
    pub fn for_recruiter_list(row: InterviewWithRefs) -> Self {
        let mut response = Self::from(row);
        response.recruiter_name = String::new();
        response
    }

    /// List projection for the candidate's own view.
    pub fn for_student_list(row: InterviewWithRefs) -> Self {
        let mut response = Self::from(row);
        response.candidate_name = String::new();
        response
    }
}
