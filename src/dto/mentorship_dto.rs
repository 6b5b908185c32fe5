use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::mentorship::{
    ApplicationDetails, MentorshipStatus, MentorshipWithRefs, ProgramDetails,
};
use crate::models::user::User;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MentorsQuery {
    pub skills: Option<String>,
    pub organization: Option<String>,
    pub experience: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MentorshipListQuery {
    pub status: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProgramsQuery {
    pub skills: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMentorshipPayload {
    pub mentor_id: Option<Uuid>,
    pub message: Option<String>,
    pub topic: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMentorshipStatusPayload {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProgramPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub skills_offered: Option<Vec<String>>,
    pub max_participants: Option<i64>,
    pub requirements: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ApplyProgramPayload {
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub organization: Option<String>,
    pub job_title: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorshipResponse {
    pub id: Uuid,
    pub mentor: ParticipantSummary,
    pub student: Option<ParticipantSummary>,
    pub message: String,
    pub topic: String,
    pub status: MentorshipStatus,
    pub program_details: Option<ProgramDetails>,
    pub application_details: Option<ApplicationDetails>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<MentorshipWithRefs> for MentorshipResponse {
    fn from(row: MentorshipWithRefs) -> Self {
        let student = match (row.student_id, row.student_first_name, row.student_last_name) {
            (Some(id), Some(first_name), Some(last_name)) => Some(ParticipantSummary {
                id,
                first_name,
                last_name,
                organization: None,
                job_title: None,
                avatar: row.student_avatar,
            }),
            _ => None,
        };
        Self {
            id: row.id,
            mentor: ParticipantSummary {
                id: row.mentor_id,
                first_name: row.mentor_first_name,
                last_name: row.mentor_last_name,
                organization: row.mentor_organization,
                job_title: row.mentor_job_title,
                avatar: row.mentor_avatar,
            },
            student,
            message: row.message,
            topic: row.topic,
            status: row.status,
            program_details: row.program_details.map(|details| details.0),
            application_details: row.application_details.map(|details| details.0),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        let total_pages = if limit > 0 {
            (total + limit - 1) / limit
        } else {
            0
        };
        Self {
            total,
            page,
            limit,
            total_pages,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub organization: Option<String>,
    pub job_title: Option<String>,
    pub avatar: Option<String>,
    pub skills: Vec<String>,
    pub years_of_experience: Option<i32>,
}

impl From<User> for MentorSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            organization: user.organization,
            job_title: user.job_title,
            avatar: user.avatar,
            skills: user.skills,
            years_of_experience: user.years_of_experience,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorsResponse {
    pub mentors: Vec<MentorSummary>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorshipListResponse {
    pub mentorships: Vec<MentorshipResponse>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramsResponse {
    pub programs: Vec<MentorshipResponse>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorshipStatistics {
    pub total_requests: i64,
    pub pending_requests: i64,
    pub accepted_requests: i64,
    pub rejected_requests: i64,
    pub active_mentees: i64,
    pub active_programs: i64,
    pub recent_requests: Vec<MentorshipResponse>,
}
