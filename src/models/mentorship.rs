use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "mentorship_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MentorshipStatus {
    Pending,
    Accepted,
    Rejected,
}

impl std::str::FromStr for MentorshipStatus {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(MentorshipStatus::Pending),
            "accepted" => Ok(MentorshipStatus::Accepted),
            "rejected" => Ok(MentorshipStatus::Rejected),
            _ => Err(()),
        }
    }
}

/// Details carried by mentor-authored program rows (student_id is NULL
/// for these). `max_participants` is tracked but not enforced on
/// application; see DESIGN.md.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramDetails {
    pub duration: String,
    #[serde(default)]
    pub skills_offered: Vec<String>,
    pub max_participants: i64,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub current_participants: i64,
    pub is_program: bool,
}

/// Details carried by a student's application to a program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationDetails {
    pub program_id: Uuid,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Mentorship {
    pub id: Uuid,
    pub mentor_id: Uuid,
    pub student_id: Option<Uuid>,
    pub message: String,
    pub topic: String,
    pub status: MentorshipStatus,
    pub program_details: Option<Json<ProgramDetails>>,
    pub application_details: Option<Json<ApplicationDetails>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Mentorship {
    pub fn is_program(&self) -> bool {
        self.program_details
            .as_ref()
            .map(|details| details.is_program)
            .unwrap_or(false)
    }
}

/// Mentorship joined with both participants' display fields.
#[derive(Debug, Clone, FromRow)]
pub struct MentorshipWithRefs {
    pub id: Uuid,
    pub mentor_id: Uuid,
    pub student_id: Option<Uuid>,
    pub message: String,
    pub topic: String,
    pub status: MentorshipStatus,
    pub program_details: Option<Json<ProgramDetails>>,
    pub application_details: Option<Json<ApplicationDetails>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub mentor_first_name: String,
    pub mentor_last_name: String,
    pub mentor_organization: Option<String>,
    pub mentor_job_title: Option<String>,
    pub mentor_avatar: Option<String>,
    pub student_first_name: Option<String>,
    pub student_last_name: Option<String>,
    pub student_avatar: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(MentorshipStatus::Pending).unwrap(),
            serde_json::json!("pending")
        );
    }

    #[test]
    fn program_detection_requires_flag() {
        let mut mentorship = Mentorship {
            id: Uuid::new_v4(),
            mentor_id: Uuid::new_v4(),
            student_id: None,
            message: "Program".into(),
            topic: "Rust 101".into(),
            status: MentorshipStatus::Accepted,
            program_details: None,
            application_details: None,
            created_at: None,
            updated_at: None,
        };
        assert!(!mentorship.is_program());

        mentorship.program_details = Some(Json(ProgramDetails {
            duration: "8 weeks".into(),
            skills_offered: vec!["Rust".into()],
            max_participants: 10,
            requirements: vec![],
            current_participants: 0,
            is_program: true,
        }));
        assert!(mentorship.is_program());
    }
}
