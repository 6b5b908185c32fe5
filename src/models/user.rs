use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const ROLE_STUDENT: &str = "student";
pub const ROLE_RECRUITER: &str = "recruiter";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub organization: Option<String>,
    pub job_title: Option<String>,
    pub avatar: Option<String>,
    pub skills: Vec<String>,
    pub years_of_experience: Option<i32>,
    pub last_active: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_joins_first_and_last() {
        let user = User {
            id: Uuid::new_v4(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            role: ROLE_STUDENT.into(),
            organization: None,
            job_title: None,
            avatar: None,
            skills: vec![],
            years_of_experience: None,
            last_active: None,
            created_at: None,
        };
        assert_eq!(user.full_name(), "Ada Lovelace");
    }
}
