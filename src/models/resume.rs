use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub linkedin: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub summary: String,
}

impl Default for PersonalInfo {
    fn default() -> Self {
        Self {
            name: "Your Name".to_string(),
            email: "your.email@example.com".to_string(),
            phone: String::new(),
            address: String::new(),
            linkedin: String::new(),
            website: String::new(),
            summary: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Resume {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    /// Uploaded file payload, base64-encoded. Resumes created from
    /// structured data carry no file.
    pub file_data: Option<String>,
    pub personal_info: Json<PersonalInfo>,
    pub education: JsonValue,
    pub experience: JsonValue,
    pub skills: JsonValue,
    pub projects: JsonValue,
    pub certifications: JsonValue,
    pub last_updated: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn personal_info_defaults_are_placeholders() {
        let info = PersonalInfo::default();
        assert_eq!(info.name, "Your Name");
        assert_eq!(info.email, "your.email@example.com");
        assert!(info.phone.is_empty());
    }

    #[test]
    fn personal_info_tolerates_partial_json() {
        let info: PersonalInfo =
            serde_json::from_value(serde_json::json!({"name": "Ada", "email": "a@b.c"})).unwrap();
        assert_eq!(info.name, "Ada");
        assert!(info.linkedin.is_empty());
    }
}
