use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::models::resume::PersonalInfo;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateResumePayload {
    pub title: Option<String>,
    pub personal_info: Option<PersonalInfoPayload>,
    pub education: Option<JsonValue>,
    pub experience: Option<JsonValue>,
    pub skills: Option<JsonValue>,
    pub projects: Option<JsonValue>,
    pub certifications: Option<JsonValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PersonalInfoPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub linkedin: Option<String>,
    pub website: Option<String>,
    pub summary: Option<String>,
}

impl PersonalInfoPayload {
    /// Fills placeholders for the required fields and merges the rest
    /// over an existing record.
    pub fn merge_into(self, mut current: PersonalInfo) -> PersonalInfo {
        if let Some(name) = self.name.filter(|n| !n.is_empty()) {
            current.name = name;
        }
        if let Some(email) = self.email.filter(|e| !e.is_empty()) {
            current.email = email;
        }
        if let Some(phone) = self.phone {
            current.phone = phone;
        }
        if let Some(address) = self.address {
            current.address = address;
        }
        if let Some(linkedin) = self.linkedin {
            current.linkedin = linkedin;
        }
        if let Some(website) = self.website {
            current.website = website;
        }
        if let Some(summary) = self.summary {
            current.summary = summary;
        }
        current
    }

    pub fn sanitized(self) -> PersonalInfo {
        self.merge_into(PersonalInfo::default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateResumePayload {
    pub title: Option<String>,
    pub personal_info: Option<PersonalInfoPayload>,
    pub education: Option<JsonValue>,
    pub experience: Option<JsonValue>,
    pub skills: Option<JsonValue>,
    pub projects: Option<JsonValue>,
    pub certifications: Option<JsonValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_fills_required_placeholders() {
        let info = PersonalInfoPayload {
            phone: Some("555-0100".into()),
            ..Default::default()
        }
        .sanitized();
        assert_eq!(info.name, "Your Name");
        assert_eq!(info.email, "your.email@example.com");
        assert_eq!(info.phone, "555-0100");
    }

    #[test]
    fn merge_keeps_existing_when_incoming_is_empty() {
        let current = PersonalInfo {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            ..Default::default()
        };
        let merged = PersonalInfoPayload {
            name: Some(String::new()),
            summary: Some("Systems programmer".into()),
            ..Default::default()
        }
        .merge_into(current);
        assert_eq!(merged.name, "Ada");
        assert_eq!(merged.summary, "Systems programmer");
    }
}
