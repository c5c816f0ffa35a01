use crate::search::SearchFields;
use chrono::{DateTime, Utc};
use portal_types::Role;
use uuid::Uuid;

/// The authenticated identity returned by `GET /auth/me`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// "First Last", falling back to the email when names are missing.
    pub fn display_name(&self) -> String {
        display_name(
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            Some(&self.email),
        )
    }
}

impl SearchFields for User {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.email.as_str()];
        fields.extend(self.first_name.as_deref());
        fields.extend(self.last_name.as_deref());
        fields
    }
}

/// An embedded person snapshot, as the backend nests it inside appointments,
/// feedback and prescriptions (`appointment.patient.firstName`, …).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRef {
    pub id: Option<Uuid>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl PersonRef {
    pub fn display_name(&self) -> String {
        display_name(
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.email.as_deref(),
        )
    }
}

pub(crate) fn display_name(
    first: Option<&str>,
    last: Option<&str>,
    fallback: Option<&str>,
) -> String {
    match (first, last) {
        (Some(f), Some(l)) => format!("{f} {l}"),
        (Some(f), None) => f.to_owned(),
        (None, Some(l)) => l.to_owned(),
        (None, None) => fallback.unwrap_or("(unknown)").to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_deserialises_from_camel_case_payload() {
        let raw = r#"{
            "id": "7b1c6f2e-4c3d-4e5f-8a9b-0c1d2e3f4a5b",
            "email": "amara@example.org",
            "role": "doctor",
            "firstName": "Amara",
            "lastName": "Okafor"
        }"#;
        let user: User = serde_json::from_str(raw).unwrap();
        assert_eq!(user.role, Role::Doctor);
        assert_eq!(user.display_name(), "Amara Okafor");
        assert!(user.phone.is_none());
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let raw = r#"{
            "id": "7b1c6f2e-4c3d-4e5f-8a9b-0c1d2e3f4a5b",
            "email": "frontdesk@example.org",
            "role": "admin"
        }"#;
        let user: User = serde_json::from_str(raw).unwrap();
        assert_eq!(user.display_name(), "frontdesk@example.org");
    }

    #[test]
    fn person_ref_tolerates_missing_fields() {
        let person: PersonRef = serde_json::from_str(r#"{"firstName": "Jonas"}"#).unwrap();
        assert_eq!(person.display_name(), "Jonas");
    }
}
