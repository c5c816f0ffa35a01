use crate::search::SearchFields;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A doctor as the directory and profile pages receive one.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub specialization: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub available: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Doctor {
    pub fn display_name(&self) -> String {
        super::user::display_name(
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.email.as_deref(),
        )
    }
}

impl SearchFields for Doctor {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = Vec::new();
        fields.extend(self.first_name.as_deref());
        fields.extend(self.last_name.as_deref());
        fields.extend(self.email.as_deref());
        fields.extend(self.specialization.as_deref());
        fields.extend(self.department.as_deref());
        fields
    }
}

/// A nurse as the directory pages receive one.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nurse {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub shift: Option<String>,
    pub phone: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Nurse {
    pub fn display_name(&self) -> String {
        super::user::display_name(
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.email.as_deref(),
        )
    }
}

impl SearchFields for Nurse {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = Vec::new();
        fields.extend(self.first_name.as_deref());
        fields.extend(self.last_name.as_deref());
        fields.extend(self.email.as_deref());
        fields.extend(self.department.as_deref());
        fields
    }
}
