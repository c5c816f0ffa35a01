use crate::search::SearchFields;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// A patient as the admin roster and nurse station receive one.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub blood_group: Option<String>,
    pub address: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Patient {
    pub fn display_name(&self) -> String {
        super::user::display_name(
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.email.as_deref(),
        )
    }
}

impl SearchFields for Patient {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = Vec::new();
        fields.extend(self.first_name.as_deref());
        fields.extend(self.last_name.as_deref());
        fields.extend(self.email.as_deref());
        fields.extend(self.phone.as_deref());
        fields
    }
}
