use crate::models::PersonRef;
use crate::search::SearchFields;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A feedback entry as the admin review page receives one.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: Uuid,
    pub patient: Option<PersonRef>,
    pub message: String,
    pub rating: Option<u8>,
    pub created_at: Option<DateTime<Utc>>,
}

impl SearchFields for Feedback {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.message.as_str()];
        if let Some(person) = &self.patient {
            fields.extend(person.first_name.as_deref());
            fields.extend(person.last_name.as_deref());
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feedback_tolerates_missing_rating() {
        let fb: Feedback = serde_json::from_str(
            r#"{"id": "5b9d6bcd-bbfd-4b2d-9b5d-ab8dfbbd4bed", "message": "very helpful staff"}"#,
        )
        .unwrap();
        assert!(fb.rating.is_none());
        assert!(fb.patient.is_none());
    }
}
