use crate::models::PersonRef;
use crate::search::SearchFields;
use chrono::NaiveDate;
use uuid::Uuid;

/// A prescribed medication as the patient dashboard receives one.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: Uuid,
    pub name: String,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub prescribed_by: Option<PersonRef>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub instructions: Option<String>,
}

impl SearchFields for Medication {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.dosage.as_deref());
        fields.extend(self.instructions.as_deref());
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn medication_deserialises_with_prescriber() {
        let raw = r#"{
            "id": "6b9d6bcd-bbfd-4b2d-9b5d-ab8dfbbd4bed",
            "name": "Amoxicillin",
            "dosage": "500mg",
            "frequency": "3x daily",
            "prescribedBy": {"firstName": "Amara", "lastName": "Okafor"},
            "startDate": "2025-05-20"
        }"#;
        let med: Medication = serde_json::from_str(raw).unwrap();
        assert_eq!(med.name, "Amoxicillin");
        assert_eq!(med.prescribed_by.unwrap().display_name(), "Amara Okafor");
        assert!(med.end_date.is_none());
    }
}
