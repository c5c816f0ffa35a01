use crate::models::PersonRef;
use crate::search::SearchFields;
use crate::status::{categorise, AppointmentCategory, AppointmentStatus};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// An appointment as every dashboard receives one.
///
/// The participant snapshots are optional: the doctor view omits `doctor`,
/// the patient view omits `patient`, and older records may carry neither.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub patient: Option<PersonRef>,
    pub doctor: Option<PersonRef>,
    pub date: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Appointment {
    /// The rendered category at `now`.
    pub fn category(&self, now: DateTime<Utc>) -> AppointmentCategory {
        categorise(self.status, self.date, now)
    }

    pub fn patient_name(&self) -> String {
        self.patient
            .as_ref()
            .map(PersonRef::display_name)
            .unwrap_or_else(|| "(unknown)".into())
    }

    pub fn doctor_name(&self) -> String {
        self.doctor
            .as_ref()
            .map(PersonRef::display_name)
            .unwrap_or_else(|| "(unknown)".into())
    }
}

impl SearchFields for Appointment {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = Vec::new();
        for person in [self.patient.as_ref(), self.doctor.as_ref()].into_iter().flatten() {
            fields.extend(person.first_name.as_deref());
            fields.extend(person.last_name.as_deref());
            fields.extend(person.email.as_deref());
        }
        fields.extend(self.reason.as_deref());
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search;

    #[test]
    fn appointment_deserialises_nested_participants() {
        let raw = r#"{
            "id": "4b9d6bcd-bbfd-4b2d-9b5d-ab8dfbbd4bed",
            "patient": {"firstName": "Lena", "lastName": "Moreau"},
            "doctor": {"firstName": "Amara", "lastName": "Okafor"},
            "date": "2025-06-03T09:30:00Z",
            "status": "confirmed",
            "reason": "follow-up"
        }"#;
        let appointment: Appointment = serde_json::from_str(raw).unwrap();
        assert_eq!(appointment.status, AppointmentStatus::Confirmed);
        assert_eq!(appointment.patient_name(), "Lena Moreau");
        assert_eq!(appointment.doctor_name(), "Amara Okafor");
    }

    #[test]
    fn search_matches_participant_names_and_reason() {
        let raw = r#"[{
            "id": "4b9d6bcd-bbfd-4b2d-9b5d-ab8dfbbd4bed",
            "patient": {"firstName": "Lena", "lastName": "Moreau"},
            "date": "2025-06-03T09:30:00Z",
            "status": "pending",
            "reason": "annual check"
        }]"#;
        let list: Vec<Appointment> = serde_json::from_str(raw).unwrap();
        assert_eq!(search::filter("moreau", &list).len(), 1);
        assert_eq!(search::filter("annual", &list).len(), 1);
        assert!(search::filter("okafor", &list).is_empty());
    }
}
