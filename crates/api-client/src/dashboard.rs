//! Dashboard aggregation.
//!
//! The admin landing page fans out four independent fetches and merges
//! whatever comes back: an individual failure leaves that figure at its
//! zero/default value instead of failing the aggregate. The other role
//! snapshots surface their errors: those pages render the error string in
//! place of content.

use crate::client::ApiClient;
use crate::error::ApiResult;
use portal_core::models::{Appointment, Doctor, Feedback, Medication, Notification};

/// The admin landing figures, with the most recent appointments alongside.
#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct AdminDashboard {
    pub doctor_count: usize,
    pub patient_count: usize,
    pub appointment_count: usize,
    pub feedback_count: usize,
    pub recent_appointments: Vec<Appointment>,
}

fn count_or_zero<T>(label: &str, result: ApiResult<Vec<T>>) -> (usize, Vec<T>) {
    match result {
        Ok(items) => (items.len(), items),
        Err(e) => {
            tracing::warn!("{label} fetch failed, rendering zero: {e}");
            (0, Vec::new())
        }
    }
}

/// Aggregate the admin dashboard with a concurrent fan-out.
///
/// The four fetches are independent and merged with no ordering dependency.
/// The appointment list is the one call carrying the fixed request deadline.
pub async fn admin_dashboard(client: &ApiClient) -> AdminDashboard {
    let (doctors, patients, appointments, feedback) = tokio::join!(
        client.doctors(),
        client.admin_patients(),
        client.get_with_timeout::<Vec<Appointment>>("/appointments"),
        client.admin_feedback(),
    );

    let (doctor_count, _) = count_or_zero("doctor", doctors);
    let (patient_count, _) = count_or_zero("patient", patients);
    let (appointment_count, mut recent_appointments) = count_or_zero("appointment", appointments);
    let (feedback_count, _) = count_or_zero::<Feedback>("feedback", feedback);

    // Newest first; the page showed the top handful.
    recent_appointments.sort_by(|a, b| b.date.cmp(&a.date));
    recent_appointments.truncate(5);

    AdminDashboard {
        doctor_count,
        patient_count,
        appointment_count,
        feedback_count,
        recent_appointments,
    }
}

/// The doctor landing snapshot: profile plus the day's appointment list.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DoctorDay {
    pub profile: Doctor,
    pub appointments: Vec<Appointment>,
}

/// Fetch the doctor snapshot. Both calls run concurrently; either failure
/// fails the snapshot (the page renders the error and offers a retry).
pub async fn doctor_day(client: &ApiClient) -> ApiResult<DoctorDay> {
    let (profile, appointments) = tokio::join!(client.doctor_me(), client.my_appointments());
    Ok(DoctorDay {
        profile: profile?,
        appointments: appointments?,
    })
}

/// The patient landing snapshot.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PatientHome {
    pub appointments: Vec<Appointment>,
    pub medications: Vec<Medication>,
    pub notifications: Vec<Notification>,
}

/// Fetch the patient snapshot. All three calls run concurrently; either
/// failure fails the snapshot.
pub async fn patient_home(client: &ApiClient) -> ApiResult<PatientHome> {
    let (appointments, medications, notifications) = tokio::join!(
        client.my_appointments(),
        client.my_medications(),
        client.notifications(),
    );
    Ok(PatientHome {
        appointments: appointments?,
        medications: medications?,
        notifications: notifications?,
    })
}

/// The nurse landing snapshot: the ward roster and the appointment list.
#[derive(Debug, Clone, serde::Serialize)]
pub struct NurseStation {
    pub patients: Vec<portal_core::models::Patient>,
    pub appointments: Vec<Appointment>,
}

/// Fetch the nurse snapshot. Both calls run concurrently; either failure
/// fails the snapshot.
pub async fn nurse_station(client: &ApiClient) -> ApiResult<NurseStation> {
    let (patients, appointments) = tokio::join!(client.patients(), client.appointments());
    Ok(NurseStation {
        patients: patients?,
        appointments: appointments?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    #[test]
    fn count_or_zero_defaults_on_failure() {
        let failed: ApiResult<Vec<Feedback>> = Err(ApiError::Timeout);
        let (count, items) = count_or_zero("feedback", failed);
        assert_eq!(count, 0);
        assert!(items.is_empty());
    }

    #[test]
    fn count_or_zero_counts_successes() {
        let ok: ApiResult<Vec<u8>> = Ok(vec![1, 2, 3]);
        let (count, items) = count_or_zero("bytes", ok);
        assert_eq!(count, 3);
        assert_eq!(items, vec![1, 2, 3]);
    }
}
