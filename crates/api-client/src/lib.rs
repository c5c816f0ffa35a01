//! # API client
//!
//! REST consumer for the portal backend.
//!
//! Handles:
//! - JSON requests with `Authorization: Bearer <jwt>` once logged in
//! - the endpoint surface the dashboards use (auth, rosters, appointments,
//!   feedback, medications, notifications)
//! - per-call error mapping with no retry policy of its own: retry is a
//!   manual re-invocation by the caller
//!
//! Uses `portal-core` for the record shapes and configuration.

#![warn(rust_2018_idioms)]

mod client;
mod dashboard;
mod error;

pub use client::{
    ApiClient, BookAppointmentRequest, DoctorProfileUpdate, LoginResponse,
    SubmitFeedbackRequest, UpdateAppointmentRequest,
};
pub use dashboard::{
    admin_dashboard, doctor_day, nurse_station, patient_home, AdminDashboard, DoctorDay,
    NurseStation, PatientHome,
};
pub use error::{ApiError, ApiResult};
