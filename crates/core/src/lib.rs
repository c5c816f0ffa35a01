//! # Portal Core
//!
//! Core client-side logic for the healthcare portal.
//!
//! This crate contains the pure, backend-agnostic pieces of the portal:
//! - serde mirrors of the backend records (users, staff, appointments, …)
//! - appointment status derivation (upcoming / completed / cancelled)
//! - case-insensitive search over in-memory lists
//! - the stored session (JWT + role) and unverified claims decoding
//! - the role gate that decides whether a section may render
//!
//! **No API concerns**: HTTP calls and the notification socket belong in
//! `api-client` and `notifications`.

pub mod config;
pub mod error;
pub mod gate;
pub mod models;
pub mod search;
pub mod session;
pub mod status;

pub use config::CoreConfig;
pub use error::{PortalError, PortalResult};
pub use gate::{gate_section, RedirectReason, SectionAccess};
pub use models::{
    Appointment, Doctor, Feedback, Medication, Notification, Nurse, Patient, PersonRef, User,
};
pub use portal_types::{NonEmptyText, Role};
pub use search::{filter, matches, SearchFields};
pub use session::{Claims, Session, SessionStore};
pub use status::{categorise, filter_by_tab, AppointmentCategory, AppointmentStatus};
