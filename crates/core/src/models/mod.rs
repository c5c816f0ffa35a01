//! Serde mirrors of the backend response shapes.
//!
//! These records carry exactly what the pages read off the JSON payloads.
//! Fields the backend may omit are `Option`-al; the client never enforces
//! invariants the backend does not promise, and entities are created,
//! updated and deleted exclusively by the backend: the portal only mirrors
//! a snapshot per fetch.

mod appointment;
mod feedback;
mod medication;
mod notification;
mod patient;
mod staff;
mod user;

pub use appointment::Appointment;
pub use feedback::Feedback;
pub use medication::Medication;
pub use notification::Notification;
pub use patient::Patient;
pub use staff::{Doctor, Nurse};
pub use user::{PersonRef, User};
