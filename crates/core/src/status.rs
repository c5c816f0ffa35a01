//! Appointment status derivation.
//!
//! The backend stores a status string on each appointment; the portal renders
//! a category derived from that status and the current wall-clock time. The
//! derivation is a pure mapping from `(status, date, now)` to a category -
//! there are no transitions and nothing is persisted.

use crate::models::Appointment;
use chrono::{DateTime, Utc};

/// Stored appointment status, as the backend serialises it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Scheduled,
    Rescheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Whether the status still counts towards "upcoming" when the date is in
    /// the future.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Pending
                | AppointmentStatus::Confirmed
                | AppointmentStatus::Scheduled
                | AppointmentStatus::Rescheduled
        )
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Rescheduled => "rescheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = crate::PortalError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            "rescheduled" => Ok(AppointmentStatus::Rescheduled),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(crate::PortalError::InvalidInput(format!(
                "unknown appointment status: {other}"
            ))),
        }
    }
}

/// Rendered appointment category. This is what the dashboard tabs show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentCategory {
    Upcoming,
    Completed,
    Cancelled,
}

impl std::fmt::Display for AppointmentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AppointmentCategory::Upcoming => "upcoming",
            AppointmentCategory::Completed => "completed",
            AppointmentCategory::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for AppointmentCategory {
    type Err = crate::PortalError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "upcoming" => Ok(AppointmentCategory::Upcoming),
            "completed" => Ok(AppointmentCategory::Completed),
            "cancelled" => Ok(AppointmentCategory::Cancelled),
            other => Err(crate::PortalError::InvalidInput(format!(
                "unknown tab: {other} (expected upcoming, completed or cancelled)"
            ))),
        }
    }
}

/// Derive the rendered category for an appointment.
///
/// - `cancelled` is cancelled regardless of date;
/// - an active status (pending, confirmed, scheduled, rescheduled) with a
///   date strictly in the future is upcoming;
/// - everything else is completed. A date exactly equal to `now` is not
///   "upcoming".
pub fn categorise(
    status: AppointmentStatus,
    date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> AppointmentCategory {
    if status == AppointmentStatus::Cancelled {
        return AppointmentCategory::Cancelled;
    }
    if status.is_active() && date > now {
        return AppointmentCategory::Upcoming;
    }
    AppointmentCategory::Completed
}

/// Keep exactly the appointments whose derived category matches `tab`,
/// preserving order.
pub fn filter_by_tab<'a>(
    appointments: &'a [Appointment],
    tab: AppointmentCategory,
    now: DateTime<Utc>,
) -> Vec<&'a Appointment> {
    appointments
        .iter()
        .filter(|a| categorise(a.status, a.date, now) == tab)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Appointment;
    use chrono::{Duration, TimeZone};

    fn at(now: DateTime<Utc>, offset_hours: i64) -> DateTime<Utc> {
        now + Duration::hours(offset_hours)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn appointment(status: AppointmentStatus, date: DateTime<Utc>) -> Appointment {
        Appointment {
            id: uuid::Uuid::new_v4(),
            patient: None,
            doctor: None,
            date,
            status,
            reason: None,
            notes: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn active_status_with_future_date_is_upcoming() {
        let now = now();
        for status in [
            AppointmentStatus::Pending,
            AppointmentStatus::Confirmed,
            AppointmentStatus::Scheduled,
            AppointmentStatus::Rescheduled,
        ] {
            assert_eq!(
                categorise(status, at(now, 2), now),
                AppointmentCategory::Upcoming,
                "status {status} should be upcoming"
            );
        }
    }

    #[test]
    fn active_status_with_past_date_is_completed() {
        let now = now();
        for status in [
            AppointmentStatus::Pending,
            AppointmentStatus::Confirmed,
            AppointmentStatus::Scheduled,
            AppointmentStatus::Rescheduled,
        ] {
            assert_eq!(
                categorise(status, at(now, -2), now),
                AppointmentCategory::Completed,
                "status {status} should be completed"
            );
        }
    }

    #[test]
    fn cancelled_wins_regardless_of_date() {
        let now = now();
        assert_eq!(
            categorise(AppointmentStatus::Cancelled, at(now, 5), now),
            AppointmentCategory::Cancelled
        );
        assert_eq!(
            categorise(AppointmentStatus::Cancelled, at(now, -5), now),
            AppointmentCategory::Cancelled
        );
    }

    #[test]
    fn explicit_completed_status_is_completed_even_in_future() {
        let now = now();
        assert_eq!(
            categorise(AppointmentStatus::Completed, at(now, 5), now),
            AppointmentCategory::Completed
        );
    }

    #[test]
    fn date_equal_to_now_is_not_upcoming() {
        let now = now();
        assert_eq!(
            categorise(AppointmentStatus::Scheduled, now, now),
            AppointmentCategory::Completed
        );
    }

    #[test]
    fn tab_filter_returns_exactly_the_upcoming_entry() {
        let now = now();
        let list = vec![
            appointment(AppointmentStatus::Scheduled, at(now, 3)),
            appointment(AppointmentStatus::Scheduled, at(now, -3)),
        ];
        let upcoming = filter_by_tab(&list, AppointmentCategory::Upcoming, now);
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].id, list[0].id);
    }

    #[test]
    fn status_round_trips_through_wire_form() {
        let json = serde_json::to_string(&AppointmentStatus::Rescheduled).unwrap();
        assert_eq!(json, "\"rescheduled\"");
        let parsed: AppointmentStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, AppointmentStatus::Rescheduled);
    }

    #[test]
    fn tab_parses_case_insensitively() {
        use std::str::FromStr;
        assert_eq!(
            AppointmentCategory::from_str("Upcoming").unwrap(),
            AppointmentCategory::Upcoming
        );
        assert!(AppointmentCategory::from_str("missed").is_err());
    }
}
