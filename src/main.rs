//! Portal shell binary.
//!
//! Runs the logged-in user's dashboard the way the browser app did: a
//! periodic snapshot refresh for the configured section, concurrently with
//! the notification stream. A failed refresh keeps the previous snapshot; a
//! failed socket leaves the refresh loop running alone.
//!
//! # Environment Variables
//! - `PORTAL_API_URL`: backend base URL (default: "http://localhost:5000/api")
//! - `PORTAL_WS_URL`: notification socket URL (default: derived from the API base)
//! - `PORTAL_DATA_DIR`: where the session file lives (default: ".portal")
//! - `PORTAL_SESSION_FILE`: session file override
//! - `PORTAL_SECTION`: which section to run (default: "patient")
//! - `PORTAL_REFRESH_SECS`: refresh period (default: 30)
//! - `PORTAL_REQUEST_TIMEOUT_SECS`: deadline for the dashboard stats fetch (default: 30)

use std::path::Path;
use std::time::Duration;

use api_client::ApiClient;
use chrono::Utc;
use notifications::NotificationStream;
use portal_core::config::{
    request_timeout_from_env_value, session_file_from_env_value, DEFAULT_API_URL,
};
use portal_core::status::AppointmentCategory;
use portal_core::{filter_by_tab, gate_section, CoreConfig, SectionAccess, SessionStore};
use portal_types::Role;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("portal_run=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api_base_url =
        std::env::var("PORTAL_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
    let ws_url = std::env::var("PORTAL_WS_URL").ok();
    let data_dir = std::env::var("PORTAL_DATA_DIR").unwrap_or_else(|_| ".portal".into());
    let session_file =
        session_file_from_env_value(std::env::var("PORTAL_SESSION_FILE").ok(), Path::new(&data_dir));
    let request_timeout =
        request_timeout_from_env_value(std::env::var("PORTAL_REQUEST_TIMEOUT_SECS").ok())?;
    let cfg = CoreConfig::new(api_base_url, ws_url, session_file, request_timeout)?;

    let section: Role = std::env::var("PORTAL_SECTION")
        .unwrap_or_else(|_| "patient".into())
        .parse()?;
    let refresh_period = Duration::from_secs(
        std::env::var("PORTAL_REFRESH_SECS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(30),
    );

    tracing::info!("-- Starting portal shell for the {section} section");
    tracing::info!("-- Backend {} / socket {}", cfg.api_base_url(), cfg.ws_url());

    let store = SessionStore::new(cfg.session_file());
    let token = match gate_section(section, &store, Utc::now()) {
        SectionAccess::Allow { .. } => store.load()?.token,
        SectionAccess::RedirectToLogin { reason } => {
            anyhow::bail!("{reason}: run `portal login` first");
        }
    };

    let client = ApiClient::with_token(&cfg, token.clone());
    let ws_url = cfg.ws_url().to_owned();

    let notification_task = tokio::spawn(async move {
        notification_loop(&ws_url, &token).await;
    });

    refresh_loop(&client, section, refresh_period).await;

    notification_task.await.map_err(anyhow::Error::from)?;
    Ok(())
}

/// Periodically re-fetch the section's snapshot. A failed refresh logs and
/// keeps the previous snapshot in place: the next tick tries again.
async fn refresh_loop(client: &ApiClient, section: Role, period: Duration) {
    let mut interval = tokio::time::interval(period);
    loop {
        interval.tick().await;
        match section {
            Role::Admin => {
                let dashboard = api_client::admin_dashboard(client).await;
                tracing::info!(
                    "admin dashboard: {} doctors, {} patients, {} appointments, {} feedback",
                    dashboard.doctor_count,
                    dashboard.patient_count,
                    dashboard.appointment_count,
                    dashboard.feedback_count
                );
            }
            Role::Doctor => match api_client::doctor_day(client).await {
                Ok(day) => {
                    let upcoming = filter_by_tab(
                        &day.appointments,
                        AppointmentCategory::Upcoming,
                        Utc::now(),
                    );
                    tracing::info!(
                        "{}: {} appointments, {} upcoming",
                        day.profile.display_name(),
                        day.appointments.len(),
                        upcoming.len()
                    );
                }
                Err(e) => tracing::warn!("refresh failed, keeping previous snapshot: {e}"),
            },
            Role::Nurse => match api_client::nurse_station(client).await {
                Ok(station) => tracing::info!(
                    "nurse station: {} patients, {} appointments",
                    station.patients.len(),
                    station.appointments.len()
                ),
                Err(e) => tracing::warn!("refresh failed, keeping previous snapshot: {e}"),
            },
            Role::Patient => match api_client::patient_home(client).await {
                Ok(home) => {
                    let unread = home.notifications.iter().filter(|n| !n.read).count();
                    tracing::info!(
                        "patient home: {} appointments, {} medications, {} unread notifications",
                        home.appointments.len(),
                        home.medications.len(),
                        unread
                    );
                }
                Err(e) => tracing::warn!("refresh failed, keeping previous snapshot: {e}"),
            },
        }
    }
}

/// Consume the notification socket until it closes. Connection failure is
/// logged and the shell carries on without push updates.
async fn notification_loop(ws_url: &str, token: &str) {
    let mut stream = match NotificationStream::connect(ws_url, token).await {
        Ok(stream) => stream,
        Err(e) => {
            tracing::warn!("notification socket unavailable: {e}");
            return;
        }
    };
    while let Some(event) = stream.next().await {
        match event {
            Ok(notification) => match &notification.title {
                Some(title) => tracing::info!("notification: {title}: {}", notification.message),
                None => tracing::info!("notification: {}", notification.message),
            },
            Err(e) => tracing::warn!("notification error: {e}"),
        }
    }
    tracing::info!("notification stream ended");
}
