//! The typed REST client.

use crate::error::{ApiError, ApiResult};
use chrono::{DateTime, Utc};
use portal_core::models::{
    Appointment, Doctor, Feedback, Medication, Notification, Nurse, Patient, User,
};
use portal_core::status::AppointmentStatus;
use portal_core::CoreConfig;
use portal_types::Role;
use serde::de::DeserializeOwned;
use std::time::Duration;
use uuid::Uuid;

/// What `POST /auth/login` returns.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Body for `POST /appointments`.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentRequest {
    pub doctor_id: Uuid,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Body for `PUT /appointments/{id}`. Only the provided fields change.
#[derive(Debug, Clone, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body for `POST /feedback`.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

/// Body for `PUT /doctor/me`. Only the provided fields change.
#[derive(Debug, Clone, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

/// Backend error payloads carry a `message` field when they carry anything.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// REST client for the portal backend.
///
/// One instance per process; endpoints borrow it. The bearer token is
/// attached to every request once set. No call is retried automatically.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    stats_timeout: Duration,
}

impl ApiClient {
    /// Create an unauthenticated client from the startup configuration.
    pub fn new(cfg: &CoreConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: cfg.api_base_url().to_owned(),
            token: None,
            stats_timeout: cfg.request_timeout(),
        }
    }

    /// Create a client that sends `token` as a bearer credential.
    pub fn with_token(cfg: &CoreConfig, token: impl Into<String>) -> Self {
        let mut client = Self::new(cfg);
        client.token = Some(token.into());
        client
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn handle<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_owned()
                });
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        response.json().await.map_err(ApiError::Decode)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        tracing::debug!("GET {path}");
        let response = self
            .authed(self.http.get(self.url(path)))
            .send()
            .await
            .map_err(ApiError::from_transport)?;
        Self::handle(response).await
    }

    /// Like [`get`](Self::get), with the fixed per-request deadline used by
    /// the dashboard stats fetch.
    pub(crate) async fn get_with_timeout<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        tracing::debug!("GET {path} (timeout {:?})", self.stats_timeout);
        let response = self
            .authed(self.http.get(self.url(path)))
            .timeout(self.stats_timeout)
            .send()
            .await
            .map_err(ApiError::from_transport)?;
        Self::handle(response).await
    }

    async fn post<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        tracing::debug!("POST {path}");
        let response = self
            .authed(self.http.post(self.url(path)).json(body))
            .send()
            .await
            .map_err(ApiError::from_transport)?;
        Self::handle(response).await
    }

    async fn put<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        tracing::debug!("PUT {path}");
        let response = self
            .authed(self.http.put(self.url(path)).json(body))
            .send()
            .await
            .map_err(ApiError::from_transport)?;
        Self::handle(response).await
    }

    // --- auth ---

    /// `POST /auth/login`. On success the returned token is installed on
    /// this client for subsequent calls.
    pub async fn login(&mut self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let response: LoginResponse = self
            .post("/auth/login", &LoginRequest { email, password })
            .await?;
        self.token = Some(response.token.clone());
        tracing::info!("logged in as {}", response.role);
        Ok(response)
    }

    /// `GET /auth/me`: the authenticated identity.
    pub async fn me(&self) -> ApiResult<User> {
        self.get("/auth/me").await
    }

    // --- rosters ---

    /// `GET /patients/admin/patients`: the admin patient roster.
    pub async fn admin_patients(&self) -> ApiResult<Vec<Patient>> {
        self.get("/patients/admin/patients").await
    }

    /// `GET /patients`: the roster the nurse station reads.
    pub async fn patients(&self) -> ApiResult<Vec<Patient>> {
        self.get("/patients").await
    }

    /// `GET /doctors`.
    pub async fn doctors(&self) -> ApiResult<Vec<Doctor>> {
        self.get("/doctors").await
    }

    /// `GET /nurses`.
    pub async fn nurses(&self) -> ApiResult<Vec<Nurse>> {
        self.get("/nurses").await
    }

    // --- appointments ---

    /// `GET /appointments`: every appointment the caller may see.
    pub async fn appointments(&self) -> ApiResult<Vec<Appointment>> {
        self.get("/appointments").await
    }

    /// `GET /appointments/mine`: the caller's own appointments.
    pub async fn my_appointments(&self) -> ApiResult<Vec<Appointment>> {
        self.get("/appointments/mine").await
    }

    /// `POST /appointments`.
    pub async fn book_appointment(&self, req: &BookAppointmentRequest) -> ApiResult<Appointment> {
        self.post("/appointments", req).await
    }

    /// `PUT /appointments/{id}`.
    pub async fn update_appointment(
        &self,
        id: Uuid,
        req: &UpdateAppointmentRequest,
    ) -> ApiResult<Appointment> {
        self.put(&format!("/appointments/{id}"), req).await
    }

    /// `PUT /appointments/{id}/cancel`.
    pub async fn cancel_appointment(&self, id: Uuid) -> ApiResult<Appointment> {
        self.put(&format!("/appointments/{id}/cancel"), &serde_json::json!({}))
            .await
    }

    // --- doctor profile ---

    /// `GET /doctor/me`.
    pub async fn doctor_me(&self) -> ApiResult<Doctor> {
        self.get("/doctor/me").await
    }

    /// `PUT /doctor/me`.
    pub async fn update_doctor_me(&self, req: &DoctorProfileUpdate) -> ApiResult<Doctor> {
        self.put("/doctor/me", req).await
    }

    // --- feedback ---

    /// `GET /feedback/admin`: all feedback, for the admin review page.
    pub async fn admin_feedback(&self) -> ApiResult<Vec<Feedback>> {
        self.get("/feedback/admin").await
    }

    /// `GET /feedback/mine`.
    pub async fn my_feedback(&self) -> ApiResult<Vec<Feedback>> {
        self.get("/feedback/mine").await
    }

    /// `POST /feedback`.
    pub async fn submit_feedback(&self, req: &SubmitFeedbackRequest) -> ApiResult<Feedback> {
        self.post("/feedback", req).await
    }

    // --- medications ---

    /// `GET /medications/mine`.
    pub async fn my_medications(&self) -> ApiResult<Vec<Medication>> {
        self.get("/medications/mine").await
    }

    // --- notifications ---

    /// `GET /notifications`.
    pub async fn notifications(&self) -> ApiResult<Vec<Notification>> {
        self.get("/notifications").await
    }

    /// `PUT /notifications/{id}/read`.
    pub async fn mark_notification_read(&self, id: Uuid) -> ApiResult<Notification> {
        self.put(&format!("/notifications/{id}/read"), &serde_json::json!({}))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn cfg() -> CoreConfig {
        CoreConfig::new(
            "http://localhost:5000/api/".into(),
            None,
            PathBuf::from("/tmp/session.json"),
            Duration::from_secs(30),
        )
        .unwrap()
    }

    #[test]
    fn url_joins_without_double_slashes() {
        let client = ApiClient::new(&cfg());
        assert_eq!(
            client.url("/auth/login"),
            "http://localhost:5000/api/auth/login"
        );
        assert_eq!(client.url("doctors"), "http://localhost:5000/api/doctors");
    }

    #[test]
    fn book_request_serialises_camel_case_and_skips_absent_reason() {
        let req = BookAppointmentRequest {
            doctor_id: Uuid::nil(),
            date: "2025-06-03T09:30:00Z".parse().unwrap(),
            reason: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("doctorId").is_some());
        assert!(json.get("reason").is_none());
    }

    #[test]
    fn update_request_sends_only_what_changed() {
        let req = UpdateAppointmentRequest {
            status: Some(AppointmentStatus::Completed),
            ..Default::default()
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"status": "completed"}));
    }

    #[test]
    fn login_response_parses_wire_shape() {
        let response: LoginResponse =
            serde_json::from_str(r#"{"token": "a.b.c", "role": "admin"}"#).unwrap();
        assert_eq!(response.role, Role::Admin);
        assert_eq!(response.token, "a.b.c");
    }
}
