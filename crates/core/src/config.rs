//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the
//! client and CLI. The intent is to avoid reading process-wide environment
//! variables during request handling, which can lead to inconsistent behaviour
//! in multi-threaded runtimes and test harnesses.

use crate::{PortalError, PortalResult};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default backend base URL when `PORTAL_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Default per-request timeout in seconds when `PORTAL_REQUEST_TIMEOUT_SECS`
/// is not set. Applied to the dashboard stats fetch only.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

const SESSION_FILE_NAME: &str = "session.json";

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    api_base_url: String,
    ws_url: String,
    session_file: PathBuf,
    request_timeout: Duration,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// The API base URL is normalised by stripping a trailing slash so that
    /// endpoint paths can always be joined with a leading one.
    pub fn new(
        api_base_url: String,
        ws_url: Option<String>,
        session_file: PathBuf,
        request_timeout: Duration,
    ) -> PortalResult<Self> {
        let api_base_url = api_base_url.trim().trim_end_matches('/').to_owned();
        if api_base_url.is_empty() {
            return Err(PortalError::InvalidInput(
                "api_base_url cannot be empty".into(),
            ));
        }

        let ws_url = match ws_url {
            Some(url) if !url.trim().is_empty() => url.trim().to_owned(),
            _ => ws_url_from_api_base(&api_base_url),
        };

        Ok(Self {
            api_base_url,
            ws_url,
            session_file,
            request_timeout,
        })
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn ws_url(&self) -> &str {
        &self.ws_url
    }

    pub fn session_file(&self) -> &Path {
        &self.session_file
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

/// Derive the notification socket URL from the API base URL.
///
/// `http(s)://host/api` becomes `ws(s)://host/ws`; anything without a scheme
/// is left alone apart from the `/ws` path.
pub fn ws_url_from_api_base(api_base_url: &str) -> String {
    let stripped = api_base_url.trim_end_matches('/');
    let without_api = stripped.strip_suffix("/api").unwrap_or(stripped);

    if let Some(rest) = without_api.strip_prefix("https://") {
        format!("wss://{}/ws", rest)
    } else if let Some(rest) = without_api.strip_prefix("http://") {
        format!("ws://{}/ws", rest)
    } else {
        format!("{}/ws", without_api)
    }
}

/// Resolve the session file path from an optional `PORTAL_SESSION_FILE`
/// override, falling back to `<data_dir>/session.json`.
pub fn session_file_from_env_value(
    override_path: Option<String>,
    data_dir: &Path,
) -> PathBuf {
    match override_path {
        Some(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => data_dir.join(SESSION_FILE_NAME),
    }
}

/// Parse the request timeout from an optional `PORTAL_REQUEST_TIMEOUT_SECS`
/// environment value.
pub fn request_timeout_from_env_value(value: Option<String>) -> PortalResult<Duration> {
    match value {
        None => Ok(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
        Some(raw) => {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                PortalError::InvalidInput(format!(
                    "PORTAL_REQUEST_TIMEOUT_SECS must be a whole number of seconds, got {raw:?}"
                ))
            })?;
            if secs == 0 {
                return Err(PortalError::InvalidInput(
                    "PORTAL_REQUEST_TIMEOUT_SECS cannot be zero".into(),
                ));
            }
            Ok(Duration::from_secs(secs))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(api: &str, ws: Option<&str>) -> CoreConfig {
        CoreConfig::new(
            api.to_owned(),
            ws.map(str::to_owned),
            PathBuf::from("/tmp/session.json"),
            Duration::from_secs(30),
        )
        .unwrap()
    }

    #[test]
    fn strips_trailing_slash_from_api_base() {
        assert_eq!(
            cfg("http://localhost:5000/api/", None).api_base_url(),
            "http://localhost:5000/api"
        );
    }

    #[test]
    fn rejects_empty_api_base() {
        let err = CoreConfig::new(
            "  ".into(),
            None,
            PathBuf::from("/tmp/session.json"),
            Duration::from_secs(30),
        );
        assert!(err.is_err());
    }

    #[test]
    fn derives_ws_url_when_not_overridden() {
        assert_eq!(cfg("http://localhost:5000/api", None).ws_url(), "ws://localhost:5000/ws");
        assert_eq!(cfg("https://portal.example/api", None).ws_url(), "wss://portal.example/ws");
    }

    #[test]
    fn keeps_ws_url_override() {
        assert_eq!(
            cfg("http://localhost:5000/api", Some("ws://elsewhere:9000/socket")).ws_url(),
            "ws://elsewhere:9000/socket"
        );
    }

    #[test]
    fn session_file_defaults_under_data_dir() {
        let path = session_file_from_env_value(None, Path::new("/data/.portal"));
        assert_eq!(path, PathBuf::from("/data/.portal/session.json"));
    }

    #[test]
    fn request_timeout_parses_and_validates() {
        assert_eq!(
            request_timeout_from_env_value(None).unwrap(),
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        );
        assert_eq!(
            request_timeout_from_env_value(Some("5".into())).unwrap(),
            Duration::from_secs(5)
        );
        assert!(request_timeout_from_env_value(Some("0".into())).is_err());
        assert!(request_timeout_from_env_value(Some("soon".into())).is_err());
    }
}
