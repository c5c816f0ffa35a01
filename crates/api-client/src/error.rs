/// Failures a portal fetch can surface.
///
/// The pages render one error string per fetch and offer a manual retry;
/// nothing here is retried automatically and there is no backoff.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(reqwest::Error),
    #[error("request timed out")]
    Timeout,
    #[error("not authenticated")]
    Unauthorized,
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("failed to decode response body: {0}")]
    Decode(reqwest::Error),
    #[error(transparent)]
    Core(#[from] portal_core::PortalError),
}

impl ApiError {
    /// Collapse a transport error, distinguishing the timeout case so the
    /// caller can say so.
    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Transport(e)
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
