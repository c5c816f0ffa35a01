//! # Notifications
//!
//! Thin wrapper around the backend's notification socket.
//!
//! Connects with the session token, deserialises incoming JSON text frames
//! into [`Notification`] records and hands them to the caller one at a time.
//! There is deliberately nothing else here: no reconnection, no buffering,
//! no acknowledgement protocol: close or transport failure simply ends the
//! stream.

use futures_util::{SinkExt, StreamExt};
use portal_core::models::Notification;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// Failures the notification stream can surface.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("failed to connect to notification socket: {0}")]
    Connect(tokio_tungstenite::tungstenite::Error),
    #[error("notification socket failed: {0}")]
    Transport(tokio_tungstenite::tungstenite::Error),
    #[error("failed to decode notification frame: {0}")]
    Decode(serde_json::Error),
}

/// Parse one text frame into a notification.
fn decode_frame(text: &str) -> Result<Notification, NotifyError> {
    serde_json::from_str(text).map_err(NotifyError::Decode)
}

/// A live notification subscription.
pub struct NotificationStream {
    inner: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl NotificationStream {
    /// Connect to `ws_url`, authenticating with `token` as a query
    /// parameter: the browser socket client could not set headers, and the
    /// backend reads the token from the URL.
    pub async fn connect(ws_url: &str, token: &str) -> Result<Self, NotifyError> {
        let url = format!("{ws_url}?token={token}");
        let (inner, _response) = connect_async(url).await.map_err(NotifyError::Connect)?;
        tracing::info!("notification socket connected to {ws_url}");
        Ok(Self { inner })
    }

    /// The next notification, or `None` once the socket closes.
    ///
    /// Ping frames are answered, binary frames are ignored. A frame that is
    /// not valid notification JSON is surfaced as a `Decode` error without
    /// ending the stream.
    pub async fn next(&mut self) -> Option<Result<Notification, NotifyError>> {
        loop {
            let message = match self.inner.next().await? {
                Ok(message) => message,
                Err(e) => return Some(Err(NotifyError::Transport(e))),
            };
            match message {
                Message::Text(text) => return Some(decode_frame(text.as_str())),
                Message::Ping(payload) => {
                    if let Err(e) = self.inner.send(Message::Pong(payload)).await {
                        return Some(Err(NotifyError::Transport(e)));
                    }
                }
                Message::Close(_) => return None,
                other => {
                    tracing::debug!("ignoring non-text frame: {other:?}");
                }
            }
        }
    }

    /// Close the subscription.
    pub async fn close(mut self) -> Result<(), NotifyError> {
        self.inner
            .close(None)
            .await
            .map_err(NotifyError::Transport)
    }
}
