//! Stored session and token claims.
//!
//! The browser front-end kept a JWT string and a role string in local
//! storage; the portal keeps the same pair in a JSON file under the data
//! directory. Claims are read by decoding the token's payload segment
//! without verifying the signature: verification is the backend's concern,
//! the client only needs to read what the token says about itself.

use crate::{PortalError, PortalResult};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use portal_types::Role;
use std::fs;
use std::path::{Path, PathBuf};

/// The persisted session: the raw JWT plus the role string the backend
/// returned at login.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Session {
    pub token: String,
    pub role: Role,
}

/// Reads and writes the session file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist `session`, creating the parent directory if needed.
    pub fn save(&self, session: &Session) -> PortalResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(PortalError::SessionDirCreation)?;
        }
        let contents =
            serde_json::to_string(session).map_err(PortalError::SessionSerialisation)?;
        fs::write(&self.path, contents).map_err(PortalError::SessionWrite)
    }

    /// Load the stored session. A missing file is `PortalError::NoSession`.
    pub fn load(&self) -> PortalResult<Session> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PortalError::NoSession)
            }
            Err(e) => return Err(PortalError::SessionRead(e)),
        };
        serde_json::from_str(&contents).map_err(PortalError::SessionDeserialisation)
    }

    /// Remove the stored session. Clearing an absent session is not an error.
    pub fn clear(&self) -> PortalResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PortalError::SessionRemove(e)),
        }
    }
}

/// The claims the portal reads from a token payload. Unknown claims are
/// ignored; all known ones are optional because the backend owns the shape.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Claims {
    pub sub: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub exp: Option<i64>,
    pub iat: Option<i64>,
}

impl Claims {
    /// Decode the payload segment of `token` without verifying the signature.
    ///
    /// # Errors
    ///
    /// Returns `MalformedToken` when the token is not three dot-separated
    /// segments, `TokenPayloadDecode` when the payload is not base64url, and
    /// `TokenClaims` when the decoded payload is not a JSON object of claims.
    pub fn decode(token: &str) -> PortalResult<Self> {
        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 {
            return Err(PortalError::MalformedToken(
                "expected three dot-separated segments".into(),
            ));
        }
        let payload = URL_SAFE_NO_PAD
            .decode(segments[1])
            .map_err(PortalError::TokenPayloadDecode)?;
        serde_json::from_slice(&payload).map_err(PortalError::TokenClaims)
    }

    /// Whether the token has expired at `now`. A missing `exp` claim is
    /// treated as non-expiring.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.exp {
            Some(exp) => exp < now.timestamp(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    /// Builds an unsigned token carrying `payload` as its middle segment.
    fn token_with_payload(payload: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.as_bytes());
        format!("{header}.{body}.sig")
    }

    #[test]
    fn session_round_trips_through_the_store() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::new(temp.path().join("state").join("session.json"));

        store
            .save(&Session {
                token: "abc.def.ghi".into(),
                role: Role::Nurse,
            })
            .unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.token, "abc.def.ghi");
        assert_eq!(loaded.role, Role::Nurse);
    }

    #[test]
    fn loading_a_missing_session_is_no_session() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::new(temp.path().join("session.json"));
        assert!(matches!(store.load(), Err(PortalError::NoSession)));
    }

    #[test]
    fn clearing_twice_is_fine() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::new(temp.path().join("session.json"));
        store
            .save(&Session {
                token: "t".into(),
                role: Role::Admin,
            })
            .unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(matches!(store.load(), Err(PortalError::NoSession)));
    }

    #[test]
    fn decodes_claims_from_payload_segment() {
        let token = token_with_payload(
            r#"{"sub":"u-17","email":"amara@example.org","role":"doctor","exp":1893456000,"iat":1717200000}"#,
        );
        let claims = Claims::decode(&token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("u-17"));
        assert_eq!(claims.role, Some(Role::Doctor));
        assert_eq!(claims.exp, Some(1893456000));
    }

    #[test]
    fn unknown_claims_are_ignored() {
        let token = token_with_payload(r#"{"sub":"u-1","departmentId":42,"scopes":["x"]}"#);
        let claims = Claims::decode(&token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("u-1"));
        assert!(claims.role.is_none());
    }

    #[test]
    fn rejects_tokens_without_three_segments() {
        assert!(matches!(
            Claims::decode("only-one-segment"),
            Err(PortalError::MalformedToken(_))
        ));
        assert!(matches!(
            Claims::decode("two.segments"),
            Err(PortalError::MalformedToken(_))
        ));
    }

    #[test]
    fn rejects_non_base64_payload() {
        assert!(matches!(
            Claims::decode("aGVhZGVy.!!!.sig"),
            Err(PortalError::TokenPayloadDecode(_))
        ));
    }

    #[test]
    fn expiry_honours_the_exp_claim() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let expired = Claims {
            sub: None,
            email: None,
            role: None,
            exp: Some(now.timestamp() - 1),
            iat: None,
        };
        assert!(expired.is_expired(now));

        let live = Claims {
            exp: Some(now.timestamp() + 3600),
            ..expired.clone()
        };
        assert!(!live.is_expired(now));

        let no_exp = Claims { exp: None, ..live };
        assert!(!no_exp.is_expired(now));
    }
}
