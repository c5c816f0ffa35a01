//! Role-gated sections.
//!
//! Each portal section (admin, doctor, nurse, patient) checks the stored
//! identity once before rendering and sends mismatches back to login. This
//! is a guard clause, not an access-control engine: the backend enforces
//! authorisation on every request regardless.

use crate::session::{Claims, SessionStore};
use chrono::{DateTime, Utc};
use portal_types::Role;

/// Why a section refused to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectReason {
    NoSession,
    ExpiredToken,
    MalformedToken,
    RoleMismatch { expected: Role, actual: Role },
}

impl std::fmt::Display for RedirectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RedirectReason::NoSession => f.write_str("not logged in"),
            RedirectReason::ExpiredToken => f.write_str("session expired"),
            RedirectReason::MalformedToken => f.write_str("stored token is unreadable"),
            RedirectReason::RoleMismatch { expected, actual } => {
                write!(f, "this section is for {expected} accounts, you are logged in as {actual}")
            }
        }
    }
}

/// The gate's decision for one section.
#[derive(Debug)]
pub enum SectionAccess {
    Allow { session_role: Role, claims: Claims },
    RedirectToLogin { reason: RedirectReason },
}

/// Decide whether the `expected` section may render for the stored session.
///
/// The decoded role claim wins when present; the stored role string is the
/// fallback for tokens that do not carry one. Any unreadable session file is
/// treated the same as no session at all.
pub fn gate_section(expected: Role, store: &SessionStore, now: DateTime<Utc>) -> SectionAccess {
    let session = match store.load() {
        Ok(session) => session,
        Err(crate::PortalError::NoSession) => {
            return SectionAccess::RedirectToLogin {
                reason: RedirectReason::NoSession,
            }
        }
        Err(e) => {
            tracing::warn!("discarding unreadable session file: {e}");
            return SectionAccess::RedirectToLogin {
                reason: RedirectReason::NoSession,
            };
        }
    };

    let claims = match Claims::decode(&session.token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!("stored token failed to decode: {e}");
            return SectionAccess::RedirectToLogin {
                reason: RedirectReason::MalformedToken,
            };
        }
    };

    if claims.is_expired(now) {
        return SectionAccess::RedirectToLogin {
            reason: RedirectReason::ExpiredToken,
        };
    }

    let actual = claims.role.unwrap_or(session.role);
    if actual != expected {
        return SectionAccess::RedirectToLogin {
            reason: RedirectReason::RoleMismatch { expected, actual },
        };
    }

    SectionAccess::Allow {
        session_role: session.role,
        claims,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Session, SessionStore};
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine as _;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn token(role: &str, exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload =
            URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"u-1","role":"{role}","exp":{exp}}}"#));
        format!("{header}.{payload}.sig")
    }

    fn store_with(session: Option<Session>) -> (TempDir, SessionStore) {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::new(temp.path().join("session.json"));
        if let Some(session) = session {
            store.save(&session).unwrap();
        }
        (temp, store)
    }

    #[test]
    fn missing_session_redirects() {
        let (_temp, store) = store_with(None);
        let access = gate_section(Role::Doctor, &store, now());
        assert!(matches!(
            access,
            SectionAccess::RedirectToLogin {
                reason: RedirectReason::NoSession
            }
        ));
    }

    #[test]
    fn matching_role_is_allowed() {
        let (_temp, store) = store_with(Some(Session {
            token: token("doctor", now().timestamp() + 3600),
            role: Role::Doctor,
        }));
        let access = gate_section(Role::Doctor, &store, now());
        match access {
            SectionAccess::Allow { session_role, claims } => {
                assert_eq!(session_role, Role::Doctor);
                assert_eq!(claims.sub.as_deref(), Some("u-1"));
            }
            other => panic!("expected Allow, got {other:?}"),
        }
    }

    #[test]
    fn role_mismatch_redirects_with_both_roles() {
        let (_temp, store) = store_with(Some(Session {
            token: token("nurse", now().timestamp() + 3600),
            role: Role::Nurse,
        }));
        let access = gate_section(Role::Admin, &store, now());
        assert!(matches!(
            access,
            SectionAccess::RedirectToLogin {
                reason: RedirectReason::RoleMismatch {
                    expected: Role::Admin,
                    actual: Role::Nurse
                }
            }
        ));
    }

    #[test]
    fn expired_token_redirects() {
        let (_temp, store) = store_with(Some(Session {
            token: token("patient", now().timestamp() - 10),
            role: Role::Patient,
        }));
        let access = gate_section(Role::Patient, &store, now());
        assert!(matches!(
            access,
            SectionAccess::RedirectToLogin {
                reason: RedirectReason::ExpiredToken
            }
        ));
    }

    #[test]
    fn garbage_token_redirects_as_malformed() {
        let (_temp, store) = store_with(Some(Session {
            token: "not-a-jwt".into(),
            role: Role::Patient,
        }));
        let access = gate_section(Role::Patient, &store, now());
        assert!(matches!(
            access,
            SectionAccess::RedirectToLogin {
                reason: RedirectReason::MalformedToken
            }
        ));
    }

    #[test]
    fn stored_role_is_the_fallback_when_token_has_no_role_claim() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"u-2"}"#);
        let (_temp, store) = store_with(Some(Session {
            token: format!("{header}.{payload}.sig"),
            role: Role::Nurse,
        }));
        assert!(matches!(
            gate_section(Role::Nurse, &store, now()),
            SectionAccess::Allow { .. }
        ));
    }
}
