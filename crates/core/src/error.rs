#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to create session directory: {0}")]
    SessionDirCreation(std::io::Error),
    #[error("failed to write session file: {0}")]
    SessionWrite(std::io::Error),
    #[error("failed to read session file: {0}")]
    SessionRead(std::io::Error),
    #[error("failed to remove session file: {0}")]
    SessionRemove(std::io::Error),
    #[error("failed to serialise session: {0}")]
    SessionSerialisation(serde_json::Error),
    #[error("failed to deserialise session: {0}")]
    SessionDeserialisation(serde_json::Error),
    #[error("no stored session")]
    NoSession,

    #[error("malformed token: {0}")]
    MalformedToken(String),
    #[error("failed to decode token payload: {0}")]
    TokenPayloadDecode(base64::DecodeError),
    #[error("failed to parse token claims: {0}")]
    TokenClaims(serde_json::Error),

    #[error("role error: {0}")]
    Role(#[from] portal_types::RoleError),
}

pub type PortalResult<T> = std::result::Result<T, PortalError>;
