use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SocialClientError {
    // HTTP ошибки
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // Ошибки чтения файлов для загрузки
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Бизнес-логика ошибки
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Server error ({0}): {1}")]
    Server(u16, String),

    // Ошибки сериализации/десериализации
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No active session, please login first")]
    NotLoggedIn,
}

impl SocialClientError {
    /// Maps a non-2xx status and the server's message to an error variant.
    pub fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::UNAUTHORIZED => Self::Unauthorized(message),
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::CONFLICT => Self::Conflict(message),
            s if s.is_client_error() => Self::InvalidRequest(message),
            s => Self::Server(s.as_u16(), message),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SocialClientError::NotFound(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            SocialClientError::Unauthorized(_) | SocialClientError::NotLoggedIn
        )
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, SocialClientError::Forbidden(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_map_to_variants() {
        let err = |code: u16| {
            SocialClientError::from_status(StatusCode::from_u16(code).unwrap(), "m".into())
        };

        assert!(err(404).is_not_found());
        assert!(err(401).is_unauthorized());
        assert!(err(403).is_forbidden());
        assert!(matches!(err(409), SocialClientError::Conflict(_)));
        assert!(matches!(err(400), SocialClientError::InvalidRequest(_)));
        assert!(matches!(err(413), SocialClientError::InvalidRequest(_)));
        assert!(matches!(err(503), SocialClientError::Server(503, _)));
    }
}
