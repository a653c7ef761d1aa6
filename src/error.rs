//! Error types shared across the relay.
//!
//! Each error stays inside the component that raised it: routing errors drop
//! one record or match, external service errors abort one Radarr/Unmanic step.

use crate::config::LibraryId;
use std::path::PathBuf;

/// Failure talking to Radarr or Unmanic.
#[derive(Debug, thiserror::Error)]
pub enum ExternalServiceError {
    /// 401 from the service; the API key is wrong or missing.
    #[error("Unauthorized: check the API key")]
    Unauthorized,

    /// 403 from the service.
    #[error("Access restricted")]
    AccessRestricted,

    /// 404 from the service.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// 502 from the service or a proxy in front of it.
    #[error("Bad gateway")]
    BadGateway,

    /// The request never produced a response.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Any other non-success status.
    #[error("Unexpected status {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ExternalServiceError {
    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16, path: &str, message: String) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::AccessRestricted,
            404 => Self::NotFound(path.to_string()),
            502 => Self::BadGateway,
            _ => Self::Status { status, message },
        }
    }
}

impl From<reqwest::Error> for ExternalServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Connection(e.to_string())
        }
    }
}

/// Why a record or match was dropped during routing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoutingError {
    #[error("{path:?} is outside service root {root:?}")]
    PathOutsideRoot { path: PathBuf, root: PathBuf },

    #[error("movie has no root path")]
    MissingRoot,

    #[error("library {0} is not in the Unmanic library catalog")]
    UnknownLibrary(LibraryId),
}

/// Result type alias for calls to external services.
pub type ServiceResult<T> = std::result::Result<T, ExternalServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert!(matches!(
            ExternalServiceError::from_status(401, "/x", String::new()),
            ExternalServiceError::Unauthorized
        ));
        assert!(matches!(
            ExternalServiceError::from_status(403, "/x", String::new()),
            ExternalServiceError::AccessRestricted
        ));
        assert!(matches!(
            ExternalServiceError::from_status(404, "/api/v3/movie/9", String::new()),
            ExternalServiceError::NotFound(p) if p == "/api/v3/movie/9"
        ));
        assert!(matches!(
            ExternalServiceError::from_status(502, "/x", String::new()),
            ExternalServiceError::BadGateway
        ));
        assert!(matches!(
            ExternalServiceError::from_status(500, "/x", "boom".into()),
            ExternalServiceError::Status { status: 500, .. }
        ));
    }

    #[test]
    fn routing_error_display() {
        let err = RoutingError::UnknownLibrary(LibraryId(7));
        assert_eq!(
            err.to_string(),
            "library 7 is not in the Unmanic library catalog"
        );
    }
}
