//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use hub_common::AppError;
use hub_core::DomainError;
use thiserror::Error;

/// Service layer error type
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Domain rule violation
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Application error (auth, token, infrastructure)
    #[error(transparent)]
    App(AppError),

    /// Resource not found
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// Permission denied
    #[error("Missing required permission: {permission}")]
    PermissionDenied { permission: String },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflict (e.g., duplicate resource)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn permission_denied(permission: impl Into<String>) -> Self {
        Self::PermissionDenied {
            permission: permission.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Shorthand for the credential failure every login path shares
    pub fn invalid_credentials() -> Self {
        Self::App(AppError::InvalidCredentials)
    }

    /// The wrapped domain error, if any
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(e) => Some(e),
            Self::App(AppError::Domain(e)) => Some(e),
            _ => None,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => e.status_code(),
            Self::App(e) => e.status_code(),
            Self::NotFound { .. } => 404,
            Self::PermissionDenied { .. } => 403,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::Internal(_) => 500,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::NotFound { .. } => "NOT_FOUND",
            Self::PermissionDenied { .. } => "INSUFFICIENT_PERMISSIONS",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        match err {
            // keep domain errors matchable without unwrapping two layers
            AppError::Domain(e) => Self::Domain(e),
            other => Self::App(other),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::NotFound { resource, id } => {
                AppError::NotFound(format!("{resource} {id}"))
            }
            ServiceError::PermissionDenied { permission: _ } => AppError::InsufficientPermissions,
            ServiceError::Validation(msg) => AppError::Validation(msg),
            ServiceError::Conflict(msg) => AppError::Conflict(msg),
            ServiceError::Internal(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use hub_core::{Currency, Id};

    #[test]
    fn test_not_found_error() {
        let err = ServiceError::not_found("Member", "123");
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(err.to_string().contains("Member not found: 123"));
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(ServiceError::validation("empty").to_string(), "Validation error: empty");
        assert_eq!(
            ServiceError::permission_denied("coupon:issue").to_string(),
            "Missing required permission: coupon:issue"
        );

        let domain = DomainError::PostNotFound(Id::new(4));
        let expected = domain.to_string();
        assert_eq!(ServiceError::from(domain).to_string(), expected);
    }

    #[test]
    fn test_domain_error_keeps_status_and_code() {
        let err = ServiceError::from(DomainError::InsufficientBalance {
            currency: Currency::Ticket,
            balance: 0,
            required: 1,
        });
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "INSUFFICIENT_BALANCE");

        let err = ServiceError::from(DomainError::RoadmapGenerationFailed("timeout".into()));
        assert_eq!(err.status_code(), 502);
    }

    #[test]
    fn test_app_domain_error_is_flattened() {
        let err = ServiceError::from(AppError::Domain(DomainError::WeakPassword("short".into())));
        assert!(matches!(err, ServiceError::Domain(DomainError::WeakPassword(_))));
        assert!(err.as_domain().is_some());
    }

    #[test]
    fn test_invalid_credentials() {
        let err = ServiceError::invalid_credentials();
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.error_code(), "INVALID_CREDENTIALS");
    }

    #[test]
    fn test_convert_to_app_error() {
        let app_err: AppError = ServiceError::from(DomainError::PostNotFound(Id::new(4))).into();
        assert_eq!(app_err.status_code(), 404);
        assert_eq!(app_err.error_code(), "POST_NOT_FOUND");

        let app_err: AppError = ServiceError::conflict("taken").into();
        assert_eq!(app_err.status_code(), 409);
    }
}
