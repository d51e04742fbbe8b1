//! Unified application error types for PayLockr.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. The `kind` field is the stable,
//! machine-readable classification the API layer translates into HTTP
//! status codes; presentation never depends on the free-text message.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested resource was not found.
    NotFound,
    /// The payment link exists but its expiry timestamp has passed.
    LinkExpired,
    /// The payment link has no remaining download quota.
    LinkExhausted,
    /// Input validation failed.
    Validation,
    /// A transaction with the same external reference already exists.
    Duplicate,
    /// A transaction was asked to leave a terminal state.
    InvalidTransition,
    /// The caller is not the recorded customer for the transaction.
    Unauthorized,
    /// A download was requested for a transaction that is not completed.
    NotCompleted,
    /// The link quota was exhausted after payment; requires support follow-up.
    QuotaExceeded,
    /// Settlement was still pending after the bounded verification attempts.
    VerificationTimeout,
    /// A conflict occurred (duplicate entry, concurrent modification, etc.).
    Conflict,
    /// The payment gateway rejected or failed a request.
    Gateway,
    /// A database error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal server error occurred.
    Internal,
    /// The service is temporarily unavailable.
    ServiceUnavailable,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::LinkExpired => write!(f, "LINK_EXPIRED"),
            Self::LinkExhausted => write!(f, "LINK_EXHAUSTED"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Duplicate => write!(f, "DUPLICATE"),
            Self::InvalidTransition => write!(f, "INVALID_TRANSITION"),
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::NotCompleted => write!(f, "NOT_COMPLETED"),
            Self::QuotaExceeded => write!(f, "QUOTA_EXCEEDED"),
            Self::VerificationTimeout => write!(f, "VERIFICATION_TIMEOUT"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Gateway => write!(f, "GATEWAY"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::ServiceUnavailable => write!(f, "SERVICE_UNAVAILABLE"),
        }
    }
}

/// The unified application error used throughout PayLockr.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. This provides a single error type for
/// the entire application boundary.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a link-expired error.
    pub fn link_expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::LinkExpired, message)
    }

    /// Create a link-exhausted error.
    pub fn link_exhausted(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::LinkExhausted, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a duplicate-reference error.
    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Duplicate, message)
    }

    /// Create an invalid-transition error.
    pub fn invalid_transition(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidTransition, message)
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Create a not-completed error.
    pub fn not_completed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotCompleted, message)
    }

    /// Create a quota-exceeded error.
    pub fn quota_exceeded(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::QuotaExceeded, message)
    }

    /// Create a verification-timeout error.
    pub fn verification_timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::VerificationTimeout, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a gateway error.
    pub fn gateway(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Gateway, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a service-unavailable error.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
