//! Tagged application error type.
//!
//! Every fallible operation in the crate returns [`AppError`] so that callers
//! can branch on the outcome without exception-style control flow. Not-found
//! and permission failures are ordinary, expected variants; only
//! [`AppError::Infrastructure`] signals that something below the service
//! (storage, browser launch) actually broke.

use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed input: bad URL, non-positive TTL or click limit.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// No link exists for the given short code.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// The caller is not the link's owner.
    #[error("{message}")]
    PermissionDenied { message: String, details: Value },

    /// A link with the same short code already exists.
    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// The link exists but can no longer be used (expired or exhausted).
    #[error("{message}")]
    Gone { message: String, details: Value },

    /// Storage or browser-launch failure; fatal for the call in progress.
    #[error("{message}")]
    Infrastructure { message: String, details: Value },
}

impl AppError {
    pub fn validation(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn permission_denied(message: impl Into<String>, details: Value) -> Self {
        Self::PermissionDenied {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn gone(message: impl Into<String>, details: Value) -> Self {
        Self::Gone {
            message: message.into(),
            details,
        }
    }

    pub fn infrastructure(message: impl Into<String>, details: Value) -> Self {
        Self::Infrastructure {
            message: message.into(),
            details,
        }
    }
}

/// Maps sqlx errors into the application taxonomy.
///
/// A unique-constraint violation on insert means the short code is already
/// taken and becomes [`AppError::Conflict`]; everything else is an
/// infrastructure failure.
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() {
            return AppError::conflict(
                "Short code already exists",
                serde_json::json!({ "constraint": db.constraint() }),
            );
        }
    }

    AppError::infrastructure(
        "Database error",
        serde_json::json!({ "source": e.to_string() }),
    )
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}
