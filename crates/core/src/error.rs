//! Domain error model.

use serde::Serialize;

/// Classification of a domain failure.
///
/// Only `Unexpected` may originate from a caught infrastructure/programmer
/// fault translated at a boundary. Every other kind is produced directly by
/// validation and rule checks, never by throwing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Input or business-rule violation (recoverable).
    Validation,
    /// A referenced entity is absent.
    NotFound,
    /// Concurrency or uniqueness violation.
    Conflict,
    /// Caller is not authenticated.
    Unauthorized,
    /// Caller is authenticated but not allowed.
    Forbidden,
    /// Infrastructure or programmer fault surfaced at a boundary.
    Unexpected,
}

/// Immutable failure descriptor: kind + message + optional field tag.
///
/// Errors have value semantics. They are cloned, not aliased, when they move
/// between outcomes, and the message is never empty by construction at call
/// sites that follow the `Error::validation("...")` convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    /// Form-field attribution for the transport/API mapping collaborator.
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }

    /// Translate a caught fault (IO error, poisoned lock, ...) into an
    /// `Unexpected` error at the boundary instead of leaking it raw.
    pub fn unexpected_from(source: impl core::fmt::Display) -> Self {
        Self::new(ErrorKind::Unexpected, source.to_string())
    }

    /// Attach a form-field tag (e.g. `"email"`).
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}
