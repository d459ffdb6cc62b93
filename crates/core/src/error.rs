//! Domain error model.

use thiserror::Error;

/// Domain-level error.
///
/// Deterministic failures parsing client-side input (identifiers, closed-set
/// values). Field validation reports through `ValidationErrors` instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A value outside a closed set (role, status, specialization).
    #[error("unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn unknown_variant(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownVariant {
            kind,
            value: value.into(),
        }
    }
}
