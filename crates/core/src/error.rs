//! Engine error model.

use thiserror::Error;

use crate::id::ProductId;

/// Result type used across the engine.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Deterministic failures of the mutation/aggregation engine.
///
/// Every failure is a value; nothing here aborts the process. License
/// transport failures are deliberately absent: the gate downgrades them to an
/// invalid verdict before they can reach a mutation caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The targeted field is not part of the mutable set for this operation.
    #[error("unsupported field: {0}")]
    UnsupportedField(String),

    /// A closed enum received a value outside its domain.
    #[error("invalid value '{value}' for {field}")]
    InvalidEnumValue { field: &'static str, value: String },

    /// The product id did not resolve to a record.
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// The usage gate refused the mutation.
    #[error("denied: {0}")]
    Denied(String),

    /// The product store failed to persist a write.
    #[error("persistence failed: {0}")]
    Persistence(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The request shape failed validation (e.g. empty selection).
    #[error("validation failed: {0}")]
    Validation(String),
}

impl CatalogError {
    pub fn unsupported_field(field: impl Into<String>) -> Self {
        Self::UnsupportedField(field.into())
    }

    pub fn invalid_enum(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidEnumValue {
            field,
            value: value.into(),
        }
    }

    pub fn not_found(id: ProductId) -> Self {
        Self::NotFound(id)
    }

    pub fn denied(reason: impl Into<String>) -> Self {
        Self::Denied(reason.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
