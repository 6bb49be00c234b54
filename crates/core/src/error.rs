//! Domain error model.

use thiserror::Error;

use crate::id::ItemCode;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is an expected, recoverable outcome of a rejected operation.
/// Rejections never mutate state; callers branch on the variant (or on
/// [`ErrorKind`]) instead of unwinding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Registration with a code that is already taken.
    #[error("item already exists: {0}")]
    DuplicateItem(ItemCode),

    /// Operation referencing a code that was never registered.
    #[error("item not found: {0}")]
    UnknownItem(ItemCode),

    /// Zero, negative, non-finite, or (for exits) insufficient quantity.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

/// Closed classification of [`DomainError`] without its payload.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DuplicateItem,
    UnknownItem,
    InvalidQuantity,
    InvalidId,
}

impl DomainError {
    pub fn duplicate_item(code: impl Into<ItemCode>) -> Self {
        Self::DuplicateItem(code.into())
    }

    pub fn unknown_item(code: impl Into<ItemCode>) -> Self {
        Self::UnknownItem(code.into())
    }

    pub fn invalid_quantity(msg: impl Into<String>) -> Self {
        Self::InvalidQuantity(msg.into())
    }

    pub fn insufficient_stock(requested: f64, available: f64) -> Self {
        Self::InvalidQuantity(format!(
            "insufficient stock (requested: {requested}, available: {available})"
        ))
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::DuplicateItem(_) => ErrorKind::DuplicateItem,
            DomainError::UnknownItem(_) => ErrorKind::UnknownItem,
            DomainError::InvalidQuantity(_) => ErrorKind::InvalidQuantity,
            DomainError::InvalidId(_) => ErrorKind::InvalidId,
        }
    }
}
