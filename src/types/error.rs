//! Error types for the chip ledger
//!
//! Two layers, mirroring the error-handling design:
//!
//! - [`LedgerError`] is the business-level taxonomy. Expected conditions
//!   (bad amount, missing counterpart, bad credentials, no candidates,
//!   replayed transfer response) are returned as values and rendered to the
//!   caller; they are never panics.
//! - [`StoreError`] is the infrastructure layer. Backing-store faults
//!   propagate up wrapped in [`LedgerError::Store`], and adapters turn them
//!   into a generic user-facing message.

use thiserror::Error;

use super::transfer::TransferToken;
use super::user::UserId;

/// Infrastructure fault raised by a backing store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached or the statement failed outright
    #[error("backing store unavailable: {message}")]
    Unavailable { message: String },

    /// A key or uniqueness constraint was violated unexpectedly
    #[error("constraint violation: {message}")]
    Constraint { message: String },
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        StoreError::Unavailable {
            message: message.into(),
        }
    }

    pub fn constraint(message: impl Into<String>) -> Self {
        StoreError::Constraint {
            message: message.into(),
        }
    }
}

/// Business-level failure of an engine operation
///
/// Display texts are user-facing; adapters may forward them verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Amount failed the shared positivity precondition
    ///
    /// Checked before any store is touched; no state has changed.
    #[error("Amount must be greater than zero.")]
    InvalidAmount { amount: i64 },

    /// A referenced user or counterpart does not exist
    #[error("User '{user_id}' not found.")]
    UserNotFound { user_id: UserId },

    /// No other players exist to transfer with
    #[error("No other players available to buy from.")]
    NoCounterpart,

    /// Login failed
    ///
    /// Deliberately the same text for a wrong password and any other
    /// credential problem, so the message does not reveal whether the
    /// username exists.
    #[error("Invalid username or password.")]
    InvalidCredentials,

    /// The transfer token was already consumed, or never existed
    ///
    /// Returned to the second responder when confirm/reject races; the
    /// balance change from the first response stands.
    #[error("This transfer was already answered or has expired.")]
    TransferResolved { token: TransferToken },

    /// Underlying store fault, not a business condition
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: i64) -> Self {
        LedgerError::InvalidAmount { amount }
    }

    /// Create a UserNotFound error
    pub fn user_not_found(user_id: impl Into<UserId>) -> Self {
        LedgerError::UserNotFound {
            user_id: user_id.into(),
        }
    }

    /// Create a TransferResolved error
    pub fn transfer_resolved(token: TransferToken) -> Self {
        LedgerError::TransferResolved { token }
    }

    /// Whether this failure is a business condition rather than an
    /// infrastructure fault
    pub fn is_business(&self) -> bool {
        !matches!(self, LedgerError::Store(_))
    }
}
