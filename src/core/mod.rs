//! Core business logic module
//!
//! This module contains the ledger's processing components:
//! - `engine` - transaction orchestration (bank, transfers, login)
//! - `identity` - external-identity to internal-user resolution
//! - `pending` - in-flight transfer proposals awaiting a response
//! - `auth` - password hashing seam for the login flow

pub mod auth;
pub mod engine;
pub mod identity;
pub mod pending;

pub use auth::{PasswordHasher, Sha256Hasher};
pub use engine::ChipEngine;
pub use identity::IdentityResolver;
pub use pending::PendingTransfers;
