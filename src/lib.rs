//! Chip Ledger Library
//! # Overview
//!
//! This library tracks a shared chip balance ledger for a group of players
//! reachable over several messaging channels, resolving each external
//! identity to one internal account and applying balance-changing
//! transactions with broadcast notification to all participants.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (User, Account, PendingTransfer, errors)
//! - [`store`] - Repository traits and the in-memory backends
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - Transaction orchestration (bank, transfers, login)
//!   - [`core::identity`] - External-identity resolution
//!   - [`core::pending`] - In-flight transfer proposals
//! - [`cli`] - A scripted demonstration channel adapter
//!
//! # Transactions
//!
//! The engine supports three transaction families:
//!
//! - **Bank**: buy from / sell to the bank, debiting or crediting the caller
//! - **Two-phase transfer**: a buyer proposes, the chosen seller confirms or
//!   rejects; the proposal lives in the pending-transfer registry in between
//! - **Direct transfer**: buy from / sell to a player addressed by platform
//!   username, applied immediately
//!
//! plus the login flow (register/login/logout) that binds channel
//! identities to durable accounts.

// Module declarations
pub mod cli;
pub mod core;
pub mod store;
pub mod types;

pub use crate::core::{ChipEngine, IdentityResolver, PasswordHasher, PendingTransfers, Sha256Hasher};
pub use store::{
    AccountStore, IdentityStore, MemoryAccountStore, MemoryIdentityStore, MemoryUserStore,
    UserStore,
};
pub use types::{
    Account, Broadcast, CallerContext, LedgerError, PendingTransfer, Roster, StoreError,
    TransactionOutcome, TransferPrompt, TransferReply, TransferSelection, TransferToken, User,
    UserId,
};
