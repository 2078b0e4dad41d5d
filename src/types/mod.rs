//! Types module
//!
//! Contains core data structures used throughout the ledger.
//! This module organizes types into logical submodules:
//! - `user`: users, balances, and the normalized caller context
//! - `account`: login accounts (username / password hash)
//! - `transfer`: pending transfers, tokens, and typed transfer payloads
//! - `outcome`: broadcasts and operation results
//! - `error`: business and store error types

pub mod account;
pub mod error;
pub mod outcome;
pub mod transfer;
pub mod user;

pub use account::{Account, AccountId};
pub use error::{LedgerError, StoreError};
pub use outcome::{Broadcast, Roster, TransactionOutcome, TransferPrompt};
pub use transfer::{PendingTransfer, TransferReply, TransferSelection, TransferToken};
pub use user::{CallerContext, User, UserId};
