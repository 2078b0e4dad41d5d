//! Engine operation results
//!
//! Every engine operation either fails with a tagged [`LedgerError`] and no
//! broadcasts, or succeeds with an ordered list of broadcasts for the
//! channel adapters to deliver. Nothing here performs I/O.
//!
//! [`LedgerError`]: super::error::LedgerError

use serde::{Deserialize, Serialize};

use super::user::{User, UserId};

/// A notification addressed to one recipient user
///
/// Adapters fan each broadcast out to every channel endpoint bound to the
/// recipient (or to a fixed group, for channels that work that way).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Broadcast {
    pub recipient: UserId,
    pub text: String,
}

impl Broadcast {
    pub fn new(recipient: impl Into<UserId>, text: impl Into<String>) -> Self {
        Broadcast {
            recipient: recipient.into(),
            text: text.into(),
        }
    }
}

/// Successful result of a balance-changing operation
///
/// Carries zero or more broadcasts, ordered by recipient id so adapter
/// output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionOutcome {
    pub broadcasts: Vec<Broadcast>,
}

impl TransactionOutcome {
    /// An outcome with nothing to announce
    pub fn silent() -> Self {
        TransactionOutcome::default()
    }

    pub fn with_broadcasts(broadcasts: Vec<Broadcast>) -> Self {
        TransactionOutcome { broadcasts }
    }
}

/// Result of initiating a player-to-player transfer
///
/// A read-only preparatory step: the resolved buyer plus every other known
/// user as a candidate seller. The adapter turns this into a selection
/// prompt; no balance has moved and nothing is pending yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPrompt {
    pub buyer: User,
    pub candidates: Vec<User>,
}

/// Snapshot of the whole table
///
/// Players sorted by display name, plus the summed balance. The total is
/// the conservation figure: bank buys push it negative, bank sells pull it
/// back, player transfers leave it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Roster {
    pub players: Vec<User>,
    pub total: i64,
}
