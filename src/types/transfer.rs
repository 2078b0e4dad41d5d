//! Player-to-player transfer types
//!
//! A transfer runs in two phases: the buyer proposes, the seller confirms or
//! rejects. Between those two events the proposal lives in the
//! pending-transfer registry as a `PendingTransfer`, keyed by an opaque
//! `TransferToken` so that no channel's message-identifier semantics leak
//! into the core.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserId;

/// Opaque correlation token for an in-flight transfer proposal
///
/// Generated at proposal time; the seller's confirm or reject event carries
/// it back. A token resolves at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransferToken(Uuid);

impl TransferToken {
    /// Generate a fresh random token
    pub fn generate() -> Self {
        TransferToken(Uuid::new_v4())
    }
}

impl fmt::Display for TransferToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TransferToken {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TransferToken(Uuid::parse_str(s)?))
    }
}

/// A proposed but not-yet-resolved player-to-player transfer
///
/// Consumed exactly once by the seller's confirm or reject, or abandoned if
/// no response ever arrives. The core defines no timeout; deployments may
/// sweep stale records via the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransfer {
    pub token: TransferToken,

    /// User who initiated the buy and will be debited
    pub buyer: UserId,

    /// User whose confirmation is awaited and who will be credited
    pub seller: UserId,

    /// Chip amount, always positive
    pub amount: i64,

    /// Proposal time, used only by the optional TTL sweep
    pub created_at: DateTime<Utc>,
}

/// Typed seller-choice payload
///
/// Channel adapters serialize this through their own wire format (callback
/// payload, JSON, ...) when presenting the candidate list; the core never
/// parses delimited protocol strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferSelection {
    pub buyer: UserId,
    pub seller: UserId,
    pub amount: i64,
}

/// Typed confirm/decline payload carried by the seller's response event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReply {
    pub token: TransferToken,
    pub accepted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrips_through_display() {
        let token = TransferToken::generate();
        let parsed: TransferToken = token.to_string().parse().unwrap();
        assert_eq!(parsed, token);
    }

    #[test]
    fn test_tokens_are_unique() {
        assert_ne!(TransferToken::generate(), TransferToken::generate());
    }

    #[test]
    fn test_selection_payload_shape_is_stable() {
        let selection = TransferSelection {
            buyer: "12345".to_string(),
            seller: "67890".to_string(),
            amount: 50,
        };
        let json = serde_json::to_string(&selection).unwrap();
        assert_eq!(
            json,
            r#"{"buyer":"12345","seller":"67890","amount":50}"#
        );
        let back: TransferSelection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, selection);
    }

    #[test]
    fn test_reply_payload_shape_is_stable() {
        let reply = TransferReply {
            token: "0191b6a8-0000-7000-8000-000000000000".parse().unwrap(),
            accepted: true,
        };
        let json = serde_json::to_string(&reply).unwrap();
        assert_eq!(
            json,
            r#"{"token":"0191b6a8-0000-7000-8000-000000000000","accepted":true}"#
        );
    }
}
