//! User and caller-context types
//!
//! This module defines the channel-agnostic `User` record that holds a chip
//! balance, and the `CallerContext` that channel adapters hand to the engine
//! in place of any SDK-specific message type.

use serde::{Deserialize, Serialize};

/// Internal user identifier
///
/// Opaque string. Legacy auto-provisioned users reuse their external id;
/// login-provisioned users get a freshly generated id.
pub type UserId = String;

/// A player at the table
///
/// The user is the channel-agnostic account that owns a chip balance. Users
/// are created on first resolution from an external identity or at
/// registration, mutated only through balance deltas, and never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Internal user id, unique across all channels
    pub id: UserId,

    /// Given name as reported by the originating channel
    pub first_name: String,

    /// Family name; channels without one leave it empty
    pub last_name: String,

    /// Chip balance
    ///
    /// May go negative: a negative balance is an IOU to the bank or the
    /// other players. No floor is enforced.
    pub balance: i64,
}

impl User {
    /// Create a user with a zero balance
    pub fn new(
        id: impl Into<UserId>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        User {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            balance: 0,
        }
    }

    /// Human-readable name used in broadcast texts
    ///
    /// "first last", trimmed so users without a last name render cleanly.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Normalized caller identity produced by a channel adapter
///
/// The engine never sees Telegram/Discord/web SDK types; adapters reduce an
/// inbound event to this context before calling in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerContext {
    /// Channel name, e.g. "telegram", "discord", "web"
    pub channel: String,

    /// Caller identifier within that channel (chat id, guild member id, ...)
    pub external_id: String,

    /// Given name as reported by the channel
    pub first_name: String,

    /// Family name as reported by the channel; may be empty
    pub last_name: String,
}

impl CallerContext {
    pub fn new(
        channel: impl Into<String>,
        external_id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        CallerContext {
            channel: channel.into(),
            external_id: external_id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}
