//! Login account types
//!
//! A platform account is the username/password identity used by the login
//! flow so that one user can be reused across channels and sessions.

use serde::{Deserialize, Serialize};

/// Account identifier
///
/// Matches the id of the user the account owns; registration generates one
/// id and uses it for both records.
pub type AccountId = String;

/// Platform-wide login identity
///
/// One account per user at most. Created at registration, looked up by
/// username at login, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,

    /// Unique login name
    pub username: String,

    /// Hex-encoded digest produced by the configured password hasher
    pub password_hash: String,
}

impl Account {
    pub fn new(
        id: impl Into<AccountId>,
        username: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Account {
            id: id.into(),
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }
}
