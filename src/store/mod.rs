//! Repository traits and backends
//!
//! The engine owns no durable state; everything lives behind these three
//! traits so backends are interchangeable. The crate ships concurrent
//! in-memory implementations in [`memory`]; any other backend (SQLite,
//! Postgres, ...) qualifies as long as it preserves the key layout
//! (`users(id)`, `identity_links(channel, external_id)`,
//! `accounts(id, username UNIQUE)`) and the atomicity contracts below.
//!
//! Atomicity contracts:
//! - `UserStore::insert_if_absent` and `IdentityStore::insert_if_absent`
//!   must be single atomic statements (insert-on-conflict-ignore or an
//!   equivalent lock) so duplicate first contacts cannot create two users.
//! - `UserStore::add_balance` must be an atomic read-modify-write
//!   (`balance = balance + delta`).

pub mod memory;

pub use memory::{MemoryAccountStore, MemoryIdentityStore, MemoryUserStore};

use crate::types::{Account, StoreError, User, UserId};

/// Persistence abstraction for users and balances
pub trait UserStore: Send + Sync {
    /// Point lookup by internal user id
    fn get(&self, id: &str) -> Result<Option<User>, StoreError>;

    /// Full-table scan of all known users, in unspecified order
    fn list_all(&self) -> Result<Vec<User>, StoreError>;

    /// Insert the user unless a row with the same id exists
    ///
    /// The first write wins; a concurrent duplicate is silently ignored.
    fn insert_if_absent(&self, user: User) -> Result<(), StoreError>;

    /// Atomically apply `delta` to the user's balance
    ///
    /// A missing row is a no-op, matching `UPDATE ... WHERE id = ?`
    /// affecting zero rows.
    fn add_balance(&self, id: &str, delta: i64) -> Result<(), StoreError>;
}

/// Persistence abstraction for (channel, external_id) -> user id links
pub trait IdentityStore: Send + Sync {
    /// Look up the user id linked to an external identity
    fn find(&self, channel: &str, external_id: &str) -> Result<Option<UserId>, StoreError>;

    /// Overwrite upsert: point the external identity at `user_id`,
    /// replacing any previous target
    fn upsert(&self, channel: &str, external_id: &str, user_id: &str) -> Result<(), StoreError>;

    /// Insert the link unless one exists, returning the user id the link
    /// points at afterwards
    ///
    /// Under a duplicate-resolution race every caller receives the same
    /// winning user id.
    fn insert_if_absent(
        &self,
        channel: &str,
        external_id: &str,
        user_id: &str,
    ) -> Result<UserId, StoreError>;

    /// Delete the link if present; absent is a no-op
    fn remove(&self, channel: &str, external_id: &str) -> Result<(), StoreError>;

    /// All external ids on `channel` currently linked to `user_id`
    fn external_ids_for(&self, channel: &str, user_id: &str) -> Result<Vec<String>, StoreError>;
}

/// Persistence abstraction for login accounts
pub trait AccountStore: Send + Sync {
    fn by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;

    fn by_id(&self, id: &str) -> Result<Option<Account>, StoreError>;

    /// Persist a new account
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Constraint`] when the username is already
    /// taken by a different account.
    fn create(&self, account: Account) -> Result<(), StoreError>;
}
