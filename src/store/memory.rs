//! Concurrent in-memory store implementations
//!
//! All three stores are backed by `DashMap`, which provides fine-grained
//! per-entry locking. Every method takes `&self`, so one store instance can
//! be shared across threads; operations on the same entry are serialized by
//! the map, which is what makes `insert_if_absent` and `add_balance`
//! honor the atomicity contracts in [`super`].

use dashmap::DashMap;

use crate::store::{AccountStore, IdentityStore, UserStore};
use crate::types::{Account, StoreError, User, UserId};

/// In-memory user table keyed by user id
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: DashMap<UserId, User>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for MemoryUserStore {
    fn get(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(id).map(|entry| entry.value().clone()))
    }

    fn list_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(self
            .users
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    fn insert_if_absent(&self, user: User) -> Result<(), StoreError> {
        // First occurrence wins, like INSERT OR IGNORE.
        self.users.entry(user.id.clone()).or_insert(user);
        Ok(())
    }

    fn add_balance(&self, id: &str, delta: i64) -> Result<(), StoreError> {
        // The entry lock makes the read-modify-write atomic. A missing row
        // is a no-op, like an UPDATE matching zero rows.
        if let Some(mut entry) = self.users.get_mut(id) {
            entry.value_mut().balance += delta;
        }
        Ok(())
    }
}

/// In-memory identity links keyed by (channel, external_id)
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    links: DashMap<(String, String), UserId>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(channel: &str, external_id: &str) -> (String, String) {
        (channel.to_string(), external_id.to_string())
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn find(&self, channel: &str, external_id: &str) -> Result<Option<UserId>, StoreError> {
        Ok(self
            .links
            .get(&Self::key(channel, external_id))
            .map(|entry| entry.value().clone()))
    }

    fn upsert(&self, channel: &str, external_id: &str, user_id: &str) -> Result<(), StoreError> {
        self.links
            .insert(Self::key(channel, external_id), user_id.to_string());
        Ok(())
    }

    fn insert_if_absent(
        &self,
        channel: &str,
        external_id: &str,
        user_id: &str,
    ) -> Result<UserId, StoreError> {
        let winner = self
            .links
            .entry(Self::key(channel, external_id))
            .or_insert_with(|| user_id.to_string());
        Ok(winner.value().clone())
    }

    fn remove(&self, channel: &str, external_id: &str) -> Result<(), StoreError> {
        self.links.remove(&Self::key(channel, external_id));
        Ok(())
    }

    fn external_ids_for(&self, channel: &str, user_id: &str) -> Result<Vec<String>, StoreError> {
        let mut ids: Vec<String> = self
            .links
            .iter()
            .filter(|entry| entry.key().0 == channel && entry.value() == user_id)
            .map(|entry| entry.key().1.clone())
            .collect();
        ids.sort();
        Ok(ids)
    }
}

/// In-memory account table keyed by unique username
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    accounts: DashMap<String, Account>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountStore for MemoryAccountStore {
    fn by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.get(username).map(|entry| entry.value().clone()))
    }

    fn by_id(&self, id: &str) -> Result<Option<Account>, StoreError> {
        Ok(self
            .accounts
            .iter()
            .find(|entry| entry.value().id == id)
            .map(|entry| entry.value().clone()))
    }

    fn create(&self, account: Account) -> Result<(), StoreError> {
        let username = account.username.clone();
        let id = account.id.clone();
        let existing = self.accounts.entry(username.clone()).or_insert(account);
        if existing.value().id != id {
            return Err(StoreError::constraint(format!(
                "username '{username}' is already taken"
            )));
        }
        Ok(())
    }
}
