//! Identity resolution
//!
//! Maps (channel, external_id) pairs to internal users. Two modes coexist:
//! the legacy get-or-create path auto-provisions a user on first contact,
//! while the login flow links identities explicitly via [`link`] and
//! [`unlink`]. The two are deliberately kept as separate capabilities so
//! callers wanting strict login-based provisioning can use [`find`] and
//! reject unknown identities themselves.
//!
//! [`link`]: IdentityResolver::link
//! [`unlink`]: IdentityResolver::unlink
//! [`find`]: IdentityResolver::find

use std::sync::Arc;

use tracing::debug;

use crate::store::{IdentityStore, UserStore};
use crate::types::{CallerContext, LedgerError, User};

/// Resolves external identities to internal users
///
/// Holds shared handles to the user and identity stores; clones of those
/// handles may live inside an engine at the same time.
pub struct IdentityResolver<U, I> {
    users: Arc<U>,
    identities: Arc<I>,
}

impl<U, I> Clone for IdentityResolver<U, I> {
    fn clone(&self) -> Self {
        IdentityResolver {
            users: Arc::clone(&self.users),
            identities: Arc::clone(&self.identities),
        }
    }
}

impl<U: UserStore, I: IdentityStore> IdentityResolver<U, I> {
    pub fn new(users: Arc<U>, identities: Arc<I>) -> Self {
        IdentityResolver { users, identities }
    }

    /// Look up the user linked to an external identity
    ///
    /// Pure read: returns the linked user refreshed from the user store, or
    /// `None` when no link exists (or the link points at an unknown user).
    pub fn find(&self, channel: &str, external_id: &str) -> Result<Option<User>, LedgerError> {
        let Some(user_id) = self.identities.find(channel, external_id)? else {
            return Ok(None);
        };
        Ok(self.users.get(&user_id)?)
    }

    /// Legacy get-or-create resolution
    ///
    /// Returns the linked user if the identity is known. Otherwise
    /// provisions a new user whose id equals the external id, inserts it,
    /// links it, and returns it. Both inserts are insert-if-absent, so a
    /// duplicate concurrent first contact converges on a single user.
    ///
    /// Callers migrating to login-based identity should use
    /// [`Self::link`] / [`Self::find`] instead.
    pub fn resolve_or_create(
        &self,
        channel: &str,
        external_id: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<User, LedgerError> {
        if let Some(user) = self.find(channel, external_id)? {
            return Ok(user);
        }

        let user = User::new(external_id, first_name, last_name);
        self.users.insert_if_absent(user)?;
        let winner = self
            .identities
            .insert_if_absent(channel, external_id, external_id)?;

        debug!(channel, external_id, user_id = %winner, "auto-provisioned identity");

        // Re-read through the store rather than trusting our candidate:
        // under a race the winning link may point at the other caller's row.
        self.users
            .get(&winner)?
            .ok_or_else(|| LedgerError::user_not_found(winner))
    }

    /// Resolve the caller context through the legacy get-or-create path
    pub fn resolve_caller(&self, ctx: &CallerContext) -> Result<User, LedgerError> {
        self.resolve_or_create(
            &ctx.channel,
            &ctx.external_id,
            &ctx.first_name,
            &ctx.last_name,
        )
    }

    /// Point an external identity at a user, replacing any previous target
    ///
    /// Supports re-login from the same device to a different account.
    pub fn link(&self, channel: &str, external_id: &str, user_id: &str) -> Result<(), LedgerError> {
        self.identities.upsert(channel, external_id, user_id)?;
        debug!(channel, external_id, user_id, "linked identity");
        Ok(())
    }

    /// Remove the link for an external identity
    ///
    /// Idempotent: logging out twice is not an error.
    pub fn unlink(&self, channel: &str, external_id: &str) -> Result<(), LedgerError> {
        self.identities.remove(channel, external_id)?;
        debug!(channel, external_id, "unlinked identity");
        Ok(())
    }

    /// Every external id on `channel` bound to `user_id`
    ///
    /// Used by adapters to fan a broadcast out to each endpoint of a user.
    pub fn external_ids_for(
        &self,
        channel: &str,
        user_id: &str,
    ) -> Result<Vec<String>, LedgerError> {
        Ok(self.identities.external_ids_for(channel, user_id)?)
    }
}
