//! Pending-transfer registry
//!
//! Tracks in-flight player-to-player transfer proposals across the gap
//! between the buyer's proposal and the seller's confirm/reject response,
//! which may arrive on a different channel invocation entirely. Records are
//! keyed by an opaque token, never by any channel's message id.
//!
//! The registry mandates no expiry; [`PendingTransfers::purge_older_than`]
//! exists for deployments that want a TTL sweep.

use chrono::{Duration, Utc};
use dashmap::DashMap;

use crate::types::{PendingTransfer, TransferToken};

/// Token-keyed store of unresolved transfer proposals
///
/// `take` is an atomic remove-and-return: when confirm and reject race on
/// the same token, exactly one caller receives the record and may mutate
/// balances; the other sees `None`.
#[derive(Debug, Default)]
pub struct PendingTransfers {
    entries: DashMap<TransferToken, PendingTransfer>,
}

impl PendingTransfers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create, store, and return a proposal for buyer -> seller of `amount`
    pub fn propose(&self, buyer: &str, seller: &str, amount: i64) -> TransferToken {
        let token = TransferToken::generate();
        self.put(PendingTransfer {
            token,
            buyer: buyer.to_string(),
            seller: seller.to_string(),
            amount,
            created_at: Utc::now(),
        });
        token
    }

    /// Store a proposal under its own token
    pub fn put(&self, record: PendingTransfer) {
        self.entries.insert(record.token, record);
    }

    /// Atomically remove and return the record for `token`
    ///
    /// A second call for the same token returns `None`.
    pub fn take(&self, token: TransferToken) -> Option<PendingTransfer> {
        self.entries.remove(&token).map(|(_, record)| record)
    }

    /// Non-consuming lookup, for diagnostics
    pub fn peek(&self, token: TransferToken) -> Option<PendingTransfer> {
        self.entries.get(&token).map(|entry| entry.value().clone())
    }

    /// Number of unresolved proposals
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove and return every proposal strictly older than `ttl`
    ///
    /// The core never calls this on its own; deployments that add a sweep
    /// decide the cadence and the TTL. A record swept here was abandoned,
    /// and its buyer/seller balances are untouched.
    pub fn purge_older_than(&self, ttl: Duration) -> Vec<PendingTransfer> {
        let cutoff = Utc::now() - ttl;
        let stale: Vec<TransferToken> = self
            .entries
            .iter()
            .filter(|entry| entry.value().created_at < cutoff)
            .map(|entry| *entry.key())
            .collect();

        // take() re-checks existence, so racing a confirm is safe: either
        // the sweep gets the record or the responder does, never both.
        stale.into_iter().filter_map(|token| self.take(token)).collect()
    }
}
