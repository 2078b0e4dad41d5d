//! Transaction engine
//!
//! This module provides the `ChipEngine` that applies every balance-changing
//! operation: bank buys and sells, the two-phase player-to-player transfer
//! protocol, direct username-addressed transfers, and the login flow.
//!
//! The engine is pure logic over the store traits. It resolves the caller
//! through the identity layer, mutates balances through the user store, and
//! returns results plus broadcast lists; it never talks to a channel itself.
//! Apart from the pending-transfer registry it holds no state between calls.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::core::auth::{PasswordHasher, Sha256Hasher};
use crate::core::identity::IdentityResolver;
use crate::core::pending::PendingTransfers;
use crate::store::{AccountStore, IdentityStore, UserStore};
use crate::types::{
    Account, Broadcast, CallerContext, LedgerError, Roster, TransactionOutcome, TransferPrompt,
    TransferToken, User,
};

/// Fixed notice sent to the buyer when the seller declines
const DECLINE_NOTICE: &str = "haha sorry";

/// Chip transaction engine
///
/// Orchestrates identity resolution, balance mutation, and broadcast
/// construction over shared store handles. All methods take `&self`; the
/// engine is safe to share across threads when its stores are.
pub struct ChipEngine<U, I, A, H = Sha256Hasher> {
    users: Arc<U>,
    accounts: Arc<A>,
    identity: IdentityResolver<U, I>,
    pending: PendingTransfers,
    hasher: H,
}

impl<U, I, A> ChipEngine<U, I, A, Sha256Hasher>
where
    U: UserStore,
    I: IdentityStore,
    A: AccountStore,
{
    /// Create an engine with the default SHA-256 password hasher
    pub fn new(users: Arc<U>, identities: Arc<I>, accounts: Arc<A>) -> Self {
        Self::with_hasher(users, identities, accounts, Sha256Hasher)
    }
}

impl<U, I, A, H> ChipEngine<U, I, A, H>
where
    U: UserStore,
    I: IdentityStore,
    A: AccountStore,
    H: PasswordHasher,
{
    /// Create an engine with a custom password hasher
    pub fn with_hasher(users: Arc<U>, identities: Arc<I>, accounts: Arc<A>, hasher: H) -> Self {
        let identity = IdentityResolver::new(Arc::clone(&users), identities);
        ChipEngine {
            users,
            accounts,
            identity,
            pending: PendingTransfers::new(),
            hasher,
        }
    }

    /// The identity layer, exposed for adapters (fan-out, strict lookups)
    pub fn identity(&self) -> &IdentityResolver<U, I> {
        &self.identity
    }

    /// The pending-transfer registry, exposed for diagnostics and sweeps
    pub fn pending(&self) -> &PendingTransfers {
        &self.pending
    }

    /// Shared precondition: every operation takes a strictly positive amount
    fn validate_amount(amount: i64) -> Result<(), LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::invalid_amount(amount));
        }
        Ok(())
    }

    /// One broadcast per currently-known user, ordered by recipient id
    fn roster_broadcast(&self, text: &str) -> Result<Vec<Broadcast>, LedgerError> {
        let mut recipients: Vec<User> = self.users.list_all()?;
        recipients.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(recipients
            .into_iter()
            .map(|user| Broadcast::new(user.id, text))
            .collect())
    }

    fn user_or_not_found(&self, user_id: &str) -> Result<User, LedgerError> {
        self.users
            .get(user_id)?
            .ok_or_else(|| LedgerError::user_not_found(user_id))
    }

    /// Look up a player by platform username
    fn user_by_username(&self, username: &str) -> Result<User, LedgerError> {
        let account = self
            .accounts
            .by_username(username)?
            .ok_or_else(|| LedgerError::user_not_found(username))?;
        self.user_or_not_found(&account.id)
    }

    /// Buy chips from the bank
    ///
    /// Debits the caller by `amount` (the buyer now owes the bank) and
    /// announces the purchase to every known user. The caller is resolved,
    /// and created if unknown, before the roster is read, so a first-time
    /// buyer is included in their own broadcast.
    pub fn buy_from_bank(
        &self,
        ctx: &CallerContext,
        amount: i64,
    ) -> Result<TransactionOutcome, LedgerError> {
        Self::validate_amount(amount)?;
        let user = self.identity.resolve_caller(ctx)?;
        self.users.add_balance(&user.id, -amount)?;
        info!(user_id = %user.id, amount, "bank buy");

        let text = format!("{} buys {}", user.display_name(), amount);
        Ok(TransactionOutcome::with_broadcasts(
            self.roster_broadcast(&text)?,
        ))
    }

    /// Sell chips to the bank
    ///
    /// Credits the caller by `amount`; otherwise identical in shape to
    /// [`Self::buy_from_bank`].
    pub fn sell_to_bank(
        &self,
        ctx: &CallerContext,
        amount: i64,
    ) -> Result<TransactionOutcome, LedgerError> {
        Self::validate_amount(amount)?;
        let user = self.identity.resolve_caller(ctx)?;
        self.users.add_balance(&user.id, amount)?;
        info!(user_id = %user.id, amount, "bank sell");

        let text = format!("{} sells {}", user.display_name(), amount);
        Ok(TransactionOutcome::with_broadcasts(
            self.roster_broadcast(&text)?,
        ))
    }

    /// Start a player-to-player buy
    ///
    /// Read-only: resolves the caller as the buyer and returns every other
    /// known user as a candidate seller for the adapter to present. No
    /// balance moves and nothing is recorded yet.
    ///
    /// # Errors
    ///
    /// [`LedgerError::NoCounterpart`] when the caller is the only player.
    pub fn initiate_transfer(
        &self,
        ctx: &CallerContext,
        amount: i64,
    ) -> Result<TransferPrompt, LedgerError> {
        Self::validate_amount(amount)?;
        let buyer = self.identity.resolve_caller(ctx)?;

        let mut candidates: Vec<User> = self
            .users
            .list_all()?
            .into_iter()
            .filter(|user| user.id != buyer.id)
            .collect();
        candidates.sort_by(|a, b| a.id.cmp(&b.id));

        if candidates.is_empty() {
            return Err(LedgerError::NoCounterpart);
        }

        Ok(TransferPrompt { buyer, candidates })
    }

    /// Record a transfer proposal once a specific seller has been chosen
    ///
    /// Verifies both parties exist, stores the pending record, and returns
    /// the correlation token the seller's response must carry.
    pub fn propose_transfer(
        &self,
        buyer_id: &str,
        seller_id: &str,
        amount: i64,
    ) -> Result<TransferToken, LedgerError> {
        Self::validate_amount(amount)?;
        self.user_or_not_found(buyer_id)?;
        self.user_or_not_found(seller_id)?;

        let token = self.pending.propose(buyer_id, seller_id, amount);
        info!(buyer_id, seller_id, amount, %token, "transfer proposed");
        Ok(token)
    }

    /// Apply a proposed transfer after the seller confirmed
    ///
    /// Takes the pending record first, so of two racing responses exactly
    /// one proceeds to mutate balances. Then debits the buyer, credits the
    /// seller, and announces the trade to every known user.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::TransferResolved`] when the token was already
    ///   answered (or never existed); balances are untouched.
    /// - [`LedgerError::UserNotFound`] when either party has vanished from
    ///   the user store; the proposal is consumed and stays failed.
    pub fn confirm_transfer(
        &self,
        token: TransferToken,
    ) -> Result<TransactionOutcome, LedgerError> {
        let record = self
            .pending
            .take(token)
            .ok_or_else(|| LedgerError::transfer_resolved(token))?;

        let buyer = self.user_or_not_found(&record.buyer)?;
        let seller = self.user_or_not_found(&record.seller)?;

        // Debit before credit: a fault between the two deltas can only
        // under-credit, never mint chips.
        self.users.add_balance(&buyer.id, -record.amount)?;
        self.users.add_balance(&seller.id, record.amount)?;
        info!(
            buyer_id = %buyer.id,
            seller_id = %seller.id,
            amount = record.amount,
            %token,
            "transfer confirmed"
        );

        let text = format!(
            "{} buys {} from {}",
            buyer.display_name(),
            record.amount,
            seller.display_name()
        );
        Ok(TransactionOutcome::with_broadcasts(
            self.roster_broadcast(&text)?,
        ))
    }

    /// Decline a proposed transfer
    ///
    /// No balance changes. Consumes the pending record and produces exactly
    /// one broadcast, addressed to the buyer alone.
    pub fn reject_transfer(&self, token: TransferToken) -> Result<TransactionOutcome, LedgerError> {
        let record = self
            .pending
            .take(token)
            .ok_or_else(|| LedgerError::transfer_resolved(token))?;
        info!(buyer_id = %record.buyer, seller_id = %record.seller, %token, "transfer rejected");

        Ok(TransactionOutcome::with_broadcasts(vec![Broadcast::new(
            record.buyer,
            DECLINE_NOTICE,
        )]))
    }

    /// Buy chips directly from a player addressed by platform username
    ///
    /// The username form of the command was always immediate: no proposal,
    /// no confirmation. Debits the caller, credits the named seller, and
    /// announces the trade.
    pub fn buy_from_player(
        &self,
        ctx: &CallerContext,
        username: &str,
        amount: i64,
    ) -> Result<TransactionOutcome, LedgerError> {
        Self::validate_amount(amount)?;
        let buyer = self.identity.resolve_caller(ctx)?;
        let seller = self.user_by_username(username)?;

        self.users.add_balance(&buyer.id, -amount)?;
        self.users.add_balance(&seller.id, amount)?;
        info!(buyer_id = %buyer.id, seller_id = %seller.id, amount, "direct buy");

        let text = format!(
            "{} buys {} from {}",
            buyer.display_name(),
            amount,
            seller.display_name()
        );
        Ok(TransactionOutcome::with_broadcasts(
            self.roster_broadcast(&text)?,
        ))
    }

    /// Sell chips directly to a player addressed by platform username
    ///
    /// Mirror image of [`Self::buy_from_player`]: credits the caller,
    /// debits the named target.
    pub fn sell_to_player(
        &self,
        ctx: &CallerContext,
        username: &str,
        amount: i64,
    ) -> Result<TransactionOutcome, LedgerError> {
        Self::validate_amount(amount)?;
        let seller = self.identity.resolve_caller(ctx)?;
        let target = self.user_by_username(username)?;

        self.users.add_balance(&target.id, -amount)?;
        self.users.add_balance(&seller.id, amount)?;
        info!(seller_id = %seller.id, target_id = %target.id, amount, "direct sell");

        let text = format!(
            "{} sells {} to {}",
            seller.display_name(),
            amount,
            target.display_name()
        );
        Ok(TransactionOutcome::with_broadcasts(
            self.roster_broadcast(&text)?,
        ))
    }

    /// Register a new account or log into an existing one, then link the
    /// caller's external identity to it
    ///
    /// An unknown username registers: account and user are created as a
    /// pair sharing one generated id. A known username logs in after the
    /// password verifies. Either way the caller's (channel, external_id)
    /// is pointed at the account's user, replacing any previous link.
    ///
    /// # Errors
    ///
    /// [`LedgerError::InvalidCredentials`] on a password mismatch; the
    /// error text does not disclose whether the username existed.
    pub fn register_or_login(
        &self,
        ctx: &CallerContext,
        username: &str,
        password: &str,
    ) -> Result<User, LedgerError> {
        let user = match self.accounts.by_username(username)? {
            Some(account) => {
                if !self.hasher.verify(password, &account.password_hash) {
                    return Err(LedgerError::InvalidCredentials);
                }
                self.user_or_not_found(&account.id)?
            }
            None => {
                let id = Uuid::new_v4().to_string();
                self.accounts.create(Account::new(
                    id.clone(),
                    username,
                    self.hasher.hash(password),
                ))?;
                let user = User::new(id, ctx.first_name.clone(), ctx.last_name.clone());
                self.users.insert_if_absent(user.clone())?;
                info!(user_id = %user.id, username, "registered account");
                user
            }
        };

        self.identity
            .link(&ctx.channel, &ctx.external_id, &user.id)?;
        Ok(user)
    }

    /// Log the caller's device out
    ///
    /// Removes the external-identity link; idempotent, so logging out while
    /// already logged out succeeds quietly.
    pub fn logout(&self, ctx: &CallerContext) -> Result<(), LedgerError> {
        self.identity.unlink(&ctx.channel, &ctx.external_id)
    }

    /// Snapshot the table: every player plus the summed balance
    pub fn roster(&self) -> Result<Roster, LedgerError> {
        let mut players = self.users.list_all()?;
        players.sort_by(|a, b| {
            a.display_name()
                .cmp(&b.display_name())
                .then_with(|| a.id.cmp(&b.id))
        });
        let total = players.iter().map(|user| user.balance).sum();
        Ok(Roster { players, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryAccountStore, MemoryIdentityStore, MemoryUserStore};
    use rstest::rstest;

    type TestEngine = ChipEngine<MemoryUserStore, MemoryIdentityStore, MemoryAccountStore>;

    fn engine() -> TestEngine {
        ChipEngine::new(
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryIdentityStore::new()),
            Arc::new(MemoryAccountStore::new()),
        )
    }

    fn ctx(external_id: &str, first_name: &str, last_name: &str) -> CallerContext {
        CallerContext::new("telegram", external_id, first_name, last_name)
    }

    fn balance_of(engine: &TestEngine, user_id: &str) -> i64 {
        engine.users.get(user_id).unwrap().unwrap().balance
    }

    #[test]
    fn test_buy_from_bank_creates_user_and_debits() {
        let engine = engine();

        let outcome = engine.buy_from_bank(&ctx("12345", "John", "Doe"), 100).unwrap();

        assert_eq!(balance_of(&engine, "12345"), -100);
        // The first-time buyer is part of their own broadcast.
        assert_eq!(outcome.broadcasts.len(), 1);
        assert_eq!(outcome.broadcasts[0].recipient, "12345");
        assert_eq!(outcome.broadcasts[0].text, "John Doe buys 100");
    }

    #[rstest]
    #[case::zero(0)]
    #[case::negative(-25)]
    fn test_bank_operations_reject_non_positive_amounts(#[case] amount: i64) {
        let engine = engine();
        let caller = ctx("12345", "John", "Doe");

        let buy = engine.buy_from_bank(&caller, amount);
        let sell = engine.sell_to_bank(&caller, amount);

        assert!(matches!(buy, Err(LedgerError::InvalidAmount { .. })));
        assert!(matches!(sell, Err(LedgerError::InvalidAmount { .. })));
        // The precondition fires before resolution: no user was created.
        assert!(engine.users.get("12345").unwrap().is_none());
    }

    #[test]
    fn test_buy_then_sell_same_amount_restores_balance() {
        let engine = engine();
        let caller = ctx("12345", "John", "Doe");

        engine.buy_from_bank(&caller, 100).unwrap();
        engine.sell_to_bank(&caller, 100).unwrap();

        assert_eq!(balance_of(&engine, "12345"), 0);
    }

    #[test]
    fn test_bank_broadcasts_reach_every_user() {
        let engine = engine();
        engine.buy_from_bank(&ctx("1", "Ann", ""), 10).unwrap();
        engine.buy_from_bank(&ctx("2", "Ben", ""), 10).unwrap();

        let outcome = engine.sell_to_bank(&ctx("3", "Cas", ""), 5).unwrap();

        let recipients: Vec<&str> = outcome
            .broadcasts
            .iter()
            .map(|b| b.recipient.as_str())
            .collect();
        assert_eq!(recipients, vec!["1", "2", "3"]);
        assert!(outcome.broadcasts.iter().all(|b| b.text == "Cas sells 5"));
    }

    #[test]
    fn test_initiate_transfer_excludes_caller_from_candidates() {
        let engine = engine();
        engine.buy_from_bank(&ctx("1", "Ann", ""), 10).unwrap();
        engine.buy_from_bank(&ctx("2", "Ben", ""), 10).unwrap();

        let prompt = engine.initiate_transfer(&ctx("1", "Ann", ""), 30).unwrap();

        assert_eq!(prompt.buyer.id, "1");
        assert_eq!(prompt.candidates.len(), 1);
        assert_eq!(prompt.candidates[0].id, "2");
    }

    #[test]
    fn test_initiate_transfer_alone_at_the_table() {
        let engine = engine();

        let result = engine.initiate_transfer(&ctx("1", "Ann", ""), 30);

        assert!(matches!(result, Err(LedgerError::NoCounterpart)));
    }

    #[test]
    fn test_initiate_transfer_moves_no_balance() {
        let engine = engine();
        engine.buy_from_bank(&ctx("1", "Ann", ""), 10).unwrap();
        engine.sell_to_bank(&ctx("2", "Ben", ""), 10).unwrap();

        engine.initiate_transfer(&ctx("1", "Ann", ""), 30).unwrap();

        assert_eq!(balance_of(&engine, "1"), -10);
        assert_eq!(balance_of(&engine, "2"), 10);
        assert!(engine.pending().is_empty());
    }

    #[test]
    fn test_propose_transfer_requires_known_parties() {
        let engine = engine();
        engine.buy_from_bank(&ctx("1", "Ann", ""), 10).unwrap();

        let result = engine.propose_transfer("1", "ghost", 30);

        assert!(matches!(result, Err(LedgerError::UserNotFound { .. })));
        assert!(engine.pending().is_empty());
    }

    #[test]
    fn test_confirm_transfer_moves_amount_and_conserves_total() {
        let engine = engine();
        engine.buy_from_bank(&ctx("1", "Ann", ""), 100).unwrap();
        engine.sell_to_bank(&ctx("2", "Ben", ""), 100).unwrap();
        let total_before = engine.roster().unwrap().total;

        let token = engine.propose_transfer("1", "2", 30).unwrap();
        let outcome = engine.confirm_transfer(token).unwrap();

        assert_eq!(balance_of(&engine, "1"), -130);
        assert_eq!(balance_of(&engine, "2"), 130);
        assert_eq!(engine.roster().unwrap().total, total_before);
        assert_eq!(outcome.broadcasts.len(), 2);
        assert!(outcome.broadcasts.iter().all(|b| b.text == "Ann buys 30 from Ben"));
    }

    #[test]
    fn test_second_confirm_is_rejected_without_balance_change() {
        let engine = engine();
        engine.buy_from_bank(&ctx("1", "Ann", ""), 100).unwrap();
        engine.sell_to_bank(&ctx("2", "Ben", ""), 100).unwrap();
        let token = engine.propose_transfer("1", "2", 30).unwrap();

        engine.confirm_transfer(token).unwrap();
        let replay = engine.confirm_transfer(token);

        assert!(matches!(replay, Err(LedgerError::TransferResolved { .. })));
        assert_eq!(balance_of(&engine, "1"), -130);
        assert_eq!(balance_of(&engine, "2"), 130);
    }

    #[test]
    fn test_reject_transfer_notifies_buyer_only() {
        let engine = engine();
        engine.buy_from_bank(&ctx("1", "Ann", ""), 100).unwrap();
        engine.sell_to_bank(&ctx("2", "Ben", ""), 100).unwrap();
        let token = engine.propose_transfer("1", "2", 30).unwrap();

        let outcome = engine.reject_transfer(token).unwrap();

        assert_eq!(balance_of(&engine, "1"), -100);
        assert_eq!(balance_of(&engine, "2"), 100);
        assert_eq!(outcome.broadcasts.len(), 1);
        assert_eq!(outcome.broadcasts[0].recipient, "1");
        assert_eq!(outcome.broadcasts[0].text, "haha sorry");
    }

    #[test]
    fn test_reject_after_confirm_sees_resolved_token() {
        let engine = engine();
        engine.buy_from_bank(&ctx("1", "Ann", ""), 100).unwrap();
        engine.sell_to_bank(&ctx("2", "Ben", ""), 100).unwrap();
        let token = engine.propose_transfer("1", "2", 30).unwrap();

        engine.confirm_transfer(token).unwrap();
        let result = engine.reject_transfer(token);

        assert!(matches!(result, Err(LedgerError::TransferResolved { .. })));
    }

    #[test]
    fn test_concurrent_confirms_apply_the_transfer_once() {
        let engine = engine();
        engine.buy_from_bank(&ctx("1", "Ann", ""), 100).unwrap();
        engine.sell_to_bank(&ctx("2", "Ben", ""), 100).unwrap();
        let token = engine.propose_transfer("1", "2", 30).unwrap();

        let successes: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| engine.confirm_transfer(token).is_ok() as usize))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });

        assert_eq!(successes, 1);
        assert_eq!(balance_of(&engine, "1"), -130);
        assert_eq!(balance_of(&engine, "2"), 130);
    }

    #[test]
    fn test_direct_buy_by_username() {
        let engine = engine();
        let seller = engine
            .register_or_login(&ctx("200", "Jane", "Smith"), "jane", "pw")
            .unwrap();

        let outcome = engine
            .buy_from_player(&ctx("100", "John", "Doe"), "jane", 40)
            .unwrap();

        assert_eq!(balance_of(&engine, "100"), -40);
        assert_eq!(balance_of(&engine, &seller.id), 40);
        assert!(outcome
            .broadcasts
            .iter()
            .all(|b| b.text == "John Doe buys 40 from Jane Smith"));
    }

    #[test]
    fn test_direct_sell_by_username() {
        let engine = engine();
        let target = engine
            .register_or_login(&ctx("200", "Jane", "Smith"), "jane", "pw")
            .unwrap();

        engine
            .sell_to_player(&ctx("100", "John", "Doe"), "jane", 40)
            .unwrap();

        assert_eq!(balance_of(&engine, "100"), 40);
        assert_eq!(balance_of(&engine, &target.id), -40);
    }

    #[test]
    fn test_direct_buy_unknown_username() {
        let engine = engine();

        let result = engine.buy_from_player(&ctx("100", "John", "Doe"), "nobody", 40);

        assert!(matches!(result, Err(LedgerError::UserNotFound { .. })));
    }

    #[test]
    fn test_register_then_login_reuses_one_user_across_channels() {
        let engine = engine();

        let registered = engine
            .register_or_login(&ctx("12345", "John", "Doe"), "john", "pw")
            .unwrap();
        let telegram_user = engine.identity().find("telegram", "12345").unwrap().unwrap();

        let discord = CallerContext::new("discord", "67890", "John", "");
        let logged_in = engine.register_or_login(&discord, "john", "pw").unwrap();
        let discord_user = engine.identity().find("discord", "67890").unwrap().unwrap();

        assert_eq!(registered.id, logged_in.id);
        assert_eq!(telegram_user.id, discord_user.id);
    }

    #[test]
    fn test_login_with_wrong_password() {
        let engine = engine();
        engine
            .register_or_login(&ctx("12345", "John", "Doe"), "john", "pw")
            .unwrap();

        let result = engine.register_or_login(&ctx("99", "Eve", ""), "john", "guess");

        assert!(matches!(result, Err(LedgerError::InvalidCredentials)));
        // The attacker's device was not linked.
        assert!(engine.identity().find("telegram", "99").unwrap().is_none());
    }

    #[test]
    fn test_logout_is_idempotent() {
        let engine = engine();
        let caller = ctx("12345", "John", "Doe");
        engine.register_or_login(&caller, "john", "pw").unwrap();

        engine.logout(&caller).unwrap();
        engine.logout(&caller).unwrap();

        assert!(engine.identity().find("telegram", "12345").unwrap().is_none());
    }

    #[test]
    fn test_logout_then_legacy_resolution_provisions_a_fresh_user() {
        let engine = engine();
        let caller = ctx("12345", "John", "Doe");
        let account_user = engine.register_or_login(&caller, "john", "pw").unwrap();

        engine.logout(&caller).unwrap();
        // Legacy get-or-create no longer sees a link, so it provisions a
        // new user keyed off the raw external id.
        let legacy_user = engine.identity().resolve_caller(&caller).unwrap();

        assert_ne!(legacy_user.id, account_user.id);
        assert_eq!(legacy_user.id, "12345");
        // The login user keeps existing; no merge is attempted.
        assert!(engine.users.get(&account_user.id).unwrap().is_some());
    }

    #[test]
    fn test_roster_totals_and_ordering() {
        let engine = engine();
        engine.buy_from_bank(&ctx("1", "Zoe", ""), 100).unwrap();
        engine.sell_to_bank(&ctx("2", "Abe", ""), 30).unwrap();

        let roster = engine.roster().unwrap();

        assert_eq!(roster.total, -70);
        let names: Vec<String> = roster.players.iter().map(|u| u.display_name()).collect();
        assert_eq!(names, vec!["Abe".to_string(), "Zoe".to_string()]);
    }

    #[test]
    fn test_full_table_scenario() {
        let engine = engine();
        let ann = ctx("A", "Ann", "");

        // Ann buys 100 from the bank.
        let outcome = engine.buy_from_bank(&ann, 100).unwrap();
        assert_eq!(balance_of(&engine, "A"), -100);
        assert!(outcome.broadcasts[0].text.contains("100"));

        // Ann sells 50 back.
        engine.sell_to_bank(&ann, 50).unwrap();
        assert_eq!(balance_of(&engine, "A"), -50);

        // Ben joins; Ann buys 30 from him through the two-phase flow.
        engine.buy_from_bank(&ctx("B", "Ben", ""), 10).unwrap();
        engine.sell_to_bank(&ctx("B", "Ben", ""), 10).unwrap();
        let prompt = engine.initiate_transfer(&ann, 30).unwrap();
        assert_eq!(prompt.candidates.len(), 1);

        let token = engine.propose_transfer("A", "B", 30).unwrap();
        let outcome = engine.confirm_transfer(token).unwrap();
        assert_eq!(balance_of(&engine, "A"), -80);
        assert_eq!(balance_of(&engine, "B"), 30);
        assert!(outcome.broadcasts[0].text.contains("Ann"));
        assert!(outcome.broadcasts[0].text.contains("Ben"));
        assert!(outcome.broadcasts[0].text.contains("30"));

        // A second attempt gets declined: only Ann hears about it.
        let token = engine.propose_transfer("A", "B", 10).unwrap();
        let outcome = engine.reject_transfer(token).unwrap();
        assert_eq!(balance_of(&engine, "A"), -80);
        assert_eq!(balance_of(&engine, "B"), 30);
        assert_eq!(outcome.broadcasts.len(), 1);
        assert_eq!(outcome.broadcasts[0].recipient, "A");
    }
}
