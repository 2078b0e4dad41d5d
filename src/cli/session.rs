//! Scripted table session
//!
//! A minimal channel adapter over the engine, standing in for the chat
//! bots: it parses newline-delimited commands, keeps the per-seller
//! correlation between a transfer prompt and the later confirm/reject (the
//! piece of state a real chat adapter derives from its reply UI), and fans
//! broadcasts out to external ids via the identity layer.
//!
//! Command grammar, one command per line, `#` starts a comment:
//!
//! ```text
//! <caller> join <username> <password>
//! <caller> leave
//! <caller> buy <amount> [username]
//! <caller> sell <amount> [username]
//! <caller> transfer <amount> <seller-caller>
//! <caller> confirm
//! <caller> reject
//! list
//! ```
//!
//! `<caller>` doubles as the external id and the display name on the "cli"
//! channel, the way a chat handle would.

use std::collections::HashMap;
use std::io::{self, BufRead, Write};

use crate::core::auth::PasswordHasher;
use crate::core::engine::ChipEngine;
use crate::store::{AccountStore, IdentityStore, UserStore};
use crate::types::{Broadcast, CallerContext, LedgerError, TransferToken};

/// Channel name this adapter registers identities under
pub const CHANNEL: &str = "cli";

/// Interpreter state for one scripted session
pub struct Session<U, I, A, H> {
    engine: ChipEngine<U, I, A, H>,

    /// Latest unanswered transfer prompt per seller handle
    ///
    /// A real chat adapter carries this correlation in its reply payloads;
    /// here the seller simply answers their most recent prompt.
    prompts: HashMap<String, TransferToken>,
}

impl<U, I, A, H> Session<U, I, A, H>
where
    U: UserStore,
    I: IdentityStore,
    A: AccountStore,
    H: PasswordHasher,
{
    pub fn new(engine: ChipEngine<U, I, A, H>) -> Self {
        Session {
            engine,
            prompts: HashMap::new(),
        }
    }

    pub fn engine(&self) -> &ChipEngine<U, I, A, H> {
        &self.engine
    }

    /// Run every command from `input`, writing deliveries and errors to `out`
    ///
    /// Business failures are reported inline and the session continues;
    /// only I/O faults abort the run.
    pub fn run(&mut self, input: impl BufRead, out: &mut impl Write) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if let Err(error) = self.dispatch(trimmed, out) {
                writeln!(out, "! {error}")?;
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, line: &str, out: &mut impl Write) -> Result<(), SessionError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();

        if tokens[0] == "list" {
            return self.print_roster(out);
        }
        if tokens.len() < 2 {
            return Err(SessionError::Usage);
        }

        let caller = ctx(tokens[0]);
        match (tokens[1], &tokens[2..]) {
            ("join", [username, password]) => {
                self.engine.register_or_login(&caller, username, password)?;
                writeln!(out, "@{} joined as '{}'", caller.external_id, username)?;
            }
            ("leave", []) => {
                self.engine.logout(&caller)?;
                writeln!(out, "@{} logged out", caller.external_id)?;
            }
            ("buy", [amount]) => {
                let outcome = self.engine.buy_from_bank(&caller, parse_amount(amount)?)?;
                self.deliver(&outcome.broadcasts, out)?;
            }
            ("buy", [amount, username]) => {
                let outcome =
                    self.engine
                        .buy_from_player(&caller, username, parse_amount(amount)?)?;
                self.deliver(&outcome.broadcasts, out)?;
            }
            ("sell", [amount]) => {
                let outcome = self.engine.sell_to_bank(&caller, parse_amount(amount)?)?;
                self.deliver(&outcome.broadcasts, out)?;
            }
            ("sell", [amount, username]) => {
                let outcome =
                    self.engine
                        .sell_to_player(&caller, username, parse_amount(amount)?)?;
                self.deliver(&outcome.broadcasts, out)?;
            }
            ("transfer", [amount, seller_handle]) => {
                let amount = parse_amount(amount)?;
                let prompt = self.engine.initiate_transfer(&caller, amount)?;
                let seller = self
                    .engine
                    .identity()
                    .find(CHANNEL, seller_handle)?
                    .ok_or_else(|| LedgerError::user_not_found(*seller_handle))?;
                let token = self
                    .engine
                    .propose_transfer(&prompt.buyer.id, &seller.id, amount)?;
                self.prompts.insert(seller_handle.to_string(), token);
                writeln!(
                    out,
                    "@{seller_handle} {} wants to buy {amount} from you (confirm/reject)",
                    prompt.buyer.display_name()
                )?;
            }
            ("confirm", []) => {
                let token = self.take_prompt(tokens[0])?;
                let outcome = self.engine.confirm_transfer(token)?;
                self.deliver(&outcome.broadcasts, out)?;
            }
            ("reject", []) => {
                let token = self.take_prompt(tokens[0])?;
                let outcome = self.engine.reject_transfer(token)?;
                self.deliver(&outcome.broadcasts, out)?;
            }
            _ => return Err(SessionError::Usage),
        }
        Ok(())
    }

    fn take_prompt(&mut self, seller_handle: &str) -> Result<TransferToken, SessionError> {
        self.prompts
            .remove(seller_handle)
            .ok_or(SessionError::NoPrompt)
    }

    /// Fan each broadcast out to the recipient's endpoints on this channel
    fn deliver(&self, broadcasts: &[Broadcast], out: &mut impl Write) -> Result<(), SessionError> {
        for broadcast in broadcasts {
            let endpoints = self
                .engine
                .identity()
                .external_ids_for(CHANNEL, &broadcast.recipient)?;
            if endpoints.is_empty() {
                // Known on another channel only; nothing to deliver here.
                continue;
            }
            for external_id in endpoints {
                writeln!(out, "@{external_id} {}", broadcast.text)?;
            }
        }
        Ok(())
    }

    fn print_roster(&self, out: &mut impl Write) -> Result<(), SessionError> {
        let roster = self.engine.roster()?;
        if roster.players.is_empty() {
            writeln!(out, "No players at the table yet.")?;
            return Ok(());
        }
        for player in &roster.players {
            writeln!(out, "{}: {}", player.display_name(), player.balance)?;
        }
        writeln!(out, "Total balance: {}", roster.total)?;
        Ok(())
    }
}

/// Build the caller context a chat adapter would extract from a message
fn ctx(handle: &str) -> CallerContext {
    CallerContext::new(CHANNEL, handle, handle, "")
}

fn parse_amount(token: &str) -> Result<i64, SessionError> {
    token.parse().map_err(|_| SessionError::BadAmount)
}

/// Session-level failures, folded into one printable error
enum SessionError {
    Usage,
    BadAmount,
    NoPrompt,
    Io(io::Error),
    Ledger(LedgerError),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Usage => write!(f, "Unknown or incomplete command."),
            SessionError::BadAmount => write!(f, "Amount must be a number."),
            SessionError::NoPrompt => write!(f, "You have no transfer request to answer."),
            SessionError::Io(error) => write!(f, "{error}"),
            SessionError::Ledger(error) => write!(f, "{error}"),
        }
    }
}

impl From<io::Error> for SessionError {
    fn from(error: io::Error) -> Self {
        SessionError::Io(error)
    }
}

impl From<LedgerError> for SessionError {
    fn from(error: LedgerError) -> Self {
        SessionError::Ledger(error)
    }
}
