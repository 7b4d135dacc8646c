//! In-memory host for tests and local simulation. **Never use in production.**
//!
//! Keeps native balances received through payouts, per-token balances and
//! allowances, a record of every completed transfer, configurable failures,
//! and an optional reentry hook that runs inside each transfer, the way a
//! hostile recipient contract would.
//!
//! Native value attached to a call is assumed to have arrived with the call;
//! only outbound native payouts are tracked.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use prizepool_types::{Amount, Identity, TokenAddress};

use crate::host::{Host, TransferOutcome};

/// Which rail a transfer used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rail {
    Native,
    Token(TokenAddress),
}

/// A completed transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRecord {
    pub rail: Rail,
    pub from: Identity,
    pub to: Identity,
    pub amount: Amount,
}

/// How an injected failure presents itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Callee returns a failure indicator.
    Reject,
    /// Callee aborts.
    Abort,
}

impl FailureMode {
    fn outcome(self, what: &str) -> TransferOutcome {
        match self {
            Self::Reject => TransferOutcome::Rejected,
            Self::Abort => TransferOutcome::Aborted {
                reason: format!("{what} aborted by simulation"),
            },
        }
    }
}

/// Callback run inside a transfer, after value moved and before the
/// transfer returns. Receives the reentry handle and the host itself.
pub type ReentryHook<R> = Box<dyn FnMut(&mut R, &mut SimulatedHost<R>, &TransferRecord)>;

#[derive(Debug, Default)]
struct TokenBook {
    balances: HashMap<Identity, Amount>,
    /// owner → amount approved for the escrow account.
    allowances: HashMap<Identity, Amount>,
}

/// In-memory [`Host`] implementation.
pub struct SimulatedHost<R: ?Sized> {
    escrow_account: Identity,
    now: DateTime<Utc>,
    native: HashMap<Identity, Amount>,
    tokens: HashMap<TokenAddress, TokenBook>,
    transfers: Vec<TransferRecord>,
    failing_recipients: HashMap<Identity, FailureMode>,
    failing_tokens: HashMap<TokenAddress, FailureMode>,
    hook: Option<ReentryHook<R>>,
}

impl<R: ?Sized> SimulatedHost<R> {
    /// A host whose registry lives at `escrow_account`.
    pub fn new(escrow_account: Identity) -> Self {
        Self {
            escrow_account,
            now: Utc::now(),
            native: HashMap::new(),
            tokens: HashMap::new(),
            transfers: Vec::new(),
            failing_recipients: HashMap::new(),
            failing_tokens: HashMap::new(),
            hook: None,
        }
    }

    // -- clock ---------------------------------------------------------------

    pub fn set_now(&mut self, now: DateTime<Utc>) {
        self.now = now;
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    // -- token fixtures --------------------------------------------------------

    /// Credit `amount` of `token` to `owner` out of thin air.
    pub fn mint(&mut self, token: TokenAddress, owner: Identity, amount: Amount) {
        *self
            .tokens
            .entry(token)
            .or_default()
            .balances
            .entry(owner)
            .or_default() += amount;
    }

    /// `owner` approves the escrow account to pull `amount` of `token`.
    pub fn approve(&mut self, token: TokenAddress, owner: Identity, amount: Amount) {
        self.tokens
            .entry(token)
            .or_default()
            .allowances
            .insert(owner, amount);
    }

    pub fn token_balance(&self, token: TokenAddress, owner: Identity) -> Amount {
        self.tokens
            .get(&token)
            .and_then(|book| book.balances.get(&owner))
            .copied()
            .unwrap_or(0)
    }

    pub fn allowance(&self, token: TokenAddress, owner: Identity) -> Amount {
        self.tokens
            .get(&token)
            .and_then(|book| book.allowances.get(&owner))
            .copied()
            .unwrap_or(0)
    }

    /// Native currency received by `owner` through payouts.
    pub fn native_balance(&self, owner: Identity) -> Amount {
        self.native.get(&owner).copied().unwrap_or(0)
    }

    // -- failure injection -----------------------------------------------------

    /// Every transfer to `recipient` fails (either rail).
    pub fn fail_recipient(&mut self, recipient: Identity, mode: FailureMode) {
        self.failing_recipients.insert(recipient, mode);
    }

    /// Every call into `token` fails.
    pub fn fail_token(&mut self, token: TokenAddress, mode: FailureMode) {
        self.failing_tokens.insert(token, mode);
    }

    /// Remove all injected failures.
    pub fn heal(&mut self) {
        self.failing_recipients.clear();
        self.failing_tokens.clear();
    }

    // -- reentry -----------------------------------------------------------------

    /// Install a hook that runs inside every completed transfer.
    pub fn set_reentry_hook(&mut self, hook: ReentryHook<R>) {
        self.hook = Some(hook);
    }

    /// Completed transfers, oldest first.
    pub fn transfers(&self) -> &[TransferRecord] {
        &self.transfers
    }

    /// Total paid to `to` on `rail` across all completed transfers.
    pub fn total_received(&self, rail: Rail, to: Identity) -> Amount {
        self.transfers
            .iter()
            .filter(|t| t.rail == rail && t.to == to)
            .map(|t| t.amount)
            .sum()
    }

    fn complete(&mut self, reentry: &mut R, record: TransferRecord) -> TransferOutcome {
        self.transfers.push(record);
        // The hook is taken out while it runs, so a transfer issued from
        // inside the hook does not recurse into it.
        if let Some(mut hook) = self.hook.take() {
            hook(reentry, self, &record);
            if self.hook.is_none() {
                self.hook = Some(hook);
            }
        }
        TransferOutcome::Completed
    }

    fn move_tokens(
        &mut self,
        token: TokenAddress,
        from: Identity,
        to: Identity,
        amount: Amount,
    ) -> bool {
        let book = self.tokens.entry(token).or_default();
        let available = book.balances.get(&from).copied().unwrap_or(0);
        if available < amount {
            return false;
        }
        book.balances.insert(from, available - amount);
        *book.balances.entry(to).or_default() += amount;
        true
    }
}

impl<R: ?Sized> Host<R> for SimulatedHost<R> {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn send_native(&mut self, reentry: &mut R, to: Identity, amount: Amount) -> TransferOutcome {
        if let Some(mode) = self.failing_recipients.get(&to) {
            return mode.outcome("native receive");
        }
        *self.native.entry(to).or_default() += amount;
        let record = TransferRecord {
            rail: Rail::Native,
            from: self.escrow_account,
            to,
            amount,
        };
        self.complete(reentry, record)
    }

    fn token_transfer(
        &mut self,
        reentry: &mut R,
        token: TokenAddress,
        to: Identity,
        amount: Amount,
    ) -> TransferOutcome {
        if let Some(mode) = self.failing_tokens.get(&token) {
            return mode.outcome("token transfer");
        }
        if let Some(mode) = self.failing_recipients.get(&to) {
            return mode.outcome("token receive");
        }
        let from = self.escrow_account;
        if !self.move_tokens(token, from, to, amount) {
            return TransferOutcome::Rejected;
        }
        let record = TransferRecord {
            rail: Rail::Token(token),
            from,
            to,
            amount,
        };
        self.complete(reentry, record)
    }

    fn token_transfer_from(
        &mut self,
        reentry: &mut R,
        token: TokenAddress,
        from: Identity,
        to: Identity,
        amount: Amount,
    ) -> TransferOutcome {
        if let Some(mode) = self.failing_tokens.get(&token) {
            return mode.outcome("token transferFrom");
        }
        let allowance = self.allowance(token, from);
        if allowance < amount {
            return TransferOutcome::Rejected;
        }
        if !self.move_tokens(token, from, to, amount) {
            return TransferOutcome::Rejected;
        }
        self.tokens
            .entry(token)
            .or_default()
            .allowances
            .insert(from, allowance - amount);
        let record = TransferRecord {
            rail: Rail::Token(token),
            from,
            to,
            amount,
        };
        self.complete(reentry, record)
    }
}
