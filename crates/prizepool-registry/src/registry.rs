//! The competition registry.
//!
//! Owns the competition arena, both ledgers, the event log and the
//! administrator capability, and sequences every operation:
//!
//! ```text
//! guard check → authorize → validate → mutate (journaled) → transfer → log → verify
//! ```
//!
//! Ledger state is committed before any outbound transfer, and the transfer
//! runs with the competition's reentrancy guard held. Any error unwinds the
//! journal to the operation's entry mark, so a failed call leaves the
//! registry exactly as it found it. Value already moved by the host is the
//! host's to revert.

use chrono::{DateTime, Utc};
use prizepool_escrow::{ClaimLedger, Host, ParticipantLedger, PayoutEngine};
use prizepool_proof::{MerkleVerifier, NodeHash};
use prizepool_types::{
    Amount, Competition, CompetitionId, CompetitionMode, CompetitionStatus, EventKind, Identity,
    LedgerEvent, MerkleRoot, PrizePoolError, RegistryConfig, Result, SettlementAsset, constants,
};

use crate::{
    auth::{AdminCapability, CallContext},
    event_log::EventLog,
    guard::ReentrancyGuard,
    journal::{Journal, JournalEntry},
};

/// Competition escrow and prize settlement.
///
/// Every mutating operation is generic over the [`Host`] that moves value.
/// The host receives the registry itself as its reentry handle, so a
/// recipient can call back in while a transfer is in flight.
#[derive(Debug)]
pub struct CompetitionRegistry {
    config: RegistryConfig,
    admin: AdminCapability,
    payouts: PayoutEngine,
    guard: ReentrancyGuard,
    competitions: Vec<Competition>,
    participants: ParticipantLedger,
    claims: ClaimLedger,
    events: EventLog,
    journal: Journal,
}

impl CompetitionRegistry {
    /// Create an empty registry.
    ///
    /// # Errors
    /// Returns `Configuration` if `config` does not validate.
    pub fn new(config: RegistryConfig) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            engine = constants::ENGINE_NAME,
            version = constants::VERSION,
            administrator = %config.administrator,
            escrow_account = %config.escrow_account,
            reentrancy_guard = config.reentrancy_guard,
            verify_conservation = config.verify_conservation,
            "Competition registry initialized"
        );
        Ok(Self {
            admin: AdminCapability::new(config.administrator),
            payouts: PayoutEngine::new(config.escrow_account),
            guard: ReentrancyGuard::new(config.reentrancy_guard),
            competitions: Vec::new(),
            participants: ParticipantLedger::new(),
            claims: ClaimLedger::new(),
            events: EventLog::new(),
            journal: Journal::new(),
            config,
        })
    }

    // =================================================================
    // Operations
    // =================================================================

    /// Open a new competition. Administrator only, non-payable.
    ///
    /// # Errors
    /// `Unauthorized`, `UnexpectedPayment`, or `InvalidIdentity` for a null
    /// token address.
    pub fn create_competition<H>(
        &mut self,
        host: &mut H,
        ctx: &CallContext,
        mode: CompetitionMode,
        settlement_asset: SettlementAsset,
        entry_fee: Amount,
    ) -> Result<CompetitionId>
    where
        H: Host<Self> + ?Sized,
    {
        self.atomically("create_competition", |reg| {
            reg.admin.authorize(ctx.caller)?;
            PayoutEngine::ensure_no_value(ctx.value)?;
            if let SettlementAsset::Token(token) = settlement_asset {
                if token.0.is_null() {
                    return Err(PrizePoolError::InvalidIdentity {
                        reason: "token address must not be null".into(),
                    });
                }
            }

            let id = reg.next_id()?;
            let now = host.now();
            reg.competitions.push(Competition::new(
                id,
                mode,
                settlement_asset,
                entry_fee,
                ctx.caller,
                now,
            ));
            reg.journal.record(JournalEntry::Created(id));
            reg.emit(
                Some(id),
                EventKind::CompetitionCreated {
                    mode,
                    settlement_asset,
                    entry_fee,
                    administrator: ctx.caller,
                },
                now,
            );

            tracing::info!(
                competition = %id,
                mode = %mode,
                asset = %settlement_asset,
                entry_fee = entry_fee,
                "Competition created"
            );
            Ok(id)
        })
    }

    /// Pay the entry fee and enroll `identity`. Anyone may pay on behalf of
    /// anyone; the caller is the payer.
    ///
    /// # Errors
    /// `ReentrantCall`, `CompetitionNotFound`, `InvalidState`,
    /// `InvalidIdentity`, `AlreadyJoined`, `PaymentMismatch`,
    /// `UnexpectedPayment`, `TransferFailure`.
    pub fn join<H>(
        &mut self,
        host: &mut H,
        ctx: &CallContext,
        competition: CompetitionId,
        identity: Identity,
    ) -> Result<()>
    where
        H: Host<Self> + ?Sized,
    {
        self.atomically("join", |reg| {
            reg.guard.check(competition)?;
            let current = reg.competition(competition)?;
            current.ensure_status(CompetitionStatus::Active)?;
            let (asset, fee) = (current.settlement_asset, current.entry_fee);
            if identity.is_null() {
                return Err(PrizePoolError::InvalidIdentity {
                    reason: "cannot enroll the null identity".into(),
                });
            }

            reg.participants.enroll(competition, identity)?;
            reg.journal.record(JournalEntry::Enrolled {
                competition,
                identity,
            });
            let entry = reg.modify(competition)?;
            entry.participant_count = entry
                .participant_count
                .checked_add(1)
                .ok_or(PrizePoolError::ArithmeticOverflow {
                    context: "participant count",
                })?;

            let payouts = reg.payouts;
            reg.guard.enter(competition);
            let collected = payouts.collect(host, reg, asset, ctx.caller, fee, ctx.value);
            reg.guard.exit(competition);
            collected?;

            // A reentrant call during the pull may have finalized the
            // competition when the guard is off.
            let entry = reg.modify(competition)?;
            entry.ensure_status(CompetitionStatus::Active)?;
            entry.escrow.credit(fee)?;
            let pooled = entry.pooled_balance();

            reg.emit(
                Some(competition),
                EventKind::EntryJoined {
                    participant: identity,
                    payer: ctx.caller,
                    amount: fee,
                },
                host.now(),
            );
            tracing::debug!(
                competition = %competition,
                participant = %identity,
                payer = %ctx.caller,
                amount = fee,
                pooled = pooled,
                "Entry joined"
            );
            reg.check_conservation(competition)
        })
    }

    /// Settle a single-winner competition: the whole pool goes to `winner`.
    /// Administrator only. Returns the amount paid.
    ///
    /// # Errors
    /// `ReentrantCall`, `Unauthorized`, `UnexpectedPayment`,
    /// `CompetitionNotFound`, `InvalidMode`, `InvalidState`,
    /// `InvalidIdentity`, `NotAParticipant`, `TransferFailure`.
    pub fn set_winner<H>(
        &mut self,
        host: &mut H,
        ctx: &CallContext,
        competition: CompetitionId,
        winner: Identity,
    ) -> Result<Amount>
    where
        H: Host<Self> + ?Sized,
    {
        self.atomically("set_winner", |reg| {
            reg.guard.check(competition)?;
            reg.admin.authorize(ctx.caller)?;
            PayoutEngine::ensure_no_value(ctx.value)?;
            let current = reg.competition(competition)?;
            current.ensure_mode(CompetitionMode::SingleWinner)?;
            current.ensure_status(CompetitionStatus::Active)?;
            if winner.is_null() {
                return Err(PrizePoolError::InvalidIdentity {
                    reason: "winner must not be the null identity".into(),
                });
            }
            if !reg.participants.has_joined(competition, winner) {
                return Err(PrizePoolError::NotAParticipant {
                    competition,
                    identity: winner,
                });
            }

            let entry = reg.modify(competition)?;
            entry.single_winner = Some(winner);
            entry.mark_completed()?;
            let amount = entry.escrow.drain()?;
            let asset = entry.settlement_asset;

            reg.emit(
                Some(competition),
                EventKind::WinnerSettled { winner, amount },
                host.now(),
            );

            reg.release(host, competition, asset, winner, amount)?;

            tracing::info!(
                competition = %competition,
                winner = %winner,
                amount = amount,
                asset = %asset,
                "Winner settled"
            );
            reg.check_conservation(competition)?;
            Ok(amount)
        })
    }

    /// Finalize a batch-proof competition by committing to a claim root.
    /// Administrator only. No value moves.
    ///
    /// # Errors
    /// `ReentrantCall`, `Unauthorized`, `UnexpectedPayment`,
    /// `CompetitionNotFound`, `InvalidMode`, `InvalidState`, `InvalidRoot`.
    pub fn publish_claim_root<H>(
        &mut self,
        host: &mut H,
        ctx: &CallContext,
        competition: CompetitionId,
        root: MerkleRoot,
    ) -> Result<()>
    where
        H: Host<Self> + ?Sized,
    {
        self.atomically("publish_claim_root", |reg| {
            reg.guard.check(competition)?;
            reg.admin.authorize(ctx.caller)?;
            PayoutEngine::ensure_no_value(ctx.value)?;
            let current = reg.competition(competition)?;
            current.ensure_mode(CompetitionMode::BatchProof)?;
            current.ensure_status(CompetitionStatus::Active)?;
            if root.is_zero() {
                return Err(PrizePoolError::InvalidRoot {
                    reason: "claim root must not be zero".into(),
                });
            }

            let entry = reg.modify(competition)?;
            entry.claim_root = Some(root);
            entry.mark_completed()?;
            let pooled = entry.pooled_balance();

            reg.emit(
                Some(competition),
                EventKind::ClaimRootPublished { root },
                host.now(),
            );
            tracing::info!(
                competition = %competition,
                root = %root,
                pooled = pooled,
                "Claim root published"
            );
            reg.check_conservation(competition)
        })
    }

    /// Withdraw against a cumulative entitlement committed in the claim root.
    /// The caller is the claimant. Pays `total_entitlement` minus what the
    /// caller already withdrew, and returns that amount.
    ///
    /// # Errors
    /// `ReentrantCall`, `UnexpectedPayment`, `CompetitionNotFound`,
    /// `InvalidMode`, `InvalidState`, `RootNotSet`, `InvalidAmount`,
    /// `InvalidProof`, `AlreadyClaimed`, `InsufficientPool`,
    /// `TransferFailure`.
    pub fn claim<H>(
        &mut self,
        host: &mut H,
        ctx: &CallContext,
        competition: CompetitionId,
        total_entitlement: Amount,
        proof: &[NodeHash],
    ) -> Result<Amount>
    where
        H: Host<Self> + ?Sized,
    {
        self.atomically("claim", |reg| {
            reg.guard.check(competition)?;
            PayoutEngine::ensure_no_value(ctx.value)?;
            let claimant = ctx.caller;
            let current = reg.competition(competition)?;
            current.ensure_mode(CompetitionMode::BatchProof)?;
            current.ensure_status(CompetitionStatus::Completed)?;
            let root = current
                .claim_root
                .filter(|root| !root.is_zero())
                .ok_or(PrizePoolError::RootNotSet(competition))?;
            let (asset, pooled) = (current.settlement_asset, current.pooled_balance());

            if total_entitlement == 0 {
                return Err(PrizePoolError::InvalidAmount {
                    reason: "entitlement must be positive".into(),
                });
            }
            if !MerkleVerifier::verify_claim(&root, claimant, total_entitlement, proof) {
                tracing::warn!(
                    competition = %competition,
                    claimant = %claimant,
                    entitlement = total_entitlement,
                    "Claim rejected: invalid proof"
                );
                return Err(PrizePoolError::InvalidProof { claimant });
            }
            let delta = reg
                .claims
                .delta_for(competition, claimant, total_entitlement)?;
            if delta > pooled {
                return Err(PrizePoolError::InsufficientPool {
                    needed: delta,
                    available: pooled,
                });
            }

            let previous = reg
                .claims
                .record(competition, claimant, total_entitlement)?;
            reg.journal.record(JournalEntry::Claimed {
                competition,
                claimant,
                previous,
            });
            reg.modify(competition)?.escrow.debit(delta)?;
            reg.emit(
                Some(competition),
                EventKind::PrizeClaimed {
                    claimant,
                    amount: delta,
                    total_claimed: total_entitlement,
                },
                host.now(),
            );

            reg.release(host, competition, asset, claimant, delta)?;

            tracing::info!(
                competition = %competition,
                claimant = %claimant,
                amount = delta,
                total_claimed = total_entitlement,
                "Prize claimed"
            );
            reg.check_conservation(competition)?;
            Ok(delta)
        })
    }

    /// Native value sent to the registry outside of `join`. Always refused.
    ///
    /// # Errors
    /// Always returns `UnexpectedPayment`.
    pub fn receive(&self, ctx: &CallContext) -> Result<()> {
        tracing::warn!(
            sender = %ctx.caller,
            amount = ctx.value,
            "Unsolicited deposit refused"
        );
        Err(PrizePoolError::UnexpectedPayment { amount: ctx.value })
    }

    /// Hand the administrator capability to `successor`. Administrator only.
    ///
    /// # Errors
    /// `Unauthorized`, `UnexpectedPayment`, or `InvalidIdentity` if the
    /// successor is null or the escrow account.
    pub fn transfer_administration<H>(
        &mut self,
        host: &mut H,
        ctx: &CallContext,
        successor: Identity,
    ) -> Result<()>
    where
        H: Host<Self> + ?Sized,
    {
        self.atomically("transfer_administration", |reg| {
            reg.admin.authorize(ctx.caller)?;
            PayoutEngine::ensure_no_value(ctx.value)?;
            if successor.is_null() {
                return Err(PrizePoolError::InvalidIdentity {
                    reason: "administrator must not be the null identity".into(),
                });
            }
            if successor == reg.payouts.escrow_account() {
                return Err(PrizePoolError::InvalidIdentity {
                    reason: "administrator must differ from the escrow account".into(),
                });
            }

            let previous = reg.admin.replace(successor);
            reg.journal.record(JournalEntry::AdminChanged { previous });
            reg.emit(
                None,
                EventKind::AdministrationTransferred {
                    previous,
                    current: successor,
                },
                host.now(),
            );
            tracing::info!(
                previous = %previous,
                current = %successor,
                "Administration transferred"
            );
            Ok(())
        })
    }

    // =================================================================
    // Queries
    // =================================================================

    /// # Errors
    /// Returns `CompetitionNotFound` for an unknown id.
    pub fn competition(&self, id: CompetitionId) -> Result<&Competition> {
        self.index_of(id)
            .map(|index| &self.competitions[index])
            .ok_or(PrizePoolError::CompetitionNotFound(id))
    }

    #[must_use]
    pub fn has_joined(&self, competition: CompetitionId, identity: Identity) -> bool {
        self.participants.has_joined(competition, identity)
    }

    /// Cumulative amount `claimant` withdrew from `competition`.
    #[must_use]
    pub fn claimed_amount(&self, competition: CompetitionId, claimant: Identity) -> Amount {
        self.claims.claimed(competition, claimant)
    }

    #[must_use]
    pub fn competition_count(&self) -> usize {
        self.competitions.len()
    }

    /// Participants of `competition` in join order.
    #[must_use]
    pub fn participants(&self, competition: CompetitionId) -> &[Identity] {
        self.participants.participants(competition)
    }

    /// The full event log, oldest first.
    #[must_use]
    pub fn events(&self) -> &[LedgerEvent] {
        self.events.all()
    }

    pub fn events_for(&self, competition: CompetitionId) -> impl Iterator<Item = &LedgerEvent> + '_ {
        self.events.for_competition(competition)
    }

    /// Current holder of the administrator capability.
    #[must_use]
    pub fn administrator(&self) -> Identity {
        self.admin.administrator()
    }

    /// The configuration this registry was created with.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// True if a transfer for `competition` is in flight.
    #[must_use]
    pub fn is_locked(&self, competition: CompetitionId) -> bool {
        self.guard.is_held(competition)
    }

    // =================================================================
    // Internals
    // =================================================================

    /// Run `op` as one all-or-nothing unit.
    fn atomically<T>(
        &mut self,
        operation: &'static str,
        op: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let mark = self.journal.begin();
        match op(self) {
            Ok(value) => {
                self.journal.commit();
                Ok(value)
            }
            Err(err) => {
                let undone = self.journal.rollback(mark);
                if undone.is_empty() {
                    tracing::debug!(operation = operation, error = %err, "Operation rejected");
                } else {
                    tracing::warn!(
                        operation = operation,
                        entries = undone.len(),
                        error = %err,
                        "Operation rolled back"
                    );
                }
                for entry in undone {
                    self.undo(entry);
                }
                Err(err)
            }
        }
    }

    fn undo(&mut self, entry: JournalEntry) {
        match entry {
            JournalEntry::Created(id) => {
                if self.competitions.last().is_some_and(|c| c.id == id) {
                    self.competitions.pop();
                }
            }
            JournalEntry::Competition(previous) => {
                if let Some(index) = self.index_of(previous.id) {
                    self.competitions[index] = *previous;
                }
            }
            JournalEntry::Enrolled {
                competition,
                identity,
            } => self.participants.unwind(competition, identity),
            JournalEntry::Claimed {
                competition,
                claimant,
                previous,
            } => self.claims.unwind(competition, claimant, previous),
            JournalEntry::Logged => {
                self.events.pop();
            }
            JournalEntry::AdminChanged { previous } => {
                self.admin.replace(previous);
            }
        }
    }

    fn next_id(&self) -> Result<CompetitionId> {
        u64::try_from(self.competitions.len())
            .ok()
            .and_then(|len| len.checked_add(constants::FIRST_COMPETITION_ID))
            .map(CompetitionId)
            .ok_or(PrizePoolError::ArithmeticOverflow {
                context: "competition id",
            })
    }

    fn index_of(&self, id: CompetitionId) -> Option<usize> {
        id.0.checked_sub(constants::FIRST_COMPETITION_ID)
            .and_then(|offset| usize::try_from(offset).ok())
            .filter(|index| *index < self.competitions.len())
    }

    /// Mutable access to a competition, journaling its prior value first.
    fn modify(&mut self, id: CompetitionId) -> Result<&mut Competition> {
        let index = self
            .index_of(id)
            .ok_or(PrizePoolError::CompetitionNotFound(id))?;
        self.journal.record(JournalEntry::Competition(Box::new(
            self.competitions[index].clone(),
        )));
        Ok(&mut self.competitions[index])
    }

    fn emit(&mut self, competition: Option<CompetitionId>, kind: EventKind, at: DateTime<Utc>) {
        self.events.append(competition, kind, at);
        self.journal.record(JournalEntry::Logged);
    }

    /// Outbound transfer with the competition's guard held.
    fn release<H>(
        &mut self,
        host: &mut H,
        competition: CompetitionId,
        asset: SettlementAsset,
        to: Identity,
        amount: Amount,
    ) -> Result<()>
    where
        H: Host<Self> + ?Sized,
    {
        let payouts = self.payouts;
        self.guard.enter(competition);
        let released = payouts.release(host, self, asset, to, amount);
        self.guard.exit(competition);
        released
    }

    /// Escrow conservation for one competition, plus agreement between the
    /// escrow counters and both ledgers.
    fn check_conservation(&self, id: CompetitionId) -> Result<()> {
        if !self.config.verify_conservation {
            return Ok(());
        }
        let competition = self.competition(id)?;
        let result = competition.escrow.verify(id).and_then(|()| {
            let enrolled = u64::try_from(self.participants.count(id)).unwrap_or(u64::MAX);
            if enrolled != competition.participant_count {
                return Err(PrizePoolError::ConservationViolation {
                    reason: format!(
                        "{id}: ledger holds {enrolled} participants, competition counts {}",
                        competition.participant_count
                    ),
                });
            }
            if competition.mode == CompetitionMode::BatchProof {
                let claimed = self.claims.total_claimed(id);
                if claimed != competition.escrow.paid_out {
                    return Err(PrizePoolError::ConservationViolation {
                        reason: format!(
                            "{id}: claims total {claimed}, escrow paid out {}",
                            competition.escrow.paid_out
                        ),
                    });
                }
            }
            Ok(())
        });
        if let Err(err) = &result {
            tracing::error!(competition = %id, error = %err, "CONSERVATION VIOLATION");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use prizepool_escrow::{FailureMode, SimulatedHost};
    use prizepool_proof::ClaimTree;
    use prizepool_types::TokenAddress;

    use super::*;

    type TestHost = SimulatedHost<CompetitionRegistry>;

    const ADMIN: Identity = Identity::repeat_byte(0xad);
    const ESCROW: Identity = Identity::repeat_byte(0xe5);

    fn setup() -> (CompetitionRegistry, TestHost) {
        let registry = CompetitionRegistry::new(RegistryConfig::new(ADMIN, ESCROW)).unwrap();
        (registry, SimulatedHost::new(ESCROW))
    }

    fn admin() -> CallContext {
        CallContext::new(ADMIN)
    }

    fn token() -> TokenAddress {
        TokenAddress::new(Identity::repeat_byte(0x70))
    }

    #[test]
    fn rejects_invalid_config() {
        let err = CompetitionRegistry::new(RegistryConfig::new(ADMIN, ADMIN)).unwrap_err();
        assert!(matches!(err, PrizePoolError::Configuration(_)));
    }

    #[test]
    fn ids_start_at_one_and_increase() {
        let (mut reg, mut host) = setup();
        let a = reg
            .create_competition(&mut host, &admin(), CompetitionMode::SingleWinner, SettlementAsset::Native, 10)
            .unwrap();
        let b = reg
            .create_competition(&mut host, &admin(), CompetitionMode::BatchProof, SettlementAsset::Native, 10)
            .unwrap();
        assert_eq!(a, CompetitionId::FIRST);
        assert_eq!(b, a.next());
        assert_eq!(reg.competition_count(), 2);
        assert_eq!(reg.competition(a).unwrap().status, CompetitionStatus::Active);
    }

    #[test]
    fn timestamps_come_from_host() {
        let (mut reg, mut host) = setup();
        let start = Utc::now();
        host.set_now(start);
        let id = reg
            .create_competition(&mut host, &admin(), CompetitionMode::SingleWinner, SettlementAsset::Native, 1)
            .unwrap();
        assert_eq!(reg.competition(id).unwrap().created_at, start);

        host.advance(chrono::Duration::minutes(5));
        let who = Identity::repeat_byte(1);
        reg.join(&mut host, &CallContext::with_value(who, 1), id, who)
            .unwrap();
        let joined = reg.events_for(id).last().unwrap();
        assert_eq!(joined.recorded_at, start + chrono::Duration::minutes(5));
    }

    #[test]
    fn create_requires_admin_and_no_value() {
        let (mut reg, mut host) = setup();
        let mallory = CallContext::new(Identity::repeat_byte(0x66));
        let err = reg
            .create_competition(&mut host, &mallory, CompetitionMode::SingleWinner, SettlementAsset::Native, 1)
            .unwrap_err();
        assert!(matches!(err, PrizePoolError::Unauthorized { .. }));

        let paying = CallContext::with_value(ADMIN, 5);
        let err = reg
            .create_competition(&mut host, &paying, CompetitionMode::SingleWinner, SettlementAsset::Native, 1)
            .unwrap_err();
        assert_eq!(err, PrizePoolError::UnexpectedPayment { amount: 5 });
        assert_eq!(reg.competition_count(), 0);
        assert!(reg.events().is_empty());
    }

    #[test]
    fn null_token_address_rejected() {
        let (mut reg, mut host) = setup();
        let err = reg
            .create_competition(
                &mut host,
                &admin(),
                CompetitionMode::BatchProof,
                SettlementAsset::Token(TokenAddress::new(Identity::NULL)),
                1,
            )
            .unwrap_err();
        assert!(matches!(err, PrizePoolError::InvalidIdentity { .. }));
    }

    #[test]
    fn unknown_competition() {
        let (mut reg, mut host) = setup();
        let who = Identity::repeat_byte(1);
        let err = reg
            .join(&mut host, &CallContext::with_value(who, 1), CompetitionId(7), who)
            .unwrap_err();
        assert_eq!(err, PrizePoolError::CompetitionNotFound(CompetitionId(7)));
        assert!(reg.competition(CompetitionId(0)).is_err());
    }

    #[test]
    fn proxy_join_credits_identity_not_payer() {
        let (mut reg, mut host) = setup();
        let id = reg
            .create_competition(&mut host, &admin(), CompetitionMode::SingleWinner, SettlementAsset::Native, 10)
            .unwrap();
        let payer = Identity::repeat_byte(1);
        let player = Identity::repeat_byte(2);
        reg.join(&mut host, &CallContext::with_value(payer, 10), id, player)
            .unwrap();
        assert!(reg.has_joined(id, player));
        assert!(!reg.has_joined(id, payer));

        let last = reg.events().last().unwrap();
        assert_eq!(
            last.kind,
            EventKind::EntryJoined {
                participant: player,
                payer,
                amount: 10
            }
        );
    }

    #[test]
    fn join_null_identity_rejected() {
        let (mut reg, mut host) = setup();
        let id = reg
            .create_competition(&mut host, &admin(), CompetitionMode::SingleWinner, SettlementAsset::Native, 0)
            .unwrap();
        let err = reg
            .join(&mut host, &CallContext::new(Identity::repeat_byte(1)), id, Identity::NULL)
            .unwrap_err();
        assert!(matches!(err, PrizePoolError::InvalidIdentity { .. }));
    }

    #[test]
    fn payment_mismatch_leaves_no_enrollment() {
        let (mut reg, mut host) = setup();
        let id = reg
            .create_competition(&mut host, &admin(), CompetitionMode::SingleWinner, SettlementAsset::Native, 10)
            .unwrap();
        let who = Identity::repeat_byte(1);
        let err = reg
            .join(&mut host, &CallContext::with_value(who, 9), id, who)
            .unwrap_err();
        assert_eq!(
            err,
            PrizePoolError::PaymentMismatch {
                expected: 10,
                attached: 9
            }
        );
        assert!(!reg.has_joined(id, who));
        assert_eq!(reg.competition(id).unwrap().participant_count, 0);
        assert_eq!(reg.competition(id).unwrap().pooled_balance(), 0);
    }

    #[test]
    fn zero_fee_competition_settles_with_no_transfer() {
        let (mut reg, mut host) = setup();
        let id = reg
            .create_competition(&mut host, &admin(), CompetitionMode::SingleWinner, SettlementAsset::Native, 0)
            .unwrap();
        let who = Identity::repeat_byte(1);
        reg.join(&mut host, &CallContext::new(who), id, who).unwrap();
        assert_eq!(reg.set_winner(&mut host, &admin(), id, who).unwrap(), 0);
        assert!(host.transfers().is_empty());
        assert_eq!(reg.competition(id).unwrap().status, CompetitionStatus::Completed);
    }

    #[test]
    fn set_winner_on_batch_competition_is_invalid_mode() {
        let (mut reg, mut host) = setup();
        let id = reg
            .create_competition(&mut host, &admin(), CompetitionMode::BatchProof, SettlementAsset::Native, 0)
            .unwrap();
        let err = reg
            .set_winner(&mut host, &admin(), id, Identity::repeat_byte(1))
            .unwrap_err();
        assert!(matches!(err, PrizePoolError::InvalidMode { .. }));

        let single = reg
            .create_competition(&mut host, &admin(), CompetitionMode::SingleWinner, SettlementAsset::Native, 0)
            .unwrap();
        let err = reg
            .publish_claim_root(&mut host, &admin(), single, MerkleRoot([1u8; 32]))
            .unwrap_err();
        assert!(matches!(err, PrizePoolError::InvalidMode { .. }));
    }

    #[test]
    fn native_value_on_token_join_unwinds_enrollment() {
        let (mut reg, mut host) = setup();
        let id = reg
            .create_competition(&mut host, &admin(), CompetitionMode::SingleWinner, SettlementAsset::Token(token()), 10)
            .unwrap();
        let who = Identity::repeat_byte(1);
        host.mint(token(), who, 10);
        host.approve(token(), who, 10);

        let err = reg
            .join(&mut host, &CallContext::with_value(who, 10), id, who)
            .unwrap_err();
        assert_eq!(err, PrizePoolError::UnexpectedPayment { amount: 10 });
        assert!(!reg.has_joined(id, who));
        assert_eq!(reg.competition(id).unwrap().participant_count, 0);
        assert_eq!(host.token_balance(token(), who), 10);
        assert!(host.transfers().is_empty());
    }

    #[test]
    fn claim_on_single_winner_is_invalid_mode() {
        let (mut reg, mut host) = setup();
        let id = reg
            .create_competition(&mut host, &admin(), CompetitionMode::SingleWinner, SettlementAsset::Native, 10)
            .unwrap();
        let who = Identity::repeat_byte(1);
        reg.join(&mut host, &CallContext::with_value(who, 10), id, who)
            .unwrap();

        let err = reg
            .claim(&mut host, &CallContext::new(who), id, 10, &[])
            .unwrap_err();
        assert!(matches!(err, PrizePoolError::InvalidMode { .. }));
        assert_eq!(reg.claimed_amount(id, who), 0);
        assert_eq!(reg.competition(id).unwrap().pooled_balance(), 10);
        assert!(host.transfers().is_empty());
    }

    #[test]
    fn zero_root_rejected() {
        let (mut reg, mut host) = setup();
        let id = reg
            .create_competition(&mut host, &admin(), CompetitionMode::BatchProof, SettlementAsset::Native, 0)
            .unwrap();
        let err = reg
            .publish_claim_root(&mut host, &admin(), id, MerkleRoot::ZERO)
            .unwrap_err();
        assert!(matches!(err, PrizePoolError::InvalidRoot { .. }));
        assert!(reg.competition(id).unwrap().is_active());
    }

    #[test]
    fn claim_before_root_is_invalid_state() {
        let (mut reg, mut host) = setup();
        let id = reg
            .create_competition(&mut host, &admin(), CompetitionMode::BatchProof, SettlementAsset::Native, 0)
            .unwrap();
        let err = reg
            .claim(&mut host, &CallContext::new(Identity::repeat_byte(1)), id, 10, &[])
            .unwrap_err();
        assert!(matches!(
            err,
            PrizePoolError::InvalidState {
                expected: CompetitionStatus::Completed,
                actual: CompetitionStatus::Active,
                ..
            }
        ));
    }

    #[test]
    fn claim_precondition_order() {
        let (mut reg, mut host) = setup();
        let id = reg
            .create_competition(&mut host, &admin(), CompetitionMode::BatchProof, SettlementAsset::Native, 5)
            .unwrap();
        let alice = Identity::repeat_byte(1);
        reg.join(&mut host, &CallContext::with_value(alice, 5), id, alice)
            .unwrap();
        // Entitlement larger than the pool.
        let tree = ClaimTree::build(&[(alice, 50)]).unwrap();
        reg.publish_claim_root(&mut host, &admin(), id, tree.root())
            .unwrap();
        let ctx = CallContext::new(alice);

        assert!(matches!(
            reg.claim(&mut host, &ctx, id, 0, &[]).unwrap_err(),
            PrizePoolError::InvalidAmount { .. }
        ));
        assert_eq!(
            reg.claim(&mut host, &ctx, id, 49, &[]).unwrap_err(),
            PrizePoolError::InvalidProof { claimant: alice }
        );
        assert_eq!(
            reg.claim(&mut host, &ctx, id, 50, &tree.proof(alice, 50).unwrap())
                .unwrap_err(),
            PrizePoolError::InsufficientPool {
                needed: 50,
                available: 5
            }
        );
        assert_eq!(reg.claimed_amount(id, alice), 0);
    }

    #[test]
    fn failed_payout_rolls_back_everything() {
        let (mut reg, mut host) = setup();
        let id = reg
            .create_competition(&mut host, &admin(), CompetitionMode::SingleWinner, SettlementAsset::Native, 10)
            .unwrap();
        let winner = Identity::repeat_byte(1);
        reg.join(&mut host, &CallContext::with_value(winner, 10), id, winner)
            .unwrap();
        let before = reg.competition(id).unwrap().clone();
        let events_before = reg.events().len();

        host.fail_recipient(winner, FailureMode::Abort);
        let err = reg.set_winner(&mut host, &admin(), id, winner).unwrap_err();
        assert!(matches!(err, PrizePoolError::TransferFailure { .. }));

        assert_eq!(reg.competition(id).unwrap(), &before);
        assert_eq!(reg.events().len(), events_before);
        assert!(!reg.is_locked(id));

        // Retry succeeds once the recipient accepts.
        host.heal();
        assert_eq!(reg.set_winner(&mut host, &admin(), id, winner).unwrap(), 10);
    }

    #[test]
    fn token_join_without_allowance_fails_cleanly() {
        let (mut reg, mut host) = setup();
        let id = reg
            .create_competition(&mut host, &admin(), CompetitionMode::BatchProof, SettlementAsset::Token(token()), 100)
            .unwrap();
        let who = Identity::repeat_byte(1);
        host.mint(token(), who, 100);
        let err = reg.join(&mut host, &CallContext::new(who), id, who).unwrap_err();
        assert!(matches!(err, PrizePoolError::TransferFailure { .. }));
        assert!(!reg.has_joined(id, who));
        assert!(reg.participants(id).is_empty());
    }

    #[test]
    fn receive_always_refuses() {
        let (reg, _host) = setup();
        let who = Identity::repeat_byte(1);
        assert_eq!(
            reg.receive(&CallContext::with_value(who, 3)).unwrap_err(),
            PrizePoolError::UnexpectedPayment { amount: 3 }
        );
    }

    #[test]
    fn administration_transfer() {
        let (mut reg, mut host) = setup();
        let successor = Identity::repeat_byte(0xbe);
        reg.transfer_administration(&mut host, &admin(), successor)
            .unwrap();
        assert_eq!(reg.administrator(), successor);
        assert_eq!(reg.config().administrator, ADMIN);

        let err = reg
            .create_competition(&mut host, &admin(), CompetitionMode::SingleWinner, SettlementAsset::Native, 1)
            .unwrap_err();
        assert!(matches!(err, PrizePoolError::Unauthorized { .. }));
        reg.create_competition(
            &mut host,
            &CallContext::new(successor),
            CompetitionMode::SingleWinner,
            SettlementAsset::Native,
            1,
        )
        .unwrap();

        let err = reg
            .transfer_administration(&mut host, &CallContext::new(successor), ESCROW)
            .unwrap_err();
        assert!(matches!(err, PrizePoolError::InvalidIdentity { .. }));
        assert_eq!(reg.administrator(), successor);
        assert!(matches!(
            reg.events()[0].kind,
            EventKind::AdministrationTransferred { .. }
        ));
        assert_eq!(reg.events()[0].competition, None);
    }
}
