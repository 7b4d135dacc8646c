//! # prizepool-escrow
//!
//! **Escrow plane**: moves value in and out of competition pools and keeps
//! the two per-competition relations the registry builds on.
//!
//! ## Architecture
//!
//! 1. **Host**: the execution environment's collaborators (clock, native
//!    value transfer, fungible-token interface)
//! 2. **PayoutEngine**: dispatches collect / release on the competition's
//!    settlement rail, all-or-nothing
//! 3. **ParticipantLedger**: who paid the entry fee, one entry per identity
//! 4. **ClaimLedger**: cumulative amount each claimant has withdrawn
//!
//! ## Value Flow
//!
//! ```text
//! join  → PayoutEngine.collect()  → Host.token_transfer_from() / attached value
//! payout → PayoutEngine.release() → Host.send_native() / Host.token_transfer()
//! ```
//!
//! Every host transfer receives a reentry handle: a recipient may call back
//! into the registry before the transfer returns.

pub mod claim_ledger;
pub mod host;
pub mod participant_ledger;
pub mod payout;
#[cfg(any(test, feature = "test-helpers"))]
pub mod simulated;

pub use claim_ledger::ClaimLedger;
pub use host::{Host, TransferOutcome};
pub use participant_ledger::ParticipantLedger;
pub use payout::PayoutEngine;
#[cfg(any(test, feature = "test-helpers"))]
pub use simulated::{FailureMode, Rail, SimulatedHost, TransferRecord};
