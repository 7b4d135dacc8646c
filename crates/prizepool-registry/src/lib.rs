//! # prizepool-registry
//!
//! **Control plane** of the PrizePool competition escrow.
//!
//! ## Lifecycle
//!
//! ```text
//! create_competition ──► join* ──┬─► set_winner          (SINGLE_WINNER: whole pool to one participant)
//!                                └─► publish_claim_root  (BATCH_PROOF)  ──► claim*
//! ```
//!
//! ## Safety Properties
//!
//! | Property | Mechanism |
//! |----------|-----------|
//! | No double payout | status moves to COMPLETED once; claim records only grow |
//! | Reentrancy | state committed before every transfer, plus a per-competition guard |
//! | Atomicity | undo journal, unwound to the entry mark on any error |
//! | Conservation | `pooled == deposited - paid_out` checked after every mutation |
//!
//! The registry never holds value itself. A [`prizepool_escrow::Host`] moves
//! native currency and tokens, and may call back into the registry while a
//! transfer is in flight.

pub mod auth;
pub mod event_log;
pub mod guard;
pub mod journal;
pub mod registry;

pub use auth::{AdminCapability, CallContext};
pub use event_log::EventLog;
pub use guard::ReentrancyGuard;
pub use journal::{Journal, JournalEntry};
pub use registry::CompetitionRegistry;
