//! # prizepool-types
//!
//! Shared types, errors, and configuration for the **PrizePool** competition
//! escrow.
//!
//! This crate is the leaf dependency of the workspace. Every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`CompetitionId`], [`Identity`], [`TokenAddress`], [`MerkleRoot`], [`EventId`]
//! - **Competition model**: [`Competition`], [`CompetitionMode`], [`CompetitionStatus`], [`SettlementAsset`]
//! - **Escrow accounting**: [`EscrowAccount`], [`Amount`]
//! - **Event log model**: [`LedgerEvent`], [`EventKind`]
//! - **Configuration**: [`RegistryConfig`]
//! - **Errors**: [`PrizePoolError`] with `PP_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod competition;
pub mod config;
pub mod constants;
pub mod error;
pub mod escrow_account;
pub mod event;
pub mod ids;

// Re-export all primary types at crate root for ergonomic imports:
//   use prizepool_types::{Competition, Identity, PrizePoolError, ...};

pub use competition::*;
pub use config::*;
pub use error::*;
pub use escrow_account::*;
pub use event::*;
pub use ids::*;

// Constants are accessed via `prizepool_types::constants::FOO`
// (not re-exported to avoid name collisions).
