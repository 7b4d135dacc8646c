//! Error types for the PrizePool escrow.
//!
//! All errors use the `PP_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Competition lifecycle errors
//! - 2xx: Authorization errors
//! - 3xx: Malformed input
//! - 4xx: Participation errors
//! - 5xx: Payment / transfer errors
//! - 6xx: Claim errors
//! - 8xx: Safety errors
//! - 9xx: General / internal errors
//!
//! Every error aborts the operation that raised it; none is retried.

use thiserror::Error;

use crate::{Amount, CompetitionId, CompetitionMode, CompetitionStatus, Identity};

/// Central error enum for all PrizePool operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrizePoolError {
    // =================================================================
    // Competition Lifecycle Errors (1xx)
    // =================================================================
    /// No competition exists with this id.
    #[error("PP_ERR_100: Competition not found: {0}")]
    CompetitionNotFound(CompetitionId),

    /// The operation is not allowed in the competition's current status.
    #[error("PP_ERR_101: Invalid state for {competition}: expected {expected}, got {actual}")]
    InvalidState {
        competition: CompetitionId,
        expected: CompetitionStatus,
        actual: CompetitionStatus,
    },

    /// The operation does not match the competition's settlement mode.
    #[error("PP_ERR_102: Invalid mode for {competition}: expected {expected}, got {actual}")]
    InvalidMode {
        competition: CompetitionId,
        expected: CompetitionMode,
        actual: CompetitionMode,
    },

    // =================================================================
    // Authorization Errors (2xx)
    // =================================================================
    /// The caller does not hold the administrator capability.
    #[error("PP_ERR_200: Unauthorized caller: {caller}")]
    Unauthorized { caller: Identity },

    // =================================================================
    // Malformed Input (3xx)
    // =================================================================
    /// Null or unparsable identity.
    #[error("PP_ERR_300: Invalid identity: {reason}")]
    InvalidIdentity { reason: String },

    /// Zero or otherwise unusable amount.
    #[error("PP_ERR_301: Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// Zero claim root.
    #[error("PP_ERR_302: Invalid claim root: {reason}")]
    InvalidRoot { reason: String },

    // =================================================================
    // Participation Errors (4xx)
    // =================================================================
    /// The identity already holds an entry in this competition.
    #[error("PP_ERR_400: {identity} already joined {competition}")]
    AlreadyJoined {
        competition: CompetitionId,
        identity: Identity,
    },

    /// The identity never joined this competition.
    #[error("PP_ERR_401: {identity} is not a participant of {competition}")]
    NotAParticipant {
        competition: CompetitionId,
        identity: Identity,
    },

    // =================================================================
    // Payment Errors (5xx)
    // =================================================================
    /// Native value attached to a join differs from the entry fee.
    #[error("PP_ERR_500: Payment mismatch: expected {expected}, attached {attached}")]
    PaymentMismatch { expected: Amount, attached: Amount },

    /// Native value attached where none is accepted.
    #[error("PP_ERR_501: Unexpected native payment of {amount}")]
    UnexpectedPayment { amount: Amount },

    /// A rail transfer reported failure or aborted.
    #[error("PP_ERR_502: Transfer failed: {reason}")]
    TransferFailure { reason: String },

    // =================================================================
    // Claim Errors (6xx)
    // =================================================================
    /// A claim was attempted before a root was published.
    #[error("PP_ERR_600: Claim root not set for {0}")]
    RootNotSet(CompetitionId),

    /// The inclusion proof does not reproduce the published root.
    #[error("PP_ERR_601: Invalid inclusion proof for {claimant}")]
    InvalidProof { claimant: Identity },

    /// The claimant already withdrew this entitlement or more.
    #[error("PP_ERR_602: Already claimed {claimed} of entitlement {entitlement}")]
    AlreadyClaimed { claimed: Amount, entitlement: Amount },

    /// The pool cannot cover the requested delta.
    #[error("PP_ERR_603: Insufficient pool: need {needed}, pooled {available}")]
    InsufficientPool { needed: Amount, available: Amount },

    // =================================================================
    // Safety Errors (8xx)
    // =================================================================
    /// A mutating call re-entered a competition with a transfer in flight.
    #[error("PP_ERR_800: Reentrant call into {0} rejected")]
    ReentrantCall(CompetitionId),

    /// Escrow conservation invariant violated. Critical safety alert.
    #[error("PP_ERR_801: Conservation invariant violation: {reason}")]
    ConservationViolation { reason: String },

    /// Checked arithmetic overflowed.
    #[error("PP_ERR_802: Arithmetic overflow in {context}")]
    ArithmeticOverflow { context: &'static str },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("PP_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("PP_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("PP_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, PrizePoolError>;

impl From<serde_json::Error> for PrizePoolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
