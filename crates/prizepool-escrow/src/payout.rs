//! Dual-rail payout engine.
//!
//! Dispatches value movement on a competition's [`SettlementAsset`]:
//!
//! | Rail | collect (join) | release (payout) |
//! |------|----------------|------------------|
//! | `Native` | attached value must equal the fee | `Host::send_native` |
//! | `Token(t)` | `t.transferFrom(payer, escrow, fee)` | `t.transfer(to, amount)` |
//!
//! Every rail call is synchronous and any failure aborts the enclosing
//! operation. There is no deferred or retried payout.

use prizepool_types::{Amount, Identity, PrizePoolError, Result, SettlementAsset};

use crate::host::Host;

/// Moves value between participants and the escrow account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayoutEngine {
    /// The registry's own ledger address.
    escrow_account: Identity,
}

impl PayoutEngine {
    /// Create an engine that escrows into `escrow_account`.
    #[must_use]
    pub fn new(escrow_account: Identity) -> Self {
        Self { escrow_account }
    }

    #[must_use]
    pub fn escrow_account(&self) -> Identity {
        self.escrow_account
    }

    /// Collect one entry fee from `payer`.
    ///
    /// `attached` is the native value that arrived with the call.
    ///
    /// # Errors
    /// - `PaymentMismatch` if a native fee is not matched exactly
    /// - `UnexpectedPayment` if native value is attached on the token rail
    /// - `TransferFailure` if the token pull is rejected or aborts
    pub fn collect<R, H>(
        &self,
        host: &mut H,
        reentry: &mut R,
        asset: SettlementAsset,
        payer: Identity,
        fee: Amount,
        attached: Amount,
    ) -> Result<()>
    where
        R: ?Sized,
        H: Host<R> + ?Sized,
    {
        match asset {
            SettlementAsset::Native => {
                if attached != fee {
                    return Err(PrizePoolError::PaymentMismatch {
                        expected: fee,
                        attached,
                    });
                }
                Ok(())
            }
            SettlementAsset::Token(token) => {
                Self::ensure_no_value(attached)?;
                if fee == 0 {
                    return Ok(());
                }
                host.token_transfer_from(reentry, token, payer, self.escrow_account, fee)
                    .into_result(format_args!("{token} entry pull from {payer}"))
            }
        }
    }

    /// Release `amount` from escrow to `to`. A zero amount moves nothing and
    /// does not touch the rail.
    ///
    /// # Errors
    /// Returns `TransferFailure` if the rail reports failure or aborts.
    pub fn release<R, H>(
        &self,
        host: &mut H,
        reentry: &mut R,
        asset: SettlementAsset,
        to: Identity,
        amount: Amount,
    ) -> Result<()>
    where
        R: ?Sized,
        H: Host<R> + ?Sized,
    {
        if amount == 0 {
            return Ok(());
        }
        let outcome = match asset {
            SettlementAsset::Native => host.send_native(reentry, to, amount),
            SettlementAsset::Token(token) => host.token_transfer(reentry, token, to, amount),
        };
        if !outcome.is_completed() {
            tracing::warn!(
                asset = %asset,
                recipient = %to,
                amount = amount,
                outcome = ?outcome,
                "Payout transfer failed"
            );
        }
        outcome.into_result(format_args!("{asset} payout of {amount} to {to}"))
    }

    /// Reject native value on a path that does not accept it.
    ///
    /// # Errors
    /// Returns `UnexpectedPayment` if `attached` is non-zero.
    pub fn ensure_no_value(attached: Amount) -> Result<()> {
        if attached == 0 {
            Ok(())
        } else {
            Err(PrizePoolError::UnexpectedPayment { amount: attached })
        }
    }
}
