//! Call context and the administrator capability.
//!
//! The registry holds exactly one [`AdminCapability`]. Gated operations check
//! it before touching any state; the check is pass/fail only.

use prizepool_types::{Amount, Identity, PrizePoolError, Result};

/// Who is calling, and how much native value arrived with the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Identity,
    pub value: Amount,
}

impl CallContext {
    /// A call with no attached value.
    #[must_use]
    pub fn new(caller: Identity) -> Self {
        Self { caller, value: 0 }
    }

    /// A call carrying `value` in native currency.
    #[must_use]
    pub fn with_value(caller: Identity, value: Amount) -> Self {
        Self { caller, value }
    }
}

/// The right to create and finalize competitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminCapability {
    administrator: Identity,
}

impl AdminCapability {
    #[must_use]
    pub fn new(administrator: Identity) -> Self {
        Self { administrator }
    }

    #[must_use]
    pub fn administrator(&self) -> Identity {
        self.administrator
    }

    /// # Errors
    /// Returns [`PrizePoolError::Unauthorized`] unless `caller` holds the
    /// capability.
    pub fn authorize(&self, caller: Identity) -> Result<()> {
        if caller == self.administrator {
            Ok(())
        } else {
            tracing::warn!(caller = %caller, "Unauthorized administrative call");
            Err(PrizePoolError::Unauthorized { caller })
        }
    }

    /// Hand the capability to `successor`, returning the previous holder.
    pub fn replace(&mut self, successor: Identity) -> Identity {
        std::mem::replace(&mut self.administrator, successor)
    }
}
