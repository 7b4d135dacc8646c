//! Configuration for a competition registry.

use serde::{Deserialize, Serialize};

use crate::{Identity, PrizePoolError, Result, constants};

/// Configuration for a single registry instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// The single identity allowed to create and finalize competitions.
    pub administrator: Identity,
    /// The registry's own ledger address. Token entry fees are pulled here.
    pub escrow_account: Identity,
    /// Reject mutating calls that re-enter a competition mid-transfer.
    #[serde(default = "default_reentrancy_guard")]
    pub reentrancy_guard: bool,
    /// Check `pooled == deposited - paid_out` after every mutating call.
    #[serde(default = "default_verify_conservation")]
    pub verify_conservation: bool,
}

fn default_reentrancy_guard() -> bool {
    constants::DEFAULT_REENTRANCY_GUARD
}

fn default_verify_conservation() -> bool {
    constants::DEFAULT_VERIFY_CONSERVATION
}

impl RegistryConfig {
    /// Config with default safety switches.
    #[must_use]
    pub fn new(administrator: Identity, escrow_account: Identity) -> Self {
        Self {
            administrator,
            escrow_account,
            reentrancy_guard: constants::DEFAULT_REENTRANCY_GUARD,
            verify_conservation: constants::DEFAULT_VERIFY_CONSERVATION,
        }
    }

    /// Parse and validate a JSON config document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| PrizePoolError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs the registry cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.administrator.is_null() {
            return Err(PrizePoolError::Configuration(
                "administrator must not be the null identity".into(),
            ));
        }
        if self.escrow_account.is_null() {
            return Err(PrizePoolError::Configuration(
                "escrow_account must not be the null identity".into(),
            ));
        }
        if self.administrator == self.escrow_account {
            return Err(PrizePoolError::Configuration(
                "administrator and escrow_account must differ".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> Identity {
        Identity::repeat_byte(0xad)
    }

    fn escrow() -> Identity {
        Identity::repeat_byte(0xe5)
    }

    #[test]
    fn defaults_enable_safety_switches() {
        let cfg = RegistryConfig::new(admin(), escrow());
        assert!(cfg.reentrancy_guard);
        assert!(cfg.verify_conservation);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn from_json_fills_defaults() {
        let json = format!(
            r#"{{"administrator":"{}","escrow_account":"{}"}}"#,
            admin(),
            escrow()
        );
        let cfg = RegistryConfig::from_json_str(&json).unwrap();
        assert_eq!(cfg, RegistryConfig::new(admin(), escrow()));
    }

    #[test]
    fn from_json_respects_switches() {
        let json = format!(
            r#"{{"administrator":"{}","escrow_account":"{}","reentrancy_guard":false}}"#,
            admin(),
            escrow()
        );
        let cfg = RegistryConfig::from_json_str(&json).unwrap();
        assert!(!cfg.reentrancy_guard);
        assert!(cfg.verify_conservation);
    }

    #[test]
    fn rejects_null_administrator() {
        let cfg = RegistryConfig::new(Identity::NULL, escrow());
        assert!(matches!(
            cfg.validate(),
            Err(PrizePoolError::Configuration(_))
        ));
    }

    #[test]
    fn rejects_admin_as_escrow() {
        let cfg = RegistryConfig::new(admin(), admin());
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn malformed_json_is_configuration_error() {
        let err = RegistryConfig::from_json_str("{\"administrator\": 5}").unwrap_err();
        assert!(matches!(err, PrizePoolError::Configuration(_)));
    }
}
