//! Deployment configuration with TOML support.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::{Result, constants::PRINCIPAL_TOKEN};

/// Identifies the EVVM deployment messages are built for.
///
/// Loaded with [`EvvmConfig::from_toml_str`] or built with [`EvvmConfig::new`].
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvvmConfig {
    /// Application identifier leading every message, as a decimal string.
    #[serde_as(as = "DisplayFromStr")]
    pub evvm_id: U256,

    /// Registration service. Receives and executes registration rewards.
    pub name_service: Address,

    /// Token registration rewards are paid in.
    #[serde(default = "default_principal_token")]
    pub principal_token: Address,
}

const fn default_principal_token() -> Address {
    PRINCIPAL_TOKEN
}

impl EvvmConfig {
    #[inline]
    pub const fn new(evvm_id: U256, name_service: Address) -> Self {
        Self {
            evvm_id,
            name_service,
            principal_token: PRINCIPAL_TOKEN,
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}
