use core::fmt;

use alloy_primitives::U256;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Selects the nonce space a payment consumes.
///
/// Travels as the `priorityFlag` field of every message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Sequential ("sync") nonce: must equal the account's next sync nonce,
    /// see `getNextCurrentSyncNonce` on the EVVM contract.
    #[default]
    Low,
    /// Unordered ("async") nonce: any value not used before.
    High,
}

impl Priority {
    #[inline]
    pub const fn from_flag(flag: bool) -> Self {
        if flag { Self::High } else { Self::Low }
    }

    #[inline]
    pub const fn flag(self) -> bool {
        matches!(self, Self::High)
    }
}

impl fmt::Display for Priority {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.flag())
    }
}

/// Fresh nonce for the async space.
#[inline]
pub fn random_async_nonce(rng: &mut impl Rng) -> U256 {
    U256::from(rng.random::<u64>())
}
