use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use thiserror::Error as ThisError;

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum LookupError {
    #[error("reward lookup failed: {0}")]
    LookupFailed(String),
}

/// On-chain read of the current reward unit of a registration service.
#[async_trait]
pub trait RewardLookup: Send + Sync {
    async fn reward(&self, service: Address) -> Result<U256, LookupError>;
}

#[async_trait]
impl<T> RewardLookup for &T
where
    T: RewardLookup + ?Sized,
{
    #[inline]
    async fn reward(&self, service: Address) -> Result<U256, LookupError> {
        T::reward(self, service).await
    }
}
