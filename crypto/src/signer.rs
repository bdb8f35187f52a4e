use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignerError {
    #[error("user rejected the signature request")]
    UserRejected,

    #[error("signer unavailable: {0}")]
    SignerUnavailable(String),
}

/// A capability that signs arbitrary messages on behalf of one account.
///
/// Every call to [`sign`](Signer::sign) is a user-facing prompt in a wallet,
/// so callers must invoke it only as many times as the protocol requires.
/// The implementation is responsible for the signing envelope (for wallets
/// this is EIP-191 `personal_sign`).
#[async_trait]
pub trait Signer: Send + Sync {
    /// Account the signatures are produced for.
    fn address(&self) -> Address;

    async fn sign(&self, message: &[u8]) -> Result<Bytes, SignerError>;
}

#[async_trait]
impl<T> Signer for &T
where
    T: Signer + ?Sized,
{
    #[inline]
    fn address(&self) -> Address {
        (**self).address()
    }

    #[inline]
    async fn sign(&self, message: &[u8]) -> Result<Bytes, SignerError> {
        (**self).sign(message).await
    }
}
