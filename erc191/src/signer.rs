use alloy_primitives::Address;
use async_trait::async_trait;
use evvm_crypto::{Bytes, Payload, Signer, SignerError};
use k256::ecdsa::SigningKey;

use crate::{Erc191Payload, SignedErc191Payload};

/// An in-memory secp256k1 key that signs the way a wallet's
/// `personal_sign()` does.
///
/// Intended for scripting and tests. Production flows sign through the
/// user's wallet, behind the same [`Signer`] trait.
#[derive(Clone)]
pub struct LocalSigner {
    key: SigningKey,
    address: Address,
}

impl LocalSigner {
    pub fn from_slice(secret: &[u8]) -> Result<Self, k256::ecdsa::Error> {
        let key = SigningKey::from_slice(secret)?;
        let address = Address::from_private_key(&key);
        Ok(Self { key, address })
    }

    #[inline]
    pub const fn address(&self) -> Address {
        self.address
    }

    pub fn sign_payload(&self, payload: Erc191Payload) -> Result<SignedErc191Payload, SignerError> {
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(payload.hash().as_slice())
            .map_err(|err| SignerError::SignerUnavailable(err.to_string()))?;

        let mut raw = Vec::with_capacity(65);
        raw.extend_from_slice(&signature.to_bytes());
        raw.push(27 + recovery_id.to_byte());

        Ok(SignedErc191Payload {
            payload,
            signature: Bytes::from(raw),
        })
    }
}

impl core::fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Signer for LocalSigner {
    #[inline]
    fn address(&self) -> Address {
        self.address
    }

    async fn sign(&self, message: &[u8]) -> Result<Bytes, SignerError> {
        tracing::trace!(signer = %self.address, len = message.len(), "personal_sign");
        self.sign_payload(Erc191Payload(message.to_vec()))
            .map(|signed| signed.signature)
    }
}
