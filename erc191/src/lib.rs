mod signer;

pub use self::signer::LocalSigner;

use alloy_primitives::Signature;
use evvm_crypto::{Address, Bytes, CryptoHash, Payload, SignedPayload, keccak256};
use impl_tools::autoimpl;

/// See [ERC-191](https://eips.ethereum.org/EIPS/eip-191), version `0x45`
/// as produced by `personal_sign()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Erc191Payload(pub Vec<u8>);

impl Erc191Payload {
    #[inline]
    pub fn prehash(&self) -> Vec<u8> {
        let data = self.0.as_slice();
        [
            format!("\x19Ethereum Signed Message:\n{}", data.len()).as_bytes(),
            data,
        ]
        .concat()
    }
}

impl From<String> for Erc191Payload {
    #[inline]
    fn from(message: String) -> Self {
        Self(message.into_bytes())
    }
}

impl From<&str> for Erc191Payload {
    #[inline]
    fn from(message: &str) -> Self {
        Self(message.as_bytes().to_vec())
    }
}

impl Payload for Erc191Payload {
    #[inline]
    fn hash(&self) -> CryptoHash {
        keccak256(self.prehash())
    }
}

#[autoimpl(Deref using self.payload)]
#[derive(Debug, Clone)]
pub struct SignedErc191Payload {
    pub payload: Erc191Payload,

    /// `r || s || v`. There is no public key member because the signer's
    /// address is recovered from the data and the signature.
    pub signature: Bytes,
}

impl Payload for SignedErc191Payload {
    #[inline]
    fn hash(&self) -> CryptoHash {
        self.payload.hash()
    }
}

impl SignedPayload for SignedErc191Payload {
    type PublicKey = Address;

    #[inline]
    fn verify(&self) -> Option<Self::PublicKey> {
        Signature::from_raw(&self.signature)
            .ok()?
            .recover_address_from_prehash(&self.hash())
            .ok()
    }
}
