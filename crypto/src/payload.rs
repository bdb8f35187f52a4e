//! Traits for hashing and verifying signed message envelopes.
//!
//! Each signing standard defines its own envelope structure implementing
//! [`Payload`] and [`SignedPayload`], so callers can compute the digest a
//! wallet signs and recover the signer without knowing the concrete
//! standard.

use alloy_primitives::B256;

pub type CryptoHash = B256;

/// Data that can be deterministically hashed for signing or verification.
///
/// Implementations typically wrap a message formatted according to an
/// external signing standard. [`hash`](Payload::hash) returns the digest
/// that is actually signed.
pub trait Payload {
    fn hash(&self) -> CryptoHash;
}

/// Extension of [`Payload`] for envelopes that carry a signature.
///
/// On success [`verify`](SignedPayload::verify) returns the identity of the
/// signer. For secp256k1 envelopes that is the recovered address.
pub trait SignedPayload: Payload {
    type PublicKey;

    fn verify(&self) -> Option<Self::PublicKey>;
}
