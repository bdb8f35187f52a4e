//! Cryptographic building blocks shared by the EVVM signature crates.
//!
//! This crate defines the [`Payload`] and [`SignedPayload`] traits that let
//! signing envelopes (currently only EIP-191 in `evvm-erc191`) be hashed and
//! verified uniformly, the two digest functions the EVVM messages are built
//! from, and the [`Signer`] capability the composer drives.

mod hash;
mod payload;
mod signer;

pub use self::{hash::*, payload::*, signer::*};

pub use alloy_primitives::{Address, B256, Bytes};
