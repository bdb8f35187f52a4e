//! Client-side construction of EVVM signed authorizations.
//!
//! The crate turns payments and identity registrations into the exact
//! comma-separated messages an EVVM contract re-derives and checks the
//! signatures against, drives the identity verification that gates a
//! registration, and composes the payment and user signatures into a
//! payload ready for submission.
//!
//! Signing, reward lookup, code delivery, third-party authentication and
//! submission are external collaborators, injected through the traits in
//! [`crypto`], [`reward`], [`verification::flow`] and [`submission`].

pub mod action;
pub mod composer;
pub mod config;
pub mod constants;
pub mod encoder;
mod error;
pub mod form;
pub mod identity;
#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;
mod nonce;
pub mod payment;
pub mod recipient;
pub mod registration;
pub mod reward;
pub mod session;
pub mod submission;
pub mod verification;

pub use self::{error::*, nonce::*};

pub use alloy_primitives::{Address, B256, Bytes, U256};
pub use evvm_crypto as crypto;
