use core::num::NonZeroU64;

use alloy_primitives::{Address, Bytes, U256};

use crate::{EvvmError, Priority, Result, identity::Identity, payment::SignedPay};

/// Caller-supplied values of a registration. The identity itself comes from
/// the verified claim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationRequest {
    /// Zero unless disambiguating a pre-registration.
    pub distinguishing_number: U256,
    /// Registration-service nonce.
    pub nonce: U256,
    pub priority_fee: U256,
    /// Nonce of the embedded reward payment.
    pub evvm_nonce: U256,
    pub priority: Priority,
    pub authority: Authority,
}

/// Fields bound by a registration action message, in message order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationAction {
    pub service: Address,
    pub identity: Identity,
    pub distinguishing_number: U256,
    pub nonce: U256,
    pub reward: U256,
    pub priority_fee: U256,
    pub evvm_nonce: U256,
    pub priority: Priority,
}

/// Optional co-signature of a trusted verifying party.
///
/// Timestamp and signature are set together or not at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Authority {
    #[default]
    Absent,
    Signed {
        timestamp: NonZeroU64,
        signature: Bytes,
    },
}

impl Authority {
    /// Parses the wire pair, where `0` and empty bytes mean "no authority".
    pub fn from_parts(timestamp: u64, signature: Bytes) -> Result<Self> {
        match (NonZeroU64::new(timestamp), signature.is_empty()) {
            (None, true) => Ok(Self::Absent),
            (Some(timestamp), false) => Ok(Self::Signed {
                timestamp,
                signature,
            }),
            _ => Err(EvvmError::MalformedAuthority),
        }
    }

    #[inline]
    pub const fn timestamp(&self) -> u64 {
        match self {
            Self::Absent => 0,
            Self::Signed { timestamp, .. } => timestamp.get(),
        }
    }

    #[inline]
    pub fn signature(&self) -> Bytes {
        match self {
            Self::Absent => Bytes::new(),
            Self::Signed { signature, .. } => signature.clone(),
        }
    }
}

/// A fully signed registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationFields {
    user: Address,
    nonce: U256,
    identity: Identity,
    distinguishing_number: U256,
    timestamp_user: u64,
    signature_user: Bytes,
    authority: Authority,
    payment: SignedPay,
}

impl RegistrationFields {
    #[allow(clippy::too_many_arguments)]
    pub(crate) const fn new(
        user: Address,
        nonce: U256,
        identity: Identity,
        distinguishing_number: U256,
        timestamp_user: u64,
        signature_user: Bytes,
        authority: Authority,
        payment: SignedPay,
    ) -> Self {
        Self {
            user,
            nonce,
            identity,
            distinguishing_number,
            timestamp_user,
            signature_user,
            authority,
            payment,
        }
    }

    #[inline]
    pub const fn user(&self) -> Address {
        self.user
    }

    #[inline]
    pub const fn nonce(&self) -> U256 {
        self.nonce
    }

    #[inline]
    pub const fn identity(&self) -> &Identity {
        &self.identity
    }

    #[inline]
    pub const fn distinguishing_number(&self) -> U256 {
        self.distinguishing_number
    }

    /// Verification time of the claim, in unix seconds.
    #[inline]
    pub const fn timestamp_user(&self) -> u64 {
        self.timestamp_user
    }

    #[inline]
    pub const fn signature_user(&self) -> &Bytes {
        &self.signature_user
    }

    #[inline]
    pub const fn authority(&self) -> &Authority {
        &self.authority
    }

    /// The reward payment funding this registration.
    #[inline]
    pub const fn payment(&self) -> &SignedPay {
        &self.payment
    }
}
