//! Identity Verification State Machine.
//!
//! [`ClaimState`] transitions are pure: every transition borrows the current
//! state and returns the next one, so a failed step leaves the caller holding
//! the last good state.

pub mod flow;

use core::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use strum::Display;

use crate::{
    EvvmError, Result,
    constants::ONE_TIME_CODE_DIGITS,
    identity::{Identity, IdentityKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum VerificationMethod {
    OutOfBandCode,
    ThirdPartyAttestation,
}

/// Decimal one-time code delivered out of band.
#[derive(Clone, PartialEq, Eq)]
pub struct OneTimeCode(String);

impl OneTimeCode {
    pub fn random(rng: &mut impl Rng) -> Self {
        let low = 10u32.pow(ONE_TIME_CODE_DIGITS - 1);
        let high = 10u32.pow(ONE_TIME_CODE_DIGITS) - 1;
        Self(rng.random_range(low..=high).to_string())
    }

    #[inline]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Surrounding whitespace of `input` is ignored.
    #[inline]
    pub fn matches(&self, input: &str) -> bool {
        input.trim() == self.0
    }
}

impl fmt::Debug for OneTimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OneTimeCode(<redacted>)")
    }
}

/// Opaque handle returned by the code transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChallengeId(pub String);

/// Successful third-party authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct Attestation {
    pub token: String,
    pub verified_identity: String,
}

impl Attestation {
    /// Whether the provider vouched for `identity`. Emails compare
    /// case-insensitively, phone numbers by their digits only.
    pub fn attests(&self, identity: &Identity) -> bool {
        let claimed = identity.as_str();
        let attested = self.verified_identity.as_str();
        match identity.kind() {
            IdentityKind::Username => claimed == attested,
            IdentityKind::Email => claimed.eq_ignore_ascii_case(attested),
            IdentityKind::PhoneNumber => {
                claimed.chars().filter(char::is_ascii_digit).eq(attested
                    .chars()
                    .filter(char::is_ascii_digit))
            }
        }
    }
}

impl fmt::Debug for Attestation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attestation")
            .field("token", &"<redacted>")
            .field("verified_identity", &self.verified_identity)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Challenge {
    Code { id: ChallengeId, code: OneTimeCode },
    Attestation,
}

/// A proven identity. Its timestamp is fixed for every later signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedClaim {
    identity: Identity,
    method: VerificationMethod,
    verified_at: DateTime<Utc>,
}

impl VerifiedClaim {
    #[inline]
    pub const fn identity(&self) -> &Identity {
        &self.identity
    }

    #[inline]
    pub const fn method(&self) -> VerificationMethod {
        self.method
    }

    #[inline]
    pub const fn verified_at(&self) -> DateTime<Utc> {
        self.verified_at
    }

    /// Unix seconds, as carried in `timestampUser`.
    #[inline]
    pub fn timestamp(&self) -> u64 {
        u64::try_from(self.verified_at.timestamp()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimState {
    Unclaimed { kind: IdentityKind, value: String },
    Sent { identity: Identity, challenge: Challenge },
    Verified(VerifiedClaim),
}

impl ClaimState {
    #[inline]
    pub fn new(kind: IdentityKind, value: impl Into<String>) -> Self {
        Self::Unclaimed {
            kind,
            value: value.into(),
        }
    }

    pub const fn kind(&self) -> IdentityKind {
        match self {
            Self::Unclaimed { kind, .. } => *kind,
            Self::Sent { identity, .. } => identity.kind(),
            Self::Verified(claim) => claim.identity.kind(),
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Unclaimed { value, .. } => value,
            Self::Sent { identity, .. } => identity.as_str(),
            Self::Verified(claim) => claim.identity.as_str(),
        }
    }

    #[inline]
    pub const fn verified(&self) -> Option<&VerifiedClaim> {
        match self {
            Self::Verified(claim) => Some(claim),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_verified(&self) -> bool {
        self.verified().is_some()
    }

    /// Replaces the claimed value. A different value always starts over.
    pub fn edit(&self, value: impl Into<String>) -> Self {
        let value = value.into();
        if value == self.value() {
            return self.clone();
        }
        Self::new(self.kind(), value)
    }

    /// Validated identity a challenge can be issued for.
    pub fn prepare(&self) -> Result<Identity> {
        match self {
            Self::Unclaimed { kind, value } => Identity::new(*kind, value.clone()),
            Self::Sent { identity, .. } => Ok(identity.clone()),
            Self::Verified(_) => Err(EvvmError::PreconditionNotMet("claim is already verified")),
        }
    }

    pub fn code_sent(&self, id: ChallengeId, code: OneTimeCode) -> Result<Self> {
        Ok(Self::Sent {
            identity: self.prepare()?,
            challenge: Challenge::Code { id, code },
        })
    }

    pub fn attestation_requested(&self) -> Result<Self> {
        Ok(Self::Sent {
            identity: self.prepare()?,
            challenge: Challenge::Attestation,
        })
    }

    /// A wrong code fails with [`EvvmError::CodeMismatch`]; the caller keeps
    /// the current state and may retry.
    pub fn submit_code(&self, input: &str, now: DateTime<Utc>) -> Result<Self> {
        let Self::Sent {
            identity,
            challenge: Challenge::Code { code, .. },
        } = self
        else {
            return Err(EvvmError::PreconditionNotMet("no one-time code was sent"));
        };
        if !code.matches(input) {
            return Err(EvvmError::CodeMismatch);
        }
        Ok(Self::Verified(VerifiedClaim {
            identity: identity.clone(),
            method: VerificationMethod::OutOfBandCode,
            verified_at: now,
        }))
    }

    pub fn attested(&self, attestation: &Attestation, now: DateTime<Utc>) -> Result<Self> {
        let Self::Sent {
            identity,
            challenge: Challenge::Attestation,
        } = self
        else {
            return Err(EvvmError::PreconditionNotMet("no attestation was requested"));
        };
        if !attestation.attests(identity) {
            return Err(EvvmError::AttestationMismatch {
                claimed: identity.to_string(),
                attested: attestation.verified_identity.clone(),
            });
        }
        Ok(Self::Verified(VerifiedClaim {
            identity: identity.clone(),
            method: VerificationMethod::ThirdPartyAttestation,
            verified_at: now,
        }))
    }
}
