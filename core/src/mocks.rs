//! Scripted collaborators for tests.

use std::sync::{
    Mutex, PoisonError,
    atomic::{AtomicUsize, Ordering},
};

use alloy_primitives::{Address, U256};
use async_trait::async_trait;

use crate::{
    identity::Identity,
    reward::{LookupError, RewardLookup},
    submission::{SubmissionPayload, SubmitError, Submitter, TxId},
    verification::{
        Attestation, ChallengeId, OneTimeCode,
        flow::{AttestationError, Authenticator, CodeSender, TransportError},
    },
};

/// Returns the same reward for every service and counts lookups.
#[derive(Debug, Default)]
pub struct FixedReward {
    reward: U256,
    calls: AtomicUsize,
}

impl FixedReward {
    pub const fn new(reward: U256) -> Self {
        Self {
            reward,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RewardLookup for FixedReward {
    async fn reward(&self, _service: Address) -> Result<U256, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reward)
    }
}

#[derive(Debug, Default)]
pub struct FailingReward;

#[async_trait]
impl RewardLookup for FailingReward {
    async fn reward(&self, _service: Address) -> Result<U256, LookupError> {
        Err(LookupError::LookupFailed("rpc unavailable".to_owned()))
    }
}

/// Keeps every delivered code, or fails every delivery.
#[derive(Debug, Default)]
pub struct RecordingCodeSender {
    sent: Mutex<Vec<(Identity, OneTimeCode)>>,
    failure: Option<String>,
}

impl RecordingCodeSender {
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            sent: Mutex::default(),
            failure: Some(reason.into()),
        }
    }

    pub fn last_code(&self) -> Option<OneTimeCode> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .map(|(_, code)| code.clone())
    }

    pub fn deliveries(&self) -> usize {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl CodeSender for RecordingCodeSender {
    async fn send_code(
        &self,
        identity: &Identity,
        code: &OneTimeCode,
    ) -> Result<ChallengeId, TransportError> {
        if let Some(reason) = &self.failure {
            return Err(TransportError::DeliveryFailed(reason.clone()));
        }
        let mut sent = self.sent.lock().unwrap_or_else(PoisonError::into_inner);
        sent.push((identity.clone(), code.clone()));
        Ok(ChallengeId(format!("challenge-{}", sent.len())))
    }
}

/// Answers every authentication with the same scripted result.
#[derive(Debug)]
pub struct ScriptedAuthenticator {
    response: Result<Attestation, AttestationError>,
    session: Option<Attestation>,
}

impl ScriptedAuthenticator {
    pub const fn new(response: Result<Attestation, AttestationError>) -> Self {
        Self {
            response,
            session: None,
        }
    }

    #[must_use]
    pub fn with_session(mut self, attestation: Attestation) -> Self {
        self.session = Some(attestation);
        self
    }
}

#[async_trait]
impl Authenticator for ScriptedAuthenticator {
    async fn authenticate(&self, _identity: &Identity) -> Result<Attestation, AttestationError> {
        self.response.clone()
    }

    async fn existing_session(&self) -> Result<Option<Attestation>, AttestationError> {
        Ok(self.session.clone())
    }
}

/// Records accepted payloads, or rejects every submission.
#[derive(Debug, Default)]
pub struct RecordingSubmitter {
    submitted: Mutex<Vec<SubmissionPayload>>,
    rejection: Option<String>,
}

impl RecordingSubmitter {
    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            submitted: Mutex::default(),
            rejection: Some(reason.into()),
        }
    }

    pub fn submitted(&self) -> Vec<SubmissionPayload> {
        self.submitted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Submitter for RecordingSubmitter {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<TxId, SubmitError> {
        if let Some(reason) = &self.rejection {
            return Err(SubmitError::Rejected(reason.clone()));
        }
        let mut submitted = self.submitted.lock().unwrap_or_else(PoisonError::into_inner);
        submitted.push(payload.clone());
        Ok(TxId(format!("0x{:064x}", submitted.len())))
    }
}
