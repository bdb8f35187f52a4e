//! Async drivers wiring [`ClaimState`] to the code transport and the
//! third-party authentication provider.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use thiserror::Error as ThisError;
use tracing::{info, instrument, warn};

use super::{Attestation, ChallengeId, ClaimState, OneTimeCode};
use crate::{EvvmError, Result, identity::Identity};

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum TransportError {
    #[error("code delivery failed: {0}")]
    DeliveryFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum AttestationError {
    #[error("rate limited")]
    RateLimited,
    #[error("a session is already authenticated")]
    AlreadyAuthenticated,
    #[error("{0}")]
    Failed(String),
}

/// Delivers one-time codes by email or SMS.
#[async_trait]
pub trait CodeSender: Send + Sync {
    async fn send_code(
        &self,
        identity: &Identity,
        code: &OneTimeCode,
    ) -> Result<ChallengeId, TransportError>;
}

/// Third-party authentication provider.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, identity: &Identity) -> Result<Attestation, AttestationError>;

    /// Attestation of the session the provider already holds, if any.
    async fn existing_session(&self) -> Result<Option<Attestation>, AttestationError>;
}

/// Generates a fresh code, hands it to `sender` and returns the `Sent` state.
#[instrument(skip_all, fields(kind = %state.kind()))]
pub async fn request_code<S>(
    state: &ClaimState,
    sender: &S,
    rng: &mut (impl Rng + Send),
) -> Result<ClaimState>
where
    S: CodeSender + ?Sized,
{
    let identity = state.prepare()?;
    let code = OneTimeCode::random(rng);

    let id = sender
        .send_code(&identity, &code)
        .await
        .inspect_err(|err| warn!(%err, "code delivery failed"))?;
    info!("one-time code sent");

    state.code_sent(id, code)
}

/// Authenticates the claimed identity with the provider.
///
/// When the provider reports an existing session, that session is accepted
/// if it attests the same identity; otherwise
/// [`EvvmError::AlreadyAuthenticated`] is returned.
#[instrument(skip_all, fields(kind = %state.kind()))]
pub async fn authenticate<A>(
    state: &ClaimState,
    authenticator: &A,
    now: DateTime<Utc>,
) -> Result<ClaimState>
where
    A: Authenticator + ?Sized,
{
    let pending = state.attestation_requested()?;
    let identity = pending.prepare()?;

    let attestation = match authenticator.authenticate(&identity).await {
        Ok(attestation) => attestation,
        Err(AttestationError::AlreadyAuthenticated) => {
            match authenticator.existing_session().await? {
                Some(attestation) if attestation.attests(&identity) => {
                    info!("reusing existing provider session");
                    attestation
                }
                _ => return Err(EvvmError::AlreadyAuthenticated),
            }
        }
        Err(err) => {
            warn!(%err, "authentication failed");
            return Err(err.into());
        }
    };

    let verified = pending.attested(&attestation, now)?;
    info!("identity attested");
    Ok(verified)
}
