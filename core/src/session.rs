//! Per-user registration session.
//!
//! The session owns the identity claim and the latest signed payload. Async
//! work runs against a snapshot and hands its result back together with the
//! [`Ticket`] taken when it started; results for a session that was edited
//! or cleared in the meantime are dropped.

use tracing::{debug, info, instrument, warn};

use crate::{
    EvvmError, Result,
    identity::IdentityKind,
    submission::{SubmissionPayload, Submitter, TxId},
    verification::ClaimState,
};

/// Generation of a [`RegistrationSession`] at the time async work started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct Ticket(u64);

#[derive(Debug, Clone)]
pub struct RegistrationSession {
    claim: ClaimState,
    payload: Option<SubmissionPayload>,
    generation: u64,
}

impl RegistrationSession {
    pub fn new(kind: IdentityKind, value: impl Into<String>) -> Self {
        Self {
            claim: ClaimState::new(kind, value),
            payload: None,
            generation: 0,
        }
    }

    #[inline]
    pub const fn claim(&self) -> &ClaimState {
        &self.claim
    }

    #[inline]
    pub const fn payload(&self) -> Option<&SubmissionPayload> {
        self.payload.as_ref()
    }

    #[inline]
    pub const fn ticket(&self) -> Ticket {
        Ticket(self.generation)
    }

    /// A changed value discards the claim, any signed payload and every
    /// outstanding ticket.
    pub fn edit_identity(&mut self, value: impl Into<String>) {
        let claim = self.claim.edit(value);
        if claim != self.claim {
            self.claim = claim;
            self.invalidate();
        }
    }

    pub fn clear(&mut self) {
        self.claim = ClaimState::new(self.claim.kind(), String::new());
        self.invalidate();
    }

    /// Stores the outcome of a verification step started with `ticket`.
    ///
    /// Returns `Ok(false)` when the result was dropped as stale. On error
    /// the current claim is kept.
    pub fn apply_claim(&mut self, ticket: Ticket, result: Result<ClaimState>) -> Result<bool> {
        if !self.is_current(ticket) {
            debug!("dropping stale verification result");
            return Ok(false);
        }
        self.claim = result?;
        Ok(true)
    }

    /// Stores the outcome of a composition started with `ticket`, replacing
    /// any previous payload. On error the previous payload is kept.
    pub fn store_payload(
        &mut self,
        ticket: Ticket,
        result: Result<SubmissionPayload>,
    ) -> Result<bool> {
        if !self.is_current(ticket) {
            debug!("dropping stale signed payload");
            return Ok(false);
        }
        self.payload = Some(result?);
        Ok(true)
    }

    #[instrument(skip_all)]
    pub async fn submit<S>(&self, submitter: &S) -> Result<TxId>
    where
        S: Submitter + ?Sized,
    {
        let payload = self
            .payload
            .as_ref()
            .ok_or(EvvmError::PreconditionNotMet("nothing has been signed"))?;

        let tx = submitter
            .submit(payload)
            .await
            .inspect_err(|err| warn!(%err, "submission failed"))?;
        info!(tx = %tx.0, action = %payload.action(), "submitted");
        Ok(tx)
    }

    const fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.generation
    }

    fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.payload = None;
    }
}
