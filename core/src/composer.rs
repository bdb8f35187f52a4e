//! Dual-Signature Composer.
//!
//! Drives the [`Signer`] over the canonical messages and assembles signed
//! payloads. A registration prompts the signer exactly twice: once for the
//! reward payment and once for the registration action.

use alloy_primitives::{Address, Bytes, U256};
use evvm_crypto::Signer;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

use crate::{
    EvvmError, Result,
    config::EvvmConfig,
    constants::REWARD_MULTIPLIER,
    encoder::Encoder,
    identity::IdentityKind,
    payment::{DispersePayFields, PayFields, SignedDispersePay, SignedPay},
    recipient::Recipient,
    registration::{RegistrationAction, RegistrationFields, RegistrationRequest},
    reward::RewardLookup,
    verification::ClaimState,
};

#[derive(Debug)]
pub struct Composer<S, R> {
    encoder: Encoder,
    name_service: Address,
    principal_token: Address,
    signer: S,
    rewards: R,
    in_flight: Mutex<()>,
}

impl<S, R> Composer<S, R>
where
    S: Signer,
    R: RewardLookup,
{
    pub fn new(config: &EvvmConfig, signer: S, rewards: R) -> Self {
        Self {
            encoder: Encoder::new(config.evvm_id),
            name_service: config.name_service,
            principal_token: config.principal_token,
            signer,
            rewards,
            in_flight: Mutex::new(()),
        }
    }

    #[inline]
    pub const fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    #[inline]
    pub const fn signer(&self) -> &S {
        &self.signer
    }

    #[inline]
    pub const fn rewards(&self) -> &R {
        &self.rewards
    }

    #[instrument(skip_all, fields(evvm_id = %self.encoder.evvm_id()))]
    pub async fn sign_pay(&self, fields: PayFields) -> Result<SignedPay> {
        let _guard = self.begin()?;

        let message = self.encoder.pay(&fields)?;
        let signature = self.sign(&message).await?;
        info!("pay signed");

        Ok(SignedPay::new(self.signer.address(), fields, signature))
    }

    #[instrument(skip_all, fields(evvm_id = %self.encoder.evvm_id(), entries = fields.entries.len()))]
    pub async fn sign_disperse_pay(&self, fields: DispersePayFields) -> Result<SignedDispersePay> {
        let _guard = self.begin()?;

        let message = self.encoder.disperse_pay(&fields)?;
        let amount = fields.total_amount()?;
        let signature = self.sign(&message).await?;
        info!("disperse pay signed");

        Ok(SignedDispersePay::new(
            self.signer.address(),
            fields,
            amount,
            signature,
        ))
    }

    #[inline]
    pub async fn sign_registration_username(
        &self,
        claim: &ClaimState,
        request: RegistrationRequest,
    ) -> Result<RegistrationFields> {
        self.sign_registration(IdentityKind::Username, claim, request)
            .await
    }

    #[inline]
    pub async fn sign_registration_email(
        &self,
        claim: &ClaimState,
        request: RegistrationRequest,
    ) -> Result<RegistrationFields> {
        self.sign_registration(IdentityKind::Email, claim, request)
            .await
    }

    #[inline]
    pub async fn sign_registration_phone_number(
        &self,
        claim: &ClaimState,
        request: RegistrationRequest,
    ) -> Result<RegistrationFields> {
        self.sign_registration(IdentityKind::PhoneNumber, claim, request)
            .await
    }

    #[instrument(skip_all, fields(evvm_id = %self.encoder.evvm_id(), kind = %kind))]
    async fn sign_registration(
        &self,
        kind: IdentityKind,
        claim: &ClaimState,
        request: RegistrationRequest,
    ) -> Result<RegistrationFields> {
        let _guard = self.begin()?;

        let verified = claim
            .verified()
            .ok_or(EvvmError::PreconditionNotMet("identity claim is not verified"))?;
        if verified.identity().kind() != kind {
            return Err(EvvmError::PreconditionNotMet(
                "verified claim is for another identity kind",
            ));
        }

        let reward = self
            .rewards
            .reward(self.name_service)
            .await
            .map_err(|err| {
                warn!(%err, "reward lookup failed");
                EvvmError::RewardUnavailable(err)
            })?;
        let amount = reward
            .checked_mul(U256::from(REWARD_MULTIPLIER))
            .ok_or(EvvmError::AmountOverflow)?;
        debug!(%reward, %amount, "reward resolved");

        let payment = PayFields {
            recipient: Recipient::Address(self.name_service),
            token: self.principal_token,
            amount,
            priority_fee: request.priority_fee,
            nonce: request.evvm_nonce,
            priority: request.priority,
            executor: self.name_service,
        };
        let action = RegistrationAction {
            service: self.name_service,
            identity: verified.identity().clone(),
            distinguishing_number: request.distinguishing_number,
            nonce: request.nonce,
            reward,
            priority_fee: request.priority_fee,
            evvm_nonce: request.evvm_nonce,
            priority: request.priority,
        };
        let pay_message = self.encoder.pay(&payment)?;
        let action_message = self.encoder.registration(&action);

        let pay_signature = self.sign(&pay_message).await?;
        let user_signature = self.sign(&action_message).await?;
        info!("registration signed");

        let user = self.signer.address();
        Ok(RegistrationFields::new(
            user,
            request.nonce,
            action.identity,
            request.distinguishing_number,
            verified.timestamp(),
            user_signature,
            request.authority,
            SignedPay::new(user, payment, pay_signature),
        ))
    }

    /// Only one signing sequence may prompt the signer at a time.
    fn begin(&self) -> Result<MutexGuard<'_, ()>> {
        self.in_flight
            .try_lock()
            .map_err(|_| EvvmError::CompositionInProgress)
    }

    async fn sign(&self, message: &str) -> Result<Bytes> {
        self.signer
            .sign(message.as_bytes())
            .await
            .inspect_err(|err| warn!(%err, "signer failed"))
            .map_err(Into::into)
    }
}
