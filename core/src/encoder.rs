//! Canonical Encoder: turns typed actions into the exact text an EVVM
//! contract rebuilds and checks the `personal_sign` signature against.
//!
//! Field order of every message is fixed by the verifying contracts.

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::SolValue;
use evvm_crypto::{keccak256, sha256};
use tracing::debug;

use crate::{
    EvvmError, Priority, Result,
    action::Action,
    identity::Identity,
    payment::{DisperseEntry, DispersePayFields, PayFields},
    registration::RegistrationAction,
};

/// `0x`-prefixed lowercase hex.
#[inline]
pub fn render_hex(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Digest of a disperse batch: SHA-256 over the ABI encoding of
/// `(uint256,address,string)[]`, entries kept in submission order.
pub fn hash_disperse_payment_users_to_pay(entries: &[DisperseEntry]) -> B256 {
    let tuples: Vec<(U256, Address, String)> =
        entries.iter().map(DisperseEntry::to_abi_tuple).collect();
    sha256(tuples.abi_encode())
}

/// Pre-registration commitment: Keccak-256 over `abi.encodePacked(string, uint256)`.
///
/// Identical for usernames, emails and phone numbers.
pub fn hash_pre_registered_identity(value: &str, distinguishing_number: U256) -> B256 {
    keccak256(
        [
            value.as_bytes(),
            distinguishing_number.to_be_bytes::<32>().as_slice(),
        ]
        .concat(),
    )
}

/// Builds the comma-separated message text field by field.
struct MessageBuilder(Vec<String>);

impl MessageBuilder {
    fn new(evvm_id: U256, function: &str) -> Self {
        Self(vec![evvm_id.to_string(), function.to_owned()])
    }

    fn number(mut self, value: U256) -> Self {
        self.0.push(value.to_string());
        self
    }

    fn address(mut self, value: Address) -> Self {
        self.0.push(render_hex(value.as_slice()));
        self
    }

    fn digest(mut self, value: B256) -> Self {
        self.0.push(render_hex(value.as_slice()));
        self
    }

    fn text(mut self, value: impl Into<String>) -> Self {
        self.0.push(value.into());
        self
    }

    fn flag(mut self, value: Priority) -> Self {
        self.0.push(value.to_string());
        self
    }

    fn build(self) -> String {
        self.0.join(",")
    }
}

/// Message encoder bound to one EVVM deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoder {
    evvm_id: U256,
}

impl Encoder {
    #[inline]
    pub const fn new(evvm_id: U256) -> Self {
        Self { evvm_id }
    }

    #[inline]
    pub const fn evvm_id(&self) -> U256 {
        self.evvm_id
    }

    fn message(&self, function: &str) -> MessageBuilder {
        MessageBuilder::new(self.evvm_id, function)
    }

    /// `{evvm_id},pay,{to},{token},{amount},{priority_fee},{nonce},{priority_flag},{executor}`
    pub fn pay(&self, fields: &PayFields) -> Result<String> {
        fields.recipient.validate()?;

        let message = self
            .message(Action::Payment.function_name())
            .text(fields.recipient.to_string())
            .address(fields.token)
            .number(fields.amount)
            .number(fields.priority_fee)
            .number(fields.nonce)
            .flag(fields.priority)
            .address(fields.executor)
            .build();
        debug!(%message, "encoded pay");
        Ok(message)
    }

    /// Same layout as [`pay`](Self::pay), with the batch digest in place of
    /// the recipient and the batch total as amount.
    pub fn disperse_pay(&self, fields: &DispersePayFields) -> Result<String> {
        if fields.entries.is_empty() {
            return Err(EvvmError::EmptyDisperseBatch);
        }
        for entry in &fields.entries {
            entry.recipient.validate()?;
        }
        let amount = fields.total_amount()?;

        let message = self
            .message(Action::DispersePayment.function_name())
            .digest(hash_disperse_payment_users_to_pay(&fields.entries))
            .address(fields.token)
            .number(amount)
            .number(fields.priority_fee)
            .number(fields.nonce)
            .flag(fields.priority)
            .address(fields.executor)
            .build();
        debug!(%message, entries = fields.entries.len(), "encoded disperse pay");
        Ok(message)
    }

    /// `{evvm_id},{function},{service},{identity},{distinguishing_number},{nonce},{reward},{priority_fee},{evvm_nonce},{priority_flag}`
    pub fn registration(&self, action: &RegistrationAction) -> String {
        let function = action.identity.kind().registration_function();
        let message = self
            .message(function)
            .address(action.service)
            .text(action.identity.as_str())
            .number(action.distinguishing_number)
            .number(action.nonce)
            .number(action.reward)
            .number(action.priority_fee)
            .number(action.evvm_nonce)
            .flag(action.priority)
            .build();
        debug!(function, "encoded registration");
        message
    }

    /// `{evvm_id},{function},{commitment},{nonce}`
    pub fn pre_registration(
        &self,
        identity: &Identity,
        distinguishing_number: U256,
        nonce: U256,
    ) -> String {
        self.message(identity.kind().pre_registration_function())
            .digest(identity.pre_registration_commitment(distinguishing_number))
            .number(nonce)
            .build()
    }
}
