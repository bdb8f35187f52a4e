//! Submission payload and its wire encoding toward the verifying backend.

use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use serde::{Serialize, Serializer, ser::SerializeMap};
use serde_with::{DisplayFromStr, serde_as};
use thiserror::Error as ThisError;

use crate::{
    action::Action,
    encoder::render_hex,
    identity::IdentityKind,
    payment::{SignedDispersePay, SignedPay},
    registration::RegistrationFields,
};

/// Everything needed to submit one signed action. Replaced, never mutated,
/// when the action is signed again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionPayload {
    Pay(SignedPay),
    DispersePay(SignedDispersePay),
    Registration(RegistrationFields),
}

impl SubmissionPayload {
    pub const fn action(&self) -> Action {
        match self {
            Self::Pay(_) => Action::Payment,
            Self::DispersePay(_) => Action::DispersePayment,
            Self::Registration(fields) => Action::registration(fields.identity().kind()),
        }
    }
}

impl From<SignedPay> for SubmissionPayload {
    #[inline]
    fn from(pay: SignedPay) -> Self {
        Self::Pay(pay)
    }
}

impl From<SignedDispersePay> for SubmissionPayload {
    #[inline]
    fn from(pay: SignedDispersePay) -> Self {
        Self::DispersePay(pay)
    }
}

impl From<RegistrationFields> for SubmissionPayload {
    #[inline]
    fn from(fields: RegistrationFields) -> Self {
        Self::Registration(fields)
    }
}

fn address(value: Address) -> String {
    render_hex(value.as_slice())
}

fn signature(value: &Bytes) -> String {
    render_hex(value)
}

#[serde_as]
#[derive(Serialize)]
struct PayInputData<'a> {
    from: String,
    to_address: String,
    to_identity: &'a str,
    token: String,
    #[serde_as(as = "DisplayFromStr")]
    amount: U256,
    #[serde(rename = "priorityFee")]
    #[serde_as(as = "DisplayFromStr")]
    priority_fee: U256,
    #[serde_as(as = "DisplayFromStr")]
    nonce: U256,
    priority: bool,
    executor: String,
    signature: String,
}

impl<'a> From<&'a SignedPay> for PayInputData<'a> {
    fn from(pay: &'a SignedPay) -> Self {
        let fields = pay.fields();
        Self {
            from: address(pay.from()),
            to_address: address(fields.recipient.to_address()),
            to_identity: fields.recipient.to_identity(),
            token: address(fields.token),
            amount: fields.amount,
            priority_fee: fields.priority_fee,
            nonce: fields.nonce,
            priority: fields.priority.flag(),
            executor: address(fields.executor),
            signature: signature(pay.signature()),
        }
    }
}

#[serde_as]
#[derive(Serialize)]
struct DisperseToData<'a> {
    #[serde_as(as = "DisplayFromStr")]
    amount: U256,
    to_address: String,
    to_identity: &'a str,
}

#[serde_as]
#[derive(Serialize)]
struct DispersePayInputData<'a> {
    from: String,
    #[serde(rename = "toData")]
    to_data: Vec<DisperseToData<'a>>,
    token: String,
    #[serde_as(as = "DisplayFromStr")]
    amount: U256,
    #[serde(rename = "priorityFee")]
    #[serde_as(as = "DisplayFromStr")]
    priority_fee: U256,
    #[serde_as(as = "DisplayFromStr")]
    nonce: U256,
    priority: bool,
    executor: String,
    signature: String,
}

impl<'a> From<&'a SignedDispersePay> for DispersePayInputData<'a> {
    fn from(pay: &'a SignedDispersePay) -> Self {
        let fields = pay.fields();
        Self {
            from: address(pay.from()),
            to_data: fields
                .entries
                .iter()
                .map(|entry| DisperseToData {
                    amount: entry.amount,
                    to_address: address(entry.recipient.to_address()),
                    to_identity: entry.recipient.to_identity(),
                })
                .collect(),
            token: address(fields.token),
            amount: pay.amount(),
            priority_fee: fields.priority_fee,
            nonce: fields.nonce,
            priority: fields.priority.flag(),
            executor: address(fields.executor),
            signature: signature(pay.signature()),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum IdentityField<'a> {
    Username(&'a str),
    Email(&'a str),
    Phone(&'a str),
}

#[serde_as]
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationInputData<'a> {
    user: String,
    #[serde_as(as = "DisplayFromStr")]
    nonce: U256,
    #[serde(flatten)]
    identity: IdentityField<'a>,
    #[serde(skip_serializing_if = "U256::is_zero")]
    #[serde_as(as = "DisplayFromStr")]
    clow_number: U256,
    #[serde_as(as = "DisplayFromStr")]
    timestamp_user: u64,
    signature_user: String,
    #[serde_as(as = "DisplayFromStr")]
    timestamp_authority: u64,
    signature_authority: String,
    #[serde(rename = "priorityFee_EVVM")]
    #[serde_as(as = "DisplayFromStr")]
    priority_fee_evvm: U256,
    #[serde(rename = "nonce_EVVM")]
    #[serde_as(as = "DisplayFromStr")]
    nonce_evvm: U256,
    #[serde(rename = "priorityFlag_EVVM")]
    priority_flag_evvm: bool,
    #[serde(rename = "signature_EVVM")]
    signature_evvm: String,
}

impl<'a> From<&'a RegistrationFields> for RegistrationInputData<'a> {
    fn from(fields: &'a RegistrationFields) -> Self {
        let value = fields.identity().as_str();
        let payment = fields.payment();
        Self {
            user: address(fields.user()),
            nonce: fields.nonce(),
            identity: match fields.identity().kind() {
                IdentityKind::Username => IdentityField::Username(value),
                IdentityKind::Email => IdentityField::Email(value),
                IdentityKind::PhoneNumber => IdentityField::Phone(value),
            },
            clow_number: fields.distinguishing_number(),
            timestamp_user: fields.timestamp_user(),
            signature_user: signature(fields.signature_user()),
            timestamp_authority: fields.authority().timestamp(),
            signature_authority: signature(&fields.authority().signature()),
            priority_fee_evvm: payment.fields().priority_fee,
            nonce_evvm: payment.fields().nonce,
            priority_flag_evvm: payment.fields().priority.flag(),
            signature_evvm: signature(payment.signature()),
        }
    }
}

const fn registration_key(kind: IdentityKind) -> &'static str {
    match kind {
        IdentityKind::Username => "UsernameRegistrationInputData",
        IdentityKind::Email => "EmailRegistrationInputData",
        IdentityKind::PhoneNumber => "PhoneRegistrationInputData",
    }
}

impl Serialize for SubmissionPayload {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Pay(pay) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("PayInputData", &PayInputData::from(pay))?;
                map.end()
            }
            Self::DispersePay(pay) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("DispersePayInputData", &DispersePayInputData::from(pay))?;
                map.end()
            }
            Self::Registration(fields) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("PayInputData", &PayInputData::from(fields.payment()))?;
                map.serialize_entry(
                    registration_key(fields.identity().kind()),
                    &RegistrationInputData::from(fields),
                )?;
                map.end()
            }
        }
    }
}

/// Identifier the backend assigns to an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TxId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum SubmitError {
    #[error("submission rejected: {0}")]
    Rejected(String),
}

/// Transmits payloads to the backend or contract.
#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<TxId, SubmitError>;
}
