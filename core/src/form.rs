//! Parsing of raw form input into the typed values the encoder accepts.
//!
//! Blank inputs report [`EvvmError::EmptyRequiredField`] with the field
//! name, so the caller can point at the offending input.

use alloy_primitives::{Address, Bytes, U256};
use serde::Deserialize;

use crate::{
    EvvmError, Priority, Result,
    payment::{DisperseEntry, DispersePayFields, PayFields},
    recipient::Recipient,
    registration::{Authority, RegistrationRequest},
};

/// Decimal unsigned 256-bit integer.
pub fn parse_u256(field: &'static str, raw: &str) -> Result<U256> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(EvvmError::EmptyRequiredField(field));
    }
    U256::from_str_radix(raw, 10).map_err(|_| EvvmError::InvalidNumber {
        field,
        value: raw.to_owned(),
    })
}

/// Like [`parse_u256`], but blank means zero.
pub fn parse_u256_or_zero(field: &'static str, raw: &str) -> Result<U256> {
    if raw.trim().is_empty() {
        return Ok(U256::ZERO);
    }
    parse_u256(field, raw)
}

pub fn parse_address(field: &'static str, raw: &str) -> Result<Address> {
    parse_optional_address(field, raw)?.ok_or(EvvmError::EmptyRequiredField(field))
}

pub fn parse_optional_address(field: &'static str, raw: &str) -> Result<Option<Address>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<Address>()
        .map(Some)
        .map_err(|_| EvvmError::InvalidAddress {
            field,
            value: raw.to_owned(),
        })
}

/// Exactly one of `address` or `identity` must be filled in.
pub fn parse_recipient(address: &str, identity: &str) -> Result<Recipient> {
    Recipient::from_parts(
        parse_optional_address("to_address", address)?,
        identity.trim(),
    )
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PayForm {
    pub to_address: String,
    pub to_identity: String,
    pub token: String,
    pub amount: String,
    pub priority_fee: String,
    pub nonce: String,
    pub priority: bool,
    /// Blank lets any executor relay the payment.
    pub executor: String,
}

impl PayForm {
    pub fn parse(&self) -> Result<PayFields> {
        Ok(PayFields {
            recipient: parse_recipient(&self.to_address, &self.to_identity)?,
            token: parse_address("token", &self.token)?,
            amount: parse_u256("amount", &self.amount)?,
            priority_fee: parse_u256("priority_fee", &self.priority_fee)?,
            nonce: parse_u256("nonce", &self.nonce)?,
            priority: Priority::from_flag(self.priority),
            executor: parse_optional_address("executor", &self.executor)?.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisperseRow {
    pub amount: String,
    pub to_address: String,
    pub to_identity: String,
}

impl DisperseRow {
    pub fn parse(&self) -> Result<DisperseEntry> {
        Ok(DisperseEntry {
            amount: parse_u256("amount", &self.amount)?,
            recipient: parse_recipient(&self.to_address, &self.to_identity)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisperseForm {
    pub rows: Vec<DisperseRow>,
    pub token: String,
    pub priority_fee: String,
    pub nonce: String,
    pub priority: bool,
    pub executor: String,
}

impl DisperseForm {
    pub fn parse(&self) -> Result<DispersePayFields> {
        if self.rows.is_empty() {
            return Err(EvvmError::EmptyDisperseBatch);
        }
        Ok(DispersePayFields {
            entries: self
                .rows
                .iter()
                .map(DisperseRow::parse)
                .collect::<Result<_>>()?,
            token: parse_address("token", &self.token)?,
            priority_fee: parse_u256("priority_fee", &self.priority_fee)?,
            nonce: parse_u256("nonce", &self.nonce)?,
            priority: Priority::from_flag(self.priority),
            executor: parse_optional_address("executor", &self.executor)?.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    /// Blank when not disambiguating a pre-registration.
    pub distinguishing_number: String,
    pub nonce: String,
    pub priority_fee: String,
    pub evvm_nonce: String,
    pub priority: bool,
    pub authority_timestamp: String,
    pub authority_signature: String,
}

impl RegistrationForm {
    pub fn parse(&self) -> Result<RegistrationRequest> {
        Ok(RegistrationRequest {
            distinguishing_number: parse_u256_or_zero(
                "distinguishing_number",
                &self.distinguishing_number,
            )?,
            nonce: parse_u256("nonce", &self.nonce)?,
            priority_fee: parse_u256("priority_fee", &self.priority_fee)?,
            evvm_nonce: parse_u256("evvm_nonce", &self.evvm_nonce)?,
            priority: Priority::from_flag(self.priority),
            authority: self.parse_authority()?,
        })
    }

    fn parse_authority(&self) -> Result<Authority> {
        let timestamp = parse_u256_or_zero("authority_timestamp", &self.authority_timestamp)?;
        let timestamp = u64::try_from(timestamp).map_err(|_| EvvmError::InvalidNumber {
            field: "authority_timestamp",
            value: self.authority_timestamp.trim().to_owned(),
        })?;

        let raw = self.authority_signature.trim();
        let signature = if raw.is_empty() || raw == "0x" {
            Bytes::new()
        } else {
            raw.parse::<Bytes>()
                .map_err(|_| EvvmError::MalformedAuthority)?
        };
        Authority::from_parts(timestamp, signature)
    }
}
