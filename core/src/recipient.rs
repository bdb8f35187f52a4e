use core::fmt;

use alloy_primitives::Address;
use derive_more::From;

use crate::{EvvmError, Result, encoder::render_hex};

/// Who receives a payment: an address or a registered identity, never both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, From)]
pub enum Recipient {
    Address(Address),
    Identity(String),
}

impl Recipient {
    /// Builds a recipient from the two wire fields, where the zero address
    /// and the empty string mean "not set".
    pub fn from_parts(address: Option<Address>, identity: &str) -> Result<Self> {
        match (address.filter(|a| !a.is_zero()), identity.is_empty()) {
            (Some(address), true) => Ok(Self::Address(address)),
            (None, false) => Ok(Self::Identity(identity.to_owned())),
            _ => Err(EvvmError::MalformedRecipient),
        }
    }

    /// Rejects the values [`from_parts`](Self::from_parts) treats as unset.
    pub fn validate(&self) -> Result<()> {
        let populated = match self {
            Self::Address(address) => !address.is_zero(),
            Self::Identity(identity) => !identity.is_empty(),
        };
        if populated {
            Ok(())
        } else {
            Err(EvvmError::MalformedRecipient)
        }
    }

    /// `to_address` wire field; zero when paying an identity.
    #[inline]
    pub const fn to_address(&self) -> Address {
        match self {
            Self::Address(address) => *address,
            Self::Identity(_) => Address::ZERO,
        }
    }

    /// `to_identity` wire field; empty when paying an address.
    #[inline]
    pub fn to_identity(&self) -> &str {
        match self {
            Self::Address(_) => "",
            Self::Identity(identity) => identity,
        }
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(address) => f.write_str(&render_hex(address.as_slice())),
            Self::Identity(identity) => f.write_str(identity),
        }
    }
}
