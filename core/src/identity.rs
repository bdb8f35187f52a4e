use core::fmt;

use alloy_primitives::{B256, U256};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::{
    EvvmError, Result,
    action::Action,
    constants::{MIN_PHONE_DIGITS, MIN_USERNAME_LEN},
    encoder::hash_pre_registered_identity,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IdentityKind {
    Username,
    Email,
    PhoneNumber,
}

impl IdentityKind {
    #[inline]
    pub const fn registration_function(self) -> &'static str {
        Action::registration(self).function_name()
    }

    #[inline]
    pub const fn pre_registration_function(self) -> &'static str {
        match self {
            Self::Username => "preRegistrationUsername",
            Self::Email => "preRegistrationEmail",
            Self::PhoneNumber => "preRegistrationPhoneNumber",
        }
    }

    /// Checks `value` has the shape expected for this kind.
    pub fn validate(self, value: &str) -> Result<()> {
        if value.is_empty() {
            return Err(EvvmError::EmptyRequiredField("identity"));
        }

        let valid = match self {
            Self::Username => is_valid_username(value),
            Self::Email => is_valid_email(value),
            Self::PhoneNumber => is_valid_phone_number(value),
        };
        if !valid {
            return Err(EvvmError::InvalidIdentityFormat {
                kind: self,
                value: value.to_owned(),
            });
        }
        Ok(())
    }
}

fn is_valid_username(value: &str) -> bool {
    value.len() >= MIN_USERNAME_LEN
        && value.starts_with(|c: char| c.is_ascii_alphabetic())
        && value.chars().all(|c| c.is_ascii_alphanumeric())
}

fn is_valid_email(value: &str) -> bool {
    value
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty() && !domain.contains('@'))
}

fn is_valid_phone_number(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_digit() || "+-() ".contains(c))
        && value.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS
}

/// A username, email or phone number whose shape has been validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Identity {
    kind: IdentityKind,
    value: String,
}

impl Identity {
    pub fn new(kind: IdentityKind, value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        kind.validate(&value)?;
        Ok(Self { kind, value })
    }

    #[inline]
    pub const fn kind(&self) -> IdentityKind {
        self.kind
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Keccak commitment used to pre-register this identity.
    #[inline]
    pub fn pre_registration_commitment(&self, distinguishing_number: U256) -> B256 {
        hash_pre_registered_identity(&self.value, distinguishing_number)
    }
}

impl fmt::Display for Identity {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
