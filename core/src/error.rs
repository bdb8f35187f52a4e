use evvm_crypto::SignerError;
use strum::Display;
use thiserror::Error as ThisError;

use crate::{
    identity::IdentityKind,
    reward::LookupError,
    submission::SubmitError,
    verification::flow::{AttestationError, TransportError},
};

pub type Result<T, E = EvvmError> = ::core::result::Result<T, E>;

#[derive(Debug, ThisError)]
pub enum EvvmError {
    #[error("identity is already authenticated with the provider")]
    AlreadyAuthenticated,

    #[error("amount overflow")]
    AmountOverflow,

    #[error("attestation failed: {0}")]
    Attestation(String),

    #[error("attested identity `{attested}` does not match claimed `{claimed}`")]
    AttestationMismatch { claimed: String, attested: String },

    #[error("one-time code does not match")]
    CodeMismatch,

    #[error("another signing sequence is already in progress")]
    CompositionInProgress,

    #[error("config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("disperse batch is empty")]
    EmptyDisperseBatch,

    #[error("required field `{0}` is empty")]
    EmptyRequiredField(&'static str),

    #[error("field `{field}`: invalid address `{value}`")]
    InvalidAddress { field: &'static str, value: String },

    #[error("`{value}` is not a valid {kind}")]
    InvalidIdentityFormat { kind: IdentityKind, value: String },

    #[error("field `{field}`: invalid unsigned integer `{value}`")]
    InvalidNumber { field: &'static str, value: String },

    #[error("authority timestamp and signature must be both set or both empty")]
    MalformedAuthority,

    #[error("recipient must be exactly one of address or identity")]
    MalformedRecipient,

    #[error("precondition not met: {0}")]
    PreconditionNotMet(&'static str),

    #[error("rate limited by the authentication provider")]
    RateLimited,

    #[error("reward unavailable: {0}")]
    RewardUnavailable(#[source] LookupError),

    #[error("signer: {0}")]
    Signer(#[from] SignerError),

    #[error("submission: {0}")]
    Submission(#[from] SubmitError),

    #[error("transport: {0}")]
    Transport(#[from] TransportError),
}

impl From<AttestationError> for EvvmError {
    fn from(err: AttestationError) -> Self {
        match err {
            AttestationError::RateLimited => Self::RateLimited,
            AttestationError::AlreadyAuthenticated => Self::AlreadyAuthenticated,
            AttestationError::Failed(reason) => Self::Attestation(reason),
        }
    }
}

/// Coarse classification of [`EvvmError`].
///
/// `MalformedInput` is always raised before any collaborator is called.
/// `ExternalDependencyFailure` is recoverable by retrying: the state the
/// failed step started from is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    MalformedInput,
    PreconditionNotMet,
    ExternalDependencyFailure,
}

impl EvvmError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AmountOverflow
            | Self::CodeMismatch
            | Self::Config(_)
            | Self::EmptyDisperseBatch
            | Self::EmptyRequiredField(_)
            | Self::InvalidAddress { .. }
            | Self::InvalidIdentityFormat { .. }
            | Self::InvalidNumber { .. }
            | Self::MalformedAuthority
            | Self::MalformedRecipient => ErrorKind::MalformedInput,
            Self::CompositionInProgress | Self::PreconditionNotMet(_) => {
                ErrorKind::PreconditionNotMet
            }
            Self::AlreadyAuthenticated
            | Self::Attestation(_)
            | Self::AttestationMismatch { .. }
            | Self::RateLimited
            | Self::RewardUnavailable(_)
            | Self::Signer(_)
            | Self::Submission(_)
            | Self::Transport(_) => ErrorKind::ExternalDependencyFailure,
        }
    }
}
