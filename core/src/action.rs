use strum::{Display, EnumIter};

use crate::identity::IdentityKind;

/// Every authorization the client can build. The tag selects the message
/// layout and whether a verified identity claim is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Action {
    Payment,
    DispersePayment,
    RegisterUsername,
    RegisterEmail,
    RegisterPhone,
}

impl Action {
    #[inline]
    pub const fn registration(kind: IdentityKind) -> Self {
        match kind {
            IdentityKind::Username => Self::RegisterUsername,
            IdentityKind::Email => Self::RegisterEmail,
            IdentityKind::PhoneNumber => Self::RegisterPhone,
        }
    }

    /// Function tag written right after the application identifier.
    #[inline]
    pub const fn function_name(self) -> &'static str {
        match self {
            Self::Payment => "pay",
            Self::DispersePayment => "dispersePay",
            Self::RegisterUsername => "registrationUsername",
            Self::RegisterEmail => "registrationEmail",
            Self::RegisterPhone => "registrationPhoneNumber",
        }
    }

    /// Kind of identity claim that must be verified before signing, if any.
    #[inline]
    pub const fn identity_kind(self) -> Option<IdentityKind> {
        match self {
            Self::Payment | Self::DispersePayment => None,
            Self::RegisterUsername => Some(IdentityKind::Username),
            Self::RegisterEmail => Some(IdentityKind::Email),
            Self::RegisterPhone => Some(IdentityKind::PhoneNumber),
        }
    }
}
