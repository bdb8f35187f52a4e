use alloy_primitives::{Address, Bytes, U256};

use crate::{EvvmError, Priority, Result, recipient::Recipient};

/// Everything a `pay` message binds, apart from the application identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayFields {
    pub recipient: Recipient,
    pub token: Address,
    pub amount: U256,
    pub priority_fee: U256,
    pub nonce: U256,
    pub priority: Priority,
    pub executor: Address,
}

/// One position of a disperse batch. Position within the batch is part of
/// the batch digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisperseEntry {
    pub amount: U256,
    pub recipient: Recipient,
}

impl DisperseEntry {
    #[inline]
    pub fn new(amount: U256, recipient: impl Into<Recipient>) -> Self {
        Self {
            amount,
            recipient: recipient.into(),
        }
    }

    /// `(uint256 amount, address to_address, string to_identity)`
    #[inline]
    pub fn to_abi_tuple(&self) -> (U256, Address, String) {
        (
            self.amount,
            self.recipient.to_address(),
            self.recipient.to_identity().to_owned(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispersePayFields {
    pub entries: Vec<DisperseEntry>,
    pub token: Address,
    pub priority_fee: U256,
    pub nonce: U256,
    pub priority: Priority,
    pub executor: Address,
}

impl DispersePayFields {
    /// Sum of all entry amounts.
    pub fn total_amount(&self) -> Result<U256> {
        self.entries.iter().try_fold(U256::ZERO, |total, entry| {
            total
                .checked_add(entry.amount)
                .ok_or(EvvmError::AmountOverflow)
        })
    }
}

/// A signed `pay` authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPay {
    from: Address,
    fields: PayFields,
    signature: Bytes,
}

impl SignedPay {
    #[inline]
    pub(crate) const fn new(from: Address, fields: PayFields, signature: Bytes) -> Self {
        Self {
            from,
            fields,
            signature,
        }
    }

    #[inline]
    pub const fn from(&self) -> Address {
        self.from
    }

    #[inline]
    pub const fn fields(&self) -> &PayFields {
        &self.fields
    }

    #[inline]
    pub const fn signature(&self) -> &Bytes {
        &self.signature
    }
}

/// A signed `dispersePay` authorization together with the total it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedDispersePay {
    from: Address,
    fields: DispersePayFields,
    amount: U256,
    signature: Bytes,
}

impl SignedDispersePay {
    #[inline]
    pub(crate) const fn new(
        from: Address,
        fields: DispersePayFields,
        amount: U256,
        signature: Bytes,
    ) -> Self {
        Self {
            from,
            fields,
            amount,
            signature,
        }
    }

    #[inline]
    pub const fn from(&self) -> Address {
        self.from
    }

    #[inline]
    pub const fn fields(&self) -> &DispersePayFields {
        &self.fields
    }

    #[inline]
    pub const fn amount(&self) -> U256 {
        self.amount
    }

    #[inline]
    pub const fn signature(&self) -> &Bytes {
        &self.signature
    }
}
