use alloy_primitives::{Address, address};

/// The EVVM principal token, in which registration rewards are paid.
pub const PRINCIPAL_TOKEN: Address = address!("0x0000000000000000000000000000000000000001");

/// A registration costs this many times the current reward unit.
pub const REWARD_MULTIPLIER: u64 = 100;

pub const MIN_USERNAME_LEN: usize = 4;

pub const MIN_PHONE_DIGITS: usize = 10;

pub const ONE_TIME_CODE_DIGITS: u32 = 6;
