pub mod asserts;
pub mod logging;
pub mod random;
pub mod signer;
pub mod tamper;
