#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use evvm_core::{
    Address, U256,
    composer::Composer,
    config::EvvmConfig,
    mocks::{FixedReward, RecordingCodeSender, RecordingSubmitter},
    reward::RewardLookup,
};
use evvm_erc191::LocalSigner;
use evvm_test_utils::{
    logging::init_test_logging,
    random::{Rng, TestRng},
    signer::CountingSigner,
};
use hex_literal::hex;

pub const NAME_SERVICE: Address = Address::new(hex!("8ac2f5a3bf9c3e8d1c4b0b6f7f9f7b4e5e2a0c11"));

/// Unix time every scripted verification happens at.
pub const VERIFIED_AT: i64 = 1_700_000_000;

pub struct Env {
    pub config: EvvmConfig,
    pub user: LocalSigner,
    pub code_sender: RecordingCodeSender,
    pub submitter: RecordingSubmitter,
    reward: U256,
}

impl Env {
    pub fn builder() -> EnvBuilder {
        EnvBuilder::default()
    }

    pub fn new(rng: &mut TestRng) -> Self {
        Self::builder().build(rng)
    }

    /// Composer prompting [`Env::user`] and paying the configured reward.
    pub fn composer(&self) -> Composer<CountingSigner<&LocalSigner>, FixedReward> {
        self.composer_with(FixedReward::new(self.reward))
    }

    pub fn composer_with<R>(&self, rewards: R) -> Composer<CountingSigner<&LocalSigner>, R>
    where
        R: RewardLookup,
    {
        Composer::new(&self.config, CountingSigner::new(&self.user), rewards)
    }

    pub fn now(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(VERIFIED_AT, 0).unwrap()
    }
}

pub struct EnvBuilder {
    evvm_id: U256,
    reward: U256,
}

impl Default for EnvBuilder {
    fn default() -> Self {
        Self {
            evvm_id: U256::from(1),
            reward: U256::from(10),
        }
    }
}

impl EnvBuilder {
    pub const fn evvm_id(mut self, evvm_id: U256) -> Self {
        self.evvm_id = evvm_id;
        self
    }

    pub const fn reward(mut self, reward: U256) -> Self {
        self.reward = reward;
        self
    }

    pub fn build(self, rng: &mut TestRng) -> Env {
        init_test_logging();

        let user = loop {
            if let Ok(signer) = LocalSigner::from_slice(&rng.random::<[u8; 32]>()) {
                break signer;
            }
        };
        Env {
            config: EvvmConfig::new(self.evvm_id, NAME_SERVICE),
            user,
            code_sender: RecordingCodeSender::default(),
            submitter: RecordingSubmitter::default(),
            reward: self.reward,
        }
    }
}
