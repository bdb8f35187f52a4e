use rand::{RngCore, SeedableRng};
use rand_chacha::ChaChaRng;
use rstest::fixture;

pub use rand::{CryptoRng, Rng};

/// Seed of a [`TestRng`]. Printed by the [`rng`] fixture so a failing run
/// can be replayed with [`make_seedable_rng`].
#[derive(Debug, Copy, Clone)]
pub struct Seed(pub u64);

impl Seed {
    #[must_use]
    pub fn from_entropy() -> Self {
        Self(rand::rng().next_u64())
    }

    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn print_with_decoration(&self, test_name: &str) {
        println!("{test_name} seed: {}", self.0);
    }
}

/// Deterministic RNG for tests, reproducible from the printed [`Seed`].
#[derive(Debug, Clone)]
pub struct TestRng(ChaChaRng);

impl TestRng {
    #[must_use]
    pub fn new(seed: Seed) -> Self {
        Self(ChaChaRng::seed_from_u64(seed.as_u64()))
    }
}

impl RngCore for TestRng {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest);
    }
}

impl CryptoRng for TestRng {}

#[must_use]
pub fn make_seedable_rng(seed: Seed) -> TestRng {
    TestRng::new(seed)
}

#[fixture]
pub fn random_seed() -> Seed {
    Seed::from_entropy()
}

#[fixture]
pub fn rng(random_seed: Seed) -> TestRng {
    random_seed.print_with_decoration("rng");
    make_seedable_rng(random_seed)
}
