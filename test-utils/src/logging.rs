use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_TEST_FILTER: &str = "evvm_core=debug,evvm_erc191=debug";

/// Installs a `fmt` subscriber writing through the libtest capture.
///
/// Safe to call from every test: only the first call installs anything.
/// `RUST_LOG` overrides the default filter.
pub fn init_test_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_TEST_FILTER));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_test_writer()
        .try_init();
}
