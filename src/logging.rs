use anyhow::{anyhow, Result};

/// Install a `tracing` fmt subscriber. Fails if a global subscriber is already set.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}

/// Same as [`init`], but writes through the test harness so output is captured per test.
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
