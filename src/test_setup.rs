#[cfg(test)]
#[ctor::ctor]
fn init_tests() {
    // initialize a subscriber only for tests, output is captured per test
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}
