/*! Integration tests for containerpage.
 *
 * A single integration test binary; modules mirror the library:
 * - containerpage: read path, merge-on-write and save against a store
 * - config: configuration parsing, locale selection and the versioned cache
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("containerpage=info".parse().unwrap()))
        .with_test_writer()
        .try_init();
}

mod config;
mod containerpage;
mod helpers;
