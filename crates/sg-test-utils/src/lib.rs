//! Test utilities for Session Gateway integration tests.

pub mod server_harness;

pub use server_harness::{TestServer, TEST_API_KEY, TEST_API_SECRET};
