// Common test utilities and fixtures

pub mod fixtures;
pub mod helpers;

// Re-export commonly used items
// Note: These may appear unused in unit tests but are used in integration tests
#[allow(unused_imports)]
pub use fixtures::ContentRoots;
#[allow(unused_imports)]
pub use helpers::{test_config, test_engine, test_services, CountingEmbedder};
