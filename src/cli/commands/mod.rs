//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for a
//! specific subcommand.

pub mod cleanup;
pub mod completions;
pub mod config;
pub mod sync;
pub mod validate;

// Re-export argument types for use in mod.rs
pub use cleanup::CleanupArgs;
pub use completions::CompletionsArgs;
pub use config::ConfigArgs;
pub use sync::SyncArgs;
pub use validate::ValidateArgs;

use crate::core::sync::SyncEngine;
use std::sync::atomic::Ordering;

/// Arm the engine's stop flag on ctrl-c. The in-flight file completes
/// before the pass halts.
pub(crate) fn arm_stop_on_ctrl_c(engine: &SyncEngine) {
    let stop = engine.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received; finishing the in-flight file before stopping");
            stop.store(true, Ordering::Relaxed);
        }
    });
}
