//! Pipeline layer tests
//!
//! Full stage-stack behavior: chunk geometry under real presets,
//! two-tier rejection policy, and enrichment determinism.

mod test_chunking;
mod test_rejection;
