//! Developer tooling: frame statistics and world inspection.
//!
//! # Invariants
//! - Tools only read the world.
//! - Frame statistics publish once per full window of frames.

pub mod inspector;
pub mod stats;

pub use inspector::{CellInfo, WorldInspector, WorldSummary};
pub use stats::FrameStats;

pub fn crate_info() -> &'static str {
    "virtworld-tools v0.1.0"
}
