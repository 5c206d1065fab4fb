//! Shared value types used across the viewer crates.

pub mod types;

pub use types::{Face, FaceSet, MeshId, Rgb};
