//! World Kernel: the voxel occupancy grid and everything derived from it.
//!
//! # Invariants
//! - Grid dimensions are fixed at construction; edits only toggle cells.
//! - Any edit marks the instance offset cache stale.
//! - Occupied cells are always enumerated z outer, x middle, y inner.

pub mod error;
pub mod heightmap;
pub mod world;

pub use error::WorldError;
pub use heightmap::HeightMap;
pub use world::{GridCoord, OffsetCache, VoxelWorld, WorldEvent};
