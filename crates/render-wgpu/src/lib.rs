//! wgpu render backend for the voxel viewer.
//!
//! Draws a `DrawList` with one shader: per-draw model matrices for single
//! shapes and a per-instance offset buffer for the world's blocks.
//!
//! # Invariants
//! - Each mesh id is uploaded at most once per renderer.
//! - The offset buffer is rebuilt only when the world's cache generation changes.
//! - Texture slots always hold a sampleable image; a fallback colour stands in
//!   until a load completes.
//! - The renderer never mutates the world.

mod context;
mod error;
mod gpu;
mod shaders;
mod texture;

pub use context::GpuContext;
pub use error::{RenderError, TextureError};
pub use gpu::WgpuRenderer;
pub use texture::{LoadedTexture, TextureImage, TextureLoader, fallback_color};
