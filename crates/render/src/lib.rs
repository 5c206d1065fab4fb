//! Rendering Adapter: renderer-agnostic camera, shapes and draw lists.
//!
//! # Invariants
//! - The view matrix is re-derived from eye/at/up after every camera mutation.
//! - Scene orchestration only reads the world, apart from refreshing its
//!   derived offset cache and displayed block count.
//! - Backends consume a `DrawList`; they never see input or timing.

mod camera;
mod critter;
mod renderer;
mod scene;
mod shapes;

pub use camera::Camera;
pub use critter::Critter;
pub use renderer::{DebugTextRenderer, Renderer};
pub use scene::{DrawCommand, DrawList, Scene, SceneOptions, WorldDrawMode, SKY_COLOR};
pub use shapes::{ColorSource, DrawBatch, Shading, Shape, TextureSlot, Vertex};

pub fn crate_info() -> &'static str {
    "virtworld-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
