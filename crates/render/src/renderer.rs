use crate::camera::Camera;
use crate::scene::{DrawCommand, DrawList};
use std::fmt::Write;

/// Backend-agnostic interface. All renderers implement this trait.
///
/// A renderer consumes a finished draw list and the camera it is seen
/// through. Backends may cache uploads keyed by mesh id, hence `&mut self`.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&mut self, camera: &Camera, frame: &DrawList<'_>) -> Self::Output;
}

/// Text renderer for headless use.
///
/// Produces a human-readable summary of a frame: camera pose, draw and
/// instance counts, and one line per command.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// List individual commands, not just totals.
    pub verbose: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose() -> Self {
        Self { verbose: true }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, camera: &Camera, frame: &DrawList<'_>) -> String {
        let mut out = String::new();
        let (eye, at) = (camera.eye(), camera.at());
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "=== Frame (commands={}, draw_calls={}, instances={}) ===",
            frame.commands.len(),
            frame.draw_calls(),
            frame.instance_count()
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.2}, {:.2}, {:.2}) at=({:.2}, {:.2}, {:.2}) fov={:.0}",
            eye.x, eye.y, eye.z, at.x, at.y, at.z,
            camera.fov()
        );
        let c = frame.clear_color;
        let _ = writeln!(out, "Clear: ({:.2}, {:.2}, {:.2})", c.r, c.g, c.b);

        if self.verbose {
            for command in &frame.commands {
                let id = command.shape().id().0.to_string();
                match command {
                    DrawCommand::Single { model, .. } => {
                        let p = model.w_axis;
                        let _ = writeln!(
                            out,
                            "  single    [{:.8}] at=({:.2}, {:.2}, {:.2})",
                            &id[..8],
                            p.x,
                            p.y,
                            p.z
                        );
                    }
                    DrawCommand::Instanced { offsets, .. } => {
                        let _ = writeln!(
                            out,
                            "  instanced [{:.8}] count={} generation={}",
                            &id[..8],
                            offsets.len(),
                            offsets.generation()
                        );
                    }
                }
            }
        }

        out
    }
}
