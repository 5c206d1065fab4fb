use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Instant;
use virtworld_input::{Action, Bindings, Button, Key, MouseLook};
use virtworld_kernel::{HeightMap, VoxelWorld};
use virtworld_render::{Camera, DrawList, Scene, SceneOptions, WorldDrawMode};
use virtworld_tools::FrameStats;

/// Everything needed to build a viewer session.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub level: Option<PathBuf>,
    pub cube_size: f32,
    pub wall_height: u32,
    pub headroom: usize,
    pub move_speed: f32,
    pub pan_speed: f32,
    pub mouse_sensitivity: f32,
    pub naive: bool,
    pub bindings: Vec<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            level: None,
            cube_size: 0.5,
            wall_height: 10_000,
            headroom: 8,
            move_speed: Bindings::DEFAULT_MOVE_SPEED,
            pan_speed: Bindings::DEFAULT_PAN_SPEED,
            mouse_sensitivity: MouseLook::DEFAULT_SENSITIVITY,
            naive: false,
            bindings: Vec::new(),
        }
    }
}

/// The viewer's application context: camera, world, scene and input state.
///
/// Window events are translated into `Action`s and applied here; the frame
/// callback asks for a draw list. Nothing here touches the GPU.
pub struct ViewerState {
    pub camera: Camera,
    pub world: VoxelWorld,
    pub scene: Scene,
    pub stats: FrameStats,
    pub show_hud: bool,
    bindings: Bindings,
    look: MouseLook,
    pointer_locked: bool,
    started: Instant,
}

impl ViewerState {
    pub fn new(config: &ViewerConfig, aspect: f32) -> Result<Self> {
        let heights = match &config.level {
            Some(path) => HeightMap::load(path)
                .with_context(|| format!("loading level {}", path.display()))?,
            None => HeightMap::default_level(config.wall_height),
        };
        let world = VoxelWorld::with_headroom(&heights, config.cube_size, config.headroom)?;

        let mut bindings = Bindings::with_speeds(config.move_speed, config.pan_speed)?;
        for spec in &config.bindings {
            bindings.apply_spec(spec)?;
        }

        let options = SceneOptions {
            wall_height: config.wall_height as f32,
            draw_mode: if config.naive {
                WorldDrawMode::Naive
            } else {
                WorldDrawMode::Instanced
            },
            debug_uvs: false,
        };
        let scene = Scene::new(&world, options);

        tracing::info!(
            "viewer ready: {}x{}x{} world, {} blocks",
            world.width(),
            world.height(),
            world.depth(),
            world.occupied_count()
        );

        Ok(Self {
            camera: Camera::new(aspect),
            world,
            scene,
            stats: FrameStats::new(0.0),
            show_hud: true,
            bindings,
            look: MouseLook::new(config.mouse_sensitivity),
            pointer_locked: false,
            started: Instant::now(),
        })
    }

    pub fn pointer_locked(&self) -> bool {
        self.pointer_locked
    }

    pub fn mouse_look(&self) -> &MouseLook {
        &self.look
    }

    pub fn key_pressed(&mut self, key: Key) {
        if let Some(action) = self.bindings.key(key) {
            self.apply(action);
        }
    }

    pub fn button_pressed(&mut self, button: Button) {
        for action in self.bindings.button(button, self.pointer_locked) {
            self.apply(action);
        }
    }

    /// Raw pointer motion. Ignored unless the pointer is locked.
    pub fn pointer_moved(&mut self, dx: f32, dy: f32) {
        if self.pointer_locked {
            let action = self.look.motion(dx, dy);
            self.apply(action);
        }
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::MoveForwards(s) => self.camera.move_forwards(s),
            Action::MoveBackwards(s) => self.camera.move_backwards(s),
            Action::MoveLeft(s) => self.camera.move_left(s),
            Action::MoveRight(s) => self.camera.move_right(s),
            Action::PanLeft(a) => self.camera.pan_left(a),
            Action::PanRight(a) => self.camera.pan_right(a),
            Action::Look { yaw, pitch } => self.camera.pan(yaw, pitch),
            Action::RemoveBlock => self.edit(false),
            Action::AddBlock => self.edit(true),
            Action::LockPointer => self.pointer_locked = true,
            Action::ReleasePointer => self.pointer_locked = false,
        }
    }

    /// Edit the cell under the look-at point. Out-of-range edits are logged
    /// and dropped; the session continues.
    fn edit(&mut self, is_block: bool) {
        match self.world.change_point(self.camera.at(), is_block) {
            Ok(cell) => tracing::debug!(
                "{} block at ({}, {}, {})",
                if is_block { "added" } else { "removed" },
                cell.x,
                cell.y,
                cell.z
            ),
            Err(e) => tracing::warn!("edit ignored: {e}"),
        }
    }

    pub fn set_draw_mode(&mut self, mode: WorldDrawMode) {
        self.scene.set_draw_mode(mode);
    }

    /// Milliseconds since the session started.
    pub fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    /// Count a finished frame.
    pub fn frame_done(&mut self) {
        let now = self.elapsed_ms();
        self.stats.frame(now);
    }

    /// The camera and the draw list for the current instant.
    pub fn frame(&mut self) -> (&Camera, DrawList<'_>) {
        let now = self.elapsed_ms();
        (&self.camera, self.scene.draw_list(&mut self.world, now))
    }

    /// Lines shown in the HUD.
    pub fn hud_lines(&self) -> Vec<String> {
        let frame_time = self
            .stats
            .frame_time_ms()
            .map_or("-".to_string(), |t| format!("{t:.1} ms"));
        let fps = self.stats.fps().map_or("-".to_string(), |f| f.to_string());
        let eye = self.camera.eye();
        vec![
            format!("Frame time: {frame_time}"),
            format!("FPS: {fps}"),
            format!("Blocks: {}", self.world.block_count()),
            format!("Eye: ({:.1}, {:.1}, {:.1})", eye.x, eye.y, eye.z),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn viewer() -> ViewerState {
        let config = ViewerConfig {
            wall_height: 12,
            headroom: 2,
            ..ViewerConfig::default()
        };
        ViewerState::new(&config, 1.0).unwrap()
    }

    #[test]
    fn keys_move_the_camera() {
        let mut v = viewer();
        v.key_pressed(Key::Char('w'));
        assert!(v.camera.eye().abs_diff_eq(Vec3::new(0.0, 0.0, -0.2), 1e-5));
        v.key_pressed(Key::Char('x'));
        assert!(v.camera.eye().abs_diff_eq(Vec3::new(0.0, 0.0, -0.2), 1e-5));
    }

    #[test]
    fn clicks_edit_at_the_look_point_and_lock() {
        let mut v = viewer();
        let cell = v.world.point_to_grid(v.camera.at());

        v.button_pressed(Button::Right);
        assert_eq!(v.world.is_block(cell), Some(true));
        assert!(v.pointer_locked());

        v.button_pressed(Button::Left);
        assert_eq!(v.world.is_block(cell), Some(false));
        assert_eq!(v.world.events().len(), 2);
    }

    #[test]
    fn out_of_range_edit_is_dropped() {
        let mut v = viewer();
        v.camera.set_pose(Vec3::new(500.0, 0.0, 0.0), Vec3::new(500.0, 0.0, -1.0), Vec3::Y);
        let before = v.world.occupied_count();
        v.button_pressed(Button::Right);
        assert_eq!(v.world.occupied_count(), before);
        assert!(v.world.events().is_empty());
        // The click still grabs the pointer.
        assert!(v.pointer_locked());
    }

    #[test]
    fn pointer_motion_needs_lock() {
        let mut v = viewer();
        let look = v.camera.look_direction();
        v.pointer_moved(40.0, 10.0);
        assert_eq!(v.camera.look_direction(), look);

        v.apply(Action::LockPointer);
        v.pointer_moved(40.0, 10.0);
        assert!(!v.camera.look_direction().abs_diff_eq(look, 1e-4));
        assert_eq!(v.mouse_look().pitch(), 5.0);

        v.key_pressed(Key::Escape);
        assert!(!v.pointer_locked());
    }

    #[test]
    fn edits_reach_the_hud_after_a_frame() {
        let mut v = viewer();
        let total = v.world.occupied_count();
        // Above every interior column of the default level.
        v.camera.set_pose(Vec3::new(0.0, 10.0, 1.0), Vec3::new(0.0, 10.0, 0.0), Vec3::Y);
        v.apply(Action::AddBlock);
        assert_eq!(v.world.block_count(), 0);

        assert!(v.frame().1.instance_count() > total);
        assert_eq!(v.world.block_count(), total + 1);
        assert_eq!(v.hud_lines()[2], format!("Blocks: {}", total + 1));
    }

    #[test]
    fn naive_flag_selects_per_block_draws() {
        let config = ViewerConfig {
            wall_height: 12,
            naive: true,
            ..ViewerConfig::default()
        };
        let mut v = ViewerState::new(&config, 1.0).unwrap();
        let blocks = v.world.occupied_count();
        let (_, list) = v.frame();
        assert!(list.commands.len() > blocks);
    }

    #[test]
    fn bad_binding_spec_fails_setup() {
        let config = ViewerConfig {
            wall_height: 12,
            bindings: vec!["nonsense".into()],
            ..ViewerConfig::default()
        };
        assert!(ViewerState::new(&config, 1.0).is_err());
    }

    #[test]
    fn missing_level_file_fails_setup() {
        let config = ViewerConfig {
            level: Some("/no/such/level.json".into()),
            ..ViewerConfig::default()
        };
        let err = ViewerState::new(&config, 1.0).err().unwrap();
        assert!(format!("{err:#}").contains("level.json"));
    }
}
