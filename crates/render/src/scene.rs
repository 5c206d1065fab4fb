use crate::critter::Critter;
use crate::shapes::{Shading, Shape, TextureSlot};
use glam::{Mat4, Vec3};
use virtworld_common::{FaceSet, Rgb};
use virtworld_kernel::{OffsetCache, VoxelWorld};

/// Clear colour and skybox colour.
pub const SKY_COLOR: Rgb = Rgb::new(0.5, 0.75, 1.0);

const CONE_X: f32 = 10.0;
const CONE_PHASES: [f32; 3] = [0.0, 1.5, 3.0];
const CRITTER_CENTER: Vec3 = Vec3::new(10.0, -0.2, 0.0);
const CRITTER_COPIES: u32 = 3;

/// How occupied world cells are submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorldDrawMode {
    /// One draw of the shared block mesh with a per-instance offset buffer.
    #[default]
    Instanced,
    /// One draw per occupied cell, re-translating the shared block mesh.
    Naive,
}

#[derive(Debug, Clone, Copy)]
pub struct SceneOptions {
    /// Vertical half extent of the skybox.
    pub wall_height: f32,
    pub draw_mode: WorldDrawMode,
    /// Show UV coordinates on the blocks and ground instead of textures.
    pub debug_uvs: bool,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            wall_height: 10_000.0,
            draw_mode: WorldDrawMode::Instanced,
            debug_uvs: false,
        }
    }
}

/// One submission to a backend.
#[derive(Debug)]
pub enum DrawCommand<'a> {
    /// Draw `shape` with an explicit model matrix.
    Single { shape: &'a Shape, model: Mat4 },
    /// Draw `shape` once per offset. Instance positions are `offset + vertex`
    /// in world space; no model matrix applies.
    Instanced {
        shape: &'a Shape,
        offsets: &'a OffsetCache,
    },
}

impl DrawCommand<'_> {
    pub fn shape(&self) -> &Shape {
        match self {
            DrawCommand::Single { shape, .. } | DrawCommand::Instanced { shape, .. } => *shape,
        }
    }

    pub fn instance_count(&self) -> usize {
        match self {
            DrawCommand::Single { .. } => 1,
            DrawCommand::Instanced { offsets, .. } => offsets.len(),
        }
    }
}

/// Everything needed to draw one frame, in submission order.
#[derive(Debug)]
pub struct DrawList<'a> {
    pub clear_color: Rgb,
    pub commands: Vec<DrawCommand<'a>>,
}

impl DrawList<'_> {
    /// GPU draw calls this list costs: one per colour batch of each command.
    pub fn draw_calls(&self) -> usize {
        self.commands
            .iter()
            .map(|c| c.shape().draw_batches().len())
            .sum()
    }

    /// Mesh copies drawn, counting every instance.
    pub fn instance_count(&self) -> usize {
        self.commands.iter().map(DrawCommand::instance_count).sum()
    }
}

/// Static scene content around a voxel world: ground, skybox, blocks, three
/// bobbing cones and a trio of orbiting critters.
#[derive(Debug, Clone)]
pub struct Scene {
    options: SceneOptions,
    block: Shape,
    ground: Shape,
    skybox: Shape,
    cones: [Shape; 3],
    critter: Critter,
}

impl Scene {
    /// Build scene geometry sized to `world`.
    pub fn new(world: &VoxelWorld, options: SceneOptions) -> Self {
        let c = world.cube_size();
        let width = world.width() as f32 * c;
        let depth = world.depth() as f32 * c;

        let block = Shape::tex_cube(
            Mat4::IDENTITY,
            FaceSet::uniform(TextureSlot::Zero),
            Vec3::splat(c),
        );
        let ground = Shape::tex_cube(
            Mat4::from_translation(Vec3::splat(-c)),
            FaceSet::uniform(TextureSlot::One),
            Vec3::new(width, 0.001, depth),
        )
        .with_uv_scale(width);
        let skybox = Shape::cube(
            Mat4::IDENTITY,
            FaceSet::uniform(SKY_COLOR),
            Vec3::new(100.0, options.wall_height, 100.0),
        );
        let cones = [
            Shape::cone(Mat4::IDENTITY, Rgb::RED, 0.5, 2.0),
            Shape::cone(Mat4::IDENTITY, Rgb::GREEN, 0.5, 1.0),
            Shape::cone(Mat4::IDENTITY, Rgb::BLUE, 0.5, 0.5),
        ];

        tracing::debug!(
            width = world.width(),
            depth = world.depth(),
            cube_size = c,
            mode = ?options.draw_mode,
            "scene built"
        );

        let mut scene = Self {
            options,
            block,
            ground,
            skybox,
            cones,
            critter: Critter::new(Rgb::new(0.85, 0.55, 0.2), Rgb::new(0.35, 0.2, 0.1)),
        };
        scene.set_debug_uvs(options.debug_uvs);
        scene
    }

    pub fn options(&self) -> SceneOptions {
        self.options
    }

    pub fn set_draw_mode(&mut self, mode: WorldDrawMode) {
        self.options.draw_mode = mode;
    }

    pub fn set_debug_uvs(&mut self, on: bool) {
        self.options.debug_uvs = on;
        let (block, ground) = if on {
            (Shading::UvDebug, Shading::UvDebug)
        } else {
            (
                Shading::Textured(FaceSet::uniform(TextureSlot::Zero)),
                Shading::Textured(FaceSet::uniform(TextureSlot::One)),
            )
        };
        self.block = self.block.clone().with_shading(block);
        self.ground = self.ground.clone().with_shading(ground);
    }

    /// Every mesh the scene can reference, for uploading before the first frame.
    pub fn meshes(&self) -> Vec<&Shape> {
        let mut meshes = vec![&self.block, &self.ground, &self.skybox];
        meshes.extend(self.cones.iter());
        meshes.extend(self.critter.meshes());
        meshes
    }

    /// Commands for one frame at wall-clock time `time_ms`.
    ///
    /// Draws ground, world, skybox, critters, then cones. Refreshes the
    /// world's block count and, on the instanced path, its offset cache.
    pub fn draw_list<'a>(&'a self, world: &'a mut VoxelWorld, time_ms: f64) -> DrawList<'a> {
        let mut commands = vec![DrawCommand::Single {
            shape: &self.ground,
            model: self.ground.matrix,
        }];

        match self.options.draw_mode {
            WorldDrawMode::Instanced => commands.push(DrawCommand::Instanced {
                shape: &self.block,
                offsets: world.instance_offsets(),
            }),
            WorldDrawMode::Naive => {
                commands.extend(world.naive_translations().into_iter().map(|t| {
                    DrawCommand::Single {
                        shape: &self.block,
                        model: Mat4::from_translation(t),
                    }
                }))
            }
        }

        commands.push(DrawCommand::Single {
            shape: &self.skybox,
            model: self.skybox.matrix,
        });

        // Degrees; wraps well before f32 loses precision.
        let orbit = (time_ms * 0.1 % 360.0) as f32;
        for k in 0..CRITTER_COPIES {
            let root = Mat4::from_translation(CRITTER_CENTER)
                * Mat4::from_rotation_y((orbit + 120.0 * k as f32).to_radians())
                * Mat4::from_translation(Vec3::X);
            commands.extend(
                self.critter
                    .pose(root, orbit)
                    .into_iter()
                    .map(|(shape, model)| DrawCommand::Single { shape, model }),
            );
        }

        let seconds = time_ms * 0.001;
        for (i, (cone, phase)) in self.cones.iter().zip(CONE_PHASES).enumerate() {
            let y = 0.1 * (seconds + phase as f64).sin() as f32 + (i + 1) as f32;
            commands.push(DrawCommand::Single {
                shape: cone,
                model: Mat4::from_translation(Vec3::new(CONE_X, y, 0.0)),
            });
        }

        DrawList {
            clear_color: SKY_COLOR,
            commands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ColorSource;
    use virtworld_kernel::HeightMap;

    fn world() -> VoxelWorld {
        let map = HeightMap::new(vec![vec![1, 0, 2], vec![0, 3, 1]]).unwrap();
        VoxelWorld::with_headroom(&map, 0.5, 1).unwrap()
    }

    // ground + skybox + 3 critters of 9 parts + 3 cones
    const FIXED_COMMANDS: usize = 2 + 3 * 9 + 3;

    #[test]
    fn instanced_world_is_one_command() {
        let mut w = world();
        let scene = Scene::new(&w, SceneOptions::default());
        let list = scene.draw_list(&mut w, 0.0);
        assert_eq!(list.commands.len(), FIXED_COMMANDS + 1);
        let instanced: Vec<_> = list
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Instanced { .. }))
            .collect();
        assert_eq!(instanced.len(), 1);
        assert_eq!(instanced[0].instance_count(), 7);
        assert_eq!(list.clear_color, SKY_COLOR);
        drop(list);
        assert_eq!(w.block_count(), 7);
    }

    #[test]
    fn naive_world_is_one_command_per_block() {
        let mut w = world();
        let options = SceneOptions {
            draw_mode: WorldDrawMode::Naive,
            ..SceneOptions::default()
        };
        let scene = Scene::new(&w, options);
        let list = scene.draw_list(&mut w, 0.0);
        assert_eq!(list.commands.len(), FIXED_COMMANDS + 7);
        assert!(list
            .commands
            .iter()
            .all(|c| matches!(c, DrawCommand::Single { .. })));
    }

    #[test]
    fn both_paths_cover_the_same_instances() {
        let mut w = world();
        let mut scene = Scene::new(&w, SceneOptions::default());
        let fast = scene.draw_list(&mut w, 500.0).instance_count();
        scene.set_draw_mode(WorldDrawMode::Naive);
        let naive = scene.draw_list(&mut w, 500.0).instance_count();
        assert_eq!(fast, naive);
    }

    #[test]
    fn edits_show_up_in_next_list() {
        let mut w = world();
        let scene = Scene::new(&w, SceneOptions::default());
        let before = scene.draw_list(&mut w, 0.0).instance_count();
        w.change_point(Vec3::ZERO, false).unwrap();
        let after = scene.draw_list(&mut w, 0.0).instance_count();
        assert_eq!(after, before - 1);
        assert_eq!(w.block_count(), 6);
    }

    #[test]
    fn cones_bob_around_their_rest_height() {
        let mut w = world();
        let scene = Scene::new(&w, SceneOptions::default());
        let list = scene.draw_list(&mut w, 0.0);
        let cones: Vec<Mat4> = list.commands[list.commands.len() - 3..]
            .iter()
            .map(|c| match c {
                DrawCommand::Single { model, .. } => *model,
                DrawCommand::Instanced { .. } => panic!("cone drawn instanced"),
            })
            .collect();
        let y = |m: &Mat4| m.w_axis.y;
        assert!((y(&cones[0]) - 1.0).abs() < 1e-6);
        assert!((y(&cones[1]) - (2.0 + 0.1 * 1.5f32.sin())).abs() < 1e-5);
        assert!((y(&cones[2]) - (3.0 + 0.1 * 3.0f32.sin())).abs() < 1e-5);
        assert!(cones.iter().all(|m| m.w_axis.x == CONE_X));
    }

    #[test]
    fn ground_uses_grass_slot_and_tiles() {
        let w = world();
        let scene = Scene::new(&w, SceneOptions::default());
        assert_eq!(
            scene.ground.draw_batches()[0].color,
            ColorSource::Texture(TextureSlot::One)
        );
        let max_u = scene
            .ground
            .vertices()
            .iter()
            .map(|v| v.uv.x)
            .fold(0.0_f32, f32::max);
        assert_eq!(max_u, 1.5);
        assert!(scene.ground.matrix.w_axis.truncate().abs_diff_eq(Vec3::splat(-0.5), 1e-6));
    }

    #[test]
    fn debug_uvs_swap_block_and_ground_shading() {
        let w = world();
        let mut scene = Scene::new(&w, SceneOptions::default());
        scene.set_debug_uvs(true);
        assert_eq!(scene.block.draw_batches()[0].color, ColorSource::UvDebug);
        assert_eq!(scene.ground.draw_batches()[0].color, ColorSource::UvDebug);
        scene.set_debug_uvs(false);
        assert_eq!(
            scene.block.draw_batches()[0].color,
            ColorSource::Texture(TextureSlot::Zero)
        );
    }

    #[test]
    fn critters_orbit_the_cone_column() {
        let mut w = world();
        let scene = Scene::new(&w, SceneOptions::default());
        let list = scene.draw_list(&mut w, 1234.0);
        let bodies: Vec<Vec3> = list
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Single { shape, model } if shape.id() == scene.critter.meshes()[0].id() => {
                    Some(model.transform_point3(Vec3::ZERO))
                }
                _ => None,
            })
            .collect();
        assert_eq!(bodies.len(), 3);
        for b in bodies {
            let radial = Vec3::new(b.x - CRITTER_CENTER.x, 0.0, b.z - CRITTER_CENTER.z);
            assert!((radial.length() - 1.0).abs() < 1e-4);
        }
    }
}
