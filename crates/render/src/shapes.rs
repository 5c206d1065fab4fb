use glam::{Mat4, Vec2, Vec3};
use std::ops::Range;
use virtworld_common::{Face, FaceSet, MeshId, Rgb};

/// One of the two texture units the shader samples from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Zero,
    One,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 2] = [TextureSlot::Zero, TextureSlot::One];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Where a draw takes its fragment colour from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorSource {
    Flat(Rgb),
    /// Interpolated UV shown as red/green, for inspecting texture mapping.
    UvDebug,
    Texture(TextureSlot),
}

impl ColorSource {
    /// Selector value understood by the fragment shader. Anything else falls
    /// through to magenta.
    pub fn shader_code(self) -> u32 {
        match self {
            ColorSource::Flat(_) => 1,
            ColorSource::UvDebug => 2,
            ColorSource::Texture(TextureSlot::Zero) => 3,
            ColorSource::Texture(TextureSlot::One) => 4,
        }
    }

    /// Colour fed to the flat-colour uniform (unused by the other sources).
    pub fn flat_color(self) -> Rgb {
        match self {
            ColorSource::Flat(c) => c,
            _ => Rgb::MAGENTA,
        }
    }
}

/// How a shape is coloured. Chosen at construction; replaces a flat/textured
/// class split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shading {
    Flat(FaceSet<Rgb>),
    Textured(FaceSet<TextureSlot>),
    UvDebug,
}

impl Shading {
    fn source(&self, face: Face) -> ColorSource {
        match self {
            Shading::Flat(colors) => ColorSource::Flat(colors.get(face)),
            Shading::Textured(slots) => ColorSource::Texture(slots.get(face)),
            Shading::UvDebug => ColorSource::UvDebug,
        }
    }

    fn is_uniform(&self) -> bool {
        match self {
            Shading::Flat(colors) => colors.is_uniform(),
            Shading::Textured(slots) => slots.is_uniform(),
            Shading::UvDebug => true,
        }
    }
}

/// Interleaved vertex: position plus texture coordinate. Flat-shaded shapes
/// carry zero UVs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub uv: Vec2,
}

/// A contiguous vertex range drawn with one colour source.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawBatch {
    pub vertices: Range<u32>,
    pub color: ColorSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Topology {
    /// Six faces of six vertices each, in `Face::ALL` order.
    Box,
    Solid,
}

/// Static triangle-list geometry with a model transform.
///
/// Geometry never changes after construction. `id` identifies the mesh to a
/// GPU backend, which uploads it the first time it is drawn.
#[derive(Debug, Clone)]
pub struct Shape {
    id: MeshId,
    topology: Topology,
    vertices: Vec<Vertex>,
    shading: Shading,
    pub matrix: Mat4,
}

/// Corners of each face in unit-box coordinates, counter-clockwise seen from
/// outside, in `Face::ALL` order.
#[rustfmt::skip]
const BOX_FACES: [[[f32; 3]; 4]; 6] = [
    [[-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0], [-1.0,  1.0, -1.0]], // top
    [[-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0]], // bottom
    [[-1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0,  1.0, -1.0]], // left
    [[ 1.0, -1.0,  1.0], [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0]], // right
    [[-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0]], // front
    [[ 1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0]], // back
];

const QUAD_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
const QUAD_TRIANGLES: [usize; 6] = [0, 1, 2, 0, 2, 3];

pub const CONE_SEGMENTS: usize = 10;

fn box_vertices(scale: Vec3) -> Vec<Vertex> {
    BOX_FACES
        .iter()
        .flat_map(|corners| {
            QUAD_TRIANGLES.iter().map(move |&i| Vertex {
                position: Vec3::from_array(corners[i]) * scale,
                uv: Vec2::from_array(QUAD_UVS[i]),
            })
        })
        .collect()
}

/// Expand a triangle fan (`hub`, `rim[0]`, `rim[1]`, ...) into a triangle list.
fn fan_to_triangles(hub: Vec3, rim: &[Vec3]) -> impl Iterator<Item = Vertex> + '_ {
    rim.windows(2).flat_map(move |pair| {
        [hub, pair[0], pair[1]].map(|position| Vertex {
            position,
            uv: Vec2::ZERO,
        })
    })
}

impl Shape {
    /// Flat-coloured box spanning `[-scale, scale]` on each axis.
    pub fn cube(matrix: Mat4, colors: FaceSet<Rgb>, scale: Vec3) -> Self {
        let vertices = box_vertices(scale)
            .into_iter()
            .map(|v| Vertex { uv: Vec2::ZERO, ..v })
            .collect();
        Self {
            id: MeshId::new(),
            topology: Topology::Box,
            vertices,
            shading: Shading::Flat(colors),
            matrix,
        }
    }

    /// Textured box spanning `[-scale, scale]`, one unit UV square per face.
    pub fn tex_cube(matrix: Mat4, textures: FaceSet<TextureSlot>, scale: Vec3) -> Self {
        Self {
            id: MeshId::new(),
            topology: Topology::Box,
            vertices: box_vertices(scale),
            shading: Shading::Textured(textures),
            matrix,
        }
    }

    /// Cone with its base disc centred on the origin in the XZ plane and its
    /// apex at `(0, height, 0)`.
    pub fn cone(matrix: Mat4, color: Rgb, radius: f32, height: f32) -> Self {
        let rim: Vec<Vec3> = (0..=CONE_SEGMENTS)
            .map(|i| {
                let angle = std::f32::consts::TAU / CONE_SEGMENTS as f32 * i as f32;
                Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
            })
            .collect();
        let vertices = fan_to_triangles(Vec3::ZERO, &rim)
            .chain(fan_to_triangles(Vec3::new(0.0, height, 0.0), &rim))
            .collect();
        Self {
            id: MeshId::new(),
            topology: Topology::Solid,
            vertices,
            shading: Shading::Flat(FaceSet::uniform(color)),
            matrix,
        }
    }

    /// Multiply every UV by `factor` so textures repeat across the shape.
    pub fn with_uv_scale(mut self, factor: f32) -> Self {
        for v in &mut self.vertices {
            v.uv *= factor;
        }
        self
    }

    pub fn with_shading(mut self, shading: Shading) -> Self {
        self.shading = shading;
        self
    }

    pub fn id(&self) -> MeshId {
        self.id
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn shading(&self) -> Shading {
        self.shading
    }

    /// Split the vertex list into draws. A shape whose faces all share one
    /// colour source is a single batch; otherwise each box face is its own.
    pub fn draw_batches(&self) -> Vec<DrawBatch> {
        if self.topology == Topology::Solid || self.shading.is_uniform() {
            return vec![DrawBatch {
                vertices: 0..self.vertex_count(),
                color: self.shading.source(Face::Top),
            }];
        }
        Face::ALL
            .iter()
            .map(|&face| {
                let start = face.index() as u32 * 6;
                DrawBatch {
                    vertices: start..start + 6,
                    color: self.shading.source(face),
                }
            })
            .collect()
    }
}
