use glam::Vec4;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of one CPU-side mesh. A backend keeps at most one GPU buffer per id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshId(pub Uuid);

impl MeshId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MeshId {
    fn default() -> Self {
        Self::new()
    }
}

/// Linear RGB colour with components in 0..=1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const RED: Self = Self::new(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0);
    pub const MAGENTA: Self = Self::new(1.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Opaque RGBA, the form the fragment colour uniform takes.
    pub fn to_rgba(self) -> Vec4 {
        Vec4::new(self.r, self.g, self.b, 1.0)
    }

    /// Quantize to 8-bit RGBA, used for 1x1 fallback textures.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), 255]
    }
}

/// One face of an axis-aligned box, in the canonical order used by every
/// per-face parameter: top, bottom, left, right, front, back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    Top,
    Bottom,
    Left,
    Right,
    Front,
    Back,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Top,
        Face::Bottom,
        Face::Left,
        Face::Right,
        Face::Front,
        Face::Back,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// A value per box face. Built either from a single value broadcast to all six
/// faces or from six explicit values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceSet<T>([T; 6]);

impl<T: Copy> FaceSet<T> {
    pub fn uniform(value: T) -> Self {
        Self([value; 6])
    }

    /// Values ordered top, bottom, left, right, front, back.
    pub fn per_face(values: [T; 6]) -> Self {
        Self(values)
    }

    pub fn get(&self, face: Face) -> T {
        self.0[face.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Face, T)> + '_ {
        Face::ALL.iter().map(|&f| (f, self.get(f)))
    }

    pub fn map<U: Copy>(&self, f: impl Fn(T) -> U) -> FaceSet<U> {
        FaceSet(self.0.map(f))
    }
}

impl<T: Copy + PartialEq> FaceSet<T> {
    /// True when every face carries the same value.
    pub fn is_uniform(&self) -> bool {
        self.0.iter().all(|v| *v == self.0[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_id_uniqueness() {
        assert_ne!(MeshId::new(), MeshId::new());
    }

    #[test]
    fn single_colour_is_broadcast_to_every_face() {
        let colors = FaceSet::uniform(Rgb::RED);
        for face in Face::ALL {
            assert_eq!(colors.get(face), Rgb::new(1.0, 0.0, 0.0));
        }
        assert!(colors.is_uniform());
    }

    #[test]
    fn per_face_values_keep_their_order() {
        let set = FaceSet::per_face([0, 1, 2, 3, 4, 5]);
        assert_eq!(set.get(Face::Top), 0);
        assert_eq!(set.get(Face::Right), 3);
        assert_eq!(set.get(Face::Back), 5);
        assert!(!set.is_uniform());
    }

    #[test]
    fn rgba8_quantizes_and_clamps() {
        assert_eq!(Rgb::new(1.0, 0.0, 2.0).to_rgba8(), [255, 0, 255, 255]);
        assert_eq!(Rgb::new(0.5, 0.75, 1.0).to_rgba8(), [128, 191, 255, 255]);
    }
}
