use crate::shapes::Shape;
use glam::{Mat4, Vec3};
use virtworld_common::{FaceSet, Rgb};

const HIPS: [Vec3; 4] = [
    Vec3::new(0.22, 0.3, 0.08),
    Vec3::new(0.22, 0.3, -0.08),
    Vec3::new(-0.22, 0.3, 0.08),
    Vec3::new(-0.22, 0.3, -0.08),
];
const LEG_HALF_LENGTH: f32 = 0.12;
const GAIT_DEGREES: f32 = 25.0;
const WAG_DEGREES: f32 = 20.0;

/// A small cat assembled from boxes and cones, animated procedurally.
///
/// Parts share meshes: one leg mesh is posed four times and one ear mesh
/// twice, so any number of critters costs five uploads.
#[derive(Debug, Clone)]
pub struct Critter {
    body: Shape,
    head: Shape,
    ear: Shape,
    leg: Shape,
    tail: Shape,
}

impl Critter {
    pub fn new(fur: Rgb, accent: Rgb) -> Self {
        let head_colors = FaceSet::per_face([fur, fur, fur, fur, fur, accent]);
        Self {
            body: Shape::cube(Mat4::IDENTITY, FaceSet::uniform(fur), Vec3::new(0.3, 0.15, 0.12)),
            head: Shape::cube(Mat4::IDENTITY, head_colors, Vec3::splat(0.12)),
            ear: Shape::cone(Mat4::IDENTITY, accent, 0.05, 0.1),
            leg: Shape::cube(
                Mat4::IDENTITY,
                FaceSet::uniform(accent),
                Vec3::new(0.04, LEG_HALF_LENGTH, 0.04),
            ),
            tail: Shape::cube(Mat4::IDENTITY, FaceSet::uniform(fur), Vec3::new(0.2, 0.03, 0.03)),
        }
    }

    /// Every part with its model matrix for one critter rooted at `root`.
    ///
    /// The critter faces local -Z (its head is built along +X and turned).
    /// `phase` is in degrees; legs swing in diagonal pairs at four times the
    /// phase rate and the tail wags at twice it.
    pub fn pose(&self, root: Mat4, phase: f32) -> Vec<(&Shape, Mat4)> {
        let root = root * Mat4::from_rotation_y(90f32.to_radians());
        let gait = (phase * 4.0).to_radians().sin() * GAIT_DEGREES;
        let wag = (phase * 2.0).to_radians().sin() * WAG_DEGREES;

        let mut parts = Vec::with_capacity(9);
        parts.push((&self.body, root * Mat4::from_translation(Vec3::new(0.0, 0.45, 0.0))));

        let head = root * Mat4::from_translation(Vec3::new(0.38, 0.6, 0.0));
        parts.push((&self.head, head));
        for side in [-1.0, 1.0] {
            let ear = head * Mat4::from_translation(Vec3::new(0.0, 0.12, side * 0.06));
            parts.push((&self.ear, ear));
        }

        for (i, hip) in HIPS.iter().enumerate() {
            // Front-left pairs with back-right.
            let swing = if i == 0 || i == 3 { gait } else { -gait };
            let leg = root
                * Mat4::from_translation(*hip)
                * Mat4::from_rotation_z(swing.to_radians())
                * Mat4::from_translation(Vec3::new(0.0, -LEG_HALF_LENGTH, 0.0));
            parts.push((&self.leg, leg));
        }

        let tail = root
            * Mat4::from_translation(Vec3::new(-0.3, 0.5, 0.0))
            * Mat4::from_rotation_y(wag.to_radians())
            * Mat4::from_rotation_z(30f32.to_radians())
            * Mat4::from_translation(Vec3::new(-0.2, 0.0, 0.0));
        parts.push((&self.tail, tail));
        parts
    }

    /// Distinct meshes used by every pose.
    pub fn meshes(&self) -> [&Shape; 5] {
        [&self.body, &self.head, &self.ear, &self.leg, &self.tail]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn critter() -> Critter {
        Critter::new(Rgb::new(0.9, 0.6, 0.2), Rgb::new(0.3, 0.2, 0.1))
    }

    #[test]
    fn pose_has_every_part() {
        let c = critter();
        let parts = c.pose(Mat4::IDENTITY, 0.0);
        assert_eq!(parts.len(), 9);
        let legs = parts.iter().filter(|(s, _)| s.id() == c.leg.id()).count();
        assert_eq!(legs, 4);
        let ears = parts.iter().filter(|(s, _)| s.id() == c.ear.id()).count();
        assert_eq!(ears, 2);
    }

    #[test]
    fn legs_swing_with_phase() {
        let c = critter();
        let still = c.pose(Mat4::IDENTITY, 0.0);
        let moving = c.pose(Mat4::IDENTITY, 22.5);
        let leg = |parts: &[(&Shape, Mat4)]| parts[4].1;
        assert!(!leg(&still).abs_diff_eq(leg(&moving), 1e-4));
        // The body does not animate.
        assert!(still[0].1.abs_diff_eq(moving[0].1, 1e-6));
    }

    #[test]
    fn pose_follows_root() {
        let c = critter();
        let root = Mat4::from_translation(Vec3::new(10.0, -0.2, 0.0));
        let parts = c.pose(root, 45.0);
        let body_origin = parts[0].1.transform_point3(Vec3::ZERO);
        assert!(body_origin.abs_diff_eq(Vec3::new(10.0, 0.25, 0.0), 1e-5));
        assert!(parts.iter().all(|(_, m)| m.is_finite()));
    }

    #[test]
    fn head_faces_negative_z() {
        let c = critter();
        let parts = c.pose(Mat4::IDENTITY, 0.0);
        let head_origin = parts[1].1.transform_point3(Vec3::ZERO);
        assert!(head_origin.z < -0.3);
        assert!(head_origin.x.abs() < 1e-5);
    }
}
