use glam::{Mat4, Vec3};

/// First-person look-at camera.
///
/// Holds an eye point, a look-at target and an up vector. Movement translates
/// eye and target together; panning rotates the look vector about the up axis
/// and about the right vector `up x look`. Angles are in degrees.
///
/// The up vector is never re-orthonormalized against the look direction, and
/// looking exactly along `up` is not guarded: the right vector degenerates and
/// NaN propagates into the pose. `is_degenerate` reports that state.
#[derive(Debug, Clone)]
pub struct Camera {
    eye: Vec3,
    at: Vec3,
    up: Vec3,
    fov: f32,
    aspect: f32,
    near: f32,
    far: f32,
    view: Mat4,
    projection: Mat4,
}

impl Camera {
    pub const DEFAULT_FOV: f32 = 60.0;
    pub const NEAR: f32 = 0.1;
    pub const FAR: f32 = 1000.0;

    /// Camera at the origin looking down -Z with +Y up.
    pub fn new(aspect: f32) -> Self {
        let mut camera = Self {
            eye: Vec3::ZERO,
            at: Vec3::NEG_Z,
            up: Vec3::Y,
            fov: Self::DEFAULT_FOV,
            aspect,
            near: Self::NEAR,
            far: Self::FAR,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        };
        camera.update_view();
        camera.update_projection();
        camera
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn at(&self) -> Vec3 {
        self.at
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Vertical field of view in degrees.
    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Unnormalized `at - eye`.
    pub fn look_direction(&self) -> Vec3 {
        self.at - self.eye
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection();
    }

    /// Place the camera directly. Used by headless tools and tests.
    pub fn set_pose(&mut self, eye: Vec3, at: Vec3, up: Vec3) {
        self.eye = eye;
        self.at = at;
        self.up = up;
        self.update_view();
    }

    /// True when the look direction is (nearly) parallel to `up`.
    pub fn is_degenerate(&self) -> bool {
        let right = self.up.cross(self.look_direction());
        right.is_nan() || right.length_squared() <= 1e-12
    }

    pub fn move_forwards(&mut self, speed: f32) {
        self.move_by(speed, 0.0, 0.0);
    }

    pub fn move_backwards(&mut self, speed: f32) {
        self.move_by(-speed, 0.0, 0.0);
    }

    pub fn move_left(&mut self, speed: f32) {
        self.move_by(0.0, speed, 0.0);
    }

    pub fn move_right(&mut self, speed: f32) {
        self.move_by(0.0, -speed, 0.0);
    }

    pub fn move_up(&mut self, speed: f32) {
        self.move_by(0.0, 0.0, speed);
    }

    pub fn move_down(&mut self, speed: f32) {
        self.move_by(0.0, 0.0, -speed);
    }

    pub fn pan_left(&mut self, angle: f32) {
        self.pan(angle, 0.0);
    }

    pub fn pan_right(&mut self, angle: f32) {
        self.pan(-angle, 0.0);
    }

    /// Rotate about `up x look` by `angle`. With +Y up this tilts the view
    /// toward -Y for positive angles.
    pub fn pan_up(&mut self, angle: f32) {
        self.pan(0.0, angle);
    }

    pub fn pan_down(&mut self, angle: f32) {
        self.pan(0.0, -angle);
    }

    /// Translate eye and target along the normalized look, right-hand and up
    /// directions.
    fn move_by(&mut self, forward: f32, left: f32, up: f32) {
        let look = self.look_direction().normalize();
        let perp = self.up.cross(look).normalize();
        let up_dir = self.up.normalize();

        let total = look * forward + perp * left + up_dir * up;
        self.eye += total;
        self.at += total;
        self.update_view();
    }

    /// Combined pan used for mouse look.
    ///
    /// The look vector is first rotated by `vertical` about the right vector
    /// computed before any rotation, then by `horizontal` about `up`:
    /// `look' = R(horizontal, up) * R(vertical, perp) * look`.
    pub fn pan(&mut self, horizontal: f32, vertical: f32) {
        let look = self.look_direction();
        let perp = self.up.cross(look).normalize();

        let rotation = Mat4::from_axis_angle(self.up.normalize(), horizontal.to_radians())
            * Mat4::from_axis_angle(perp, vertical.to_radians());
        self.at = self.eye + rotation.transform_vector3(look);
        self.update_view();
    }

    fn update_view(&mut self) {
        self.view = Mat4::look_at_rh(self.eye, self.at, self.up);
    }

    fn update_projection(&mut self) {
        self.projection =
            Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn default_camera() {
        let cam = Camera::new(16.0 / 9.0);
        assert_eq!(cam.eye(), Vec3::ZERO);
        assert_eq!(cam.at(), Vec3::NEG_Z);
        assert_eq!(cam.fov(), 60.0);
        let vp = cam.view_projection();
        assert!(!vp.col(0).x.is_nan());
        assert!(!cam.is_degenerate());
    }

    #[test]
    fn view_matrix_tracks_pose() {
        let mut cam = Camera::new(1.0);
        cam.move_forwards(2.0);
        cam.pan_left(30.0);
        let expected = Mat4::look_at_rh(cam.eye(), cam.at(), cam.up());
        assert!(cam.view_matrix().abs_diff_eq(expected, EPS));
    }

    #[test]
    fn forwards_then_backwards_round_trips() {
        let mut cam = Camera::new(1.0);
        cam.pan_left(37.0);
        cam.pan_up(12.0);
        let (eye, at) = (cam.eye(), cam.at());
        cam.move_forwards(0.7);
        assert!(!cam.eye().abs_diff_eq(eye, EPS));
        cam.move_backwards(0.7);
        assert!(cam.eye().abs_diff_eq(eye, EPS));
        assert!(cam.at().abs_diff_eq(at, EPS));
    }

    #[test]
    fn forwards_moves_along_look() {
        let mut cam = Camera::new(1.0);
        cam.move_forwards(0.2);
        assert!(cam.eye().abs_diff_eq(Vec3::new(0.0, 0.0, -0.2), EPS));
        assert!(cam.at().abs_diff_eq(Vec3::new(0.0, 0.0, -1.2), EPS));
    }

    #[test]
    fn left_and_right_strafe() {
        let mut cam = Camera::new(1.0);
        cam.move_left(1.0);
        assert!(cam.eye().abs_diff_eq(Vec3::new(-1.0, 0.0, 0.0), EPS));
        cam.move_right(2.0);
        assert!(cam.eye().abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), EPS));
    }

    #[test]
    fn up_and_down_follow_up_vector() {
        let mut cam = Camera::new(1.0);
        cam.move_up(0.5);
        assert!(cam.eye().abs_diff_eq(Vec3::new(0.0, 0.5, 0.0), EPS));
        cam.move_down(0.5);
        assert!(cam.eye().abs_diff_eq(Vec3::ZERO, EPS));
    }

    #[test]
    fn pan_left_then_right_round_trips() {
        let mut cam = Camera::new(1.0);
        cam.pan_up(20.0);
        let look = cam.look_direction();
        cam.pan_left(33.0);
        assert!(!cam.look_direction().abs_diff_eq(look, EPS));
        cam.pan_right(33.0);
        assert!(cam.look_direction().abs_diff_eq(look, EPS));
    }

    #[test]
    fn pan_left_turns_toward_negative_x() {
        let mut cam = Camera::new(1.0);
        cam.pan_left(90.0);
        assert!(cam.look_direction().abs_diff_eq(Vec3::NEG_X, EPS));
    }

    #[test]
    fn pan_up_rotates_about_up_cross_look() {
        let mut cam = Camera::new(1.0);
        cam.pan_up(10.0);
        let look = cam.look_direction();
        assert!(look.y < 0.0);
        assert!((look.length() - 1.0).abs() < EPS);
        cam.pan_down(10.0);
        assert!(cam.look_direction().abs_diff_eq(Vec3::NEG_Z, EPS));
    }

    #[test]
    fn combined_pan_pitches_about_pre_rotation_axis() {
        let mut combined = Camera::new(1.0);
        combined.pan(40.0, 25.0);

        // Pitch first about the original right vector, then yaw about up.
        let mut stepwise = Camera::new(1.0);
        stepwise.pan_up(25.0);
        stepwise.pan_left(40.0);

        assert!(combined.look_direction().abs_diff_eq(stepwise.look_direction(), EPS));
    }

    #[test]
    fn looking_along_up_is_degenerate() {
        let mut cam = Camera::new(1.0);
        cam.set_pose(Vec3::ZERO, Vec3::Y, Vec3::Y);
        assert!(cam.is_degenerate());
        cam.move_left(1.0);
        assert!(cam.eye().is_nan());
    }

    #[test]
    fn set_aspect_rebuilds_projection() {
        let mut cam = Camera::new(1.0);
        let before = cam.projection_matrix();
        cam.set_aspect(2.0);
        assert_ne!(before, cam.projection_matrix());
        assert_eq!(cam.aspect(), 2.0);
    }
}
