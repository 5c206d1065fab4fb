use crate::action::Action;

/// Turns pointer motion into look actions while the pointer is locked.
///
/// Horizontal motion yaws freely. Vertical motion accumulates into a pitch
/// counter; once the counter would pass `MAX_PITCH` it is pinned there and
/// that motion event does not pitch the camera.
#[derive(Debug, Clone)]
pub struct MouseLook {
    sensitivity: f32,
    pitch: f32,
}

impl Default for MouseLook {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SENSITIVITY)
    }
}

impl MouseLook {
    pub const DEFAULT_SENSITIVITY: f32 = 0.5;
    /// Largest accumulated pitch, degrees.
    pub const MAX_PITCH: f32 = 85.0;

    pub fn new(sensitivity: f32) -> Self {
        Self {
            sensitivity,
            pitch: 0.0,
        }
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    /// Accumulated pitch counter in degrees.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Look action for a pointer delta in pixels.
    pub fn motion(&mut self, dx: f32, dy: f32) -> Action {
        let yaw = -dx * self.sensitivity;
        let step = dy * self.sensitivity;
        self.pitch += step;
        let pitch = if self.pitch.abs() > Self::MAX_PITCH {
            self.pitch = Self::MAX_PITCH.copysign(self.pitch);
            0.0
        } else {
            step
        };
        Action::Look { yaw, pitch }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_motion_yaws_right() {
        let mut look = MouseLook::default();
        assert_eq!(look.motion(10.0, 0.0), Action::Look { yaw: -5.0, pitch: 0.0 });
        assert_eq!(look.pitch(), 0.0);
    }

    #[test]
    fn vertical_motion_accumulates() {
        let mut look = MouseLook::default();
        assert_eq!(look.motion(0.0, 20.0), Action::Look { yaw: 0.0, pitch: 10.0 });
        assert_eq!(look.motion(0.0, -4.0), Action::Look { yaw: -0.0, pitch: -2.0 });
        assert_eq!(look.pitch(), 8.0);
    }

    #[test]
    fn pitch_clamps_and_drops_the_overflowing_step() {
        let mut look = MouseLook::default();
        look.motion(0.0, 160.0); // 80
        let action = look.motion(0.0, 20.0); // would reach 90
        assert_eq!(action, Action::Look { yaw: -0.0, pitch: 0.0 });
        assert_eq!(look.pitch(), 85.0);

        // Coming back down is applied normally.
        assert_eq!(look.motion(0.0, -10.0), Action::Look { yaw: -0.0, pitch: -5.0 });
        assert_eq!(look.pitch(), 80.0);
    }

    #[test]
    fn negative_clamp() {
        let mut look = MouseLook::new(1.0);
        look.motion(0.0, -100.0);
        assert_eq!(look.pitch(), -85.0);
    }

    #[test]
    fn exactly_max_is_still_applied() {
        let mut look = MouseLook::new(1.0);
        assert_eq!(look.motion(0.0, 85.0), Action::Look { yaw: -0.0, pitch: 85.0 });
    }
}
