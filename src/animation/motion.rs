//! Pure motion curves.
//!
//! Every curve takes the frame position `t` as `f64` so periodicity can be checked at
//! non-integer offsets. Offsets are in surface pixels, y pointing down.

use crate::foundation::core::{Point, Vec2};

/// Tunable constants of the character animation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MotionParams {
    /// Vertical bounce amplitude of the whole body.
    pub bounce_amplitude: f64,
    /// Bounce angular speed in radians per frame.
    pub bounce_speed: f64,
    /// Vertical swing amplitude of each hand.
    pub arm_amplitude: f64,
    /// Arm swing angular speed in radians per frame.
    pub arm_speed: f64,
    /// Body radius.
    pub body_radius: f64,
    /// Eye radius.
    pub eye_radius: f64,
    /// Horizontal eye offset from the body center.
    pub eye_dx: f64,
    /// Vertical eye offset (negative is up).
    pub eye_dy: f64,
    /// Smile arc radius.
    pub smile_radius: f64,
    /// Vertical offset of the smile arc center.
    pub smile_dy: f64,
    /// Horizontal distance from center to the hand tip.
    pub hand_dx: f64,
    /// Vertical offset of the shoulder below the body center.
    pub shoulder_dy: f64,
    /// Number of sparkles.
    pub sparkle_count: u32,
    /// Radius of the sparkle orbit around the surface center.
    pub sparkle_orbit_radius: f64,
    /// Orbit angular speed in radians per frame.
    pub sparkle_orbit_speed: f64,
    /// Pulse angular speed in radians per frame.
    pub sparkle_pulse_speed: f64,
    /// Largest sparkle radius.
    pub sparkle_max_radius: f64,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            bounce_amplitude: 20.0,
            bounce_speed: 0.1,
            arm_amplitude: 30.0,
            arm_speed: 0.2,
            body_radius: 60.0,
            eye_radius: 8.0,
            eye_dx: 20.0,
            eye_dy: -10.0,
            smile_radius: 25.0,
            smile_dy: 10.0,
            hand_dx: 90.0,
            shoulder_dy: 20.0,
            sparkle_count: 5,
            sparkle_orbit_radius: 120.0,
            sparkle_orbit_speed: 0.1,
            sparkle_pulse_speed: 0.2,
            sparkle_max_radius: 5.0,
        }
    }
}

impl MotionParams {
    /// Frames per full bounce cycle, `2π / bounce_speed`.
    pub fn bounce_period(&self) -> f64 {
        std::f64::consts::TAU / self.bounce_speed
    }

    /// Vertical body offset at `t`, shared by every body element.
    pub fn bounce_offset(&self, t: f64) -> f64 {
        self.bounce_amplitude * (t * self.bounce_speed).sin()
    }

    /// Vertical hand offset at `t` relative to the bouncing center.
    pub fn arm_swing(&self, t: f64, phase: f64) -> f64 {
        self.arm_amplitude * (t * self.arm_speed + phase).sin()
    }

    /// Position and radius of sparkle `i` around `center`.
    pub fn sparkle(&self, center: Point, t: f64, i: u32) -> (Point, f64) {
        let k = f64::from(i);
        let angle = t * self.sparkle_orbit_speed + k;
        let pos = center + Vec2::new(angle.cos(), angle.sin()) * self.sparkle_orbit_radius;
        let radius = (t * self.sparkle_pulse_speed + k).sin().abs() * self.sparkle_max_radius;
        (pos, radius)
    }
}

/// Resolved geometry of the character for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharacterPose {
    /// Body circle center.
    pub body: Point,
    /// Left eye center.
    pub eye_left: Point,
    /// Right eye center.
    pub eye_right: Point,
    /// Center of the smile arc.
    pub smile: Point,
    /// Left arm `(shoulder, hand)`.
    pub arm_left: (Point, Point),
    /// Right arm `(shoulder, hand)`.
    pub arm_right: (Point, Point),
}

impl CharacterPose {
    /// Pose around `center` at frame position `t`.
    ///
    /// Arms swing in opposition: the right arm runs half a cycle behind the left one.
    pub fn at(params: &MotionParams, center: Point, t: f64) -> Self {
        let b = params.bounce_offset(t);
        let at = |dx: f64, dy: f64| Point::new(center.x + dx, center.y + dy + b);
        let shoulder_dx = params.body_radius;
        let hand = |dx: f64, phase: f64| at(dx, params.arm_swing(t, phase));

        Self {
            body: at(0.0, 0.0),
            eye_left: at(-params.eye_dx, params.eye_dy),
            eye_right: at(params.eye_dx, params.eye_dy),
            smile: at(0.0, params.smile_dy),
            arm_left: (
                at(-shoulder_dx, params.shoulder_dy),
                hand(-params.hand_dx, 0.0),
            ),
            arm_right: (
                at(shoulder_dx, params.shoulder_dy),
                hand(params.hand_dx, std::f64::consts::PI),
            ),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/motion.rs"]
mod tests;
