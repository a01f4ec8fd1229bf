use super::*;

const EPS: f64 = 1e-9;

#[test]
fn bounce_is_periodic() {
    let p = MotionParams::default();
    let period = p.bounce_period();
    for f in [0.0, 1.0, 7.5, 33.0, 119.0] {
        assert!((p.bounce_offset(f) - p.bounce_offset(f + period)).abs() < EPS);
    }
}

#[test]
fn bounce_stays_within_amplitude() {
    let p = MotionParams::default();
    for f in 0..240 {
        assert!(p.bounce_offset(f64::from(f)).abs() <= 20.0 + EPS);
    }
    assert_eq!(p.bounce_offset(0.0), 0.0);
}

#[test]
fn arms_swing_in_opposition() {
    let p = MotionParams::default();
    let c = Point::new(400.0, 300.0);
    for f in [3.0, 10.0, 47.0] {
        let pose = CharacterPose::at(&p, c, f);
        let b = p.bounce_offset(f);
        let left = pose.arm_left.1.y - c.y - b;
        let right = pose.arm_right.1.y - c.y - b;
        assert!((left + right).abs() < 1e-6, "frame {f}");
    }
}

#[test]
fn pose_moves_rigidly_with_bounce() {
    let p = MotionParams::default();
    let c = Point::new(400.0, 300.0);
    let pose = CharacterPose::at(&p, c, 15.0);
    let b = p.bounce_offset(15.0);
    assert!((pose.body.y - (300.0 + b)).abs() < EPS);
    assert!((pose.eye_left.y - (290.0 + b)).abs() < EPS);
    assert!((pose.smile.y - (310.0 + b)).abs() < EPS);
    assert!((pose.arm_right.0.y - (320.0 + b)).abs() < EPS);
    assert_eq!(pose.eye_left.x, 380.0);
    assert_eq!(pose.eye_right.x, 420.0);
    assert_eq!(pose.arm_left.0.x, 340.0);
    assert_eq!(pose.arm_left.1.x, 310.0);
}

#[test]
fn sparkles_orbit_at_fixed_radius() {
    let p = MotionParams::default();
    let c = Point::new(400.0, 300.0);
    for i in 0..p.sparkle_count {
        let (pos, r) = p.sparkle(c, 42.0, i);
        assert!(((pos - c).hypot() - 120.0).abs() < 1e-6);
        assert!((0.0..=5.0).contains(&r));
    }
}

#[test]
fn sparkle_size_follows_pulse() {
    let p = MotionParams::default();
    let c = Point::ORIGIN;
    let (_, r) = p.sparkle(c, 0.0, 0);
    assert_eq!(r, 0.0);
    let (_, r) = p.sparkle(c, 0.0, 1);
    assert!((r - 1f64.sin() * 5.0).abs() < EPS);
}
