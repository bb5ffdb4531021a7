// Math utilities and helper functions

use std::f32::consts::{PI, TAU};

use glam::{Quat, Vec2, Vec3};

/// Move `current` toward `target` by at most `max_delta`
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

/// Shortest signed difference between two angles (radians), in [-PI, PI]
pub fn delta_angle(current: f32, target: f32) -> f32 {
    let mut delta = (target - current).rem_euclid(TAU);
    if delta > PI {
        delta -= TAU;
    }
    delta
}

/// Critically damped spring toward `target`.
///
/// `velocity` carries the spring state between calls and must be kept by the
/// caller. The result never overshoots `target`.
pub fn smooth_damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = target + (change + temp) * decay;

    // Clamp overshoot
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = 0.0;
    }

    output
}

/// Like [`smooth_damp`], but takes the short way around the circle
pub fn smooth_damp_angle(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    dt: f32,
) -> f32 {
    let target = current + delta_angle(current, target);
    smooth_damp(current, target, velocity, smooth_time, dt)
}

/// Heading (yaw about +Y) of a planar direction; 0 faces +Z, PI/2 faces +X
pub fn heading_of(direction: Vec2) -> f32 {
    direction.x.atan2(direction.y)
}

/// Unit vector on the XZ plane for a heading
pub fn heading_direction(yaw: f32) -> Vec3 {
    Quat::from_rotation_y(yaw) * Vec3::Z
}

/// Yaw (radians) of a rotation about +Y
pub fn yaw_of(rotation: Quat) -> f32 {
    let forward = rotation * Vec3::Z;
    forward.x.atan2(forward.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_move_towards() {
        assert_eq!(move_towards(0.0, 1.0, 0.25), 0.25);
        assert_eq!(move_towards(0.9, 1.0, 0.25), 1.0);
        assert_eq!(move_towards(0.0, -1.0, 0.5), -0.5);
    }

    #[test]
    fn test_delta_angle_wraps() {
        assert_relative_eq!(delta_angle(0.0, FRAC_PI_2), FRAC_PI_2, epsilon = 1e-5);
        // 350deg -> 10deg is +20deg, not -340deg
        let from = 350f32.to_radians();
        let to = 10f32.to_radians();
        assert_relative_eq!(delta_angle(from, to), 20f32.to_radians(), epsilon = 1e-4);
    }

    #[test]
    fn test_smooth_damp_converges_without_overshoot() {
        let mut velocity = 0.0;
        let mut value = 0.0;
        for _ in 0..240 {
            value = smooth_damp(value, 1.0, &mut velocity, 0.1, 1.0 / 60.0);
            assert!(value <= 1.0);
        }
        assert_relative_eq!(value, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_smooth_damp_zero_dt_is_noop() {
        let mut velocity = 3.0;
        assert_eq!(smooth_damp(0.5, 1.0, &mut velocity, 0.1, 0.0), 0.5);
        assert_eq!(velocity, 3.0);
    }

    #[test]
    fn test_heading_round_trip() {
        let yaw = heading_of(Vec2::new(1.0, 0.0));
        assert_relative_eq!(yaw, FRAC_PI_2, epsilon = 1e-5);

        let dir = heading_direction(yaw);
        assert_relative_eq!(dir.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(dir.z, 0.0, epsilon = 1e-5);

        assert_relative_eq!(yaw_of(Quat::from_rotation_y(yaw)), yaw, epsilon = 1e-5);
    }
}
