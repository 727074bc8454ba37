//! Spin in place
//!
//! All spin variants share one step engine: the x/y/z position and the heading are captured at entry, then the
//! heading is moved linearly to `captured + angle` over a fixed number of short steps, position held. Three ways of
//! choosing the rotation are provided:
//!  - **time cost**: the total angle and the total duration are given, the yaw rate follows
//!  - **yaw-rate cost**: the total angle and a constant yaw rate are given, the duration follows
//!  - **randomized**: the angle is drawn around a nominal value, then flown at a constant yaw rate
//!
//! Angles are in degrees, durations in milliseconds.

use std::time::Duration;

use rand::Rng;

use super::Step;
use crate::setpoint::position_setpoint;
use crate::subsystems::estimator::Pose;

/// Number of steps of a spin lasting `duration_ms`
pub fn step_count(duration_ms: f32, step: Duration) -> u32 {
    let steps = (duration_ms / (step.as_micros() as f32 / 1000.0)).round();
    if steps > 0.0 {
        steps as u32
    } else {
        0
    }
}

/// Duration (ms) of a rotation by `angle` at `yaw_rate` (deg/s)
pub fn duration_ms(angle: f32, yaw_rate: f32) -> f32 {
    (angle / yaw_rate).abs() * 1000.0
}

/// Uniformly draw an angle in `[nominal - range, nominal + range]`
pub fn draw_angle<R: Rng>(rng: &mut R, nominal: f32, range: f32) -> f32 {
    let range = range.abs();
    rng.gen_range((nominal - range)..=(nominal + range))
}

/// Fold an angle above 180° to the equivalent negative rotation
pub fn fold_angle(angle: f32) -> f32 {
    if angle > 180.0 {
        angle - 360.0
    } else {
        angle
    }
}

/// Spin plan rotating by `angle` in `duration_ms` around the heading of `origin`
///
/// Produces `step_count + 1` setpoints, from the captured heading to the target heading inclusive. A duration
/// shorter than half a step produces a single setpoint at the target heading.
pub fn plan(origin: Pose, angle: f32, duration_ms: f32, step: Duration) -> impl Iterator<Item = Step> {
    let steps = step_count(duration_ms, step);
    let indices = if steps == 0 { 1..=1 } else { 0..=steps };
    let divisor = steps.max(1) as f32;

    indices.map(move |i| {
        let yaw = origin.yaw + angle * i as f32 / divisor;
        Step::Emit(position_setpoint(origin.x, origin.y, origin.z, yaw), step)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folding_keeps_the_shorter_rotation() {
        assert_eq!(fold_angle(270.0), -90.0);
        assert_eq!(fold_angle(180.0), 180.0);
        assert_eq!(fold_angle(-30.0), -30.0);
    }

    #[test]
    fn yaw_rate_duration_ignores_direction() {
        assert_eq!(duration_ms(180.0, 90.0), 2000.0);
        assert_eq!(duration_ms(-90.0, 90.0), 1000.0);
        assert_eq!(duration_ms(90.0, -45.0), 2000.0);
    }

    #[test]
    fn short_spin_jumps_to_target_heading() {
        let origin = Pose::new(0.0, 0.0, 0.5, 10.0);
        let steps: Vec<_> = plan(origin, 90.0, 2.0, Duration::from_millis(10)).collect();

        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].setpoint().and_then(|s| s.yaw()), Some(100.0));
    }
}
