//! Gradual takeoff
//!
//! Two phases, both at the x/y position captured at entry and with a zero heading:
//!  1. ramp the height by 1 cm per step from the liftoff height up to the target height
//!  2. hold the target height for a fixed number of steps to let the vehicle settle
//!
//! A target at or below the liftoff height skips the ramp entirely.

use std::time::Duration;

use super::Step;
use crate::setpoint::position_setpoint;
use crate::subsystems::estimator::Pose;

/// Number of 1 cm ramp steps from `liftoff_height` to `height`
pub fn ramp_steps(height: f32, liftoff_height: f32) -> u32 {
    let steps = (100.0 * (height - liftoff_height)).round();
    if steps > 0.0 {
        steps as u32
    } else {
        0
    }
}

/// Takeoff plan from `origin` to `height`
pub fn plan(
    origin: Pose,
    height: f32,
    liftoff_height: f32,
    hold_steps: u32,
    step: Duration,
) -> impl Iterator<Item = Step> {
    let ramp = (0..ramp_steps(height, liftoff_height)).map(move |i| {
        let z = liftoff_height + i as f32 / 100.0;
        Step::Emit(position_setpoint(origin.x, origin.y, z, 0.0), step)
    });

    let hold = (0..hold_steps)
        .map(move |_| Step::Emit(position_setpoint(origin.x, origin.y, height, 0.0), step));

    ramp.chain(hold)
}
