//! Controlled descent
//!
//! The height and heading are captured at entry. The height is then lowered by 1 cm per step, keeping the captured
//! x/y position and heading, until it reaches the final landing height. A final wait lets the vehicle settle before
//! the mission considers it landed.
//!
//! Heights are counted in whole centimeters so that a vehicle already at or below the final landing height gets no
//! descent step at all.

use std::time::Duration;

use super::Step;
use crate::setpoint::position_setpoint;
use crate::subsystems::estimator::Pose;

fn centimeters(height: f32) -> i32 {
    (100.0 * height).round() as i32
}

/// Number of 1 cm descent steps from `height` down to `final_height`
pub fn descent_steps(height: f32, final_height: f32) -> u32 {
    (centimeters(height) - centimeters(final_height)).max(0) as u32
}

/// Landing plan from `origin` down to `final_height`
pub fn plan(
    origin: Pose,
    final_height: f32,
    step: Duration,
    settle: Duration,
) -> impl Iterator<Item = Step> {
    let start = centimeters(origin.z);
    let end = centimeters(final_height);

    let descent = ((end + 1)..=start).rev().map(move |cm| {
        let z = cm as f32 / 100.0;
        Step::Emit(position_setpoint(origin.x, origin.y, z, origin.yaw), step)
    });

    descent.chain(std::iter::once(Step::Wait(settle)))
}
