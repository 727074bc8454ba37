//! Circular trajectory
//!
//! The vehicle flies one full circle of the given radius at a constant tangential velocity, at the height and
//! heading captured at entry. The circle center sits `radius` meters behind the entry position along x, so waypoint
//! 0 is the entry position itself and the vehicle ends the circuit where it started:
//!
//! ```text
//! x(i) = x0 + r * cos(2πi/n) - r
//! y(i) = y0 + r * sin(2πi/n)
//! ```
//!
//! The number of waypoints `n` is the circumference divided by the distance flown during one step.
//!
//! Both the radius and the velocity must be strictly positive: a zero velocity asks for an infinite number of
//! waypoints and this is not checked here.

use std::f32::consts::PI;
use std::time::Duration;

use super::Step;
use crate::setpoint::position_setpoint;
use crate::subsystems::estimator::Pose;

/// Number of waypoints of a circle of `radius` flown at `tangential_velocity`, one waypoint per `step`
pub fn waypoint_count(radius: f32, tangential_velocity: f32, step: Duration) -> u32 {
    let circumference = 2.0 * PI * radius;
    let circuit_time = circumference / tangential_velocity;
    (circuit_time / step.as_secs_f32()).round() as u32
}

/// Waypoint `i` out of `count` around the circle starting at `origin`
pub fn waypoint(origin: Pose, radius: f32, i: u32, count: u32) -> (f32, f32) {
    let angle = 2.0 * PI * i as f32 / count as f32;
    (
        origin.x + radius * angle.cos() - radius,
        origin.y + radius * angle.sin(),
    )
}

/// Circle plan starting at `origin`
pub fn plan(
    origin: Pose,
    radius: f32,
    tangential_velocity: f32,
    step: Duration,
) -> impl Iterator<Item = Step> {
    let count = waypoint_count(radius, tangential_velocity, step);

    (0..count).map(move |i| {
        let (x, y) = waypoint(origin, radius, i, count);
        Step::Emit(position_setpoint(x, y, origin.z, origin.yaw), step)
    })
}
