//! # Setpoint builder
//!
//! A setpoint is a single command frame for the low-level flight controller. Two shapes are produced by the
//! mission:
//!  - **Velocity mode**: body-frame x/y velocity, absolute height and yaw rate. Used to cruise.
//!  - **Position mode**: absolute x/y/z position and absolute yaw. Used by every scripted maneuver.
//!
//! Units follow the Crazyflie conventions: meters, meters/second, degrees and degrees/second.
//!
//! The builders do not validate anything: callers are responsible for staying inside the flight envelope of the
//! vehicle.
//!
//! ```
//! # use crazyflie_mission::setpoint::{position_setpoint, velocity_setpoint, AxisMode};
//! let cruise = velocity_setpoint(0.5, 0.0, 0.5, 0.0);
//! assert!(cruise.is_body_frame());
//! assert_eq!(cruise.modes().z, AxisMode::Absolute);
//!
//! let hold = position_setpoint(1.0, 2.0, 0.5, 90.0);
//! assert_eq!(hold.yaw(), Some(90.0));
//! ```

/// Interpretation of one axis of a [Setpoint]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisMode {
    /// The axis value is an absolute position (or an absolute angle for yaw)
    Absolute,
    /// The axis value is a velocity (or an angular rate for yaw)
    Velocity,
}

/// Per-axis [AxisMode] of a [Setpoint]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modes {
    /// x axis
    pub x: AxisMode,
    /// y axis
    pub y: AxisMode,
    /// z axis
    pub z: AxisMode,
    /// yaw axis
    pub yaw: AxisMode,
}

/// # Flight controller command frame
///
/// Setpoints are built fresh for every control step, handed to a
/// [SetpointSink](crate::subsystems::commander::SetpointSink) and dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Setpoint {
    /// Body-frame velocity with an absolute height
    Velocity {
        /// Forward velocity (m/s, body frame)
        vx: f32,
        /// Lateral velocity (m/s, body frame)
        vy: f32,
        /// Height (m, absolute)
        z: f32,
        /// Yaw rate (deg/s)
        yaw_rate: f32,
    },
    /// Absolute position and heading
    Position {
        /// x position (m, world frame)
        x: f32,
        /// y position (m, world frame)
        y: f32,
        /// z position (m, world frame)
        z: f32,
        /// Heading (deg, absolute)
        yaw: f32,
    },
}

/// Build a velocity-mode setpoint: body-frame x/y velocity, absolute height and yaw rate.
pub fn velocity_setpoint(x_vel: f32, y_vel: f32, z: f32, yaw_rate: f32) -> Setpoint {
    Setpoint::Velocity {
        vx: x_vel,
        vy: y_vel,
        z,
        yaw_rate,
    }
}

/// Build a position-mode setpoint, all axes absolute.
pub fn position_setpoint(x: f32, y: f32, z: f32, yaw: f32) -> Setpoint {
    Setpoint::Position { x, y, z, yaw }
}

impl Setpoint {
    /// Axis interpretation of this setpoint
    pub fn modes(&self) -> Modes {
        match self {
            Setpoint::Velocity { .. } => Modes {
                x: AxisMode::Velocity,
                y: AxisMode::Velocity,
                z: AxisMode::Absolute,
                yaw: AxisMode::Velocity,
            },
            Setpoint::Position { .. } => Modes {
                x: AxisMode::Absolute,
                y: AxisMode::Absolute,
                z: AxisMode::Absolute,
                yaw: AxisMode::Absolute,
            },
        }
    }

    /// True if the x/y velocities are expressed in the vehicle body frame
    pub fn is_body_frame(&self) -> bool {
        matches!(self, Setpoint::Velocity { .. })
    }

    /// Commanded height, absolute in both modes
    pub fn z(&self) -> f32 {
        match *self {
            Setpoint::Velocity { z, .. } | Setpoint::Position { z, .. } => z,
        }
    }

    /// Commanded absolute heading, `None` for velocity-mode setpoints
    pub fn yaw(&self) -> Option<f32> {
        match *self {
            Setpoint::Position { yaw, .. } => Some(yaw),
            Setpoint::Velocity { .. } => None,
        }
    }

    /// Commanded absolute x/y position, `None` for velocity-mode setpoints
    pub fn position_xy(&self) -> Option<(f32, f32)> {
        match *self {
            Setpoint::Position { x, y, .. } => Some((x, y)),
            Setpoint::Velocity { .. } => None,
        }
    }
}
