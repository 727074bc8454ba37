//! # State estimator interface
//!
//! The mission does not fuse sensors. It polls an external estimator for the current [Pose] whenever a maneuver
//! needs a frame of reference, and resets it before every takeoff.

use async_trait::async_trait;

/// Estimated vehicle pose
///
/// Position in meters (world frame) and heading in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pose {
    /// x position (m)
    pub x: f32,
    /// y position (m)
    pub y: f32,
    /// z position (m)
    pub z: f32,
    /// Heading (deg)
    pub yaw: f32,
}

impl Pose {
    /// Create a pose from its components
    pub fn new(x: f32, y: f32, z: f32, yaw: f32) -> Self {
        Self { x, y, z, yaw }
    }
}

/// # Pose source
#[async_trait]
pub trait Estimator {
    /// Latest estimated pose
    async fn pose(&self) -> Pose;

    /// Re-initialise the estimator, called once per takeoff
    async fn reset(&self);
}
