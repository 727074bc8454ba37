//! # Mission configuration
//!
//! [MissionConfig] gathers the power-on values of the tunable parameters, the cadences of the control loop and of
//! every maneuver, and the deck gate policy. It is deserialized from JSON; every field is optional and falls back to
//! the defaults below.
//!
//! ```
//! # use crazyflie_mission::MissionConfig;
//! let config = MissionConfig::from_json(r#"{ "flying_height": 0.8, "deck_policy": "halt" }"#).unwrap();
//! assert_eq!(config.flying_height, 0.8);
//! assert_eq!(config.forward_velocity, 0.0);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::subsystems::deck::DeckPolicy;
use crate::Result;

/// Max forward speed (m/s)
pub const FORWARD_VELOCITY: f32 = 0.0;
/// Target height for the flight (m)
pub const TARGET_HEIGHT: f32 = 0.5;
/// Height at which landing hands over to the ground (m)
pub const FINAL_LANDING_HEIGHT: f32 = 0.07;
/// Time-cost spin duration (ms)
pub const SPIN_TIME: f32 = 1500.0;
/// Yaw-rate spin rate (deg/s)
pub const SPIN_YAW_RATE: f32 = 90.0;
/// Spin angle (deg)
pub const SPIN_ANGLE: f32 = 180.0;
/// Randomized spin half-range around [SPIN_ANGLE] (deg)
pub const RANDOM_SPIN_ANGLE: f32 = 90.0;
/// Circle radius (m)
pub const CIRCLE_RADIUS: f32 = 0.5;
/// Circle tangential velocity (m/s)
pub const CIRCLE_VELOCITY: f32 = 0.5;
/// Height where the takeoff ramp starts (m)
pub const LIFTOFF_HEIGHT: f32 = 0.2;

/// Mission configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionConfig {
    /// Initial `flight.velocity` (m/s)
    pub forward_velocity: f32,
    /// Initial `flight.height` (m)
    pub flying_height: f32,
    /// Initial `flight.land_h` (m)
    pub final_landing_height: f32,
    /// Initial `settings.debug`
    pub debug: u8,
    /// Initial `spin.time` (ms)
    pub spin_time: f32,
    /// Initial `spin.angle` (deg)
    pub spin_angle: f32,
    /// Initial `spin.yaw_rate` (deg/s)
    pub spin_yaw_rate: f32,
    /// Initial `spin.rand_range` (deg)
    pub spin_rand_range: f32,
    /// Initial `circle.radius` (m)
    pub circle_radius: f32,
    /// Initial `circle.velocity` (m/s)
    pub circle_velocity: f32,

    /// What to do when the required decks are missing
    pub deck_policy: DeckPolicy,
    /// Cadence parameters
    pub timing: Timing,
}

/// Fixed cadences and step counts of the mission and its maneuvers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// Period of the control loop while airborne (ms)
    pub control_cycle_ms: u64,
    /// Period of the control loop while on the ground (ms)
    pub idle_poll_ms: u64,
    /// Delay between system start and the deck gate (ms)
    pub startup_delay_ms: u64,
    /// Duration of one takeoff ramp/hold step (ms)
    pub takeoff_step_ms: u64,
    /// Number of steps holding the target height after the takeoff ramp
    pub takeoff_hold_steps: u32,
    /// Height where the takeoff ramp starts (m)
    pub liftoff_height: f32,
    /// Duration of one landing descent step (ms)
    pub land_step_ms: u64,
    /// Wait after the landing descent (ms)
    pub land_settle_ms: u64,
    /// Duration of one circle waypoint (ms)
    pub circle_step_ms: u64,
    /// Duration of one spin step (ms)
    pub spin_step_ms: u64,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            forward_velocity: FORWARD_VELOCITY,
            flying_height: TARGET_HEIGHT,
            final_landing_height: FINAL_LANDING_HEIGHT,
            debug: 1,
            spin_time: SPIN_TIME,
            spin_angle: SPIN_ANGLE,
            spin_yaw_rate: SPIN_YAW_RATE,
            spin_rand_range: RANDOM_SPIN_ANGLE,
            circle_radius: CIRCLE_RADIUS,
            circle_velocity: CIRCLE_VELOCITY,
            deck_policy: DeckPolicy::default(),
            timing: Timing::default(),
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            control_cycle_ms: 10,
            idle_poll_ms: 100,
            startup_delay_ms: 1000,
            takeoff_step_ms: 50,
            takeoff_hold_steps: 100,
            liftoff_height: LIFTOFF_HEIGHT,
            land_step_ms: 20,
            land_settle_ms: 200,
            circle_step_ms: 100,
            spin_step_ms: 10,
        }
    }
}

impl Timing {
    pub(crate) fn control_cycle(&self) -> Duration {
        Duration::from_millis(self.control_cycle_ms)
    }

    pub(crate) fn idle_poll(&self) -> Duration {
        Duration::from_millis(self.idle_poll_ms)
    }

    pub(crate) fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }
}

impl MissionConfig {
    /// Parse a configuration from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
