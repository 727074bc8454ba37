//! # Crazyflie flight mission
//!
//! This crate is the flight-mission core of an autonomous Crazyflie application: it decides, control cycle by
//! control cycle, which setpoint to hand to the low-level flight controller, based on a small set of live tunable
//! parameters and on the estimated pose of the vehicle.
//!
//! ## Content
//!
//! | Module | Role |
//! |--------|------|
//! | [setpoint] | Builds velocity-mode and position-mode setpoints |
//! | [maneuver] | Takeoff, landing, cruise, circle and spin maneuvers |
//! | [mission] | The mission state machine |
//! | [subsystems] | Interfaces to the controller, estimator, parameters, telemetry and decks |
//! | [config] | Power-on values and cadences |
//!
//! ## Usage
//!
//! The basic procedure to use the lib is:
//!  - Load a [MissionConfig]
//!  - Create the [Param](subsystems::param::Param) store and the [Telemetry](subsystems::telemetry::Telemetry)
//!  - Wrap the controller sink, the estimator and a [Timer] into a [Pilot](maneuver::Pilot)
//!  - Create the [Mission] and call [Mission::run()] from one task
//!  - Drive the mission by setting parameters from any other task
//!
//! For example:
//! ``` no_run
//! # use crazyflie_mission::subsystems::deck::NoDeckCheck;
//! # use crazyflie_mission::subsystems::estimator::{Estimator, Pose};
//! # use crazyflie_mission::subsystems::param::{self, Param};
//! # use crazyflie_mission::subsystems::telemetry::Telemetry;
//! # use crazyflie_mission::subsystems::commander::Commander;
//! # use crazyflie_mission::maneuver::Pilot;
//! # use crazyflie_mission::{Mission, MissionConfig, TokioTimer};
//! # async fn fly(estimator: impl Estimator + Sync) -> Result<(), Box<dyn std::error::Error>> {
//! let config = MissionConfig::load("mission.json")?;
//! let param = Param::mission(&config)?;
//!
//! let (uplink, _packets) = flume::unbounded();
//! let pilot = Pilot::new(Commander::new(uplink), estimator, TokioTimer, config.timing.clone());
//! let mut mission = Mission::new(&config, param.clone(), pilot, NoDeckCheck, Telemetry::new());
//!
//! param.set(param::FLY, 1u8).await?;
//! mission.run().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod timer;
mod value;

pub mod config;
pub mod maneuver;
pub mod mission;
pub mod setpoint;
pub mod subsystems;

pub use crate::config::MissionConfig;
pub use crate::error::{Error, Result};
pub use crate::mission::{Mission, MissionState};
pub use crate::timer::{Timer, TokioTimer};
pub use crate::value::{Value, ValueType};
