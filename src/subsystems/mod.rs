//! # Mission subsystems
//!
//! The mission core talks to the rest of the vehicle through a handful of narrow interfaces, one module each. Every
//! module declares the trait the mission depends on and, where it makes sense, the implementation used on a
//! Crazyflie:
//!  - [commander]: where setpoints go
//!  - [estimator]: where the pose comes from
//!  - [param]: the operator intent and the tunables
//!  - [telemetry]: what the mission publishes
//!  - [deck]: the startup hardware presence gate

pub mod commander;
pub mod deck;
pub mod estimator;
pub mod param;
pub mod telemetry;
