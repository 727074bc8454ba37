//! # Mission state machine
//!
//! The mission decides, once per control cycle, what to hand to the flight controller. It reads the operator
//! intent and the tunables from the [parameter bus](crate::subsystems::param::ParamBus) and dispatches to the
//! [maneuver library](crate::maneuver).
//!
//! # States
//!
//! | State            | Description                                                |
//! |------------------|------------------------------------------------------------|
//! | `WaitingToStart` | On the ground since power on, waiting for the fly command  |
//! | `TakingOff`      | Running the takeoff maneuver                               |
//! | `Flying`         | Cruising forward, running one-shot maneuvers when armed    |
//! | `Landing`        | Running the landing maneuver                               |
//! | `Landed`         | On the ground after a flight, waiting for the fly command  |
//!
//! `TakingOff` and `Landing` only last for the maneuver they name: a takeoff or a landing always completes within
//! the control cycle that started it. Intent changes made while a maneuver runs are observed at the next cycle.
//!
//! While flying, the one-shot maneuver triggers are checked in a fixed priority order (circle, time-cost spin,
//! yaw-rate spin, randomized spin). Every trigger found set is armed, runs its maneuver, then gets cleared on the
//! bus. It stays armed on the mission side until the next cycle starts. One cruise setpoint is always sent at the
//! end of a flying cycle.
//!
//! Every cycle ends by publishing the commanded forward velocity, whatever the state.

use std::convert::TryFrom;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{MissionConfig, Timing};
use crate::maneuver::Pilot;
use crate::subsystems::commander::SetpointSink;
use crate::subsystems::deck::{DeckCheck, DeckPolicy, Gate};
use crate::subsystems::estimator::Estimator;
use crate::subsystems::param::{self, ParamBus};
use crate::subsystems::telemetry::{self, Telemetry};
use crate::timer::Timer;
use crate::{Result, Value};

/// Discrete mission state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MissionState {
    /// Grounded since power on
    WaitingToStart = 0,
    /// Grounded after a landing
    Landed = 1,
    /// Landing maneuver in progress
    Landing = 2,
    /// Takeoff maneuver in progress
    TakingOff = 3,
    /// Airborne
    Flying = 4,
}

impl MissionState {
    /// True for the states where the vehicle rests on the ground
    pub fn is_grounded(self) -> bool {
        matches!(self, MissionState::WaitingToStart | MissionState::Landed)
    }

    /// Human-readable label for the state
    pub fn label(self) -> &'static str {
        match self {
            MissionState::WaitingToStart => "waiting to start",
            MissionState::Landed => "landed",
            MissionState::Landing => "landing",
            MissionState::TakingOff => "taking off",
            MissionState::Flying => "flying",
        }
    }
}

impl TryFrom<u8> for MissionState {
    type Error = crate::Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(MissionState::WaitingToStart),
            1 => Ok(MissionState::Landed),
            2 => Ok(MissionState::Landing),
            3 => Ok(MissionState::TakingOff),
            4 => Ok(MissionState::Flying),
            v => Err(crate::Error::ConversionError(format!(
                "{} is not a mission state",
                v
            ))),
        }
    }
}

/// Maneuvers started by a one-shot trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Maneuver {
    /// [Pilot::fly_circle()]
    Circle,
    /// [Pilot::spin_time()]
    SpinTime,
    /// [Pilot::spin_yaw_rate()]
    SpinYawRate,
    /// [Pilot::spin_random()]
    SpinRandom,
}

impl Maneuver {
    /// All triggered maneuvers, in the order they are checked
    pub const PRIORITY: [Maneuver; 4] = [
        Maneuver::Circle,
        Maneuver::SpinTime,
        Maneuver::SpinYawRate,
        Maneuver::SpinRandom,
    ];

    /// Name of the parameter arming this maneuver
    pub fn trigger(self) -> &'static str {
        match self {
            Maneuver::Circle => param::CIRCLE,
            Maneuver::SpinTime => param::SPIN_TIME_TRIGGER,
            Maneuver::SpinYawRate => param::SPIN_RATE_TRIGGER,
            Maneuver::SpinRandom => param::SPIN_RAND_TRIGGER,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Arming state of a one-shot trigger, as seen by the mission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    /// Not seen set during the current cycle
    Disarmed,
    /// Seen set on the bus during the current cycle, its maneuver ran and the bus flag was cleared
    Armed,
}

/// Tunable parameters, read once per flying cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tunables {
    /// Cruise velocity (m/s)
    pub forward_velocity: f32,
    /// Cruise height (m)
    pub flying_height: f32,
    /// Final landing height (m)
    pub final_landing_height: f32,
    /// Time-cost spin duration (ms)
    pub spin_time: f32,
    /// Spin angle (deg)
    pub spin_angle: f32,
    /// Yaw-rate spin rate (deg/s)
    pub spin_yaw_rate: f32,
    /// Randomized spin half-range (deg)
    pub spin_rand_range: f32,
    /// Circle radius (m)
    pub circle_radius: f32,
    /// Circle tangential velocity (m/s)
    pub circle_velocity: f32,
}

async fn read_f32<P: ParamBus + Sync>(bus: &P, name: &str) -> Result<f32> {
    Ok(bus.read(name).await?.to_f64_lossy() as f32)
}

async fn read_flag<P: ParamBus + Sync>(bus: &P, name: &str) -> Result<bool> {
    Ok(bus.read(name).await?.to_f64_lossy() != 0.0)
}

impl Tunables {
    /// Read every tunable from the bus, one independent read each
    pub async fn read<P: ParamBus + Sync>(bus: &P) -> Result<Self> {
        Ok(Self {
            forward_velocity: read_f32(bus, param::VELOCITY).await?,
            flying_height: read_f32(bus, param::HEIGHT).await?,
            final_landing_height: read_f32(bus, param::LAND_HEIGHT).await?,
            spin_time: read_f32(bus, param::SPIN_TIME).await?,
            spin_angle: read_f32(bus, param::SPIN_ANGLE).await?,
            spin_yaw_rate: read_f32(bus, param::SPIN_YAW_RATE).await?,
            spin_rand_range: read_f32(bus, param::SPIN_RAND_RANGE).await?,
            circle_radius: read_f32(bus, param::CIRCLE_RADIUS).await?,
            circle_velocity: read_f32(bus, param::CIRCLE_VELOCITY).await?,
        })
    }
}

/// # Flight mission
///
/// See the [mission module documentation](crate::mission) for the state machine.
pub struct Mission<P, C, E, T, D> {
    param: P,
    pilot: Pilot<C, E, T>,
    deck: D,
    telemetry: Telemetry,
    timing: Timing,
    deck_policy: DeckPolicy,
    state: MissionState,
    triggers: [TriggerState; 4],
    gate: Option<Gate>,
    rng: StdRng,
}

impl<P, C, E, T, D> Mission<P, C, E, T, D>
where
    P: ParamBus + Sync,
    C: SetpointSink + Sync,
    E: Estimator + Sync,
    T: Timer + Sync,
    D: DeckCheck + Sync,
{
    /// Create a mission in the `WaitingToStart` state
    ///
    /// The randomized spin draws from an entropy-seeded generator, see [Mission::with_rng()] for reproducible
    /// flights.
    pub fn new(
        config: &MissionConfig,
        param: P,
        pilot: Pilot<C, E, T>,
        deck: D,
        telemetry: Telemetry,
    ) -> Self {
        Self {
            param,
            pilot,
            deck,
            telemetry,
            timing: config.timing.clone(),
            deck_policy: config.deck_policy,
            state: MissionState::WaitingToStart,
            triggers: [TriggerState::Disarmed; 4],
            gate: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Replace the random generator used by the randomized spin
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Current state
    pub fn state(&self) -> MissionState {
        self.state
    }

    /// Arming state of a maneuver trigger, as left by the last cycle
    pub fn trigger_state(&self, maneuver: Maneuver) -> TriggerState {
        self.triggers[maneuver.index()]
    }

    /// Published telemetry
    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    /// The maneuver executor
    pub fn pilot(&self) -> &Pilot<C, E, T> {
        &self.pilot
    }

    /// Outcome of the deck gate, `None` before [Mission::check_decks()] ran
    pub fn gate(&self) -> Option<Gate> {
        self.gate
    }

    /// Run the one-time deck presence check
    pub async fn check_decks(&mut self) -> Gate {
        let gate = self.deck_policy.gate(self.deck.decks_mounted().await);
        self.gate = Some(gate);
        gate
    }

    /// Run the mission for the lifetime of the process
    ///
    /// Waits for the system to settle, checks the decks once, then cycles forever. Only a parameter bus or
    /// setpoint uplink error makes this function return.
    pub async fn run(&mut self) -> Result<()> {
        log::info!("Mission started");
        self.pilot.timer().sleep(self.timing.startup_delay()).await;

        self.check_decks().await;
        self.telemetry
            .publish(telemetry::STATE, self.state as u8)
            .await?;

        loop {
            self.cycle().await?;
        }
    }

    /// Run one control cycle and return the resulting state
    pub async fn cycle(&mut self) -> Result<MissionState> {
        self.triggers = [TriggerState::Disarmed; 4];

        if self.gate != Some(Gate::Halted) {
            self.step().await?;
        }

        let velocity = read_f32(&self.param, param::VELOCITY).await?;
        self.telemetry
            .publish(telemetry::VELOCITY, velocity)
            .await?;

        let period = if self.state.is_grounded() {
            self.timing.idle_poll()
        } else {
            self.timing.control_cycle()
        };
        self.pilot.timer().sleep(period).await;

        Ok(self.state)
    }

    async fn step(&mut self) -> Result<()> {
        let fly = read_flag(&self.param, param::FLY).await?;
        let debug = read_flag(&self.param, param::DEBUG).await?;

        match (self.state, fly) {
            (MissionState::WaitingToStart, true) | (MissionState::Landed, true) => {
                self.take_off().await?;
            }
            (MissionState::WaitingToStart, false) | (MissionState::Landed, false) => {
                if debug {
                    log::debug!("Waiting start");
                }
            }
            (MissionState::Flying, false) => {
                self.land().await?;
            }
            (MissionState::Flying, true) => {
                if debug {
                    log::debug!("Flying");
                }
                self.fly().await?;
            }
            // A maneuver interrupted by an uplink error is started over
            (MissionState::TakingOff, _) => self.take_off().await?,
            (MissionState::Landing, _) => self.land().await?,
        }

        Ok(())
    }

    async fn enter(&mut self, state: MissionState) -> Result<()> {
        log::info!("Mission {} -> {}", self.state.label(), state.label());
        self.state = state;
        self.telemetry.publish(telemetry::STATE, state as u8).await
    }

    async fn take_off(&mut self) -> Result<()> {
        self.enter(MissionState::TakingOff).await?;

        let height = read_f32(&self.param, param::HEIGHT).await?;
        self.pilot.reset_estimator().await;
        self.pilot.takeoff(height).await?;

        self.enter(MissionState::Flying).await
    }

    async fn land(&mut self) -> Result<()> {
        self.enter(MissionState::Landing).await?;

        let final_height = read_f32(&self.param, param::LAND_HEIGHT).await?;
        self.pilot.land(final_height).await?;

        self.enter(MissionState::Landed).await
    }

    async fn fly(&mut self) -> Result<()> {
        let tunables = Tunables::read(&self.param).await?;

        for maneuver in Maneuver::PRIORITY.iter().copied() {
            if read_flag(&self.param, maneuver.trigger()).await? {
                self.triggers[maneuver.index()] = TriggerState::Armed;
                self.perform(maneuver, &tunables).await?;
                self.param.write(maneuver.trigger(), Value::U8(0)).await?;
            }
        }

        self.pilot
            .cruise_forward(tunables.forward_velocity, tunables.flying_height)
            .await
    }

    async fn perform(&mut self, maneuver: Maneuver, tunables: &Tunables) -> Result<()> {
        match maneuver {
            Maneuver::Circle => {
                self.pilot
                    .fly_circle(tunables.circle_radius, tunables.circle_velocity)
                    .await
            }
            Maneuver::SpinTime => {
                self.pilot
                    .spin_time(tunables.spin_angle, tunables.spin_time)
                    .await
            }
            Maneuver::SpinYawRate => {
                self.pilot
                    .spin_yaw_rate(tunables.spin_angle, tunables.spin_yaw_rate)
                    .await
            }
            Maneuver::SpinRandom => {
                let angle = self
                    .pilot
                    .spin_random(
                        tunables.spin_angle,
                        tunables.spin_rand_range,
                        tunables.spin_yaw_rate,
                        &mut self.rng,
                    )
                    .await?;
                log::info!("Random spin flew {:.1} deg", angle);
                Ok(())
            }
        }
    }
}

