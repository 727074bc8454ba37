//! # Maneuver library
//!
//! A maneuver is a bounded sequence of setpoints executed to completion. Every maneuver is split in two halves:
//!  - a **plan**: a pure iterator of [Step]s computed from the pose captured at entry and the maneuver inputs,
//!    see the [takeoff], [land], [circle] and [spin] modules
//!  - the **execution** by a [Pilot]: each step submits its setpoint to the flight controller and then waits for
//!    the step duration
//!
//! Execution is not preemptible: once started, a maneuver runs all its steps before returning, whatever happens to
//! the mission intent in the meantime. Drift of the estimated pose during a long maneuver is not compensated, the
//! pose captured at entry stays the reference for the whole maneuver.

pub mod circle;
pub mod land;
pub mod spin;
pub mod takeoff;

use std::time::Duration;

use rand::Rng;

use crate::config::Timing;
use crate::setpoint::{velocity_setpoint, Setpoint};
use crate::subsystems::commander::SetpointSink;
use crate::subsystems::estimator::{Estimator, Pose};
use crate::timer::Timer;
use crate::Result;

/// One step of a maneuver plan
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Submit the setpoint, then wait
    Emit(Setpoint, Duration),
    /// Wait without submitting anything
    Wait(Duration),
}

impl Step {
    /// Setpoint submitted by this step, if any
    pub fn setpoint(&self) -> Option<&Setpoint> {
        match self {
            Step::Emit(setpoint, _) => Some(setpoint),
            Step::Wait(_) => None,
        }
    }

    /// Time spent in this step
    pub fn duration(&self) -> Duration {
        match *self {
            Step::Emit(_, duration) | Step::Wait(duration) => duration,
        }
    }
}

/// # Maneuver executor
///
/// Owns the three collaborators a maneuver needs: where setpoints go, where the pose comes from and how to wait.
#[derive(Debug)]
pub struct Pilot<C, E, T> {
    commander: C,
    estimator: E,
    timer: T,
    timing: Timing,
}

impl<C, E, T> Pilot<C, E, T>
where
    C: SetpointSink + Sync,
    E: Estimator + Sync,
    T: Timer + Sync,
{
    /// Create a pilot using the step cadences of `timing`
    pub fn new(commander: C, estimator: E, timer: T, timing: Timing) -> Self {
        Self {
            commander,
            estimator,
            timer,
            timing,
        }
    }

    /// The delay primitive used by this pilot
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Run a plan to completion, returns the number of setpoints submitted
    pub async fn execute<I>(&self, plan: I) -> Result<usize>
    where
        I: IntoIterator<Item = Step>,
    {
        let mut emitted = 0;

        for step in plan {
            if let Step::Emit(setpoint, _) = step {
                self.commander.submit(setpoint).await?;
                emitted += 1;
            }
            self.timer.sleep(step.duration()).await;
        }

        Ok(emitted)
    }

    /// Re-initialise the state estimator
    pub async fn reset_estimator(&self) {
        self.estimator.reset().await;
    }

    /// Current estimated pose
    pub async fn pose(&self) -> Pose {
        self.estimator.pose().await
    }

    /// Gradual takeoff to `height`, see [takeoff::plan()]
    pub async fn takeoff(&self, height: f32) -> Result<()> {
        let origin = self.pose().await;
        log::info!("Taking off to {:.2} m", height);

        let plan = takeoff::plan(
            origin,
            height,
            self.timing.liftoff_height,
            self.timing.takeoff_hold_steps,
            Duration::from_millis(self.timing.takeoff_step_ms),
        );
        self.execute(plan).await?;
        Ok(())
    }

    /// Controlled descent down to `final_height`, see [land::plan()]
    pub async fn land(&self, final_height: f32) -> Result<()> {
        let origin = self.pose().await;
        log::info!("Landing from {:.2} m", origin.z);

        let plan = land::plan(
            origin,
            final_height,
            Duration::from_millis(self.timing.land_step_ms),
            Duration::from_millis(self.timing.land_settle_ms),
        );
        self.execute(plan).await?;
        Ok(())
    }

    /// Submit one body-frame velocity setpoint moving forward at `forward_velocity` at `height`
    ///
    /// This is a single step, without any wait: it is called once per control cycle while flying.
    pub async fn cruise_forward(&self, forward_velocity: f32, height: f32) -> Result<()> {
        self.commander
            .submit(velocity_setpoint(forward_velocity, 0.0, height, 0.0))
            .await
    }

    /// One full circle around a center `radius` meters behind the current position, see [circle::plan()]
    ///
    /// `radius` and `tangential_velocity` must be strictly positive.
    pub async fn fly_circle(&self, radius: f32, tangential_velocity: f32) -> Result<()> {
        let origin = self.pose().await;
        log::info!(
            "Flying circle r={:.2} m at {:.2} m/s",
            radius,
            tangential_velocity
        );

        let plan = circle::plan(
            origin,
            radius,
            tangential_velocity,
            Duration::from_millis(self.timing.circle_step_ms),
        );
        self.execute(plan).await?;
        Ok(())
    }

    /// Spin in place by `angle` degrees in `duration_ms` milliseconds
    pub async fn spin_time(&self, angle: f32, duration_ms: f32) -> Result<()> {
        let origin = self.pose().await;
        log::info!("Spinning {:.1} deg in {:.0} ms", angle, duration_ms);

        let plan = spin::plan(
            origin,
            angle,
            duration_ms,
            Duration::from_millis(self.timing.spin_step_ms),
        );
        self.execute(plan).await?;
        Ok(())
    }

    /// Spin in place by `angle` degrees at a constant `yaw_rate` (deg/s, non-zero)
    pub async fn spin_yaw_rate(&self, angle: f32, yaw_rate: f32) -> Result<()> {
        self.spin_time(angle, spin::duration_ms(angle, yaw_rate))
            .await
    }

    /// Spin in place by a random angle drawn in `nominal ± range` degrees, at a constant `yaw_rate`
    ///
    /// Returns the angle actually flown, after folding to the shorter rotation.
    pub async fn spin_random<R: Rng>(
        &self,
        nominal: f32,
        range: f32,
        yaw_rate: f32,
        rng: &mut R,
    ) -> Result<f32> {
        let angle = spin::fold_angle(spin::draw_angle(rng, nominal, range));
        self.spin_yaw_rate(angle, yaw_rate).await?;
        Ok(angle)
    }
}
