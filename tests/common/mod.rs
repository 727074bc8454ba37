// Fakes shared by the integration tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crazyflie_mission::maneuver::Pilot;
use crazyflie_mission::setpoint::Setpoint;
use crazyflie_mission::subsystems::commander::SetpointSink;
use crazyflie_mission::subsystems::deck::DeckCheck;
use crazyflie_mission::subsystems::estimator::{Estimator, Pose};
use crazyflie_mission::subsystems::param::Param;
use crazyflie_mission::subsystems::telemetry::Telemetry;
use crazyflie_mission::{Mission, MissionConfig, Result, Timer, Value};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Parameter write performed by the vehicle right after its n-th setpoint
struct Hook {
    after: usize,
    param: Param,
    name: &'static str,
    value: Value,
}

#[derive(Default)]
struct VehicleState {
    pose: Pose,
    setpoints: Vec<Setpoint>,
    hooks: Vec<Hook>,
}

/// Vehicle that jumps to every position setpoint it receives
///
/// Velocity setpoints only move the height. It is both the controller sink and the estimator of the tests.
#[derive(Clone, Default)]
pub struct SimVehicle {
    state: Arc<Mutex<VehicleState>>,
    resets: Arc<AtomicUsize>,
}

impl SimVehicle {
    pub fn at(pose: Pose) -> Self {
        let vehicle = Self::default();
        vehicle.set_pose(pose);
        vehicle
    }

    pub fn set_pose(&self, pose: Pose) {
        self.state.lock().unwrap().pose = pose;
    }

    pub fn current_pose(&self) -> Pose {
        self.state.lock().unwrap().pose
    }

    pub fn setpoints(&self) -> Vec<Setpoint> {
        self.state.lock().unwrap().setpoints.clone()
    }

    pub fn setpoint_count(&self) -> usize {
        self.state.lock().unwrap().setpoints.len()
    }

    pub fn clear(&self) {
        self.state.lock().unwrap().setpoints.clear();
    }

    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }

    /// Write `value` to `name` once `after` setpoints have been received in total
    pub fn write_after(&self, after: usize, param: &Param, name: &'static str, value: Value) {
        self.state.lock().unwrap().hooks.push(Hook {
            after,
            param: param.clone(),
            name,
            value,
        });
    }
}

#[async_trait]
impl SetpointSink for SimVehicle {
    async fn submit(&self, setpoint: Setpoint) -> Result<()> {
        let due: Vec<(Param, &'static str, Value)> = {
            let mut state = self.state.lock().unwrap();
            state.setpoints.push(setpoint);

            match setpoint {
                Setpoint::Position { x, y, z, yaw } => state.pose = Pose::new(x, y, z, yaw),
                Setpoint::Velocity { z, .. } => state.pose.z = z,
            }

            let count = state.setpoints.len();
            state
                .hooks
                .iter()
                .filter(|hook| hook.after == count)
                .map(|hook| (hook.param.clone(), hook.name, hook.value))
                .collect()
        };

        for (param, name, value) in due {
            param.set(name, value).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Estimator for SimVehicle {
    async fn pose(&self) -> Pose {
        self.current_pose()
    }

    async fn reset(&self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}

/// Timer recording every requested delay without waiting
#[derive(Clone, Default)]
pub struct VirtualTimer {
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl VirtualTimer {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }

    pub fn elapsed(&self) -> Duration {
        self.sleeps.lock().unwrap().iter().sum()
    }

    pub fn clear(&self) {
        self.sleeps.lock().unwrap().clear();
    }
}

#[async_trait]
impl Timer for VirtualTimer {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

pub struct FakeDeck(pub bool);

#[async_trait]
impl DeckCheck for FakeDeck {
    async fn decks_mounted(&self) -> bool {
        self.0
    }
}

pub type TestMission = Mission<Param, SimVehicle, SimVehicle, VirtualTimer, FakeDeck>;

pub struct Harness {
    pub mission: TestMission,
    pub param: Param,
    pub vehicle: SimVehicle,
    pub timer: VirtualTimer,
    pub telemetry: Telemetry,
}

pub fn pilot(config: &MissionConfig, vehicle: &SimVehicle, timer: &VirtualTimer) -> Pilot<SimVehicle, SimVehicle, VirtualTimer> {
    Pilot::new(vehicle.clone(), vehicle.clone(), timer.clone(), config.timing.clone())
}

pub fn harness(config: MissionConfig, decks_mounted: bool) -> Harness {
    init_logger();

    let param = Param::mission(&config).unwrap();
    let vehicle = SimVehicle::default();
    let timer = VirtualTimer::default();
    let telemetry = Telemetry::new();

    let mission = Mission::new(
        &config,
        param.clone(),
        pilot(&config, &vehicle, &timer),
        FakeDeck(decks_mounted),
        telemetry.clone(),
    )
    .with_rng(StdRng::seed_from_u64(42));

    Harness {
        mission,
        param,
        vehicle,
        timer,
        telemetry,
    }
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {}, got {}",
        expected,
        actual
    );
}
