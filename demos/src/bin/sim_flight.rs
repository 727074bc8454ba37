// -*- coding: utf-8 -*-
//
//     ||          ____  _ __
//  +------+      / __ )(_) /_______________ _____  ___
//  | 0xBC |     / __  / / __/ ___/ ___/ __ `/_  / / _ \
//  +------+    / /_/ / / /_/ /__/ /  / /_/ / / /_/  __/
//   ||  ||    /_____/_/\__/\___/_/   \__,_/ /___/\___/
//
//  Copyright (C) 2025 Bitcraze AB
//
//  This program is free software; you can redistribute it and/or
//  modify it under the terms of the GNU General Public License
//  as published by the Free Software Foundation; either version 2
//  of the License, or (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//  You should have received a copy of the GNU General Public License
//  along with this program. If not, see <https://www.gnu.org/licenses/>.


// Demo that flies the mission against a simulated Crazyflie
// The setpoint packets are decoded back and applied to a point-mass vehicle, an
// operator task drives the mission through its parameters like a ground station would.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use clap::Parser;
use crazyflie_link::Packet;
use futures::StreamExt;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::time::sleep;

use crazyflie_mission::maneuver::Pilot;
use crazyflie_mission::setpoint::Setpoint;
use crazyflie_mission::subsystems::commander::{decode_setpoint, Commander};
use crazyflie_mission::subsystems::deck::NoDeckCheck;
use crazyflie_mission::subsystems::estimator::{Estimator, Pose};
use crazyflie_mission::subsystems::param::{self, Param};
use crazyflie_mission::subsystems::telemetry::{self, Telemetry};
use crazyflie_mission::{Mission, MissionConfig, MissionState, TokioTimer, Value};

#[derive(Parser, Debug)]
#[command(about = "Fly the mission against a simulated Crazyflie")]
struct Args {
    /// Mission configuration file (JSON), defaults are used if not given
    #[arg(short, long)]
    config: Option<String>,

    /// Seed of the randomized spin
    #[arg(short, long)]
    seed: Option<u64>,

    /// Cruise time between the scripted maneuvers (seconds)
    #[arg(short, long, default_value_t = 2.0)]
    flight_time: f32,

    /// Cruise velocity (m/s)
    #[arg(short, long, default_value_t = 0.0)]
    velocity: f32,
}

/// Point-mass vehicle following the decoded setpoints
#[derive(Clone, Default)]
struct SimVehicle {
    pose: Arc<Mutex<Pose>>,
}

impl SimVehicle {
    fn apply(&self, setpoint: Setpoint, dt: f32) {
        let Ok(mut pose) = self.pose.lock() else {
            return;
        };

        match setpoint {
            Setpoint::Position { x, y, z, yaw } => *pose = Pose::new(x, y, z, yaw),
            Setpoint::Velocity { vx, vy, z, yaw_rate } => {
                let (sin, cos) = pose.yaw.to_radians().sin_cos();
                pose.x += (vx * cos - vy * sin) * dt;
                pose.y += (vx * sin + vy * cos) * dt;
                pose.z = z;
                pose.yaw += yaw_rate * dt;
            }
        }
    }
}

#[async_trait]
impl Estimator for SimVehicle {
    async fn pose(&self) -> Pose {
        self.pose.lock().map(|pose| *pose).unwrap_or_default()
    }

    async fn reset(&self) {
        log::info!("Estimator reset");
    }
}

async fn simulate(packets: flume::Receiver<Packet>, vehicle: SimVehicle, dt: f32) {
    while let Ok(pk) = packets.recv_async().await {
        match decode_setpoint(pk.get_data()) {
            Ok(setpoint) => vehicle.apply(setpoint, dt),
            Err(e) => log::warn!("Dropping packet: {}", e),
        }
    }
}

async fn operator(param: Param, flight_time: Duration) -> crazyflie_mission::Result<()> {
    sleep(Duration::from_secs(2)).await;
    println!("Taking off");
    param.set(param::FLY, 1u8).await?;

    // Takeoff completes before the first trigger is seen
    sleep(Duration::from_secs(8)).await;

    for trigger in [
        param::CIRCLE,
        param::SPIN_TIME_TRIGGER,
        param::SPIN_RATE_TRIGGER,
        param::SPIN_RAND_TRIGGER,
    ] {
        println!("Triggering {}", trigger);
        param.set(trigger, 1u8).await?;

        // Wait for the mission to clear the trigger
        while param.get::<u8>(trigger).await? != 0 {
            sleep(Duration::from_millis(100)).await;
        }
        sleep(flight_time).await;
    }

    println!("Landing");
    param.set(param::FLY, 0u8).await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => MissionConfig::load(path)?,
        None => MissionConfig::default(),
    };
    config.forward_velocity = args.velocity;

    let param = Param::mission(&config)?;
    let telemetry = Telemetry::new();
    let vehicle = SimVehicle::default();

    let (uplink, packets) = flume::unbounded();
    let dt = config.timing.control_cycle_ms as f32 / 1000.0;
    tokio::spawn(simulate(packets, vehicle.clone(), dt));

    let pilot = Pilot::new(
        Commander::new(uplink),
        vehicle.clone(),
        TokioTimer,
        config.timing.clone(),
    );
    let mut mission = Mission::new(&config, param.clone(), pilot, NoDeckCheck, telemetry.clone());
    if let Some(seed) = args.seed {
        mission = mission.with_rng(StdRng::seed_from_u64(seed));
    }

    let mut states = telemetry.watch().await;
    let mission_task = tokio::spawn(async move { mission.run().await });
    let operator_task = tokio::spawn(operator(param, Duration::from_secs_f32(args.flight_time)));

    while let Some((name, value)) = states.next().await {
        if name != telemetry::STATE {
            continue;
        }

        let pose = vehicle.pose().await;
        let state = match value {
            Value::U8(v) => MissionState::try_from(v)?,
            _ => continue,
        };
        println!(
            "{:<16} x={:6.2} y={:6.2} z={:5.2} yaw={:7.1}",
            state.label(),
            pose.x,
            pose.y,
            pose.z,
            pose.yaw
        );

        if state == MissionState::Landed {
            break;
        }
    }

    operator_task.await??;
    mission_task.abort();

    Ok(())
}
