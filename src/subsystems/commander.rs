//! # Controller uplink
//!
//! This subsystem forwards the mission [Setpoint]s to the low-level flight controller. The controller is the only
//! component turning setpoints into actuator output; the mission only needs somewhere to submit them, expressed by
//! the [SetpointSink] trait.
//!
//! [Commander] is the sink that streams setpoints to a Crazyflie as CRTP generic setpoint packets over an uplink
//! channel, the same packets the firmware commander accepts from a ground station:
//!  - velocity-mode setpoints are sent as *hover* setpoints (`vx`, `vy`, `yawrate`, `zdistance`)
//!  - position-mode setpoints are sent as *position* setpoints (`x`, `y`, `z`, `yaw`)
//!
//! The Crazyflie has a couple of safety mechanisms that one needs to be aware of:
//!  - There is a priority for setpoints in the Crazyflie, only the higher priority setpoint is taken into account.
//!  - If no setpoint is received for 1 second, the Crazyflie will level itself and after 2 seconds will fall back
//!    to a lower-priority setpoint which in most case will cut the motors.
//!
//! ```
//! # use crazyflie_mission::subsystems::commander::{Commander, SetpointSink};
//! # use crazyflie_mission::setpoint::position_setpoint;
//! # async fn example() -> crazyflie_mission::Result<()> {
//! let (uplink, packets) = flume::unbounded();
//! let commander = Commander::new(uplink);
//!
//! commander.submit(position_setpoint(0.0, 0.0, 0.5, 0.0)).await?;
//! let packet = packets.recv_async().await.unwrap();
//! assert_eq!(packet.get_port(), 7);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use crazyflie_link::Packet;
use flume::Sender;

use crate::setpoint::{position_setpoint, velocity_setpoint, Setpoint};
use crate::{Error, Result, Value, ValueType};

/// CRTP port of the generic setpoint commander
pub const GENERIC_SETPOINT_PORT: u8 = 7;

// Channels
const GENERIC_SETPOINT_CHANNEL: u8 = 0;
const GENERIC_CMD_CHANNEL: u8 = 1;

// Setpoint type identifiers
const TYPE_STOP: u8 = 0;
const TYPE_POSITION: u8 = 7;
const TYPE_HOVER: u8 = 10;
const TYPE_META_COMMAND_NOTIFY_SETPOINT_STOP: u8 = 0;

/// # Controller interface
///
/// Accepts one setpoint per control step. Submission is fire-and-forget: the mission never inspects what the
/// controller does with it.
#[async_trait]
pub trait SetpointSink {
    /// Hand a setpoint to the flight controller
    async fn submit(&self, setpoint: Setpoint) -> Result<()>;
}

/// # CRTP setpoint streamer
///
/// This struct implements [SetpointSink] by encoding setpoints as generic setpoint packets. See the
/// [commander module documentation](crate::subsystems::commander) for more context and information.
#[derive(Debug, Clone)]
pub struct Commander {
    uplink: Sender<Packet>,
}

impl Commander {
    /// Create a commander sending packets to `uplink`
    pub fn new(uplink: Sender<Packet>) -> Self {
        Self { uplink }
    }

    async fn send(&self, channel: u8, payload: Vec<u8>) -> Result<()> {
        let pk = Packet::new(GENERIC_SETPOINT_PORT, channel, payload);
        self.uplink.send_async(pk).await?;
        Ok(())
    }

    /// Cut the motors right away, the vehicle drops if airborne
    pub async fn setpoint_stop(&self) -> Result<()> {
        self.send(GENERIC_SETPOINT_CHANNEL, vec![TYPE_STOP]).await
    }

    /// Hand the controller back to lower priority setpoint sources
    ///
    /// The last streamed setpoint stays in effect for `remain_valid_milliseconds`, usually 0.
    pub async fn notify_setpoint_stop(&self, remain_valid_milliseconds: u32) -> Result<()> {
        let mut payload = Vec::with_capacity(1 + 4);
        payload.push(TYPE_META_COMMAND_NOTIFY_SETPOINT_STOP);
        payload.extend_from_slice(&remain_valid_milliseconds.to_le_bytes());
        self.send(GENERIC_CMD_CHANNEL, payload).await
    }
}

#[async_trait]
impl SetpointSink for Commander {
    async fn submit(&self, setpoint: Setpoint) -> Result<()> {
        self.send(GENERIC_SETPOINT_CHANNEL, encode_setpoint(&setpoint)).await
    }
}

/// Encode a setpoint as a generic setpoint packet payload
pub fn encode_setpoint(setpoint: &Setpoint) -> Vec<u8> {
    let (setpoint_type, fields) = match *setpoint {
        Setpoint::Velocity { vx, vy, z, yaw_rate } => (TYPE_HOVER, [vx, vy, yaw_rate, z]),
        Setpoint::Position { x, y, z, yaw } => (TYPE_POSITION, [x, y, z, yaw]),
    };

    let mut payload = Vec::with_capacity(1 + 4 * 4);
    payload.push(setpoint_type);
    for field in fields.iter() {
        payload.extend_from_slice(&field.to_le_bytes());
    }
    payload
}

/// Decode a generic setpoint packet payload produced by [encode_setpoint]
///
/// Returns a [Error::ProtocolError] for unknown setpoint types or truncated payloads.
pub fn decode_setpoint(payload: &[u8]) -> Result<Setpoint> {
    let (setpoint_type, data) = payload
        .split_first()
        .ok_or_else(|| Error::ProtocolError("Empty setpoint payload".to_string()))?;

    if data.len() != 4 * 4 {
        return Err(Error::ProtocolError(format!(
            "Setpoint payload should carry 16 bytes, got {}",
            data.len()
        )));
    }

    let mut fields = [0f32; 4];
    for (field, bytes) in fields.iter_mut().zip(data.chunks(4)) {
        *field = f32::try_from(Value::from_le_bytes(bytes, ValueType::F32)?)?;
    }
    let [a, b, c, d] = fields;

    match *setpoint_type {
        TYPE_HOVER => Ok(velocity_setpoint(a, b, d, c)),
        TYPE_POSITION => Ok(position_setpoint(a, b, c, d)),
        t => Err(Error::ProtocolError(format!("Unknown setpoint type {}", t))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_payload_matches_firmware_layout() {
        let payload = encode_setpoint(&velocity_setpoint(0.5, 0.0, 0.4, 10.0));

        assert_eq!(payload[0], TYPE_HOVER);
        assert_eq!(&payload[1..5], &0.5f32.to_le_bytes());
        assert_eq!(&payload[9..13], &10.0f32.to_le_bytes());
        assert_eq!(&payload[13..17], &0.4f32.to_le_bytes());
    }

    #[test]
    fn decode_reverses_encode() {
        let setpoint = position_setpoint(1.0, -2.0, 0.5, 45.0);
        assert_eq!(decode_setpoint(&encode_setpoint(&setpoint)).unwrap(), setpoint);

        let setpoint = velocity_setpoint(0.3, 0.1, 0.5, -20.0);
        assert_eq!(decode_setpoint(&encode_setpoint(&setpoint)).unwrap(), setpoint);
    }

    #[test]
    fn decode_rejects_malformed_payloads() {
        assert!(decode_setpoint(&[]).is_err());
        assert!(decode_setpoint(&[TYPE_POSITION, 0, 0]).is_err());
        assert!(decode_setpoint(&[42; 17]).is_err());
    }
}
