use crazyflie_mission::setpoint::{position_setpoint, velocity_setpoint, AxisMode, Setpoint};
use crazyflie_mission::subsystems::commander::{
    decode_setpoint, Commander, SetpointSink, GENERIC_SETPOINT_PORT,
};
use crazyflie_mission::Error;

#[test]
fn velocity_setpoint_is_body_frame_with_absolute_height() {
    let setpoint = velocity_setpoint(0.5, -0.1, 0.4, 30.0);

    let modes = setpoint.modes();
    assert_eq!(modes.x, AxisMode::Velocity);
    assert_eq!(modes.y, AxisMode::Velocity);
    assert_eq!(modes.z, AxisMode::Absolute);
    assert_eq!(modes.yaw, AxisMode::Velocity);
    assert!(setpoint.is_body_frame());
    assert_eq!(setpoint.z(), 0.4);
    assert_eq!(setpoint.yaw(), None);
    assert_eq!(setpoint.position_xy(), None);
}

#[test]
fn position_setpoint_is_absolute_on_every_axis() {
    let setpoint = position_setpoint(1.0, 2.0, 0.5, -45.0);

    let modes = setpoint.modes();
    assert!([modes.x, modes.y, modes.z, modes.yaw]
        .iter()
        .all(|mode| *mode == AxisMode::Absolute));
    assert!(!setpoint.is_body_frame());
    assert_eq!(setpoint.position_xy(), Some((1.0, 2.0)));
    assert_eq!(setpoint.yaw(), Some(-45.0));
}

#[test]
fn builders_do_not_clamp() {
    let setpoint = position_setpoint(0.0, 0.0, -1.0, 720.0);
    assert_eq!(setpoint.z(), -1.0);
    assert_eq!(setpoint.yaw(), Some(720.0));
}

#[tokio::test]
async fn commander_streams_generic_setpoints() -> Result<(), Box<dyn std::error::Error>> {
    let (uplink, packets) = flume::unbounded();
    let commander = Commander::new(uplink);

    let hover = velocity_setpoint(0.2, 0.0, 0.5, 0.0);
    let hold = position_setpoint(1.0, 0.0, 0.5, 90.0);
    commander.submit(hover).await?;
    commander.submit(hold).await?;

    let pk = packets.recv_async().await?;
    assert_eq!(pk.get_port(), GENERIC_SETPOINT_PORT);
    assert_eq!(pk.get_channel(), 0);
    assert_eq!(decode_setpoint(pk.get_data())?, hover);

    let pk = packets.recv_async().await?;
    assert_eq!(decode_setpoint(pk.get_data())?, hold);

    Ok(())
}

#[tokio::test]
async fn commander_stop_commands() -> Result<(), Box<dyn std::error::Error>> {
    let (uplink, packets) = flume::unbounded();
    let commander = Commander::new(uplink);

    commander.setpoint_stop().await?;
    let pk = packets.recv_async().await?;
    assert_eq!(pk.get_channel(), 0);
    assert_eq!(pk.get_data(), &vec![0u8]);

    commander.notify_setpoint_stop(100).await?;
    let pk = packets.recv_async().await?;
    assert_eq!(pk.get_channel(), 1);
    assert_eq!(pk.get_data()[0], 0);
    assert_eq!(&pk.get_data()[1..], &100u32.to_le_bytes());

    Ok(())
}

#[tokio::test]
async fn commander_reports_a_closed_uplink() {
    let (uplink, packets) = flume::unbounded();
    drop(packets);

    let result = Commander::new(uplink)
        .submit(position_setpoint(0.0, 0.0, 0.5, 0.0))
        .await;
    assert!(matches!(result, Err(Error::Disconnected)));
}

#[test]
fn setpoints_compare_by_value() {
    assert_eq!(
        velocity_setpoint(0.1, 0.2, 0.3, 0.4),
        Setpoint::Velocity {
            vx: 0.1,
            vy: 0.2,
            z: 0.3,
            yaw_rate: 0.4
        }
    );
}
