use crazyflie_mission::subsystems::deck::DeckPolicy;
use crazyflie_mission::subsystems::param::{self, Param, ParamBuilder, ParamBus};
use crazyflie_mission::subsystems::telemetry::{self, Telemetry};
use crazyflie_mission::{MissionConfig, Value, ValueType};

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::test]
async fn mission_params_start_from_the_config() -> TestResult {
    let config = MissionConfig {
        flying_height: 0.8,
        circle_radius: 0.3,
        ..Default::default()
    };
    let param = Param::mission(&config)?;

    assert_eq!(param.names().len(), 15);
    let height: f32 = param.get(param::HEIGHT).await?;
    assert_eq!(height, 0.8);
    let radius: f32 = param.get(param::CIRCLE_RADIUS).await?;
    assert_eq!(radius, 0.3);
    let fly: u8 = param.get(param::FLY).await?;
    assert_eq!(fly, 0);
    let debug: bool = param.get(param::DEBUG).await?;
    assert!(debug);

    assert_eq!(param.get_type(param::CIRCLE)?, ValueType::U8);
    assert_eq!(param.get_type(param::SPIN_TIME)?, ValueType::F32);
    assert_eq!(param.get_id(param::FLY)?, 0);

    Ok(())
}

#[tokio::test]
async fn set_checks_the_declared_type() -> TestResult {
    let param = Param::mission(&MissionConfig::default())?;

    assert!(param.set(param::HEIGHT, 1u8).await.is_err());
    assert!(param.set(param::FLY, 1.0f32).await.is_err());
    assert!(param.set("flight.unknown", 1u8).await.is_err());

    param.set(param::FLY, true).await?;
    let fly: u8 = param.get(param::FLY).await?;
    assert_eq!(fly, 1);

    let wrong: Result<u8, _> = param.get(param::HEIGHT).await;
    assert!(wrong.is_err());

    Ok(())
}

#[tokio::test]
async fn lossy_access_converts_to_the_declared_type() -> TestResult {
    let param = Param::mission(&MissionConfig::default())?;

    param.set_lossy(param::CIRCLE, 1.0).await?;
    assert_eq!(param.get::<Value>(param::CIRCLE).await?, Value::U8(1));

    param.set_lossy(param::SPIN_ANGLE, 90.5).await?;
    assert_eq!(param.get_lossy(param::SPIN_ANGLE).await?, 90.5);

    Ok(())
}

#[tokio::test]
async fn bus_access_goes_through_the_store() -> TestResult {
    let param = Param::mission(&MissionConfig::default())?;
    let bus: &dyn ParamBus = &param;

    bus.write(param::SPIN_RAND_TRIGGER, Value::U8(1)).await?;
    assert_eq!(bus.read(param::SPIN_RAND_TRIGGER).await?, Value::U8(1));
    let trigger: u8 = param.get(param::SPIN_RAND_TRIGGER).await?;
    assert_eq!(trigger, 1);

    Ok(())
}

#[tokio::test]
async fn watchers_see_every_write() -> TestResult {
    let param = Param::mission(&MissionConfig::default())?;
    let mut changes = param.watch_change().await;

    param.set(param::FLY, 1u8).await?;
    param.set(param::FLY, 1u8).await?;
    param.set(param::VELOCITY, 0.2f32).await?;

    let mut seen = Vec::new();
    while let Ok(Some(change)) = changes.try_next() {
        seen.push(change);
    }
    assert_eq!(
        seen,
        vec![
            (param::FLY.to_string(), Value::U8(1)),
            (param::FLY.to_string(), Value::U8(1)),
            (param::VELOCITY.to_string(), Value::F32(0.2)),
        ]
    );

    Ok(())
}

#[tokio::test]
async fn clones_share_values() -> TestResult {
    let param = Param::mission(&MissionConfig::default())?;
    let operator = param.clone();

    operator.set(param::HEIGHT, 1.2f32).await?;
    let height: f32 = param.get(param::HEIGHT).await?;
    assert_eq!(height, 1.2);

    Ok(())
}

#[test]
fn duplicate_names_are_rejected() {
    let built = ParamBuilder::new().add("a.b", 1u8).add("a.b", 2u8).build();
    assert!(built.is_err());

    let built = ParamBuilder::new().add("a.b", 1u8).add("a.c", 2.0f32).build();
    assert!(built.is_ok());
}

#[tokio::test]
async fn telemetry_is_typed_and_starts_at_zero() -> TestResult {
    let telemetry = Telemetry::new();

    assert_eq!(telemetry.names().len(), 2);
    assert_eq!(telemetry.get_type(telemetry::STATE)?, ValueType::U8);
    assert_eq!(telemetry.get_type(telemetry::VELOCITY)?, ValueType::F32);
    let velocity: f32 = telemetry.get(telemetry::VELOCITY).await?;
    assert_eq!(velocity, 0.0);
    assert!(telemetry.get_type("mission.unknown").is_err());

    Ok(())
}

#[test]
fn config_fields_are_optional() -> TestResult {
    let config = MissionConfig::from_json(
        r#"{
            "forward_velocity": 0.2,
            "deck_policy": "halt",
            "timing": { "control_cycle_ms": 20 }
        }"#,
    )?;

    assert_eq!(config.forward_velocity, 0.2);
    assert_eq!(config.deck_policy, DeckPolicy::Halt);
    assert_eq!(config.timing.control_cycle_ms, 20);
    assert_eq!(config.timing.idle_poll_ms, 100);
    assert_eq!(config.flying_height, 0.5);
    assert_eq!(config.final_landing_height, 0.07);

    assert_eq!(MissionConfig::from_json("{}")?, MissionConfig::default());
    assert!(MissionConfig::from_json(r#"{ "deck_policy": "ignore" }"#).is_err());
    assert!(MissionConfig::load("/nonexistent/mission.json").is_err());

    Ok(())
}

#[test]
fn config_survives_serialization() -> TestResult {
    let config = MissionConfig {
        spin_angle: 90.0,
        deck_policy: DeckPolicy::Halt,
        ..Default::default()
    };

    let json = serde_json::to_string(&config)?;
    assert_eq!(MissionConfig::from_json(&json)?, config);

    Ok(())
}
