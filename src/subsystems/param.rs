//! # Parameter subsystem
//!
//! The mission is tuned live through a flat namespace of named scalar parameters. Each parameter has a unique name
//! composed from a group and a variable name. Functions that accesses variables, take a `name` parameter that
//! accepts a string in the format "group.variable".
//!
//! [Param] is the parameter store: a table of content declared once at startup, a value cache and change
//! watchers. It is cheap to clone; clones share the same values so an operator task and the mission task can hold
//! one each. The mission itself only sees the narrow [ParamBus] trait.
//!
//! The parameters declared by [Param::mission()] are listed as constants in this module.

use crate::{Error, MissionConfig, Result};
use crate::{Value, ValueType};
use async_trait::async_trait;
use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures::lock::Mutex;
use std::{
    collections::{BTreeMap, HashMap},
    convert::{TryFrom, TryInto},
    sync::Arc,
};

/// Takeoff/landing command, non-zero to fly
pub const FLY: &str = "start_stop.fly";
/// Verbosity of the mission diagnostic log, 0 disables per-cycle messages
pub const DEBUG: &str = "settings.debug";
/// Cruise forward velocity (m/s)
pub const VELOCITY: &str = "flight.velocity";
/// Takeoff and cruise height (m)
pub const HEIGHT: &str = "flight.height";
/// Final landing height threshold (m)
pub const LAND_HEIGHT: &str = "flight.land_h";
/// One-shot circle trigger
pub const CIRCLE: &str = "maneuver.circle";
/// One-shot time-cost spin trigger
pub const SPIN_TIME_TRIGGER: &str = "maneuver.spin_time";
/// One-shot yaw-rate spin trigger
pub const SPIN_RATE_TRIGGER: &str = "maneuver.spin_rate";
/// One-shot randomized spin trigger
pub const SPIN_RAND_TRIGGER: &str = "maneuver.spin_rand";
/// Time-cost spin duration (ms)
pub const SPIN_TIME: &str = "spin.time";
/// Spin angle (deg)
pub const SPIN_ANGLE: &str = "spin.angle";
/// Yaw-rate spin rate (deg/s)
pub const SPIN_YAW_RATE: &str = "spin.yaw_rate";
/// Randomized spin half-range (deg)
pub const SPIN_RAND_RANGE: &str = "spin.rand_range";
/// Circle radius (m)
pub const CIRCLE_RADIUS: &str = "circle.radius";
/// Circle tangential velocity (m/s)
pub const CIRCLE_VELOCITY: &str = "circle.velocity";

/// # Parameter bus interface
///
/// Each read and write is independent: no multi-field atomicity is provided or assumed.
#[async_trait]
pub trait ParamBus {
    /// Read the current value of a parameter
    async fn read(&self, name: &str) -> Result<Value>;

    /// Write a parameter
    async fn write(&self, name: &str, value: Value) -> Result<()>;
}

type ParamChangeWatchers = Arc<Mutex<Vec<UnboundedSender<(String, Value)>>>>;

async fn notify_watchers(watchers: &ParamChangeWatchers, name: String, value: Value) {
    let mut watchers = watchers.lock().await;

    // Drop watchers whose receiver is gone
    watchers.retain(|watcher| watcher.unbounded_send((name.clone(), value)).is_ok());
}

fn not_found(name: &str) -> Error {
    Error::ParamError(format!("Parameter {} not found", name))
}

/// # Parameter store
///
/// See the [param module documentation](crate::subsystems::param) for more context and information.
#[derive(Debug, Clone)]
pub struct Param {
    toc: Arc<BTreeMap<String, (u16, ValueType)>>,
    values: Arc<Mutex<HashMap<String, Value>>>,
    watchers: ParamChangeWatchers,
}

/// Declares the table of content of a [Param] store
///
/// Variables get consecutive ids in declaration order. The type of each variable is the type of its initial value.
#[derive(Debug, Default)]
pub struct ParamBuilder {
    entries: Vec<(String, Value)>,
}

impl ParamBuilder {
    /// Start an empty table of content
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a variable with its initial value
    pub fn add<T: Into<Value>>(mut self, name: &str, initial: T) -> Self {
        self.entries.push((name.to_owned(), initial.into()));
        self
    }

    /// Build the store
    ///
    /// Return an error if a name is declared twice.
    pub fn build(self) -> Result<Param> {
        let mut toc = BTreeMap::new();
        let mut values = HashMap::new();

        for (id, (name, initial)) in self.entries.into_iter().enumerate() {
            if toc.contains_key(&name) {
                return Err(Error::ParamError(format!(
                    "Parameter {} declared twice",
                    name
                )));
            }
            toc.insert(name.clone(), (id as u16, initial.into()));
            values.insert(name, initial);
        }

        Ok(Param {
            toc: Arc::new(toc),
            values: Arc::new(Mutex::new(values)),
            watchers: Arc::default(),
        })
    }
}

impl Param {
    /// Store holding the full mission parameter surface, initialised from `config`
    pub fn mission(config: &MissionConfig) -> Result<Self> {
        ParamBuilder::new()
            .add(FLY, 0u8)
            .add(DEBUG, config.debug)
            .add(VELOCITY, config.forward_velocity)
            .add(HEIGHT, config.flying_height)
            .add(LAND_HEIGHT, config.final_landing_height)
            .add(CIRCLE, 0u8)
            .add(SPIN_TIME_TRIGGER, 0u8)
            .add(SPIN_RATE_TRIGGER, 0u8)
            .add(SPIN_RAND_TRIGGER, 0u8)
            .add(SPIN_TIME, config.spin_time)
            .add(SPIN_ANGLE, config.spin_angle)
            .add(SPIN_YAW_RATE, config.spin_yaw_rate)
            .add(SPIN_RAND_RANGE, config.spin_rand_range)
            .add(CIRCLE_RADIUS, config.circle_radius)
            .add(CIRCLE_VELOCITY, config.circle_velocity)
            .build()
    }

    /// Names of every declared parameter, as "group.name", sorted
    pub fn names(&self) -> Vec<String> {
        self.toc.keys().cloned().collect()
    }

    /// Declared type of a parameter
    pub fn get_type(&self, name: &str) -> Result<ValueType> {
        Ok(self.toc.get(name).ok_or_else(|| not_found(name))?.1)
    }

    /// Declaration index of a parameter
    pub fn get_id(&self, name: &str) -> Result<u16> {
        Ok(self.toc.get(name).ok_or_else(|| not_found(name))?.0)
    }

    /// Write a parameter and notify the watchers
    ///
    /// Both primitives and [Value](crate::Value)s are accepted, as long as the type is the declared one. Writing
    /// the height:
    ///
    /// ```
    /// # use crazyflie_mission::{MissionConfig, Value};
    /// # use crazyflie_mission::subsystems::param::Param;
    /// # async fn example() -> crazyflie_mission::Result<()> {
    /// let param = Param::mission(&MissionConfig::default())?;
    /// param.set("flight.height", 0.8f32).await?;  // From primitive
    /// param.set("flight.height", Value::F32(0.8)).await?;  // From Value
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// Fails on an unknown name or a type mismatch, the stored value is then left untouched.
    pub async fn set<T: Into<Value>>(&self, name: &str, value: T) -> Result<()> {
        let value: Value = value.into();
        let item_type = self.get_type(name)?;

        if item_type != value.into() {
            return Err(Error::ParamError(format!(
                "Parameter {} is type {:?}, cannot set with value {:?}",
                name, item_type, value
            )));
        }

        self.values.lock().await.insert(name.to_owned(), value);
        log::debug!("Parameter {} set to {:?}", name, value);
        notify_watchers(&self.watchers, name.to_owned(), value).await;

        Ok(())
    }

    /// Read a parameter
    ///
    /// The requested type must be the declared one, or [Value](crate::Value). Reading the fly flag:
    /// ```
    /// # use crazyflie_mission::{MissionConfig, Value};
    /// # use crazyflie_mission::subsystems::param::Param;
    /// # async fn example() -> crazyflie_mission::Result<()> {
    /// let param = Param::mission(&MissionConfig::default())?;
    /// let fly: u8 = param.get("start_stop.fly").await?;  // To primitive
    /// let fly: Value = param.get("start_stop.fly").await?;  // To Value
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// Fails on an unknown name or a type mismatch.
    pub async fn get<T: TryFrom<Value>>(&self, name: &str) -> Result<T>
    where
        <T as TryFrom<Value>>::Error: std::fmt::Debug,
    {
        let value = *self
            .values
            .lock()
            .await
            .get(name)
            .ok_or_else(|| not_found(name))?;

        value
            .try_into()
            .map_err(|e| Error::ParamError(format!("Type error reading param: {:?}", e)))
    }

    /// Write any parameter from a `f64`, converted to the declared type
    ///
    /// See [Value::from_f64_lossy()](crate::Value::from_f64_lossy) for what gets lost on the way.
    pub async fn set_lossy(&self, name: &str, value: f64) -> Result<()> {
        let value_type = self.get_type(name)?;
        self.set(name, Value::from_f64_lossy(value_type, value)).await
    }

    /// Read any parameter as a `f64`
    pub async fn get_lossy(&self, name: &str) -> Result<f64> {
        let value: Value = self.get(name).await?;
        Ok(value.to_f64_lossy())
    }

    /// Get notified for every parameter value change
    ///
    /// Every successful `set` is sent to the returned stream as `(name, value)`, including writes that do not change
    /// the value.
    pub async fn watch_change(&self) -> UnboundedReceiver<(String, Value)> {
        let (tx, rx) = unbounded();

        self.watchers.lock().await.push(tx);

        rx
    }
}

#[async_trait]
impl ParamBus for Param {
    async fn read(&self, name: &str) -> Result<Value> {
        self.get(name).await
    }

    async fn write(&self, name: &str, value: Value) -> Result<()> {
        self.set(name, value).await
    }
}
