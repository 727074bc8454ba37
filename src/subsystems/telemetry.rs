//! # Telemetry subsystem
//!
//! Read-only variables published by the mission for external observation. The layout mirrors the
//! [param subsystem](crate::subsystems::param): a table of content of "group.name" variables with a fixed type,
//! a value cache and change watchers. Only the mission publishes; everybody else reads or watches.
//!
//! | name | type | content |
//! |------|------|---------|
//! | `mission.velocity` | f32 | forward velocity, published every control cycle |
//! | `mission.state` | u8 | [MissionState](crate::mission::MissionState) discriminant, published on every state entry |

use crate::{Error, Result, Value, ValueType};
use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures::lock::Mutex;
use std::{
    collections::{BTreeMap, HashMap},
    convert::{TryFrom, TryInto},
    sync::Arc,
};

/// Forward velocity as commanded by the mission (m/s)
pub const VELOCITY: &str = "mission.velocity";
/// Current mission state
pub const STATE: &str = "mission.state";

type TelemetryWatchers = Arc<Mutex<Vec<UnboundedSender<(String, Value)>>>>;

fn not_found(name: &str) -> Error {
    Error::TelemetryError(format!("Telemetry variable {} not found", name))
}

/// # Access to the mission telemetry
///
/// See the [telemetry module documentation](crate::subsystems::telemetry) for more context and information.
#[derive(Debug, Clone)]
pub struct Telemetry {
    toc: Arc<BTreeMap<String, ValueType>>,
    values: Arc<Mutex<HashMap<String, Value>>>,
    watchers: TelemetryWatchers,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl Telemetry {
    /// Telemetry with the mission variables, all zero
    pub fn new() -> Self {
        let variables = [(VELOCITY, Value::F32(0.0)), (STATE, Value::U8(0))];

        let toc = variables
            .iter()
            .map(|(name, value)| (name.to_string(), (*value).into()))
            .collect();
        let values = variables
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect();

        Self {
            toc: Arc::new(toc),
            values: Arc::new(Mutex::new(values)),
            watchers: Arc::default(),
        }
    }

    /// Get the names of all the telemetry variables
    pub fn names(&self) -> Vec<String> {
        self.toc.keys().cloned().collect()
    }

    /// Return the type of a telemetry variable or an Error if the variable does not exist.
    pub fn get_type(&self, name: &str) -> Result<ValueType> {
        self.toc.get(name).copied().ok_or_else(|| not_found(name))
    }

    /// Get the last published value of a variable
    ///
    /// The type of the variable must match the requested type, see [Param::get()](crate::subsystems::param::Param::get).
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
            .map_err(|e| Error::TelemetryError(format!("Type error reading telemetry: {:?}", e)))
    }

    /// Get notified of every publication as `(name, value)`
    pub async fn watch(&self) -> UnboundedReceiver<(String, Value)> {
        let (tx, rx) = unbounded();

        self.watchers.lock().await.push(tx);

        rx
    }

    pub(crate) async fn publish<T: Into<Value>>(&self, name: &str, value: T) -> Result<()> {
        let value: Value = value.into();
        let item_type = self.get_type(name)?;

        if item_type != value.into() {
            return Err(Error::TelemetryError(format!(
                "Telemetry {} is type {:?}, cannot publish {:?}",
                name, item_type, value
            )));
        }

        self.values.lock().await.insert(name.to_owned(), value);

        let mut watchers = self.watchers.lock().await;
        watchers.retain(|watcher| watcher.unbounded_send((name.to_owned(), value)).is_ok());

        Ok(())
    }
}
