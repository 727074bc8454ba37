use std::array::TryFromSliceError;

use crazyflie_link::Packet;

/// [Result] alias for return types of the crate API
pub type Result<T> = std::result::Result<T, Error>;

/// Error enum type
#[derive(Debug)]
pub enum Error {
    /// Unexpected setpoint encoding. The String contains the reason.
    ProtocolError(String),
    /// Parameter subsystem error. The String contains the reason.
    ParamError(String),
    /// Telemetry subsystem error. The String contains the reason.
    TelemetryError(String),
    /// [Value](crate::Value) conversion error. The String contains the reason.
    ConversionError(String),
    /// Mission configuration could not be loaded or parsed. The String contains the reason.
    ConfigError(String),
    /// The setpoint uplink is closed.
    Disconnected,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ProtocolError(reason) => write!(f, "protocol error: {}", reason),
            Error::ParamError(reason) => write!(f, "param error: {}", reason),
            Error::TelemetryError(reason) => write!(f, "telemetry error: {}", reason),
            Error::ConversionError(reason) => write!(f, "conversion error: {}", reason),
            Error::ConfigError(reason) => write!(f, "config error: {}", reason),
            Error::Disconnected => write!(f, "setpoint uplink disconnected"),
        }
    }
}

impl std::error::Error for Error {}

impl From<TryFromSliceError> for Error {
    fn from(e: TryFromSliceError) -> Self {
        Self::ConversionError(format!("{:?}", e))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::ConfigError(format!("{}", e))
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::ConfigError(format!("{}", e))
    }
}

impl From<flume::SendError<Packet>> for Error {
    fn from(_: flume::SendError<Packet>) -> Self {
        self::Error::Disconnected
    }
}
