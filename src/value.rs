use std::convert::{TryFrom, TryInto};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Error;

// Declares `Value`, `ValueType` and every per-type conversion from one table.
// Each entry is `Variant(primitive, wide)`: `wide` is the 64 bits type lossy
// conversions from f64 go through before truncating to `primitive`.
macro_rules! scalar_types {
    ($($(#[$doc:meta])* $name:ident($ty:ident, $wide:ident)),* $(,)?) => {
        /// # Typed scalar value
        ///
        /// This enum supports all the data types that can be exchanged on the mission
        /// [param](crate::subsystems::param) and [telemetry](crate::subsystems::telemetry)
        /// surfaces.
        ///
        /// Every variant converts from its rust primitive with [From]. Converting back
        /// with [TryFrom] only succeeds for the exact same type:
        /// ```
        /// # use std::convert::TryInto;
        /// # use crazyflie_mission::Value;
        /// let height: f32 = Value::F32(0.5).try_into().unwrap();
        /// ```
        ///
        /// The following **will panic**, a flag is not a float:
        /// ``` should_panic
        /// # use std::convert::TryInto;
        /// # use crazyflie_mission::Value;
        /// let height: f32 = Value::U8(1).try_into().unwrap();
        /// ```
        ///
        /// Flags are carried as `U8`. Converting to `bool` accepts any integer value
        /// and maps non-zero to `true`.
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub enum Value {
            $($(#[$doc])* $name($ty),)*
        }

        /// # Value type
        ///
        /// Type tag of a [Value], as declared in a table of content
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum ValueType {
            $($(#[$doc])* $name,)*
        }

        impl From<Value> for ValueType {
            fn from(value: Value) -> Self {
                match value {
                    $(Value::$name(_) => ValueType::$name,)*
                }
            }
        }

        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$name(v)
                }
            }

            impl TryFrom<Value> for $ty {
                type Error = Error;

                fn try_from(value: Value) -> Result<$ty, Self::Error> {
                    match value {
                        Value::$name(v) => Ok(v),
                        other => Err(Error::ConversionError(format!(
                            "{:?} is not a {}",
                            other,
                            stringify!($ty)
                        ))),
                    }
                }
            }
        )*

        impl Value {
            /// Decode a little-endian `bytes` slice as a value of type `value_type`
            ///
            /// The slice length must be the size of the type.
            pub fn from_le_bytes(bytes: &[u8], value_type: ValueType) -> Result<Value, Error> {
                Ok(match value_type {
                    $(ValueType::$name => Value::$name($ty::from_le_bytes(bytes.try_into()?)),)*
                })
            }

            /// Widen the value to a [f64], exact for every type
            pub fn to_f64_lossy(&self) -> f64 {
                match *self {
                    $(Value::$name(v) => v as f64,)*
                }
            }

            /// Make a [Value] of type `value_type` from a [f64]
            ///
            /// Integers are truncated to their bit width, `257` written to a `u8` gives `1`, and floats lose
            /// the precision `f32` cannot hold.
            pub fn from_f64_lossy(value_type: ValueType, value: f64) -> Value {
                match value_type {
                    $(ValueType::$name => Value::$name((value as $wide) as $ty),)*
                }
            }
        }

        impl fmt::Display for Value {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(Value::$name(v) => write!(f, "{}", v),)*
                }
            }
        }
    };
}

scalar_types! {
    /// Unsigned 8 bits, also used for flags
    U8(u8, u64),
    /// Unsigned 16 bits
    U16(u16, u64),
    /// Unsigned 32 bits
    U32(u32, u64),
    /// Signed 8 bits
    I8(i8, i64),
    /// Signed 16 bits
    I16(i16, i64),
    /// Signed 32 bits
    I32(i32, i64),
    /// 32 bits float
    F32(f32, f64),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::U8(v as u8)
    }
}

impl TryFrom<Value> for bool {
    type Error = Error;

    fn try_from(value: Value) -> Result<bool, Self::Error> {
        match value {
            Value::F32(_) => Err(Error::ConversionError(format!(
                "{:?} is not a flag",
                value
            ))),
            _ => Ok(value.to_f64_lossy() != 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lossy_write_truncates_to_the_declared_width() {
        assert_eq!(Value::from_f64_lossy(ValueType::U8, 257.0), Value::U8(1));
        assert_eq!(Value::from_f64_lossy(ValueType::I8, -1.0), Value::I8(-1));
        assert_eq!(Value::from_f64_lossy(ValueType::F32, 0.25), Value::F32(0.25));
    }

    #[test]
    fn flags_accept_any_integer() {
        assert!(bool::try_from(Value::U8(2)).unwrap());
        assert!(!bool::try_from(Value::I32(0)).unwrap());
        assert!(bool::try_from(Value::F32(1.0)).is_err());
    }

    #[test]
    fn bytes_must_match_the_type_size() {
        assert_eq!(
            Value::from_le_bytes(&[0x34, 0x12], ValueType::U16).unwrap(),
            Value::U16(0x1234)
        );
        assert!(Value::from_le_bytes(&[0, 0, 0], ValueType::F32).is_err());
    }
}
