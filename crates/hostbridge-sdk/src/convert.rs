//! Traits for converting between bridge values and Rust types.
//!
//! `FromBridge` extracts method arguments and setter values; `ToBridge` wraps
//! return values and getter results. `ToBridge::KIND` is the declared type the
//! bridge uses to decide what to expose and which properties are complex.

use std::sync::Arc;

use crate::error::{BridgeError, BridgeResult};
use crate::handler::Exposed;
use crate::value::{BridgeValue, HostObject, TypeTag, ValueKind};

/// Convert from BridgeValue to Rust type.
pub trait FromBridge: Sized {
    /// Convert, returning an error if the type doesn't match.
    fn from_bridge(value: &BridgeValue) -> BridgeResult<Self>;
}

/// Convert from Rust type to BridgeValue.
pub trait ToBridge {
    /// Declared type of values produced by this conversion
    const KIND: ValueKind;

    /// Convert to BridgeValue.
    fn to_bridge(self) -> BridgeValue;
}

fn mismatch(expected: &str, value: &BridgeValue) -> BridgeError {
    BridgeError::TypeMismatch {
        expected: expected.to_string(),
        got: value.type_name().to_string(),
    }
}

impl FromBridge for bool {
    fn from_bridge(value: &BridgeValue) -> BridgeResult<Self> {
        value.as_bool().ok_or_else(|| mismatch("bool", value))
    }
}

impl ToBridge for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn to_bridge(self) -> BridgeValue {
        BridgeValue::Bool(self)
    }
}

impl FromBridge for i32 {
    fn from_bridge(value: &BridgeValue) -> BridgeResult<Self> {
        match value {
            BridgeValue::I32(i) => Ok(*i),
            BridgeValue::I64(i) => i32::try_from(*i).map_err(|_| mismatch("i32", value)),
            _ => Err(mismatch("i32", value)),
        }
    }
}

impl ToBridge for i32 {
    const KIND: ValueKind = ValueKind::I32;

    fn to_bridge(self) -> BridgeValue {
        BridgeValue::I32(self)
    }
}

impl FromBridge for i64 {
    fn from_bridge(value: &BridgeValue) -> BridgeResult<Self> {
        value.as_i64().ok_or_else(|| mismatch("i64", value))
    }
}

impl ToBridge for i64 {
    const KIND: ValueKind = ValueKind::I64;

    fn to_bridge(self) -> BridgeValue {
        BridgeValue::I64(self)
    }
}

impl FromBridge for f64 {
    fn from_bridge(value: &BridgeValue) -> BridgeResult<Self> {
        value.as_f64().ok_or_else(|| mismatch("f64", value))
    }
}

impl ToBridge for f64 {
    const KIND: ValueKind = ValueKind::F64;

    fn to_bridge(self) -> BridgeValue {
        BridgeValue::F64(self)
    }
}

impl FromBridge for String {
    fn from_bridge(value: &BridgeValue) -> BridgeResult<Self> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mismatch("string", value))
    }
}

impl ToBridge for String {
    const KIND: ValueKind = ValueKind::String;

    fn to_bridge(self) -> BridgeValue {
        BridgeValue::String(self)
    }
}

impl ToBridge for &'static str {
    const KIND: ValueKind = ValueKind::String;

    fn to_bridge(self) -> BridgeValue {
        BridgeValue::String(self.to_string())
    }
}

// Unit type (for methods that return nothing)
impl ToBridge for () {
    const KIND: ValueKind = ValueKind::Unit;

    fn to_bridge(self) -> BridgeValue {
        BridgeValue::Null
    }
}

impl ToBridge for TypeTag {
    const KIND: ValueKind = ValueKind::Type;

    fn to_bridge(self) -> BridgeValue {
        BridgeValue::Type(self)
    }
}

impl FromBridge for BridgeValue {
    fn from_bridge(value: &BridgeValue) -> BridgeResult<Self> {
        Ok(value.clone())
    }
}

// An untyped value is declared as "any object", which is complex.
impl ToBridge for BridgeValue {
    const KIND: ValueKind = ValueKind::Object;

    fn to_bridge(self) -> BridgeValue {
        self
    }
}

impl FromBridge for HostObject {
    fn from_bridge(value: &BridgeValue) -> BridgeResult<Self> {
        value.as_object().cloned().ok_or_else(|| mismatch("object", value))
    }
}

impl ToBridge for HostObject {
    const KIND: ValueKind = ValueKind::Object;

    fn to_bridge(self) -> BridgeValue {
        BridgeValue::Object(self)
    }
}

impl<T: Exposed> FromBridge for Arc<T> {
    fn from_bridge(value: &BridgeValue) -> BridgeResult<Self> {
        value
            .as_object()
            .and_then(|obj| obj.downcast_arc::<T>())
            .ok_or_else(|| mismatch(std::any::type_name::<T>(), value))
    }
}

impl<T: Exposed> ToBridge for Arc<T> {
    const KIND: ValueKind = ValueKind::Object;

    fn to_bridge(self) -> BridgeValue {
        BridgeValue::Object(HostObject::from_arc(self))
    }
}

impl<T: FromBridge> FromBridge for Option<T> {
    fn from_bridge(value: &BridgeValue) -> BridgeResult<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_bridge(value).map(Some)
        }
    }
}

impl<T: ToBridge> ToBridge for Option<T> {
    const KIND: ValueKind = T::KIND;

    fn to_bridge(self) -> BridgeValue {
        match self {
            Some(value) => value.to_bridge(),
            None => BridgeValue::Null,
        }
    }
}
