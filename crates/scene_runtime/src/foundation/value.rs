//! Typed attribute values
//!
//! Attribute payloads are opaque to the runtime: a value is a closed payload
//! enum paired with a type-name string, and the runtime only ever creates,
//! compares and removes them by name and type. The type-name key is
//! authoritative: two names may share a payload shape (`"vector3"` and
//! `"color3"`) and still compare as different types.

use serde::{Deserialize, Serialize};

/// Type name for boolean values.
pub const BOOLEAN: &str = "boolean";
/// Type name for integer values.
pub const INTEGER: &str = "integer";
/// Type name for float values.
pub const FLOAT: &str = "float";
/// Type name for string values.
pub const STRING: &str = "string";
/// Type name for three-component vector values.
pub const VECTOR3: &str = "vector3";
/// Type name for RGB color values.
pub const COLOR3: &str = "color3";

/// Payload of a typed attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Boolean payload.
    Bool(bool),
    /// Signed integer payload.
    Int(i64),
    /// Double precision float payload.
    Float(f64),
    /// String payload.
    Str(String),
    /// Three-component vector payload.
    Vec3([f64; 3]),
}

impl Value {
    /// Default payload for a built-in type name, or `None` for an unknown
    /// one.
    pub fn default_for_type(type_name: &str) -> Option<Self> {
        match type_name {
            BOOLEAN => Some(Self::Bool(false)),
            INTEGER => Some(Self::Int(0)),
            FLOAT => Some(Self::Float(0.0)),
            STRING => Some(Self::Str(String::new())),
            VECTOR3 | COLOR3 => Some(Self::Vec3([0.0; 3])),
            _ => None,
        }
    }

    /// True when `other` carries the same payload shape.
    pub fn same_shape(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Name of the payload shape, for diagnostics.
    pub fn shape_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => BOOLEAN,
            Self::Int(_) => INTEGER,
            Self::Float(_) => FLOAT,
            Self::Str(_) => STRING,
            Self::Vec3(_) => VECTOR3,
        }
    }
}

/// An attribute value together with its type name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedValue {
    type_name: String,
    value: Value,
}

impl TypedValue {
    /// Create a value of `type_name` with its default payload, or `None`
    /// for an unknown type name.
    pub fn new(type_name: &str) -> Option<Self> {
        Value::default_for_type(type_name).map(|value| Self {
            type_name: type_name.to_string(),
            value,
        })
    }

    /// Create a value of `type_name` with a concrete payload. `None` when
    /// the type name is unknown or the payload shape does not match it.
    pub fn with_value(type_name: &str, value: Value) -> Option<Self> {
        let default = Value::default_for_type(type_name)?;
        default.same_shape(&value).then(|| Self {
            type_name: type_name.to_string(),
            value,
        })
    }

    /// The type-name key.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The payload.
    pub fn value(&self) -> &Value {
        &self.value
    }

    // Shape validation is the caller's job; see `ElementHandle::set_attribute`.
    pub(crate) fn set_value(&mut self, value: Value) {
        self.value = value;
    }
}
