//! Codecs between typed domain values and flat property maps
//!
//! Every persisted type provides an explicit pair:
//! - [`ToProperties`] marshals a value into the map written with `SET n = $props`
//! - [`FromProperties`] rebuilds the value from the map the store returns
//!
//! Decoding goes through [`PropertyReader`], which resolves field names
//! exactly first and ASCII-case-insensitively second.

use super::property::{PropertyMap, PropertyValue};
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while converting a property map into a typed value
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MappingError {
    #[error("Missing required property '{0}'")]
    MissingProperty(String),

    #[error("Property '{property}' has type {found}, expected {expected}")]
    TypeMismatch {
        property: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Property '{property}' is invalid: {message}")]
    InvalidValue { property: String, message: String },

    #[error("Expected a property map in column '{0}'")]
    NotAMap(String),
}

pub type MappingResult<T> = Result<T, MappingError>;

/// Marshals a typed value into a flat property map
pub trait ToProperties {
    fn to_properties(&self) -> PropertyMap;
}

/// Rebuilds a typed value from a flat property map
pub trait FromProperties: Sized {
    fn from_properties(properties: &PropertyMap) -> MappingResult<Self>;
}

/// Conversion of a single property value into a Rust type
pub trait FromPropertyValue: Sized {
    /// Type name reported in [`MappingError::TypeMismatch`]
    const EXPECTED: &'static str;

    fn from_property_value(property: &str, value: &PropertyValue) -> MappingResult<Self>;
}

fn mismatch<T: FromPropertyValue>(property: &str, value: &PropertyValue) -> MappingError {
    MappingError::TypeMismatch {
        property: property.to_string(),
        expected: T::EXPECTED,
        found: value.type_name(),
    }
}

impl FromPropertyValue for PropertyValue {
    const EXPECTED: &'static str = "Any";

    fn from_property_value(_property: &str, value: &PropertyValue) -> MappingResult<Self> {
        Ok(value.clone())
    }
}

impl FromPropertyValue for String {
    const EXPECTED: &'static str = "String";

    fn from_property_value(property: &str, value: &PropertyValue) -> MappingResult<Self> {
        value
            .as_string()
            .map(str::to_string)
            .ok_or_else(|| mismatch::<Self>(property, value))
    }
}

impl FromPropertyValue for i64 {
    const EXPECTED: &'static str = "Integer";

    fn from_property_value(property: &str, value: &PropertyValue) -> MappingResult<Self> {
        value
            .as_integer()
            .ok_or_else(|| mismatch::<Self>(property, value))
    }
}

impl FromPropertyValue for i32 {
    const EXPECTED: &'static str = "Integer";

    fn from_property_value(property: &str, value: &PropertyValue) -> MappingResult<Self> {
        let raw = i64::from_property_value(property, value)?;
        i32::try_from(raw).map_err(|_| MappingError::InvalidValue {
            property: property.to_string(),
            message: format!("{} does not fit in i32", raw),
        })
    }
}

impl FromPropertyValue for u32 {
    const EXPECTED: &'static str = "Integer";

    fn from_property_value(property: &str, value: &PropertyValue) -> MappingResult<Self> {
        let raw = i64::from_property_value(property, value)?;
        u32::try_from(raw).map_err(|_| MappingError::InvalidValue {
            property: property.to_string(),
            message: format!("{} does not fit in u32", raw),
        })
    }
}

impl FromPropertyValue for f64 {
    const EXPECTED: &'static str = "Float";

    fn from_property_value(property: &str, value: &PropertyValue) -> MappingResult<Self> {
        value.as_float().ok_or_else(|| mismatch::<Self>(property, value))
    }
}

impl FromPropertyValue for bool {
    const EXPECTED: &'static str = "Boolean";

    fn from_property_value(property: &str, value: &PropertyValue) -> MappingResult<Self> {
        value
            .as_boolean()
            .ok_or_else(|| mismatch::<Self>(property, value))
    }
}

impl FromPropertyValue for Uuid {
    const EXPECTED: &'static str = "String";

    fn from_property_value(property: &str, value: &PropertyValue) -> MappingResult<Self> {
        let raw = String::from_property_value(property, value)?;
        Uuid::parse_str(&raw).map_err(|e| MappingError::InvalidValue {
            property: property.to_string(),
            message: e.to_string(),
        })
    }
}

impl FromPropertyValue for DateTime<Utc> {
    const EXPECTED: &'static str = "String";

    fn from_property_value(property: &str, value: &PropertyValue) -> MappingResult<Self> {
        let raw = String::from_property_value(property, value)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|e| MappingError::InvalidValue {
                property: property.to_string(),
                message: e.to_string(),
            })
    }
}

impl<T: FromPropertyValue> FromPropertyValue for Vec<T> {
    const EXPECTED: &'static str = "Array";

    fn from_property_value(property: &str, value: &PropertyValue) -> MappingResult<Self> {
        let items = value
            .as_array()
            .ok_or_else(|| mismatch::<Self>(property, value))?;
        items
            .iter()
            .map(|item| T::from_property_value(property, item))
            .collect()
    }
}

impl<T: FromPropertyValue> FromPropertyValue for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_property_value(property: &str, value: &PropertyValue) -> MappingResult<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_property_value(property, value).map(Some)
        }
    }
}

/// Read-only view over a property map with case-insensitive field lookup
#[derive(Debug, Clone, Copy)]
pub struct PropertyReader<'a> {
    properties: &'a PropertyMap,
}

impl<'a> PropertyReader<'a> {
    pub fn new(properties: &'a PropertyMap) -> Self {
        Self { properties }
    }

    /// Look up a field, preferring an exact match over a case-insensitive one
    pub fn lookup(&self, name: &str) -> Option<&'a PropertyValue> {
        self.properties.get(name).or_else(|| {
            self.properties
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value)
        })
    }

    /// Decode a field that must be present and non-null
    pub fn required<T: FromPropertyValue>(&self, name: &str) -> MappingResult<T> {
        match self.lookup(name) {
            Some(value) if !value.is_null() => T::from_property_value(name, value),
            _ => Err(MappingError::MissingProperty(name.to_string())),
        }
    }

    /// Decode a field that may be absent or null
    pub fn optional<T: FromPropertyValue>(&self, name: &str) -> MappingResult<Option<T>> {
        match self.lookup(name) {
            Some(value) if !value.is_null() => T::from_property_value(name, value).map(Some),
            _ => Ok(None),
        }
    }

    /// Decode a field, falling back to `default` when it is absent or null
    pub fn or_default<T: FromPropertyValue>(&self, name: &str, default: T) -> MappingResult<T> {
        Ok(self.optional(name)?.unwrap_or(default))
    }
}

/// Decode a projected entity column into `T`
pub fn decode_entity<T: FromProperties>(column: &str, value: &PropertyValue) -> MappingResult<T> {
    match value {
        PropertyValue::Map(map) => T::from_properties(map),
        _ => Err(MappingError::NotAMap(column.to_string())),
    }
}
