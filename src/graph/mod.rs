//! Property graph values and their typed mapping
//!
//! - Property values and maps exchanged with the store
//! - Label / relationship-type names
//! - Explicit codecs between domain types and property maps

pub mod mapper;
pub mod property;
pub mod types;

// Re-export main types
pub use mapper::{
    decode_entity, FromProperties, FromPropertyValue, MappingError, MappingResult,
    PropertyReader, ToProperties,
};
pub use property::{PropertyMap, PropertyValue};
pub use types::{Label, RelationshipType};
