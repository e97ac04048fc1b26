//! Schema IR types
//!
//! - [`Data`] - a schema node with nullability, metadata and examples
//! - [`Primitive`] / [`PrimitiveValue`] - typed leaves
//! - [`DataMeta`] - HTTP position of a top-level field
//! - [`Method`] - argument and response maps of one endpoint

pub mod data;
pub mod meta;
pub mod method;
pub mod primitive;

pub use data::{
    Data, DataValue, ExampleValue, List, MAX_EXAMPLE_VALUES, MapData, OneOf, Optional, Struct,
};
pub use meta::{DataMeta, HttpLocation, HttpMeta};
pub use method::{Method, MethodMeta};
pub use primitive::{BaseType, Primitive, PrimitiveValue};
