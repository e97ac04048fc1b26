//! The schema tree
//!
//! A [`Data`] node describes the shape of one value. Witness trees and the
//! accumulated spec use the same representation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::meta::DataMeta;
use super::primitive::{BaseType, Primitive};
use crate::hash::ContentAddressedMap;

/// Maximum number of example values retained per node
pub const MAX_EXAMPLE_VALUES: usize = 2;

/// One observed example of a value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleValue {
    pub value: String,
}

impl ExampleValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// A schema node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Data {
    pub value: DataValue,
    /// The value may be the null literal
    #[serde(default, skip_serializing_if = "is_false")]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<DataMeta>,
    /// Examples keyed by example key; never part of the node's identity
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub example_values: BTreeMap<String, ExampleValue>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// The shape carried by a [`Data`] node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataValue {
    Primitive(Primitive),
    Struct(Struct),
    List(List),
    Optional(Optional),
    OneOf(OneOf),
}

/// A record, or a homogeneous map when `map_type` is set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Struct {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Data>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_type: Option<MapData>,
}

/// Key and value types of a struct inferred to be a map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Box<Data>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Box<Data>>,
}

/// A list; once melded, it holds a single representative element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub elems: Vec<Data>,
}

/// A field that may be absent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Optional {
    Data(Box<Data>),
    /// Observed without a value; contributes only nullability
    None,
}

/// Incompatible shapes observed for one field, keyed by content hash
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OneOf {
    pub options: ContentAddressedMap,
    /// Created from conflicting observations rather than declared
    #[serde(default)]
    pub potential_conflict: bool,
}

impl Data {
    /// Create a node with no metadata, examples or nullability
    pub fn new(value: DataValue) -> Self {
        Self {
            value,
            nullable: false,
            meta: None,
            example_values: BTreeMap::new(),
        }
    }

    pub fn primitive(primitive: Primitive) -> Self {
        Self::new(DataValue::Primitive(primitive))
    }

    /// A value-less primitive of `base_type`
    pub fn of_type(base_type: BaseType) -> Self {
        Self::primitive(Primitive::of_type(base_type))
    }

    pub fn structure<K: Into<String>>(fields: impl IntoIterator<Item = (K, Data)>) -> Self {
        let fields = fields.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self::new(DataValue::Struct(Struct {
            fields,
            map_type: None,
        }))
    }

    pub fn list(elems: Vec<Data>) -> Self {
        Self::new(DataValue::List(List { elems }))
    }

    /// `Optional` wrapping `inner`
    pub fn optional(inner: Data) -> Self {
        Self::new(DataValue::Optional(Optional::Data(Box::new(inner))))
    }

    /// `Optional` wrapping the none marker, i.e. an observed null
    pub fn none() -> Self {
        Self::new(DataValue::Optional(Optional::None))
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_meta(mut self, meta: DataMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn with_example(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.example_values
            .insert(key.into(), ExampleValue::new(value));
        self
    }

    /// Short name of the node's variant, for diagnostics
    pub fn kind_name(&self) -> &'static str {
        self.value.kind_name()
    }

    pub fn is_optional(&self) -> bool {
        matches!(self.value, DataValue::Optional(_))
    }

    /// Move the value out, leaving an `Optional::None` placeholder behind
    pub(crate) fn take_value(&mut self) -> DataValue {
        std::mem::replace(&mut self.value, DataValue::Optional(Optional::None))
    }

    /// Clone of this node without metadata, as stored in a oneof
    pub fn strip_meta(&self) -> Data {
        Data {
            meta: None,
            ..self.clone()
        }
    }

    /// Wrap this node in an `Optional` layer unless it already is one.
    ///
    /// Metadata and nullability move to the new outer node.
    pub fn make_optional(&mut self) {
        if self.is_optional() {
            return;
        }
        let inner = Data {
            value: self.take_value(),
            nullable: false,
            meta: None,
            example_values: std::mem::take(&mut self.example_values),
        };
        self.value = DataValue::Optional(Optional::Data(Box::new(inner)));
    }

    /// Merge example values, keeping the lexicographically smallest keys.
    pub fn merge_example_values(&mut self, other: BTreeMap<String, ExampleValue>) {
        for (key, example) in other {
            self.example_values.entry(key).or_insert(example);
        }
        while self.example_values.len() > MAX_EXAMPLE_VALUES {
            self.example_values.pop_last();
        }
    }
}

impl DataValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            DataValue::Primitive(_) => "primitive",
            DataValue::Struct(s) if s.is_map() => "map",
            DataValue::Struct(_) => "struct",
            DataValue::List(_) => "list",
            DataValue::Optional(_) => "optional",
            DataValue::OneOf(_) => "oneof",
        }
    }
}

impl From<Primitive> for Data {
    fn from(primitive: Primitive) -> Self {
        Data::primitive(primitive)
    }
}

impl Struct {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this struct has been converted to a map representation
    pub fn is_map(&self) -> bool {
        self.map_type.is_some()
    }

    pub fn with_field(mut self, name: impl Into<String>, data: Data) -> Self {
        self.fields.insert(name.into(), data);
        self
    }
}
