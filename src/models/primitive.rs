//! Primitive leaf types of the schema IR

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Base type tag of a primitive value
///
/// Declaration order is significant: the type lattice normalizes pairs by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BaseType {
    Bool,
    Bytes,
    String,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Float,
    Double,
}

impl BaseType {
    /// Every base type, in declaration order
    pub const ALL: [BaseType; 9] = [
        BaseType::Bool,
        BaseType::Bytes,
        BaseType::String,
        BaseType::Int32,
        BaseType::Int64,
        BaseType::Uint32,
        BaseType::Uint64,
        BaseType::Float,
        BaseType::Double,
    ];

    /// Get the lowercase type name
    pub fn name(&self) -> &'static str {
        match self {
            BaseType::Bool => "bool",
            BaseType::Bytes => "bytes",
            BaseType::String => "string",
            BaseType::Int32 => "int32",
            BaseType::Int64 => "int64",
            BaseType::Uint32 => "uint32",
            BaseType::Uint64 => "uint64",
            BaseType::Float => "float",
            BaseType::Double => "double",
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Concrete payload of a primitive. Only reachable through [`PrimitiveValue`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) enum Scalar {
    Bool(bool),
    Bytes(Vec<u8>),
    String(String),
    Int32(i32),
    Int64(i64),
    Uint32(u32),
    Uint64(u64),
    Float(f32),
    Double(f64),
}

/// A primitive value observed in a witness
///
/// The representation is closed: values are built with [`PrimitiveValue::zero`]
/// or one of the `From` conversions, never by naming a variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrimitiveValue(Scalar);

impl PrimitiveValue {
    /// The zero value of a base type
    pub fn zero(base_type: BaseType) -> Self {
        let scalar = match base_type {
            BaseType::Bool => Scalar::Bool(false),
            BaseType::Bytes => Scalar::Bytes(Vec::new()),
            BaseType::String => Scalar::String(String::new()),
            BaseType::Int32 => Scalar::Int32(0),
            BaseType::Int64 => Scalar::Int64(0),
            BaseType::Uint32 => Scalar::Uint32(0),
            BaseType::Uint64 => Scalar::Uint64(0),
            BaseType::Float => Scalar::Float(0.0),
            BaseType::Double => Scalar::Double(0.0),
        };
        Self(scalar)
    }

    /// Base type of this value
    pub fn base_type(&self) -> BaseType {
        match self.0 {
            Scalar::Bool(_) => BaseType::Bool,
            Scalar::Bytes(_) => BaseType::Bytes,
            Scalar::String(_) => BaseType::String,
            Scalar::Int32(_) => BaseType::Int32,
            Scalar::Int64(_) => BaseType::Int64,
            Scalar::Uint32(_) => BaseType::Uint32,
            Scalar::Uint64(_) => BaseType::Uint64,
            Scalar::Float(_) => BaseType::Float,
            Scalar::Double(_) => BaseType::Double,
        }
    }

    /// Whether this is the zero value of its base type
    pub fn is_zero(&self) -> bool {
        *self == Self::zero(self.base_type())
    }

    /// Convert to a wider base type along an edge of the type lattice.
    ///
    /// Returns `None` when `target` is not reachable from this value's type.
    pub fn widen(&self, target: BaseType) -> Option<PrimitiveValue> {
        if self.base_type() == target {
            return Some(self.clone());
        }
        let scalar = match (&self.0, target) {
            (Scalar::Int32(v), BaseType::Int64) => Scalar::Int64(i64::from(*v)),
            (Scalar::Int32(v), BaseType::Float) => Scalar::Float(*v as f32),
            (Scalar::Int32(v), BaseType::Double) => Scalar::Double(f64::from(*v)),
            (Scalar::Uint32(v), BaseType::Int64) => Scalar::Int64(i64::from(*v)),
            (Scalar::Uint32(v), BaseType::Uint64) => Scalar::Uint64(u64::from(*v)),
            (Scalar::Uint32(v), BaseType::Float) => Scalar::Float(*v as f32),
            (Scalar::Uint32(v), BaseType::Double) => Scalar::Double(f64::from(*v)),
            (Scalar::Int64(v), BaseType::Double) => Scalar::Double(*v as f64),
            (Scalar::Uint64(v), BaseType::Double) => Scalar::Double(*v as f64),
            (Scalar::Float(v), BaseType::Double) => Scalar::Double(f64::from(*v)),
            _ => return None,
        };
        Some(Self(scalar))
    }

    pub(crate) fn scalar(&self) -> &Scalar {
        &self.0
    }
}

impl fmt::Display for PrimitiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Scalar::Bool(v) => write!(f, "{v}"),
            Scalar::Bytes(v) => {
                for b in v {
                    write!(f, "{b:02x}")?;
                }
                Ok(())
            }
            Scalar::String(v) => f.write_str(v),
            Scalar::Int32(v) => write!(f, "{v}"),
            Scalar::Int64(v) => write!(f, "{v}"),
            Scalar::Uint32(v) => write!(f, "{v}"),
            Scalar::Uint64(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Double(v) => write!(f, "{v}"),
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for PrimitiveValue {
                fn from(v: $ty) -> Self {
                    Self(Scalar::$variant(v))
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool,
    Vec<u8> => Bytes,
    String => String,
    i32 => Int32,
    i64 => Int64,
    u32 => Uint32,
    u64 => Uint64,
    f32 => Float,
    f64 => Double,
}

impl From<&str> for PrimitiveValue {
    fn from(v: &str) -> Self {
        Self(Scalar::String(v.to_string()))
    }
}

/// A primitive node: a typed value plus format metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Primitive {
    pub value: PrimitiveValue,
    /// Semantic category of the detected formats, e.g. `datetime`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub format_kind: String,
    /// Specific formats detected within `format_kind`
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub formats: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub type_hint: String,
}

impl Primitive {
    /// Create a primitive carrying an observed value
    pub fn new(value: impl Into<PrimitiveValue>) -> Self {
        Self {
            value: value.into(),
            format_kind: String::new(),
            formats: BTreeSet::new(),
            type_hint: String::new(),
        }
    }

    /// Create a value-less primitive of the given type
    pub fn of_type(base_type: BaseType) -> Self {
        Self::new(PrimitiveValue::zero(base_type))
    }

    /// Tag with a format, setting the format kind
    pub fn with_format(mut self, kind: impl Into<String>, format: impl Into<String>) -> Self {
        self.format_kind = kind.into();
        self.formats.insert(format.into());
        self
    }

    pub fn with_type_hint(mut self, hint: impl Into<String>) -> Self {
        self.type_hint = hint.into();
        self
    }

    pub fn base_type(&self) -> BaseType {
        self.value.base_type()
    }
}
