//! Canonical hashing of schema IR nodes
//!
//! Each node hashes as a message whose fields are numbered below. Example
//! values are never hashed, and default-valued fields are omitted.

use super::objecthash::{Hash, MessageHasher, hash_dict, hash_list, hash_set, hash_str};
use crate::models::primitive::Scalar;
use crate::models::{
    Data, DataMeta, DataValue, HttpLocation, HttpMeta, List, MapData, OneOf, Optional, Primitive,
    Struct,
};

mod field {
    // Data
    pub const PRIMITIVE: u32 = 1;
    pub const STRUCT: u32 = 2;
    pub const LIST: u32 = 3;
    pub const OPTIONAL: u32 = 4;
    pub const ONE_OF: u32 = 5;
    pub const META: u32 = 6;
    pub const NULLABLE: u32 = 7;

    // Primitive
    pub const TYPE_HINT: u32 = 1;
    pub const FORMAT_KIND: u32 = 2;
    pub const FORMATS: u32 = 3;
    pub const BOOL_VALUE: u32 = 4;
    pub const BYTES_VALUE: u32 = 5;
    pub const STRING_VALUE: u32 = 6;
    pub const INT32_VALUE: u32 = 7;
    pub const INT64_VALUE: u32 = 8;
    pub const UINT32_VALUE: u32 = 9;
    pub const UINT64_VALUE: u32 = 10;
    pub const FLOAT_VALUE: u32 = 11;
    pub const DOUBLE_VALUE: u32 = 12;
    pub const VALUE: u32 = 1;

    // Struct
    pub const FIELDS: u32 = 1;
    pub const MAP_TYPE: u32 = 2;
    pub const MAP_KEY: u32 = 1;
    pub const MAP_VALUE: u32 = 2;

    // List
    pub const ELEMS: u32 = 1;

    // Optional
    pub const OPTIONAL_DATA: u32 = 1;
    pub const OPTIONAL_NONE: u32 = 2;

    // OneOf
    pub const OPTIONS: u32 = 1;
    pub const POTENTIAL_CONFLICT: u32 = 2;

    // DataMeta
    pub const HTTP: u32 = 1;

    // HttpMeta
    pub const PATH: u32 = 1;
    pub const QUERY: u32 = 2;
    pub const HEADER: u32 = 3;
    pub const COOKIE: u32 = 4;
    pub const BODY: u32 = 5;
    pub const AUTH: u32 = 6;
    pub const EMPTY: u32 = 7;
    pub const RESPONSE_CODE: u32 = 8;
    pub const LOCATION_KEY: u32 = 1;
}

/// Canonical hash of a schema node
pub fn hash_data(data: &Data) -> Hash {
    let mut msg = MessageHasher::new();
    match &data.value {
        DataValue::Primitive(p) => msg.field(field::PRIMITIVE, hash_primitive(p)),
        DataValue::Struct(s) => msg.field(field::STRUCT, hash_struct(s)),
        DataValue::List(l) => msg.field(field::LIST, hash_list_node(l)),
        DataValue::Optional(o) => msg.field(field::OPTIONAL, hash_optional(o)),
        DataValue::OneOf(o) => msg.field(field::ONE_OF, hash_one_of(o)),
    };
    if let Some(meta) = &data.meta {
        msg.field(field::META, hash_data_meta(meta));
    }
    msg.bool_field(field::NULLABLE, data.nullable);
    msg.finish()
}

/// Printable canonical hash, used as a map key and equality token
pub fn hash_data_to_string(data: &Data) -> String {
    hash_data(data).to_hex()
}

pub fn hash_primitive(primitive: &Primitive) -> Hash {
    let mut msg = MessageHasher::new();
    msg.str_field(field::TYPE_HINT, &primitive.type_hint)
        .str_field(field::FORMAT_KIND, &primitive.format_kind);
    if !primitive.formats.is_empty() {
        msg.field(
            field::FORMATS,
            hash_set(primitive.formats.iter().map(|f| hash_str(f))),
        );
    }

    // The variant is always present, even when its payload is the zero value
    let mut value = MessageHasher::new();
    let index = match primitive.value.scalar() {
        Scalar::Bool(v) => {
            value.bool_field(field::VALUE, *v);
            field::BOOL_VALUE
        }
        Scalar::Bytes(v) => {
            value.bytes_field(field::VALUE, v);
            field::BYTES_VALUE
        }
        Scalar::String(v) => {
            value.str_field(field::VALUE, v);
            field::STRING_VALUE
        }
        Scalar::Int32(v) => {
            value.int_field(field::VALUE, i64::from(*v));
            field::INT32_VALUE
        }
        Scalar::Int64(v) => {
            value.int_field(field::VALUE, *v);
            field::INT64_VALUE
        }
        Scalar::Uint32(v) => {
            value.uint_field(field::VALUE, u64::from(*v));
            field::UINT32_VALUE
        }
        Scalar::Uint64(v) => {
            value.uint_field(field::VALUE, *v);
            field::UINT64_VALUE
        }
        Scalar::Float(v) => {
            value.float_field(field::VALUE, f64::from(*v));
            field::FLOAT_VALUE
        }
        Scalar::Double(v) => {
            value.float_field(field::VALUE, *v);
            field::DOUBLE_VALUE
        }
    };
    msg.field(index, value.finish());
    msg.finish()
}

fn hash_struct(s: &Struct) -> Hash {
    let mut msg = MessageHasher::new();
    if !s.fields.is_empty() {
        let entries = s
            .fields
            .iter()
            .map(|(name, data)| (hash_str(name), hash_data(data)));
        msg.field(field::FIELDS, hash_dict(entries));
    }
    if let Some(map) = &s.map_type {
        msg.field(field::MAP_TYPE, hash_map_data(map));
    }
    msg.finish()
}

fn hash_map_data(map: &MapData) -> Hash {
    let mut msg = MessageHasher::new();
    if let Some(key) = &map.key {
        msg.field(field::MAP_KEY, hash_data(key));
    }
    if let Some(value) = &map.value {
        msg.field(field::MAP_VALUE, hash_data(value));
    }
    msg.finish()
}

fn hash_list_node(l: &List) -> Hash {
    let mut msg = MessageHasher::new();
    if !l.elems.is_empty() {
        msg.field(field::ELEMS, hash_list(l.elems.iter().map(hash_data)));
    }
    msg.finish()
}

fn hash_optional(o: &Optional) -> Hash {
    let mut msg = MessageHasher::new();
    match o {
        Optional::Data(inner) => msg.field(field::OPTIONAL_DATA, hash_data(inner)),
        Optional::None => msg.field(field::OPTIONAL_NONE, MessageHasher::new().finish()),
    };
    msg.finish()
}

fn hash_one_of(o: &OneOf) -> Hash {
    let mut msg = MessageHasher::new();
    if !o.options.is_empty() {
        // Hash the values, not the stored keys, so a stale key cannot leak in
        msg.field(field::OPTIONS, hash_set(o.options.values().map(hash_data)));
    }
    msg.bool_field(field::POTENTIAL_CONFLICT, o.potential_conflict);
    msg.finish()
}

/// Hash of a field's metadata alone
pub fn hash_data_meta(meta: &DataMeta) -> Hash {
    let mut msg = MessageHasher::new();
    if let Some(http) = &meta.http {
        msg.field(field::HTTP, hash_http_meta(http));
    }
    msg.finish()
}

fn hash_http_meta(http: &HttpMeta) -> Hash {
    let mut location = MessageHasher::new();
    let index = match &http.location {
        HttpLocation::Path { key } => {
            location.str_field(field::LOCATION_KEY, key);
            field::PATH
        }
        HttpLocation::Query { key } => {
            location.str_field(field::LOCATION_KEY, key);
            field::QUERY
        }
        HttpLocation::Header { key } => {
            location.str_field(field::LOCATION_KEY, key);
            field::HEADER
        }
        HttpLocation::Cookie { key } => {
            location.str_field(field::LOCATION_KEY, key);
            field::COOKIE
        }
        HttpLocation::Body { content_type } => {
            location.str_field(field::LOCATION_KEY, content_type);
            field::BODY
        }
        HttpLocation::Auth { scheme } => {
            location.str_field(field::LOCATION_KEY, scheme);
            field::AUTH
        }
        HttpLocation::Empty => field::EMPTY,
    };

    let mut msg = MessageHasher::new();
    msg.field(index, location.finish())
        .int_field(field::RESPONSE_CODE, i64::from(http.response_code));
    msg.finish()
}
