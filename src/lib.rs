//! Spec Meld - Merges schema trees observed across API witnesses
//!
//! Provides:
//! - Schema tree types (primitives, structs, maps, lists, optionals, oneofs)
//! - Canonical content hashing and hash-keyed storage
//! - Melding of two trees into the least general common schema
//! - Top-level accumulation of method arguments and responses
//! - Postorder tree passes (rehashing, map inference)

pub mod hash;
pub mod meld;
pub mod models;
pub mod visitor;

// Re-export commonly used types
pub use hash::{ContentAddressedMap, Hash, hash_data, hash_data_to_string};
pub use meld::{
    MapInferenceThresholds, MeldError, MeldOptions, MeldStats, Melder, meld_data,
    meld_top_level_data_map, struct_should_be_map,
};
pub use models::{
    BaseType, Data, DataMeta, DataValue, HttpLocation, HttpMeta, List, MapData, Method,
    MethodMeta, OneOf, Optional, Primitive, PrimitiveValue, Struct,
};
pub use visitor::{DataVisitor, apply, infer_maps, rewrite_hash_keys, rewrite_method_hash_keys};
