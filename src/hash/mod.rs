//! Canonical hashing engine
//!
//! Produces a deterministic digest for any schema node. The digest is
//! independent of map iteration order, ignores example values, and treats
//! default-valued fields as absent, so structurally equal nodes always hash
//! identically. It serves both as an equality test and as the key under
//! which oneof options and top-level fields are stored.

mod content_map;
mod ir;
pub mod objecthash;

pub use content_map::ContentAddressedMap;
pub use ir::{hash_data, hash_data_meta, hash_data_to_string, hash_primitive};
pub use objecthash::Hash;
