//! Tagged SHA-256 hashing of scalars and containers
//!
//! Every value is hashed as `sha256(tag || payload)`, where the one-byte tag
//! separates domains (so the integer `1` and the string `"1"` never collide).
//! Containers hash the digests of their children; unordered containers sort
//! those digests first so the result is independent of iteration order.

use std::fmt;

use sha2::digest::Output;
use sha2::{Digest, Sha256};

const BOOL_TAG: u8 = b'b';
const INT_TAG: u8 = b'i';
const FLOAT_TAG: u8 = b'f';
const UNICODE_TAG: u8 = b'u';
const RAW_TAG: u8 = b'r';
const LIST_TAG: u8 = b'l';
const DICT_TAG: u8 = b'd';
const SET_TAG: u8 = b's';

/// A 256-bit content digest
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, std::hash::Hash)]
pub struct Hash(Output<Sha256>);

impl Hash {
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// Lowercase hex form, used as a map key
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({self})")
    }
}

fn digest(tag: u8, parts: &[&[u8]]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update([tag]);
    for part in parts {
        hasher.update(part);
    }
    Hash(hasher.finalize())
}

pub fn hash_bool(v: bool) -> Hash {
    let bit: &[u8] = if v { b"1" } else { b"0" };
    digest(BOOL_TAG, &[bit])
}

pub fn hash_int(v: i64) -> Hash {
    digest(INT_TAG, &[v.to_string().as_bytes()])
}

pub fn hash_uint(v: u64) -> Hash {
    digest(INT_TAG, &[v.to_string().as_bytes()])
}

pub fn hash_float(v: f64) -> Hash {
    digest(FLOAT_TAG, &[normalize_float(v).as_bytes()])
}

pub fn hash_str(v: &str) -> Hash {
    digest(UNICODE_TAG, &[v.as_bytes()])
}

pub fn hash_bytes(v: &[u8]) -> Hash {
    digest(RAW_TAG, &[v])
}

/// Ordered sequence
pub fn hash_list(items: impl IntoIterator<Item = Hash>) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update([LIST_TAG]);
    for item in items {
        hasher.update(item.0);
    }
    Hash(hasher.finalize())
}

/// Unordered collection: length prefix, then sorted member digests
pub fn hash_set(items: impl IntoIterator<Item = Hash>) -> Hash {
    let mut items: Vec<Hash> = items.into_iter().collect();
    items.sort_unstable();
    let len = (items.len() as u64).to_be_bytes();
    let concat: Vec<u8> = items.iter().flat_map(|h| h.0).collect();
    digest(SET_TAG, &[len.as_slice(), concat.as_slice()])
}

/// Key/value map: length prefix, then sorted `key || value` digest pairs
pub fn hash_dict(entries: impl IntoIterator<Item = (Hash, Hash)>) -> Hash {
    let mut entries: Vec<(Hash, Hash)> = entries.into_iter().collect();
    entries.sort_unstable();
    let len = (entries.len() as u64).to_be_bytes();
    let concat: Vec<u8> = entries
        .iter()
        .flat_map(|(k, v)| k.0.into_iter().chain(v.0))
        .collect();
    digest(DICT_TAG, &[len.as_slice(), concat.as_slice()])
}

/// Textual float form: sign, binary exponent, then mantissa bits.
///
/// Equal values always normalize identically, including `0.0` and `-0.0`.
pub fn normalize_float(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if v == 0.0 {
        return "+0:".to_string();
    }

    let mut out = String::new();
    let mut f = v;
    if f < 0.0 {
        out.push('-');
        f = -f;
    } else {
        out.push('+');
    }

    let mut exponent = 0i32;
    while f > 1.0 {
        f /= 2.0;
        exponent += 1;
    }
    while f <= 0.5 {
        f *= 2.0;
        exponent -= 1;
    }
    out.push_str(&exponent.to_string());
    out.push(':');

    // f is now in (0.5, 1]; emit bits until the mantissa is exhausted
    while f != 0.0 {
        if f >= 1.0 {
            out.push('1');
            f -= 1.0;
        } else {
            out.push('0');
        }
        f *= 2.0;
    }
    out
}

/// Builds the digest of a message-like record
///
/// Each non-default field contributes `hash(field index) || hash(value)`;
/// the pairs are sorted, so field order does not matter. Default values are
/// skipped, which makes "set to default" and "absent" hash the same.
#[derive(Debug, Default)]
pub struct MessageHasher {
    fields: Vec<(Hash, Hash)>,
}

impl MessageHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field unconditionally
    pub fn field(&mut self, index: u32, value: Hash) -> &mut Self {
        self.fields.push((hash_uint(u64::from(index)), value));
        self
    }

    pub fn bool_field(&mut self, index: u32, value: bool) -> &mut Self {
        if value {
            self.field(index, hash_bool(value));
        }
        self
    }

    pub fn int_field(&mut self, index: u32, value: i64) -> &mut Self {
        if value != 0 {
            self.field(index, hash_int(value));
        }
        self
    }

    pub fn uint_field(&mut self, index: u32, value: u64) -> &mut Self {
        if value != 0 {
            self.field(index, hash_uint(value));
        }
        self
    }

    pub fn float_field(&mut self, index: u32, value: f64) -> &mut Self {
        if value != 0.0 {
            self.field(index, hash_float(value));
        }
        self
    }

    pub fn str_field(&mut self, index: u32, value: &str) -> &mut Self {
        if !value.is_empty() {
            self.field(index, hash_str(value));
        }
        self
    }

    pub fn bytes_field(&mut self, index: u32, value: &[u8]) -> &mut Self {
        if !value.is_empty() {
            self.field(index, hash_bytes(value));
        }
        self
    }

    pub fn finish(&mut self) -> Hash {
        self.fields.sort_unstable();
        let concat: Vec<u8> = self
            .fields
            .iter()
            .flat_map(|(k, v)| k.0.into_iter().chain(v.0))
            .collect();
        digest(DICT_TAG, &[concat.as_slice()])
    }
}
