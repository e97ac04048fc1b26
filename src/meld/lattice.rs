//! Type lattice for primitive values
//!
//! | a | b | join(a, b) |
//! |---|---|---|
//! | T | T | T |
//! | int32 | int64, uint32 | int64 |
//! | uint32 | int64 | int64 |
//! | uint32 | uint64 | uint64 |
//! | int32, uint32 | float | float |
//! | int64, uint64 | float | double |
//! | any numeric | double | double |
//! | int64 | uint64 | none |
//! | int32 | uint64 | none |
//! | bool, bytes, string | anything else | none |
//!
//! A missing join means the two observations conflict and must be recorded
//! in a oneof.

use std::collections::BTreeSet;

use crate::models::{BaseType, Primitive, PrimitiveValue};

/// Join two base types, or `None` if they are irreconcilable
pub fn join_base_types(a: BaseType, b: BaseType) -> Option<BaseType> {
    use BaseType::*;

    if a == b {
        return Some(a);
    }
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    match (lo, hi) {
        (Int32, Int64) | (Int32, Uint32) | (Int64, Uint32) => Some(Int64),
        (Uint32, Uint64) => Some(Uint64),
        (Int32, Float) | (Uint32, Float) => Some(Float),
        (Int64, Float) | (Uint64, Float) => Some(Double),
        (Int32 | Int64 | Uint32 | Uint64 | Float, Double) => Some(Double),
        _ => None,
    }
}

/// Join two primitives, including their format metadata.
///
/// Fails when the base types do not join, or when both sides carry
/// different non-empty format kinds.
pub fn join_primitives(dst: &Primitive, src: &Primitive) -> Option<Primitive> {
    let base_type = join_base_types(dst.base_type(), src.base_type())?;

    // An unformatted side subsumes the formatted one
    let (format_kind, formats) = if dst.format_kind.is_empty() || src.format_kind.is_empty() {
        (String::new(), BTreeSet::new())
    } else if dst.format_kind == src.format_kind {
        let formats = dst.formats.union(&src.formats).cloned().collect();
        (dst.format_kind.clone(), formats)
    } else {
        return None;
    };

    let type_hint = if dst.type_hint.is_empty() {
        src.type_hint.clone()
    } else {
        dst.type_hint.clone()
    };

    Some(Primitive {
        value: join_values(&dst.value, &src.value, base_type),
        format_kind,
        formats,
        type_hint,
    })
}

/// Whether two primitives can be melded without a conflict
pub fn is_joinable(a: &Primitive, b: &Primitive) -> bool {
    join_primitives(a, b).is_some()
}

/// Keep the observed value only when both sides agree on it
fn join_values(a: &PrimitiveValue, b: &PrimitiveValue, base_type: BaseType) -> PrimitiveValue {
    match (a.widen(base_type), b.widen(base_type)) {
        (Some(a), Some(b)) if a == b => a,
        _ => PrimitiveValue::zero(base_type),
    }
}
