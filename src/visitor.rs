//! Postorder traversal over schema trees
//!
//! [`apply`] visits every node after its children. Oneof options are visited
//! through [`ContentAddressedMap::update_all`], so every oneof is re-keyed on
//! the way out and hash keys stay in sync with any change a visitor makes.

use tracing::debug;

use crate::hash::ContentAddressedMap;
use crate::meld::{MeldError, Melder};
use crate::models::{Data, DataValue, Method, Optional};

/// Callback invoked on each node once its children have been visited
pub trait DataVisitor {
    fn leave_data(&mut self, _data: &mut Data) -> Result<(), MeldError> {
        Ok(())
    }
}

/// Walk `data` depth-first, calling `visitor` on every node in postorder.
pub fn apply<V: DataVisitor + ?Sized>(visitor: &mut V, data: &mut Data) -> Result<(), MeldError> {
    match &mut data.value {
        DataValue::Primitive(_) | DataValue::Optional(Optional::None) => {}
        DataValue::Struct(s) => {
            for (name, field) in s.fields.iter_mut() {
                apply(visitor, field).map_err(|e| e.in_field(name.as_str()))?;
            }
            if let Some(map) = &mut s.map_type {
                if let Some(key) = map.key.as_deref_mut() {
                    apply(visitor, key).map_err(|e| e.in_field("<map key>"))?;
                }
                if let Some(value) = map.value.as_deref_mut() {
                    apply(visitor, value).map_err(|e| e.in_field("<map value>"))?;
                }
            }
        }
        DataValue::List(list) => {
            for (index, elem) in list.elems.iter_mut().enumerate() {
                apply(visitor, elem).map_err(|e| e.at_index(index))?;
            }
        }
        DataValue::Optional(Optional::Data(inner)) => apply(visitor, inner)?,
        DataValue::OneOf(one_of) => one_of.options.update_all(|option| apply(visitor, option))?,
    }
    visitor.leave_data(data)
}

/// Apply `visitor` to every entry of a top-level map, re-keying it afterwards
pub fn apply_to_map<V: DataVisitor + ?Sized>(
    visitor: &mut V,
    map: &mut ContentAddressedMap,
) -> Result<(), MeldError> {
    map.update_all(|data| apply(visitor, data))
}

struct KeyRewriter;

impl DataVisitor for KeyRewriter {}

/// Recompute every hash-keyed map inside `data`.
pub fn rewrite_hash_keys(data: &mut Data) -> Result<(), MeldError> {
    apply(&mut KeyRewriter, data)
}

/// Recompute every hash-keyed map of a method, including its top-level maps.
pub fn rewrite_method_hash_keys(method: &mut Method) -> Result<(), MeldError> {
    apply_to_map(&mut KeyRewriter, &mut method.args)?;
    apply_to_map(&mut KeyRewriter, &mut method.responses)
}

struct MapInference<'a> {
    melder: &'a Melder,
    converted: usize,
}

impl DataVisitor for MapInference<'_> {
    fn leave_data(&mut self, data: &mut Data) -> Result<(), MeldError> {
        if let DataValue::Struct(s) = &mut data.value {
            if self.melder.struct_should_be_map(s) {
                self.melder.struct_to_map(s)?;
                self.converted += 1;
            }
        }
        Ok(())
    }
}

/// Convert every struct in `data` that should be a map, innermost first.
///
/// Returns the number of structs converted.
pub fn infer_maps(data: &mut Data, melder: &Melder) -> Result<usize, MeldError> {
    let mut pass = MapInference {
        melder,
        converted: 0,
    };
    apply(&mut pass, data)?;
    if pass.converted > 0 {
        debug!(converted = pass.converted, "inferred maps");
    }
    Ok(pass.converted)
}

/// [`infer_maps`] over the arguments and responses of a method
pub fn infer_method_maps(method: &mut Method, melder: &Melder) -> Result<usize, MeldError> {
    let mut pass = MapInference {
        melder,
        converted: 0,
    };
    apply_to_map(&mut pass, &mut method.args)?;
    apply_to_map(&mut pass, &mut method.responses)?;
    Ok(pass.converted)
}
