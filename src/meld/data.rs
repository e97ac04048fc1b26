//! Top-level dispatch for melding two schema nodes

use tracing::trace;

use super::Melder;
use super::error::MeldError;
use super::lattice::join_primitives;
use crate::models::{Data, DataValue, Optional};

impl Melder {
    /// Meld `src` into `dst`.
    ///
    /// On error `dst` is left exactly as it was before the call.
    pub fn meld_data(&self, dst: &mut Data, src: Data) -> Result<(), MeldError> {
        let mut work = dst.clone();
        self.meld_into(&mut work, src)?;
        *dst = work;
        Ok(())
    }

    /// In-place meld. Leaves `dst` partially updated on error; callers that
    /// need atomicity go through [`Melder::meld_data`].
    pub(crate) fn meld_into(&self, dst: &mut Data, src: Data) -> Result<(), MeldError> {
        let Data {
            value: src_value,
            nullable: src_nullable,
            meta: _,
            example_values,
        } = src;

        dst.nullable = dst.nullable || src_nullable;

        // A oneof always ends up on the destination side.
        let src_value = match src_value {
            DataValue::OneOf(src_one_of) => {
                if matches!(dst.value, DataValue::OneOf(_)) {
                    dst.merge_example_values(example_values);
                    return self.meld_one_of(dst, src_one_of);
                }
                trace!(kind = dst.kind_name(), "swapping oneof into destination");
                let previous = Data {
                    value: std::mem::replace(&mut dst.value, DataValue::OneOf(src_one_of)),
                    nullable: false,
                    meta: None,
                    example_values: std::mem::take(&mut dst.example_values),
                };
                dst.merge_example_values(example_values);
                return self.meld_into(dst, previous);
            }
            other => other,
        };

        let src_value = match src_value {
            DataValue::Optional(Optional::None) => {
                dst.nullable = true;
                dst.merge_example_values(example_values);
                return Ok(());
            }
            DataValue::Optional(Optional::Data(inner)) => {
                self.meld_into(dst, *inner)?;
                dst.make_optional();
                dst.merge_example_values(example_values);
                return Ok(());
            }
            other => other,
        };

        let src = Data {
            value: src_value,
            nullable: false,
            meta: None,
            example_values,
        };

        match &mut dst.value {
            DataValue::Struct(dst_struct) => match src.value {
                DataValue::Struct(src_struct) => {
                    self.meld_struct(dst_struct, src_struct)?;
                    dst.merge_example_values(src.example_values);
                }
                _ => self.record_conflict(dst, src),
            },
            DataValue::List(dst_list) => match src.value {
                DataValue::List(src_list) => {
                    self.meld_list(dst_list, src_list)?;
                    dst.merge_example_values(src.example_values);
                }
                _ => self.record_conflict(dst, src),
            },
            DataValue::Optional(Optional::Data(inner)) => {
                if inner.is_optional() {
                    return Err(MeldError::InvalidVariant {
                        kind: "optional",
                        context: "optional",
                    });
                }
                self.meld_into(inner, src)?;
                // Nullability lives on the outermost node
                dst.nullable = dst.nullable || inner.nullable;
                inner.nullable = false;
            }
            DataValue::Optional(Optional::None) => {
                // The none marker carries no type; the source becomes the interior.
                dst.value = DataValue::Optional(Optional::Data(Box::new(src)));
                dst.nullable = true;
            }
            DataValue::OneOf(_) => return self.meld_one_of_variant(dst, src),
            DataValue::Primitive(dst_primitive) => match &src.value {
                DataValue::Primitive(src_primitive) => {
                    match join_primitives(dst_primitive, src_primitive) {
                        Some(joined) => {
                            *dst_primitive = joined;
                            dst.merge_example_values(src.example_values);
                        }
                        None => self.record_conflict(dst, src),
                    }
                }
                _ => self.record_conflict(dst, src),
            },
        }
        Ok(())
    }
}
