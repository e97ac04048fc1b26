//! Oneof conflict management
//!
//! A oneof holds at most one struct option and at most one list option; all
//! other options are primitives, no two of which are joinable. Options are
//! stored without metadata and without nullability, which live on the node
//! that owns the oneof.

use tracing::debug;

use super::Melder;
use super::error::MeldError;
use super::lattice::is_joinable;
use crate::models::{Data, DataValue, OneOf};

impl Melder {
    /// Turn `dst` into a oneof holding its previous shape and `src`.
    pub(crate) fn record_conflict(&self, dst: &mut Data, src: Data) {
        debug!(
            dst = dst.kind_name(),
            src = src.kind_name(),
            "recording conflict as oneof"
        );
        dst.nullable = dst.nullable || src.nullable;

        let previous = Data {
            value: dst.take_value(),
            nullable: false,
            meta: None,
            example_values: std::mem::take(&mut dst.example_values),
        };
        let incoming = Data {
            nullable: false,
            meta: None,
            ..src
        };

        let options = [previous, incoming].into_iter().collect();
        dst.value = DataValue::OneOf(OneOf {
            options,
            potential_conflict: true,
        });
    }

    /// Meld every option of `src` into the oneof at `dst`, one at a time.
    pub(crate) fn meld_one_of(&self, dst: &mut Data, src: OneOf) -> Result<(), MeldError> {
        for option in src.options.values() {
            check_option(option)?;
        }
        if let DataValue::OneOf(dst_one_of) = &mut dst.value {
            dst_one_of.potential_conflict = dst_one_of.potential_conflict || src.potential_conflict;
        }
        for option in src.options {
            // A previous option may already have collapsed dst
            if matches!(dst.value, DataValue::OneOf(_)) {
                self.meld_one_of_variant(dst, option)?;
            } else {
                self.meld_into(dst, option)?;
            }
        }
        Ok(())
    }

    /// Insert one more shape into the oneof at `dst`.
    ///
    /// A struct or list is melded into the existing option of the same kind.
    /// A primitive absorbs every option it is joinable with. If only one
    /// option remains afterwards, the oneof collapses into a plain node.
    pub(crate) fn meld_one_of_variant(&self, dst: &mut Data, variant: Data) -> Result<(), MeldError> {
        check_option(&variant)?;

        let DataValue::OneOf(one_of) = &mut dst.value else {
            return self.meld_into(dst, variant);
        };

        let mut variant = Data {
            meta: None,
            ..variant
        };
        dst.nullable = dst.nullable || variant.nullable;
        variant.nullable = false;

        let merged = match &variant.value {
            DataValue::Struct(_) => {
                let existing = one_of
                    .options
                    .take_matching(|d| matches!(d.value, DataValue::Struct(_)));
                self.fold_options(existing, variant)?
            }
            DataValue::List(_) => {
                let existing = one_of
                    .options
                    .take_matching(|d| matches!(d.value, DataValue::List(_)));
                self.fold_options(existing, variant)?
            }
            DataValue::Primitive(_) => {
                let mut acc = variant;
                loop {
                    let joinable = one_of.options.take_matching(|d| match (&d.value, &acc.value) {
                        (DataValue::Primitive(option), DataValue::Primitive(incoming)) => {
                            is_joinable(option, incoming)
                        }
                        _ => false,
                    });
                    if joinable.is_empty() {
                        break;
                    }
                    for option in joinable {
                        self.meld_into(&mut acc, option)?;
                    }
                }
                acc
            }
            // Rejected by check_option
            DataValue::Optional(_) | DataValue::OneOf(_) => return Ok(()),
        };
        one_of.options.insert(merged);

        if one_of.options.len() == 1 {
            let sole = one_of.options.take_entries().into_iter().next();
            if let Some(sole) = sole {
                debug!(kind = sole.kind_name(), "collapsing single-option oneof");
                dst.value = sole.value;
                dst.nullable = dst.nullable || sole.nullable;
                dst.merge_example_values(sole.example_values);
            }
        }
        Ok(())
    }

    /// Meld existing same-kind options and the incoming variant into one.
    fn fold_options(&self, existing: Vec<Data>, variant: Data) -> Result<Data, MeldError> {
        let mut existing = existing.into_iter();
        let Some(mut acc) = existing.next() else {
            return Ok(variant);
        };
        for option in existing {
            self.meld_into(&mut acc, option)?;
        }
        self.meld_into(&mut acc, variant)?;
        Ok(acc)
    }
}

/// Options must be structs, lists or primitives
fn check_option(option: &Data) -> Result<(), MeldError> {
    match option.value {
        DataValue::Primitive(_) | DataValue::Struct(_) | DataValue::List(_) => Ok(()),
        DataValue::Optional(_) | DataValue::OneOf(_) => Err(MeldError::InvalidVariant {
            kind: option.kind_name(),
            context: "oneof",
        }),
    }
}
