//! Struct and map melding

use tracing::{debug, trace};

use super::Melder;
use super::error::MeldError;
use crate::models::{BaseType, Data, DataValue, MapData, Optional, Struct};

impl Melder {
    /// Meld two structs field by field.
    ///
    /// Fields missing on either side become optional. If either side is
    /// already a map, both are normalized to maps first.
    pub(crate) fn meld_struct(&self, dst: &mut Struct, mut src: Struct) -> Result<(), MeldError> {
        if dst.is_map() || src.is_map() {
            if !dst.is_map() {
                self.struct_to_map(dst)?;
            }
            if !src.is_map() {
                self.struct_to_map(&mut src)?;
            }
            let dst_map = dst.map_type.get_or_insert_with(MapData::default);
            return self.meld_map(dst_map, src.map_type.unwrap_or_default());
        }

        let mut src_fields = std::mem::take(&mut src.fields);
        for (name, dst_field) in dst.fields.iter_mut() {
            match src_fields.remove(name) {
                Some(src_field) => {
                    trace!(field = %name, "melding struct field");
                    self.meld_into(dst_field, src_field)
                        .map_err(|e| e.in_field(name.as_str()))?;
                }
                None => dst_field.make_optional(),
            }
        }
        for (name, mut src_field) in src_fields {
            src_field.make_optional();
            dst.fields.insert(name, src_field);
        }

        if self.options.map_inference.should_be_map(dst) {
            debug!(fields = dst.fields.len(), "converting struct to map");
            self.struct_to_map(dst)?;
        }
        Ok(())
    }

    /// Replace the fields of `s` with a map type.
    ///
    /// The value type is the meld of every field value, each stripped of one
    /// `Optional` layer; the key type is an unformatted string.
    pub fn struct_to_map(&self, s: &mut Struct) -> Result<(), MeldError> {
        let fields = std::mem::take(&mut s.fields);
        let mut value: Option<Data> = None;
        let mut saw_null = false;

        for (name, field) in fields {
            let field = match field.value {
                DataValue::Optional(Optional::None) => {
                    saw_null = true;
                    continue;
                }
                DataValue::Optional(Optional::Data(inner)) => {
                    let mut inner = *inner;
                    inner.nullable = inner.nullable || field.nullable;
                    inner
                }
                _ => field,
            };
            match value.as_mut() {
                Some(acc) => self
                    .meld_into(acc, field)
                    .map_err(|e| e.in_field(name))?,
                None => value = Some(field),
            }
        }

        let value = match value {
            Some(mut v) => {
                v.nullable = v.nullable || saw_null;
                Some(v)
            }
            None if saw_null => Some(Data::none()),
            None => None,
        };

        s.map_type = Some(MapData {
            key: Some(Box::new(Data::of_type(BaseType::String))),
            value: value.map(Box::new),
        });
        Ok(())
    }

    /// Meld key types and value types independently
    pub(crate) fn meld_map(&self, dst: &mut MapData, src: MapData) -> Result<(), MeldError> {
        self.meld_slot(&mut dst.key, src.key)
            .map_err(|e| e.in_field("<map key>"))?;
        self.meld_slot(&mut dst.value, src.value)
            .map_err(|e| e.in_field("<map value>"))
    }

    fn meld_slot(&self, dst: &mut Option<Box<Data>>, src: Option<Box<Data>>) -> Result<(), MeldError> {
        match (dst.as_mut(), src) {
            (Some(d), Some(s)) => self.meld_into(d, *s),
            (None, Some(s)) => {
                *dst = Some(s);
                Ok(())
            }
            (_, None) => Ok(()),
        }
    }
}
