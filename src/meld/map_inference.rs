//! Heuristic for treating a struct as a homogeneous map
//!
//! Structs observed with very many fields, mostly-optional fields, or
//! numeric-looking field names are more likely to be maps keyed by data
//! (ids, timestamps) than records with a fixed set of fields.

use super::config::MapInferenceThresholds;
use crate::models::Struct;

impl MapInferenceThresholds {
    /// Whether `s` should be represented as a map.
    ///
    /// Always false for a struct that already is one.
    pub fn should_be_map(&self, s: &Struct) -> bool {
        if s.is_map() {
            return false;
        }
        if s.fields.len() > self.max_fields {
            return true;
        }

        let optional_fields = s.fields.values().filter(|f| f.is_optional()).count();
        if optional_fields > self.max_optional_fields {
            return true;
        }

        let digit_fields = s
            .fields
            .keys()
            .filter(|name| name.starts_with(|c: char| c.is_ascii_digit()))
            .count();
        digit_fields > self.max_digit_fields
    }
}

/// [`MapInferenceThresholds::should_be_map`] with the default thresholds
pub fn struct_should_be_map(s: &Struct) -> bool {
    MapInferenceThresholds::default().should_be_map(s)
}
