//! Configuration for melding

use serde::{Deserialize, Serialize};

/// Thresholds above which a struct is treated as a homogeneous map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapInferenceThresholds {
    /// Total number of fields
    pub max_fields: usize,
    /// Number of fields wrapped in `Optional`
    pub max_optional_fields: usize,
    /// Number of field names starting with an ASCII digit
    pub max_digit_fields: usize,
}

impl Default for MapInferenceThresholds {
    fn default() -> Self {
        Self {
            max_fields: 100,
            max_optional_fields: 50,
            max_digit_fields: 10,
        }
    }
}

/// Configuration for the meld engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeldOptions {
    /// Maximum number of distinct cookie names kept in a top-level map
    pub max_num_cookies: usize,

    /// Struct-to-map inference policy
    pub map_inference: MapInferenceThresholds,
}

impl Default for MeldOptions {
    fn default() -> Self {
        Self {
            max_num_cookies: 1000,
            map_inference: MapInferenceThresholds::default(),
        }
    }
}

impl MeldOptions {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> MeldOptionsBuilder {
        MeldOptionsBuilder::default()
    }
}

/// Builder for MeldOptions
#[derive(Debug, Default)]
pub struct MeldOptionsBuilder {
    options: MeldOptions,
}

impl MeldOptionsBuilder {
    /// Set the cookie cap
    pub fn max_num_cookies(mut self, max: usize) -> Self {
        self.options.max_num_cookies = max;
        self
    }

    /// Set the total field count threshold
    pub fn max_fields(mut self, max: usize) -> Self {
        self.options.map_inference.max_fields = max;
        self
    }

    /// Set the optional field count threshold
    pub fn max_optional_fields(mut self, max: usize) -> Self {
        self.options.map_inference.max_optional_fields = max;
        self
    }

    /// Set the digit-leading field name threshold
    pub fn max_digit_fields(mut self, max: usize) -> Self {
        self.options.map_inference.max_digit_fields = max;
        self
    }

    /// Build the configuration
    pub fn build(self) -> MeldOptions {
        self.options
    }
}
