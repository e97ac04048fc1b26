//! API method specs

use serde::{Deserialize, Serialize};

use super::data::Data;
use crate::hash::ContentAddressedMap;

/// Identifies the endpoint a method describes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodMeta {
    pub host: String,
    /// HTTP verb
    pub operation: String,
    pub path_template: String,
}

/// Request and response shapes of one endpoint
///
/// Both maps are keyed by the content hash of each entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    pub meta: MethodMeta,
    #[serde(default)]
    pub args: ContentAddressedMap,
    #[serde(default)]
    pub responses: ContentAddressedMap,
}

impl Method {
    pub fn new(meta: MethodMeta) -> Self {
        Self {
            meta,
            args: ContentAddressedMap::new(),
            responses: ContentAddressedMap::new(),
        }
    }

    /// Add a request field, returning its key
    pub fn add_arg(&mut self, data: Data) -> String {
        self.args.insert(data)
    }

    /// Add a response field, returning its key
    pub fn add_response(&mut self, data: Data) -> String {
        self.responses.insert(data)
    }
}

impl MethodMeta {
    pub fn new(
        host: impl Into<String>,
        operation: impl Into<String>,
        path_template: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            operation: operation.into(),
            path_template: path_template.into(),
        }
    }
}
