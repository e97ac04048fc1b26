//! Positional metadata attached to top-level fields
//!
//! Metadata identifies *which* HTTP field a tree describes, so the same
//! header or cookie can be matched across witnesses even when its inferred
//! value type differs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where in an HTTP message a value was observed
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HttpLocation {
    Path { key: String },
    Query { key: String },
    Header { key: String },
    Cookie { key: String },
    Body { content_type: String },
    Auth { scheme: String },
    /// Message with no body
    Empty,
}

/// HTTP metadata for one top-level field
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpMeta {
    pub location: HttpLocation,
    /// Response status code; 0 for request fields
    #[serde(default)]
    pub response_code: i32,
}

/// Metadata record shared by every shape observed for a field
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpMeta>,
}

impl DataMeta {
    /// Metadata for a request field at `location`
    pub fn request(location: HttpLocation) -> Self {
        Self::http(location, 0)
    }

    /// Metadata for a response field
    pub fn response(location: HttpLocation, response_code: i32) -> Self {
        Self::http(location, response_code)
    }

    fn http(location: HttpLocation, response_code: i32) -> Self {
        Self {
            http: Some(HttpMeta {
                location,
                response_code,
            }),
        }
    }

    /// Cookie name, if this field is a cookie
    pub fn cookie_name(&self) -> Option<&str> {
        match &self.http {
            Some(HttpMeta {
                location: HttpLocation::Cookie { key },
                ..
            }) => Some(key),
            _ => None,
        }
    }
}

impl HttpLocation {
    pub fn header(key: impl Into<String>) -> Self {
        HttpLocation::Header { key: key.into() }
    }

    pub fn cookie(key: impl Into<String>) -> Self {
        HttpLocation::Cookie { key: key.into() }
    }

    pub fn query(key: impl Into<String>) -> Self {
        HttpLocation::Query { key: key.into() }
    }

    pub fn path(key: impl Into<String>) -> Self {
        HttpLocation::Path { key: key.into() }
    }

    pub fn body(content_type: impl Into<String>) -> Self {
        HttpLocation::Body {
            content_type: content_type.into(),
        }
    }
}

impl fmt::Display for HttpLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpLocation::Path { key } => write!(f, "path {key}"),
            HttpLocation::Query { key } => write!(f, "query {key}"),
            HttpLocation::Header { key } => write!(f, "header {key}"),
            HttpLocation::Cookie { key } => write!(f, "cookie {key}"),
            HttpLocation::Body { content_type } => write!(f, "body {content_type}"),
            HttpLocation::Auth { scheme } => write!(f, "auth {scheme}"),
            HttpLocation::Empty => f.write_str("empty body"),
        }
    }
}

impl fmt::Display for HttpMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.response_code {
            0 => write!(f, "{}", self.location),
            code => write!(f, "{code} {}", self.location),
        }
    }
}

/// Short label naming the field, e.g. `header X-Id` or `200 body application/json`
impl fmt::Display for DataMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.http {
            Some(http) => write!(f, "{http}"),
            None => f.write_str("<no http meta>"),
        }
    }
}
