//! Error types for melding

use thiserror::Error;

/// Contract violations detected while melding.
///
/// Incompatible shapes are not errors; they become oneof nodes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeldError {
    /// Top-level entry without HTTP metadata
    #[error("top-level entry {key} has no HTTP metadata")]
    MissingMeta { key: String },

    /// A node kind that is not allowed in its position
    #[error("unexpected {kind} inside {context}")]
    InvalidVariant {
        kind: &'static str,
        context: &'static str,
    },

    /// Content-addressed key that no longer matches its value
    #[error("stale key {key}, value hashes to {actual}")]
    StaleKey { key: String, actual: String },

    /// Error inside a struct field
    #[error("field {name}: {source}")]
    Field {
        name: String,
        #[source]
        source: Box<MeldError>,
    },

    /// Error inside a list element
    #[error("index {index}: {source}")]
    Index {
        index: usize,
        #[source]
        source: Box<MeldError>,
    },
}

impl MeldError {
    /// Wrap with the name of the field where the error occurred
    pub fn in_field(self, name: impl Into<String>) -> Self {
        MeldError::Field {
            name: name.into(),
            source: Box::new(self),
        }
    }

    /// Wrap with the list index where the error occurred
    pub fn at_index(self, index: usize) -> Self {
        MeldError::Index {
            index,
            source: Box::new(self),
        }
    }

    /// The innermost error, without path context
    pub fn root_cause(&self) -> &MeldError {
        match self {
            MeldError::Field { source, .. } | MeldError::Index { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }

    /// Path from the meld root to the failing node, e.g. `["body", "[2]"]`
    pub fn path(&self) -> Vec<String> {
        let mut path = Vec::new();
        let mut current = self;
        loop {
            match current {
                MeldError::Field { name, source } => {
                    path.push(name.clone());
                    current = source;
                }
                MeldError::Index { index, source } => {
                    path.push(format!("[{index}]"));
                    current = source;
                }
                _ => return path,
            }
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        let path = self.path();
        if path.is_empty() {
            self.root_cause().to_string()
        } else {
            format!("{} (at {})", self.root_cause(), path.join(" -> "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_wrapping() {
        let err = MeldError::InvalidVariant {
            kind: "optional",
            context: "oneof",
        }
        .at_index(2)
        .in_field("items")
        .in_field("body");

        assert_eq!(err.path(), vec!["body", "items", "[2]"]);
        assert!(matches!(err.root_cause(), MeldError::InvalidVariant { .. }));
        assert_eq!(
            err.user_message(),
            "unexpected optional inside oneof (at body -> items -> [2])"
        );
        assert_eq!(
            err.to_string(),
            "field body: field items: index 2: unexpected optional inside oneof"
        );
    }
}
