use core::fmt;
use std::io;

use crate::merge::Scope;
use crate::render::Grammar;

/// Why a node cannot be the subject of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickRejection {
    NotAnElement,
    DocumentElement,
    Detached,
}

impl fmt::Display for PickRejection {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::NotAnElement => "target is not an element",
            Self::DocumentElement => "target is the document element",
            Self::Detached => "target is not attached to the document",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuilderError {
    #[error("invalid pick: {0}")]
    InvalidPick(PickRejection),
    #[error("attribute `{name}` is not whitelisted or not present on the node")]
    AttributeNotWhitelisted { name: String },
    #[error("value `{value}` is not a value of attribute `{name}` on the node")]
    ValueNotPresent { name: String, value: String },
    #[error("no {scope} path entry at index {index}")]
    UnknownEntry { scope: Scope, index: usize },
    #[error("malformed {grammar} query `{query}`: {reason}")]
    MalformedQuery {
        grammar: Grammar,
        query: String,
        reason: String,
    },
}

/// Failure loading a [`crate::BuilderConfig`] from disk.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}
