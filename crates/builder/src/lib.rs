//! Derives CSS selectors and XPath expressions from picked DOM nodes.
//!
//! A [`SelectorPathBuilder`] holds the ancestor chain of a primary pick and,
//! optionally, a relative pick joined to it at their nearest common ancestor.
//! Each entry of a chain can be refined with whitelisted attribute values;
//! every render reflects the current state.

#![allow(clippy::missing_docs_in_private_items, reason = "internal helpers are self-describing")]
#![allow(clippy::missing_inline_in_public_items, reason = "no cross-crate hot paths")]

mod arena;
pub mod config;
mod descriptor;
mod error;
mod merge;
mod path;
mod picking;
mod render;
mod resolve;
mod session;

pub use arena::{DescriptorArena, DescriptorId};
pub use config::{BuilderConfig, DEFAULT_ATTRIBUTE_WHITELIST};
pub use descriptor::{NodeDescriptor, available_attributes, candidate_values};
pub use error::{BuilderError, ConfigError, PickRejection};
pub use merge::{MergedTree, Scope, TreeEntry, merge};
pub use path::{Path, RelativePath, build_path, build_relative_path, validate_pick};
pub use picking::{PickOutcome, PickingSession};
pub use render::{Anchoring, Grammar, has_positional_conflict, positional_index, render};
pub use resolve::{resolve_query, resolve_query_from};
pub use session::{PathEntry, SelectorPathBuilder};
