//! Arena-backed HTML document used as the live DOM for selector path building.

#![allow(
    clippy::missing_docs_in_private_items,
    reason = "Internal implementation details don't need public documentation"
)]
#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]

pub mod dom;
pub mod parser;

pub use dom::{Document, DocumentNode, NodeKind};
pub use indextree::NodeId;
pub use parser::{parse_document, parse_fragment};
