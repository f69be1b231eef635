//! A small XPath 1.0 subset over [`selpath_html::Document`].
//!
//! Covers what the selector renderer produces (`//A/B[2][contains(@class, 'x')]`,
//! `.//B`) plus the abbreviated forms around it: explicit `child`, `descendant`,
//! `descendant-or-self`, `self` and `parent` axes, `*`, `node()`, `=`/`!=`,
//! `and`/`or` and a handful of string functions. Name tests are ASCII
//! case-insensitive, matching how browsers evaluate XPath against HTML
//! documents.

pub mod ast;
mod eval;
mod lexer;
mod parser;

pub use eval::Evaluator;
pub use parser::parse;

use selpath_html::{Document, NodeId};

/// Error produced when a query is outside the supported grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at offset {position}")]
pub struct XPathError {
    pub message: String,
    /// Byte offset into the query where the error was detected.
    pub position: usize,
}

impl XPathError {
    pub fn new(message: &str, position: usize) -> Self {
        Self {
            message: message.to_owned(),
            position,
        }
    }
}

/// Every element selected by `query`, in document order.
///
/// # Errors
/// Returns [`XPathError`] if the query cannot be parsed.
pub fn select(document: &Document, context: NodeId, query: &str) -> Result<Vec<NodeId>, XPathError> {
    let path = parse(query).inspect_err(|err| {
        log::warn!(target: "selpath_xpath", "rejected `{query}`: {err}");
    })?;
    Ok(Evaluator::new(document)
        .select(&path, context)
        .into_iter()
        .filter(|node| document.is_element(*node))
        .collect())
}

/// First element selected by `query` evaluated from the document node,
/// like `XPathResult.FIRST_ORDERED_NODE_TYPE`.
///
/// # Errors
/// Returns [`XPathError`] if the query cannot be parsed.
pub fn select_first(document: &Document, query: &str) -> Result<Option<NodeId>, XPathError> {
    select_first_from(document, document.root(), query)
}

/// First element selected by `query` with `context` as the context node.
///
/// # Errors
/// Returns [`XPathError`] if the query cannot be parsed.
pub fn select_first_from(document: &Document, context: NodeId, query: &str) -> Result<Option<NodeId>, XPathError> {
    Ok(select(document, context, query)?.into_iter().next())
}

/// Quote `value` as an XPath string literal. Values holding both quote kinds
/// are split into a `concat(...)` call.
pub fn literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    if !value.contains('"') {
        return format!("\"{value}\"");
    }
    let parts: Vec<String> = value
        .split('\'')
        .map(|part| format!("'{part}'"))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}
