//! Maps a query string back to the first live node it selects.

use selpath_html::{Document, NodeId};

use crate::error::BuilderError;
use crate::render::Grammar;

/// First node matched by `query` in document order. Blank queries match nothing.
///
/// # Errors
/// [`BuilderError::MalformedQuery`] when `query` does not parse in `grammar`.
pub fn resolve_query(document: &Document, query: &str, grammar: Grammar) -> Result<Option<NodeId>, BuilderError> {
    resolve_query_from(document, document.root(), query, grammar)
}

/// Like [`resolve_query`], with `anchor` as the context node. CSS compounds must all
/// match strictly inside `anchor`, mirroring how `.//` confines XPath steps.
///
/// # Errors
/// [`BuilderError::MalformedQuery`] when `query` does not parse in `grammar`.
pub fn resolve_query_from(
    document: &Document,
    anchor: NodeId,
    query: &str,
    grammar: Grammar,
) -> Result<Option<NodeId>, BuilderError> {
    if query.trim().is_empty() {
        return Ok(None);
    }
    let malformed = |reason: String| BuilderError::MalformedQuery {
        grammar,
        query: query.to_owned(),
        reason,
    };
    let found = match grammar {
        Grammar::Css => selpath_css::query_selector_within(document, anchor, query)
            .map_err(|err| malformed(err.to_string()))?,
        Grammar::XPath => selpath_xpath::select_first_from(document, anchor, query)
            .map_err(|err| malformed(err.to_string()))?,
    };
    log::trace!(target: "selpath_builder", "resolved {grammar} query `{query}` to {found:?}");
    Ok(found)
}
