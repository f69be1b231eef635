//! First-match and all-match lookups for CSS selectors.

use super::element_wrapper::{ElementWrapper, SelectorImpl};
use super::{CssError, SelectorParser};
use cssparser::{Parser, ParserInput};
use selectors::NthIndexCache;
use selectors::matching::{
    IgnoreNthChildForInvalidation, MatchingContext, MatchingMode, NeedsSelectorFlags, QuirksMode,
    matches_selector,
};
use selectors::parser::{ParseRelative, SelectorList};
use selpath_html::{Document, NodeId};

/// Parse a comma separated selector list.
///
/// # Errors
/// Returns [`CssError::InvalidSelector`] if the text is not a selector this matcher supports.
pub fn parse_selector_list(selector_text: &str) -> Result<SelectorList<SelectorImpl>, CssError> {
    let mut input = ParserInput::new(selector_text);
    let mut parser = Parser::new(&mut input);
    SelectorList::<SelectorImpl>::parse(&SelectorParser, &mut parser, ParseRelative::No).map_err(|err| {
        log::warn!(target: "selpath_css", "rejected selector `{selector_text}`: {err:?}");
        CssError::InvalidSelector {
            selector: selector_text.to_owned(),
            reason: format!("{:?}", err.kind),
        }
    })
}

/// Check if a parsed selector list matches an element.
pub fn matches(document: &Document, node: NodeId, selector_list: &SelectorList<SelectorImpl>) -> bool {
    document.is_element(node) && matches_element(&ElementWrapper::new(node, document), selector_list)
}

fn matches_element(element: &ElementWrapper<'_>, selector_list: &SelectorList<SelectorImpl>) -> bool {
    let mut nth_index_cache = NthIndexCache::default();
    let mut context = MatchingContext::new(
        MatchingMode::Normal,
        None,
        &mut nth_index_cache,
        QuirksMode::NoQuirks,
        NeedsSelectorFlags::No,
        IgnoreNthChildForInvalidation::No,
    );

    selector_list
        .0
        .iter()
        .any(|selector| matches_selector(selector, 0, None, element, &mut context))
}

/// First element in document order matching `selector_text`, like `Document.querySelector`.
///
/// # Errors
/// Returns [`CssError::InvalidSelector`] if the selector cannot be parsed.
pub fn query_selector(document: &Document, selector_text: &str) -> Result<Option<NodeId>, CssError> {
    query_selector_from(document, document.root(), selector_text)
}

/// First descendant of `scope` (exclusive) matching `selector_text`, like `Element.querySelector`.
/// As in the DOM, compound selectors may match ancestors outside `scope`.
///
/// # Errors
/// Returns [`CssError::InvalidSelector`] if the selector cannot be parsed.
pub fn query_selector_from(
    document: &Document,
    scope: NodeId,
    selector_text: &str,
) -> Result<Option<NodeId>, CssError> {
    let selector_list = parse_selector_list(selector_text)?;
    Ok(document
        .descendant_elements(scope)
        .find(|node| matches(document, *node, &selector_list)))
}

/// First descendant of `scope` matching `selector_text` with every compound of the
/// selector also matched inside `scope`, like `scope.querySelector(":scope " + selector_text)`.
///
/// # Errors
/// Returns [`CssError::InvalidSelector`] if the selector cannot be parsed.
pub fn query_selector_within(
    document: &Document,
    scope: NodeId,
    selector_text: &str,
) -> Result<Option<NodeId>, CssError> {
    let selector_list = parse_selector_list(selector_text)?;
    Ok(document
        .descendant_elements(scope)
        .find(|node| matches_element(&ElementWrapper::within(*node, document, scope), &selector_list)))
}

/// Every element matching `selector_text`, in document order.
///
/// # Errors
/// Returns [`CssError::InvalidSelector`] if the selector cannot be parsed.
pub fn query_selector_all(document: &Document, selector_text: &str) -> Result<Vec<NodeId>, CssError> {
    let selector_list = parse_selector_list(selector_text)?;
    Ok(document
        .elements()
        .filter(|node| matches(document, *node, &selector_list))
        .collect())
}
