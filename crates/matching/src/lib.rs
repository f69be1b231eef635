//! CSS selector matching against a [`selpath_html::Document`].
//!
//! Used to resolve rendered CSS queries back to live nodes. Only structural
//! selectors are supported; non-tree-structural pseudo-classes and
//! pseudo-elements fail to parse.

mod element_wrapper;
mod matcher;

pub use element_wrapper::{AttrString, ElementWrapper, SelectorImpl};
pub use matcher::{
    matches, parse_selector_list, query_selector, query_selector_all, query_selector_from, query_selector_within,
};

use cssparser::Parser;
use element_wrapper::{NonTSPseudoClass, PseudoElement};
use selectors::parser::SelectorParseErrorKind;

/// Errors raised while parsing a selector.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CssError {
    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },
}

/// Parser for CSS selectors.
pub struct SelectorParser;

impl<'i> selectors::parser::Parser<'i> for SelectorParser {
    type Impl = SelectorImpl;
    type Error = SelectorParseErrorKind<'i>;

    fn parse_non_ts_pseudo_class(
        &self,
        location: cssparser::SourceLocation,
        name: cssparser::CowRcStr<'i>,
    ) -> Result<NonTSPseudoClass, cssparser::ParseError<'i, SelectorParseErrorKind<'i>>> {
        Err(location.new_custom_error(SelectorParseErrorKind::UnsupportedPseudoClassOrElement(name)))
    }

    fn parse_pseudo_element(
        &self,
        location: cssparser::SourceLocation,
        name: cssparser::CowRcStr<'i>,
    ) -> Result<PseudoElement, cssparser::ParseError<'i, SelectorParseErrorKind<'i>>> {
        Err(location.new_custom_error(SelectorParseErrorKind::UnsupportedPseudoClassOrElement(name)))
    }

    fn parse_non_ts_functional_pseudo_class<'t>(
        &self,
        name: cssparser::CowRcStr<'i>,
        parser: &mut Parser<'i, 't>,
    ) -> Result<NonTSPseudoClass, cssparser::ParseError<'i, SelectorParseErrorKind<'i>>> {
        Err(parser.new_custom_error(SelectorParseErrorKind::UnsupportedPseudoClassOrElement(name)))
    }

    fn default_namespace(&self) -> Option<()> {
        None
    }

    fn namespace_for_prefix(&self, _prefix: &AttrString) -> Option<()> {
        None
    }
}
