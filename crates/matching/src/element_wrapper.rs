//! Wrapper that implements the selectors crate's Element trait for our DOM.

use core::fmt;
use selectors::OpaqueElement;
use selectors::attr::{AttrSelectorOperation, AttrSelectorOperator, CaseSensitivity, NamespaceConstraint};
use selpath_html::{Document, NodeId};

/// Wrapper around a NodeId that implements selectors::Element trait.
#[derive(Clone, Copy)]
pub struct ElementWrapper<'a> {
    pub node: NodeId,
    pub document: &'a Document,
    /// Ancestor the combinator chain may not reach. Matching treats its children as roots.
    boundary: Option<NodeId>,
}

impl fmt::Debug for ElementWrapper<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementWrapper")
            .field("node", &self.node)
            .finish_non_exhaustive()
    }
}

impl<'a> ElementWrapper<'a> {
    pub fn new(node: NodeId, document: &'a Document) -> Self {
        Self {
            node,
            document,
            boundary: None,
        }
    }

    /// Wrapper whose ancestor chain stops below `boundary`.
    pub fn within(node: NodeId, document: &'a Document, boundary: NodeId) -> Self {
        Self {
            node,
            document,
            boundary: Some(boundary),
        }
    }

    fn wrap(&self, node: NodeId) -> Self {
        Self {
            node,
            document: self.document,
            boundary: self.boundary,
        }
    }

    fn attribute(&self, name: &str) -> Option<&'a str> {
        self.document.attribute(self.node, name)
    }

    fn local_name(&self) -> Option<&'a str> {
        self.document.local_name(self.node)
    }
}

/// Evaluate one attribute operator. Both sides are expected to be folded already
/// when matching case-insensitively.
fn eval_operator(operator: AttrSelectorOperator, attr_value: &str, value: &str) -> bool {
    match operator {
        AttrSelectorOperator::Equal => attr_value == value,
        AttrSelectorOperator::Includes => attr_value.split_ascii_whitespace().any(|part| part == value),
        AttrSelectorOperator::DashMatch => {
            attr_value == value
                || attr_value
                    .strip_prefix(value)
                    .is_some_and(|rest| rest.starts_with('-'))
        }
        AttrSelectorOperator::Prefix => !value.is_empty() && attr_value.starts_with(value),
        AttrSelectorOperator::Suffix => !value.is_empty() && attr_value.ends_with(value),
        AttrSelectorOperator::Substring => !value.is_empty() && attr_value.contains(value),
    }
}

fn same_ident(left: &str, right: &str, case_sensitivity: CaseSensitivity) -> bool {
    match case_sensitivity {
        CaseSensitivity::CaseSensitive => left == right,
        CaseSensitivity::AsciiCaseInsensitive => left.eq_ignore_ascii_case(right),
    }
}

impl selectors::Element for ElementWrapper<'_> {
    type Impl = SelectorImpl;

    fn opaque(&self) -> OpaqueElement {
        // Address of the arena slot, stable for the lifetime of the borrow
        self.document
            .node(self.node)
            .map_or_else(|| OpaqueElement::new(self.document), |data| OpaqueElement::new(data))
    }

    fn parent_element(&self) -> Option<Self> {
        self.document
            .parent_element(self.node)
            .filter(|parent| Some(*parent) != self.boundary)
            .map(|parent| self.wrap(parent))
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        self.document
            .previous_element_sibling(self.node)
            .map(|sibling| self.wrap(sibling))
    }

    fn next_sibling_element(&self) -> Option<Self> {
        self.document
            .next_element_sibling(self.node)
            .map(|sibling| self.wrap(sibling))
    }

    fn first_element_child(&self) -> Option<Self> {
        self.document
            .first_element_child(self.node)
            .map(|child| self.wrap(child))
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, local_name: &str) -> bool {
        self.local_name() == Some(local_name)
    }

    fn has_namespace(&self, _ns: &()) -> bool {
        true
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.local_name() == other.local_name()
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&()>,
        local_name: &AttrString,
        operation: &AttrSelectorOperation<&AttrString>,
    ) -> bool {
        if !matches!(ns, NamespaceConstraint::Specific(())) {
            return false;
        }
        let Some(attr_value) = self.attribute(&local_name.0) else {
            return false;
        };

        match operation {
            AttrSelectorOperation::Exists => true,
            AttrSelectorOperation::WithValue {
                operator,
                case_sensitivity,
                value,
            } => {
                if *case_sensitivity == CaseSensitivity::CaseSensitive {
                    eval_operator(*operator, attr_value, &value.0)
                } else {
                    eval_operator(
                        *operator,
                        &attr_value.to_ascii_lowercase(),
                        &value.0.to_ascii_lowercase(),
                    )
                }
            }
        }
    }

    fn match_non_ts_pseudo_class(
        &self,
        pc: &NonTSPseudoClass,
        _context: &mut selectors::matching::MatchingContext<Self::Impl>,
    ) -> bool {
        match *pc {}
    }

    fn match_pseudo_element(
        &self,
        pe: &PseudoElement,
        _context: &mut selectors::matching::MatchingContext<Self::Impl>,
    ) -> bool {
        match *pe {}
    }

    fn apply_selector_flags(&self, _flags: selectors::matching::ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        matches!(self.local_name(), Some("a" | "area")) && self.attribute("href").is_some()
    }

    fn is_html_slot_element(&self) -> bool {
        self.local_name() == Some("slot")
    }

    fn has_id(&self, id: &AttrString, case_sensitivity: CaseSensitivity) -> bool {
        self.attribute("id")
            .is_some_and(|attr_id| same_ident(attr_id, &id.0, case_sensitivity))
    }

    fn has_class(&self, name: &AttrString, case_sensitivity: CaseSensitivity) -> bool {
        self.document
            .class_list(self.node)
            .into_iter()
            .any(|class| same_ident(class, &name.0, case_sensitivity))
    }

    fn imported_part(&self, _name: &AttrString) -> Option<AttrString> {
        None
    }

    fn is_part(&self, _name: &AttrString) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.document.first_element_child(self.node).is_none()
            && self.document.text_content(self.node).trim().is_empty()
    }

    fn is_root(&self) -> bool {
        self.document.document_element() == Some(self.node)
    }
}

/// String wrapper that implements ToCss
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct AttrString(pub String);

impl From<&str> for AttrString {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl core::borrow::Borrow<str> for AttrString {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl cssparser::ToCss for AttrString {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        cssparser::serialize_string(&self.0, dest)
    }
}

/// Selector implementation types
#[derive(Debug, Clone, Copy)]
pub struct SelectorImpl;

impl selectors::SelectorImpl for SelectorImpl {
    type ExtraMatchingData<'a> = ();
    type AttrValue = AttrString;
    type Identifier = AttrString;
    type LocalName = AttrString;
    type NamespacePrefix = AttrString;
    type NamespaceUrl = ();
    type BorrowedLocalName = str;
    type BorrowedNamespaceUrl = ();
    type NonTSPseudoClass = NonTSPseudoClass;
    type PseudoElement = PseudoElement;
}

/// Non-tree-structural pseudo-classes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NonTSPseudoClass {}

impl selectors::parser::NonTSPseudoClass for NonTSPseudoClass {
    type Impl = SelectorImpl;

    fn is_active_or_hover(&self) -> bool {
        match *self {}
    }

    fn is_user_action_state(&self) -> bool {
        match *self {}
    }
}

impl cssparser::ToCss for NonTSPseudoClass {
    fn to_css<W>(&self, _dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        match *self {}
    }
}

/// Pseudo-elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoElement {}

impl selectors::parser::PseudoElement for PseudoElement {
    type Impl = SelectorImpl;
}

impl cssparser::ToCss for PseudoElement {
    fn to_css<W>(&self, _dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        match *self {}
    }
}
