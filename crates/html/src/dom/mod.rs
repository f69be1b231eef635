mod building;
mod printing;

use indextree::{Arena, NodeId};
use smallvec::SmallVec;

pub use printing::to_json;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NodeKind {
    #[default]
    Document,
    /// Element with its lowercase local name, as html5ever reports it.
    Element { tag: String },
    Text { text: String },
    Comment { text: String },
}

#[derive(Debug, Clone, Default)]
pub struct DocumentNode {
    pub kind: NodeKind,
    pub attrs: SmallVec<[(String, String); 4]>,
}

impl DocumentNode {
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Element {
                tag: tag.into().to_ascii_lowercase(),
            },
            attrs: SmallVec::new(),
        }
    }

    pub fn local_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag } => Some(tag.as_str()),
            _ => None,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(attr_name, _)| attr_name == name)
            .map(|(_, value)| value.as_str())
    }
}

/// A parsed document. Node identity is the arena `NodeId`; the document itself
/// never hands out owned nodes.
pub struct Document {
    arena: Arena<DocumentNode>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(DocumentNode::default());
        Self { arena, root }
    }

    /// The document node (not an element).
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The `<html>` element, i.e. the first element child of the document node.
    pub fn document_element(&self) -> Option<NodeId> {
        self.first_element_child(self.root)
    }

    pub fn node(&self, node: NodeId) -> Option<&DocumentNode> {
        self.arena.get(node).map(|entry| entry.get())
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.local_name(node).is_some()
    }

    pub fn local_name(&self, node: NodeId) -> Option<&str> {
        self.node(node)?.local_name()
    }

    /// Uppercase tag name, matching `Element.tagName` for HTML elements.
    pub fn tag_name(&self, node: NodeId) -> Option<String> {
        self.local_name(node).map(str::to_ascii_uppercase)
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node)?.attribute(name)
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    pub fn attributes(&self, node: NodeId) -> &[(String, String)] {
        self.node(node).map_or(&[], |entry| entry.attrs.as_slice())
    }

    pub fn id(&self, node: NodeId) -> Option<&str> {
        self.attribute(node, "id").filter(|value| !value.is_empty())
    }

    /// Whitespace separated class tokens, duplicates removed, in source order.
    pub fn class_list(&self, node: NodeId) -> Vec<&str> {
        let mut tokens: Vec<&str> = Vec::new();
        for token in self
            .attribute(node, "class")
            .unwrap_or_default()
            .split_ascii_whitespace()
        {
            if !tokens.contains(&token) {
                tokens.push(token);
            }
        }
        tokens
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        node.parent(&self.arena)
    }

    pub fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node).filter(|parent| self.is_element(*parent))
    }

    pub fn previous_element_sibling(&self, node: NodeId) -> Option<NodeId> {
        let mut current = node.previous_sibling(&self.arena);
        while let Some(sibling) = current {
            if self.is_element(sibling) {
                return Some(sibling);
            }
            current = sibling.previous_sibling(&self.arena);
        }
        None
    }

    pub fn next_element_sibling(&self, node: NodeId) -> Option<NodeId> {
        let mut current = node.next_sibling(&self.arena);
        while let Some(sibling) = current {
            if self.is_element(sibling) {
                return Some(sibling);
            }
            current = sibling.next_sibling(&self.arena);
        }
        None
    }

    pub fn first_element_child(&self, node: NodeId) -> Option<NodeId> {
        node.children(&self.arena)
            .find(|child| self.is_element(*child))
    }

    pub fn element_children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.children(&self.arena)
            .filter(move |child| self.is_element(*child))
    }

    /// Descendant elements of `node` in document order, `node` excluded.
    pub fn descendant_elements(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.descendants(&self.arena)
            .skip(1)
            .filter(move |descendant| self.is_element(*descendant))
    }

    /// Every element of the document in document order.
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.descendant_elements(self.root)
    }

    /// Inclusive containment, like `Node.contains`.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        node.ancestors(&self.arena).any(|current| current == ancestor)
    }

    /// Whether the node is still reachable from the document node.
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.arena.get(node).is_some_and(|entry| !entry.is_removed()) && self.contains(self.root, node)
    }

    /// Nearest inclusive ancestor element whose tag matches `tag` (case-insensitive),
    /// stopping before the document element.
    pub fn closest_by_tag(&self, node: NodeId, tag: &str) -> Option<NodeId> {
        let boundary = self.document_element();
        let mut current = Some(node);
        while let Some(candidate) = current {
            if Some(candidate) == boundary {
                return None;
            }
            if self
                .local_name(candidate)
                .is_some_and(|name| name.eq_ignore_ascii_case(tag))
            {
                return Some(candidate);
            }
            current = self.parent_element(candidate);
        }
        None
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut text = String::new();
        for descendant in node.descendants(&self.arena) {
            if let Some(NodeKind::Text { text: chunk }) = self.node(descendant).map(|entry| &entry.kind) {
                text.push_str(chunk);
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_document() -> (Document, Vec<NodeId>) {
        let mut document = Document::new();
        let html = document.create_element("html");
        let ul = document.create_element("ul");
        let first = document.create_element("li");
        let text = document.create_text("between");
        let second = document.create_element("li");
        let third = document.create_element("p");
        document.append_child(document.root(), html).unwrap();
        document.append_child(html, ul).unwrap();
        for child in [first, text, second, third] {
            document.append_child(ul, child).unwrap();
        }
        (document, vec![html, ul, first, second, third])
    }

    #[test]
    fn sibling_links_skip_text_nodes() {
        let (document, nodes) = list_document();
        assert_eq!(document.previous_element_sibling(nodes[3]), Some(nodes[2]));
        assert_eq!(document.next_element_sibling(nodes[2]), Some(nodes[3]));
        assert_eq!(document.previous_element_sibling(nodes[2]), None);
    }

    #[test]
    fn document_element_is_first_element_child() {
        let (document, nodes) = list_document();
        assert_eq!(document.document_element(), Some(nodes[0]));
        assert_eq!(document.parent_element(nodes[0]), None);
    }

    #[test]
    fn tag_name_is_uppercase() {
        let (document, nodes) = list_document();
        assert_eq!(document.tag_name(nodes[1]).as_deref(), Some("UL"));
        assert_eq!(document.local_name(nodes[1]), Some("ul"));
    }

    #[test]
    fn closest_by_tag_stops_at_document_element() {
        let (document, nodes) = list_document();
        assert_eq!(document.closest_by_tag(nodes[3], "UL"), Some(nodes[1]));
        assert_eq!(document.closest_by_tag(nodes[3], "li"), Some(nodes[3]));
        assert_eq!(document.closest_by_tag(nodes[3], "html"), None);
    }

    #[test]
    fn class_list_dedupes_tokens() {
        let (mut document, nodes) = list_document();
        document.set_attribute(nodes[2], "class", "a  b a\tc");
        assert_eq!(document.class_list(nodes[2]), vec!["a", "b", "c"]);
    }
}
