//! Ancestor chains of picked nodes.

use selpath_html::{Document, NodeId};

use crate::arena::{DescriptorArena, DescriptorId};
use crate::error::{BuilderError, PickRejection};

/// Handles from the highest ancestor below the document element down to the picked node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    handles: Vec<DescriptorId>,
}

impl Path {
    pub fn handles(&self) -> &[DescriptorId] {
        &self.handles
    }

    pub fn contains(&self, id: DescriptorId) -> bool {
        self.handles.contains(&id)
    }

    pub fn position(&self, id: DescriptorId) -> Option<usize> {
        self.handles.iter().position(|handle| *handle == id)
    }

    pub fn leaf(&self) -> Option<DescriptorId> {
        self.handles.last().copied()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// Chain of a second pick. When `shared` is set, index 0 is the nearest
/// ancestor it has in common with the primary path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelativePath {
    handles: Vec<DescriptorId>,
    shared: bool,
}

impl RelativePath {
    pub fn handles(&self) -> &[DescriptorId] {
        &self.handles
    }

    /// The common ancestor's handle, if any.
    pub fn shared(&self) -> Option<DescriptorId> {
        if self.shared { self.handles.first().copied() } else { None }
    }

    pub fn has_common_ancestor(&self) -> bool {
        self.shared
    }

    /// Handles that belong to this path only.
    pub fn branch(&self) -> &[DescriptorId] {
        let skip = usize::from(self.shared);
        self.handles.get(skip..).unwrap_or_default()
    }

    pub fn leaf(&self) -> Option<DescriptorId> {
        self.handles.last().copied()
    }
}

/// Reject nodes that cannot head a path.
///
/// # Errors
/// [`BuilderError::InvalidPick`] for non-elements (including the document node),
/// the document element itself and detached nodes.
pub fn validate_pick(document: &Document, node: NodeId) -> Result<(), BuilderError> {
    if !document.is_element(node) {
        return Err(BuilderError::InvalidPick(PickRejection::NotAnElement));
    }
    if document.document_element() == Some(node) {
        return Err(BuilderError::InvalidPick(PickRejection::DocumentElement));
    }
    if !document.is_attached(node) {
        return Err(BuilderError::InvalidPick(PickRejection::Detached));
    }
    Ok(())
}

/// Element ancestors of `leaf` below the document element, `leaf` included, leaf first.
fn ancestors_below_root(document: &Document, leaf: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    let boundary = document.document_element();
    let mut current = Some(leaf);
    core::iter::from_fn(move || {
        let node = current.filter(|node| Some(*node) != boundary)?;
        current = document.parent_element(node);
        Some(node)
    })
}

pub fn build_path(document: &Document, arena: &mut DescriptorArena, leaf: NodeId) -> Path {
    let mut handles: Vec<DescriptorId> = ancestors_below_root(document, leaf)
        .map(|node| arena.insert(node))
        .collect();
    handles.reverse();
    log::debug!(target: "selpath_builder", "built path of {} nodes", handles.len());
    Path { handles }
}

/// Walk up from `leaf` until a node already on `primary`. Nodes whose
/// descriptors are not on `primary` get fresh arena entries.
pub fn build_relative_path(
    document: &Document,
    arena: &mut DescriptorArena,
    leaf: NodeId,
    primary: &Path,
) -> RelativePath {
    let mut handles = Vec::new();
    let mut shared = false;
    for node in ancestors_below_root(document, leaf) {
        if let Some(id) = arena.lookup(node).filter(|id| primary.contains(*id)) {
            handles.push(id);
            shared = true;
            break;
        }
        handles.push(arena.insert(node));
    }
    handles.reverse();
    log::debug!(
        target: "selpath_builder",
        "built relative path of {} nodes (common ancestor: {shared})",
        handles.len()
    );
    RelativePath { handles, shared }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selpath_html::parse_fragment;

    fn by_id(document: &Document, id: &str) -> NodeId {
        document.elements().find(|node| document.id(*node) == Some(id)).unwrap()
    }

    fn nodes(arena: &DescriptorArena, handles: &[DescriptorId]) -> Vec<NodeId> {
        handles.iter().map(|id| arena.get(*id).unwrap().node()).collect()
    }

    #[test]
    fn path_runs_from_top_ancestor_to_leaf() {
        let document = parse_fragment(r#"<div id="a"><p id="b"><span id="c"></span></p></div>"#).unwrap();
        let mut arena = DescriptorArena::new();
        let path = build_path(&document, &mut arena, by_id(&document, "c"));
        assert_eq!(
            nodes(&arena, path.handles()),
            vec![by_id(&document, "a"), by_id(&document, "b"), by_id(&document, "c")]
        );
    }

    #[test]
    fn relative_path_stops_at_leaf_when_it_is_on_primary() {
        let document = parse_fragment(r#"<div id="a"><p id="b"><span id="c"></span></p></div>"#).unwrap();
        let mut arena = DescriptorArena::new();
        let primary = build_path(&document, &mut arena, by_id(&document, "c"));
        let relative = build_relative_path(&document, &mut arena, by_id(&document, "b"), &primary);
        assert_eq!(relative.handles().len(), 1);
        assert_eq!(relative.shared(), primary.handles().get(1).copied());
        assert!(relative.branch().is_empty());
    }

    #[test]
    fn relative_path_without_common_ancestor_is_independent() {
        let document = parse_fragment(r#"<div id="a"><p id="b"></p></div><section id="s"><i id="i"></i></section>"#)
            .unwrap();
        let mut arena = DescriptorArena::new();
        let primary = build_path(&document, &mut arena, by_id(&document, "b"));
        let relative = build_relative_path(&document, &mut arena, by_id(&document, "i"), &primary);
        assert!(!relative.has_common_ancestor());
        assert_eq!(relative.shared(), None);
        assert_eq!(
            nodes(&arena, relative.branch()),
            vec![by_id(&document, "s"), by_id(&document, "i")]
        );
    }

    #[test]
    fn rejects_document_element_and_non_elements() {
        let mut document = parse_fragment("<p>text</p>").unwrap();
        let html = document.document_element().unwrap();
        assert_eq!(
            validate_pick(&document, html),
            Err(BuilderError::InvalidPick(PickRejection::DocumentElement))
        );
        assert_eq!(
            validate_pick(&document, document.root()),
            Err(BuilderError::InvalidPick(PickRejection::NotAnElement))
        );
        let orphan = document.create_element("p");
        assert_eq!(
            validate_pick(&document, orphan),
            Err(BuilderError::InvalidPick(PickRejection::Detached))
        );
        let paragraph = document.first_element_child(html).unwrap();
        assert_eq!(validate_pick(&document, paragraph), Ok(()));
    }
}
