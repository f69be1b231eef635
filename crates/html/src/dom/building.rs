use super::{Document, DocumentNode, NodeKind};
use anyhow::{Error, anyhow};
use indextree::NodeId;
use smallvec::SmallVec;

impl Document {
    /// Create a detached element. Attach it with [`Document::append_child`].
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.arena.new_node(DocumentNode::element(tag))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.arena.new_node(DocumentNode {
            kind: NodeKind::Text {
                text: text.to_owned(),
            },
            attrs: SmallVec::new(),
        })
    }

    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.arena.new_node(DocumentNode {
            kind: NodeKind::Comment {
                text: text.to_owned(),
            },
            attrs: SmallVec::new(),
        })
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// # Errors
    /// Returns an error if the append would create a cycle or either node was removed.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), Error> {
        parent
            .checked_append(child, &mut self.arena)
            .map_err(|err| anyhow!("cannot append {child} to {parent}: {err}"))
    }

    /// Set or replace an attribute. Setting attributes on non-elements is ignored.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(entry) = self.arena.get_mut(node) else {
            return;
        };
        let data = entry.get_mut();
        if !matches!(data.kind, NodeKind::Element { .. }) {
            log::debug!("ignoring attribute {name} on non-element {node}");
            return;
        }
        let name = name.to_ascii_lowercase();
        if let Some(slot) = data.attrs.iter_mut().find(|(attr, _)| *attr == name) {
            value.clone_into(&mut slot.1);
        } else {
            data.attrs.push((name, value.to_owned()));
        }
    }

    /// Detach a subtree from its parent. The nodes stay valid but are no longer attached.
    pub fn detach(&mut self, node: NodeId) {
        node.detach(&mut self.arena);
    }
}
