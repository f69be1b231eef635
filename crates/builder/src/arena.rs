use std::collections::HashMap;

use selpath_html::NodeId;

use crate::descriptor::NodeDescriptor;

/// Handle to a descriptor stored in a [`DescriptorArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DescriptorId(usize);

impl DescriptorId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Dense store of descriptors, at most one per node.
#[derive(Debug, Default)]
pub struct DescriptorArena {
    descriptors: Vec<NodeDescriptor>,
    index: HashMap<NodeId, DescriptorId>,
}

impl DescriptorArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptor for `node`, created unrefined when missing.
    pub fn insert(&mut self, node: NodeId) -> DescriptorId {
        if let Some(existing) = self.index.get(&node) {
            return *existing;
        }
        let id = DescriptorId(self.descriptors.len());
        self.descriptors.push(NodeDescriptor::new(node));
        self.index.insert(node, id);
        id
    }

    pub fn lookup(&self, node: NodeId) -> Option<DescriptorId> {
        self.index.get(&node).copied()
    }

    pub fn get(&self, id: DescriptorId) -> Option<&NodeDescriptor> {
        self.descriptors.get(id.0)
    }

    pub fn get_mut(&mut self, id: DescriptorId) -> Option<&mut NodeDescriptor> {
        self.descriptors.get_mut(id.0)
    }

    /// Drop every descriptor created after the first `len`.
    pub fn truncate(&mut self, len: usize) {
        self.descriptors.truncate(len);
        self.index.retain(|_, id| id.0 < len);
    }

    pub fn clear(&mut self) {
        self.descriptors.clear();
        self.index.clear();
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
