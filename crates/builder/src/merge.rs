//! Flattened view of the primary path with the relative branch spliced in.

use core::fmt;
use core::str::FromStr;

use selpath_html::{Document, NodeId};

use crate::arena::{DescriptorArena, DescriptorId};
use crate::path::{Path, RelativePath};

/// Which of the two paths an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Main,
    Relative,
}

impl fmt::Display for Scope {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Main => "main",
            Self::Relative => "relative",
        })
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "main" => Ok(Self::Main),
            "relative" => Ok(Self::Relative),
            _ => Err(value.to_owned()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub handle: DescriptorId,
    pub node: NodeId,
    pub tag: String,
    pub depth: usize,
    pub scope: Scope,
    /// Set on the primary entry the relative branch hangs from.
    pub common_parent: bool,
}

/// Pre-order listing: the main chain, then the relative branch as the
/// common parent's second child.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedTree {
    entries: Vec<TreeEntry>,
}

impl MergedTree {
    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn common_parent(&self) -> Option<&TreeEntry> {
        self.entries.iter().find(|entry| entry.common_parent)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for MergedTree {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            write!(formatter, "{:indent$}{}", "", entry.tag, indent = entry.depth * 2)?;
            if entry.common_parent {
                formatter.write_str(" *")?;
            }
            if entry.scope == Scope::Relative {
                formatter.write_str(" (relative)")?;
            }
            writeln!(formatter)?;
        }
        Ok(())
    }
}

pub fn merge(
    document: &Document,
    arena: &DescriptorArena,
    primary: &Path,
    relative: Option<&RelativePath>,
) -> MergedTree {
    let common = relative
        .and_then(RelativePath::shared)
        .and_then(|shared| primary.position(shared));
    let entry = |handle: DescriptorId, depth: usize, scope: Scope| {
        let node = arena.get(handle)?.node();
        Some(TreeEntry {
            handle,
            node,
            tag: document.tag_name(node).unwrap_or_default(),
            depth,
            scope,
            common_parent: scope == Scope::Main && common == Some(depth),
        })
    };

    let mut entries: Vec<TreeEntry> = primary
        .handles()
        .iter()
        .enumerate()
        .filter_map(|(depth, handle)| entry(*handle, depth, Scope::Main))
        .collect();
    if let Some(relative) = relative {
        let base = common.map_or(0, |position| position + 1);
        entries.extend(
            relative
                .branch()
                .iter()
                .enumerate()
                .filter_map(|(offset, handle)| entry(*handle, base + offset, Scope::Relative)),
        );
    }
    MergedTree { entries }
}
