use selpath_html::{Document, NodeId};

use crate::arena::{DescriptorArena, DescriptorId};
use crate::config::BuilderConfig;
use crate::descriptor::{NodeDescriptor, available_attributes};
use crate::error::BuilderError;
use crate::merge::{MergedTree, Scope, merge};
use crate::path::{Path, RelativePath, build_path, build_relative_path, validate_pick};
use crate::render::{Anchoring, Grammar, has_positional_conflict, render};
use crate::resolve::{resolve_query, resolve_query_from};

/// One row of a path as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    pub handle: DescriptorId,
    pub node: NodeId,
    pub tag: String,
    pub attributes: Vec<(String, Vec<String>)>,
    pub has_positional_conflict: bool,
}

/// Owns the picked paths and their refinements for one document.
#[derive(Debug)]
pub struct SelectorPathBuilder<'doc> {
    document: &'doc Document,
    config: BuilderConfig,
    arena: DescriptorArena,
    primary: Path,
    relative: Option<RelativePath>,
    grammar: Grammar,
}

impl<'doc> SelectorPathBuilder<'doc> {
    pub fn new(document: &'doc Document, config: BuilderConfig) -> Self {
        let grammar = config.grammar();
        Self {
            document,
            config,
            arena: DescriptorArena::new(),
            primary: Path::default(),
            relative: None,
            grammar,
        }
    }

    pub fn document(&self) -> &'doc Document {
        self.document
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Replace both paths with the chain of `node`. All refinements are discarded.
    ///
    /// # Errors
    /// [`BuilderError::InvalidPick`] if `node` cannot head a path; state is unchanged.
    pub fn on_primary_pick(&mut self, node: NodeId) -> Result<(), BuilderError> {
        validate_pick(self.document, node)?;
        self.arena.clear();
        self.relative = None;
        self.primary = build_path(self.document, &mut self.arena, node);
        log::debug!(target: "selpath_builder", "primary pick {node:?}, path length {}", self.primary.len());
        Ok(())
    }

    /// Replace the relative path with the chain of `node`, cut at its nearest
    /// ancestor on the primary path.
    ///
    /// # Errors
    /// [`BuilderError::InvalidPick`] if `node` cannot head a path; state is unchanged.
    pub fn on_relative_pick(&mut self, node: NodeId) -> Result<(), BuilderError> {
        validate_pick(self.document, node)?;
        self.arena.truncate(self.primary.len());
        let relative = build_relative_path(self.document, &mut self.arena, node, &self.primary);
        log::debug!(
            target: "selpath_builder",
            "relative pick {node:?}, branch length {}",
            relative.branch().len()
        );
        self.relative = Some(relative);
        Ok(())
    }

    fn handles(&self, scope: Scope) -> &[DescriptorId] {
        match scope {
            Scope::Main => self.primary.handles(),
            Scope::Relative => self.relative.as_ref().map(RelativePath::branch).unwrap_or_default(),
        }
    }

    fn handle(&self, scope: Scope, index: usize) -> Result<DescriptorId, BuilderError> {
        self.handles(scope)
            .get(index)
            .copied()
            .ok_or(BuilderError::UnknownEntry { scope, index })
    }

    pub fn descriptor(&self, scope: Scope, index: usize) -> Option<&NodeDescriptor> {
        let id = self.handles(scope).get(index)?;
        self.arena.get(*id)
    }

    /// The picked node of `scope`, if that scope has one.
    pub fn leaf(&self, scope: Scope) -> Option<NodeId> {
        let id = match scope {
            Scope::Main => self.primary.leaf(),
            Scope::Relative => self.relative.as_ref()?.leaf(),
        }?;
        self.arena.get(id).map(NodeDescriptor::node)
    }

    /// The common ancestor of the two paths.
    pub fn anchor(&self) -> Option<NodeId> {
        let shared = self.relative.as_ref()?.shared()?;
        self.arena.get(shared).map(NodeDescriptor::node)
    }

    pub fn has_common_ancestor(&self) -> bool {
        self.relative.as_ref().is_some_and(RelativePath::has_common_ancestor)
    }

    pub fn path(&self, scope: Scope) -> Vec<PathEntry> {
        self.handles(scope)
            .iter()
            .filter_map(|handle| {
                let descriptor = self.arena.get(*handle)?;
                let node = descriptor.node();
                Some(PathEntry {
                    handle: *handle,
                    node,
                    tag: self.document.tag_name(node).unwrap_or_default(),
                    attributes: descriptor.attributes().to_vec(),
                    has_positional_conflict: has_positional_conflict(self.document, node),
                })
            })
            .collect()
    }

    /// Toggleable attributes of one entry with their candidate values.
    ///
    /// # Errors
    /// [`BuilderError::UnknownEntry`] if `scope` has no entry at `index`.
    pub fn available_attributes(&self, scope: Scope, index: usize) -> Result<Vec<(String, Vec<String>)>, BuilderError> {
        let node = self
            .arena
            .get(self.handle(scope, index)?)
            .map(NodeDescriptor::node)
            .ok_or(BuilderError::UnknownEntry { scope, index })?;
        Ok(available_attributes(self.document, node, &self.config))
    }

    /// Include or exclude an attribute value on one entry. Returns whether anything changed.
    ///
    /// # Errors
    /// [`BuilderError::UnknownEntry`] for a missing entry, otherwise the errors of
    /// [`NodeDescriptor::set_attribute_included`]. State is unchanged on error.
    pub fn toggle_attribute(
        &mut self,
        scope: Scope,
        index: usize,
        name: &str,
        value: &str,
        included: bool,
    ) -> Result<bool, BuilderError> {
        let result = self.handle(scope, index).and_then(|id| {
            let descriptor = self
                .arena
                .get_mut(id)
                .ok_or(BuilderError::UnknownEntry { scope, index })?;
            descriptor.set_attribute_included(self.document, &self.config, name, value, included)
        });
        if let Err(err) = &result {
            log::warn!(target: "selpath_builder", "rejected toggle of {name}={value} on {scope}[{index}]: {err}");
        }
        result
    }

    pub fn grammar(&self) -> Grammar {
        self.grammar
    }

    pub fn set_grammar(&mut self, grammar: Grammar) {
        self.grammar = grammar;
    }

    pub fn set_use_xpath(&mut self, use_xpath: bool) {
        self.set_grammar(if use_xpath { Grammar::XPath } else { Grammar::Css });
    }

    /// Query for the primary pick.
    pub fn render_query(&self) -> String {
        self.render_scope(Scope::Main)
    }

    /// Query for `scope`. The relative scope is anchored at the common ancestor
    /// when there is one and rendered as an absolute query otherwise.
    pub fn render_scope(&self, scope: Scope) -> String {
        let anchoring = if scope == Scope::Relative && self.has_common_ancestor() {
            Anchoring::Relative
        } else {
            Anchoring::Absolute
        };
        render(self.document, &self.arena, self.handles(scope), self.grammar, anchoring)
    }

    /// Resolve `query` in the current grammar against the whole document.
    ///
    /// # Errors
    /// [`BuilderError::MalformedQuery`] when the query does not parse.
    pub fn resolve_query(&self, query: &str) -> Result<Option<NodeId>, BuilderError> {
        resolve_query(self.document, query, self.grammar)
    }

    /// Resolve the rendered query of `scope` from where it is anchored.
    ///
    /// # Errors
    /// [`BuilderError::MalformedQuery`] when the rendered query does not parse.
    pub fn resolve_scope(&self, scope: Scope) -> Result<Option<NodeId>, BuilderError> {
        let query = self.render_scope(scope);
        match self.anchor().filter(|_| scope == Scope::Relative) {
            Some(anchor) => resolve_query_from(self.document, anchor, &query, self.grammar),
            None => resolve_query(self.document, &query, self.grammar),
        }
    }

    pub fn merged_tree(&self) -> MergedTree {
        merge(self.document, &self.arena, &self.primary, self.relative.as_ref())
    }
}
