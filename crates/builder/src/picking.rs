//! Click handling between the user and a [`SelectorPathBuilder`].

use selpath_html::NodeId;

use crate::error::BuilderError;
use crate::merge::Scope;
use crate::session::SelectorPathBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    /// No pick was requested; the click is not ours.
    NotPicking,
    /// The click landed on the tool's own UI. Picking stays active.
    InsideHost,
    Picked(Scope),
}

/// Tracks whether the next click picks a main or relative node.
#[derive(Debug, Clone, Default)]
pub struct PickingSession {
    pending: Option<Scope>,
    host: Option<NodeId>,
}

impl PickingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clicks inside the subtree of `host` never pick.
    pub fn with_host(host: NodeId) -> Self {
        Self {
            pending: None,
            host: Some(host),
        }
    }

    pub fn start_picking(&mut self, scope: Scope) {
        log::debug!(target: "selpath_builder", "picking {scope} node");
        self.pending = Some(scope);
    }

    pub fn end_picking(&mut self) {
        self.pending = None;
    }

    pub fn picking(&self) -> Option<Scope> {
        self.pending
    }

    /// Route a click on `node` to the builder when a pick is pending.
    ///
    /// # Errors
    /// Propagates [`BuilderError::InvalidPick`] from the builder. Picking ends either way.
    pub fn handle_click(
        &mut self,
        builder: &mut SelectorPathBuilder<'_>,
        node: NodeId,
    ) -> Result<PickOutcome, BuilderError> {
        let Some(scope) = self.pending else {
            return Ok(PickOutcome::NotPicking);
        };
        if self
            .host
            .is_some_and(|host| builder.document().contains(host, node))
        {
            return Ok(PickOutcome::InsideHost);
        }
        self.pending = None;
        match scope {
            Scope::Main => builder.on_primary_pick(node)?,
            Scope::Relative => builder.on_relative_pick(node)?,
        }
        Ok(PickOutcome::Picked(scope))
    }
}
