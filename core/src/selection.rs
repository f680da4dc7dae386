//! The viewport's explicit selection object.
//!
//! Selection is owned by the viewport and passed by reference to whatever
//! needs it (hierarchy panels, property editors, the gizmo) — there is no
//! process-wide "currently selected node".

use std::collections::HashSet;

use crate::scene::NodeId;

/// Ordered multi-selection of scene nodes with a primary entry.
///
/// The set gives O(1) membership tests; the vector preserves selection
/// order for UI listings. The primary selection is the last node selected
/// and is the gizmo's drag target.
#[derive(Debug, Default)]
pub struct SelectionManager {
    selected: HashSet<NodeId>,
    order: Vec<NodeId>,
    primary: Option<NodeId>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Queries ==========

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.selected.contains(&node)
    }

    pub fn primary(&self) -> Option<NodeId> {
        self.primary
    }

    /// Selected nodes in selection order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.order
    }

    // ========== Mutation ==========

    pub fn clear(&mut self) {
        self.selected.clear();
        self.order.clear();
        self.primary = None;
    }

    /// Makes `node` the only selection.
    pub fn set(&mut self, node: NodeId) {
        self.clear();
        self.add(node);
    }

    /// Adds to the selection and makes `node` primary.
    pub fn add(&mut self, node: NodeId) {
        if self.selected.insert(node) {
            self.order.push(node);
        }
        self.primary = Some(node);
    }

    /// Removes a node from the selection, returning whether it was present.
    ///
    /// Also the defensive path for deleted nodes: the primary falls back to
    /// the most recent remaining selection rather than dangling.
    pub fn remove(&mut self, node: NodeId) -> bool {
        if !self.selected.remove(&node) {
            return false;
        }
        self.order.retain(|&id| id != node);
        if self.primary == Some(node) {
            self.primary = self.order.last().copied();
        }
        true
    }

    pub fn toggle(&mut self, node: NodeId) {
        if self.contains(node) {
            self.remove(node);
        } else {
            self.add(node);
        }
    }
}
