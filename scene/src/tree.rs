use crate::node::{Node, NodeId};
use crate::scene::Scene;

/// Visitor for depth-first scene traversal.
///
/// `enter_node` runs pre-order and can prune: returning `false` skips the
/// node's subtree. `exit_node` runs post-order.
pub trait TreeVisitor {
    /// Called before a node's children; return `false` to skip the subtree.
    fn enter_node(&mut self, node: &Node) -> bool;

    /// Called after a node's children.
    fn exit_node(&mut self, _node: &Node) {}
}

/// Walks the tree depth-first starting at `node_id`.
///
/// Unknown ids are ignored so a visitor can never observe a half-removed
/// subtree.
pub fn walk_tree<V: TreeVisitor>(scene: &Scene, node_id: NodeId, visitor: &mut V) {
    let Some(node) = scene.node(node_id) else {
        return;
    };

    if visitor.enter_node(node) {
        for &child in node.children() {
            walk_tree(scene, child, visitor);
        }
    }

    visitor.exit_node(node);
}
