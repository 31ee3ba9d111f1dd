//! Rerooting: reassigning the root link and the toward-root orientation.
//!
//! Rerooting is pure relabeling. No node, edge, or link is allocated or
//! freed and no `next`/`outer` relation changes; the pass only rewrites
//! which link each node uses as its ring entry (so the entry points toward
//! the new root) and which of each edge's two links counts as primary.
//! The undirected shape of the tree is untouched.

use super::id::{LinkId, NodeId};
use super::tree::Tree;
use crate::tree_error::TreeError;

impl Tree {
    /// Makes `new_root` the tree's root link, re-orienting every edge in a
    /// single pass outward from it. O(edges).
    pub fn reroot_at_link(&mut self, new_root: LinkId) -> Result<(), TreeError> {
        if self.is_empty() {
            return Err(TreeError::InvalidTree("cannot reroot an empty tree".into()));
        }
        self.link(new_root)?;

        let root_node = self.link_raw(new_root).node();
        self.root_link = Some(new_root);
        self.nodes[root_node.index()].link = new_root;

        // Down-links whose far side has not been oriented yet.
        let mut stack: Vec<LinkId> = Vec::new();
        self.orient_ring(new_root, false, &mut stack);

        while let Some(down) = stack.pop() {
            let up = self.outer_raw(down);
            let child = self.link_raw(up).node();
            self.nodes[child.index()].link = up;
            self.orient_ring(up, true, &mut stack);
        }

        Ok(())
    }

    /// Makes the given node the root, using its current primary link as the
    /// new root link.
    pub fn reroot_at_node(&mut self, node: NodeId) -> Result<(), TreeError> {
        let link = self.node(node)?.primary_link();
        self.reroot_at_link(link)
    }

    /// Marks every edge met on this ring as pointing away from the new
    /// root and queues its far link for the outward sweep.
    fn orient_ring(&mut self, entry: LinkId, skip_entry: bool, stack: &mut Vec<LinkId>) {
        let ring: Vec<LinkId> = self.ring(entry).collect();
        for l in ring {
            if skip_entry && l == entry {
                continue;
            }
            if let Some(e) = self.link_raw(l).edge() {
                let outer = self.outer_raw(l);
                let edge = &mut self.edges[e.index()];
                edge.primary = l;
                edge.secondary = outer;
                stack.push(l);
            }
        }
    }
}
