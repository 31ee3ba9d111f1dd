//! Pre-order traversal: a node before any of its descendants, children in
//! ring order, root first.

use super::Visit;
use crate::topology::id::LinkId;
use crate::topology::tree::Tree;
use crate::tree_error::TreeError;

/// Lazy pre-order iterator. Restartable by constructing a fresh one.
pub struct Preorder<'t> {
    tree: &'t Tree,
    /// The start visit, pending until the first `next` call.
    start: Option<Visit>,
    /// Down-links whose far subtree is still to be entered; pushed in
    /// reverse ring order so pops come out in ring order.
    stack: Vec<LinkId>,
}

impl<'t> Preorder<'t> {
    pub(crate) fn new(tree: &'t Tree) -> Result<Self, TreeError> {
        if tree.is_empty() {
            return Err(TreeError::EmptyTree);
        }
        Self::from_link(tree, tree.root_link()?)
    }

    pub(crate) fn from_link(tree: &'t Tree, entry: LinkId) -> Result<Self, TreeError> {
        if tree.is_empty() {
            return Err(TreeError::EmptyTree);
        }
        tree.link(entry)?;
        let node = tree.link_raw(entry).node();
        let mut stack: Vec<LinkId> = tree
            .ring(entry)
            .filter(|&l| tree.link_raw(l).edge().is_some())
            .collect();
        stack.reverse();
        Ok(Preorder {
            tree,
            start: Some(Visit {
                link: entry,
                node,
                edge: None,
            }),
            stack,
        })
    }
}

impl<'t> Iterator for Preorder<'t> {
    type Item = Visit;

    fn next(&mut self) -> Option<Visit> {
        if let Some(start) = self.start.take() {
            return Some(start);
        }
        let down = self.stack.pop()?;
        let up = self.tree.outer_raw(down);
        let node = self.tree.link_raw(up).node();

        // Ring neighbors of the link just arrived through, skipping it,
        // reversed so the first child is popped first.
        let base = self.stack.len();
        for l in self.tree.ring(up).skip(1) {
            if self.tree.link_raw(l).edge().is_some() {
                self.stack.push(l);
            }
        }
        self.stack[base..].reverse();

        Some(Visit {
            link: up,
            node,
            edge: self.tree.link_raw(up).edge(),
        })
    }
}
