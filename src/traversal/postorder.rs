//! Post-order traversal: a node after all of its descendants, children in
//! ring order, root last.
//!
//! The visit schedule is the reversal of a pre-order pass that expands
//! children in reverse ring order; it is computed once at construction
//! (O(nodes)) and then handed out lazily.

use super::Visit;
use crate::topology::id::LinkId;
use crate::topology::tree::Tree;
use crate::tree_error::TreeError;

/// Lazy post-order iterator over a precomputed schedule.
pub struct Postorder {
    schedule: std::vec::IntoIter<Visit>,
}

impl Postorder {
    pub(crate) fn new(tree: &Tree) -> Result<Self, TreeError> {
        if tree.is_empty() {
            return Err(TreeError::EmptyTree);
        }
        Self::from_link(tree, tree.root_link()?)
    }

    pub(crate) fn from_link(tree: &Tree, entry: LinkId) -> Result<Self, TreeError> {
        if tree.is_empty() {
            return Err(TreeError::EmptyTree);
        }
        tree.link(entry)?;

        // Pre-order with children expanded in ring order (so pops come out
        // in reverse ring order); reversing the whole sequence then yields
        // children-before-parent with children back in ring order.
        let mut schedule = Vec::with_capacity(tree.node_count());
        let node = tree.link_raw(entry).node();
        schedule.push(Visit {
            link: entry,
            node,
            edge: None,
        });
        let mut stack: Vec<LinkId> = tree
            .ring(entry)
            .filter(|&l| tree.link_raw(l).edge().is_some())
            .collect();
        while let Some(down) = stack.pop() {
            let up = tree.outer_raw(down);
            schedule.push(Visit {
                link: up,
                node: tree.link_raw(up).node(),
                edge: tree.link_raw(up).edge(),
            });
            stack.extend(
                tree.ring(up)
                    .skip(1)
                    .filter(|&l| tree.link_raw(l).edge().is_some()),
            );
        }
        schedule.reverse();
        Ok(Postorder {
            schedule: schedule.into_iter(),
        })
    }
}

impl Iterator for Postorder {
    type Item = Visit;

    fn next(&mut self) -> Option<Visit> {
        self.schedule.next()
    }
}
