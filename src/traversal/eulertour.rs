//! Euler tour: visits a node every time the traversal enters or leaves one
//! of its subtrees, by hopping `outer` then `next` from link to link.
//!
//! For a tree with `E >= 1` edges the tour has length `2E + 1`: every link
//! is crossed exactly once and the start node is visited once more when
//! the tour closes. A single-node tree yields exactly one visit. Callers
//! needing constant-time ancestor or depth queries feed this sequence into
//! their own range-query structures.

use super::Visit;
use crate::topology::id::LinkId;
use crate::topology::tree::Tree;
use crate::tree_error::TreeError;

/// Lazy Euler-tour iterator.
pub struct EulerTour<'t> {
    tree: &'t Tree,
    start: LinkId,
    current: LinkId,
    pending_start: bool,
    done: bool,
}

impl<'t> EulerTour<'t> {
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
        Ok(EulerTour {
            tree,
            start: entry,
            current: entry,
            pending_start: true,
            done: false,
        })
    }
}

impl<'t> Iterator for EulerTour<'t> {
    type Item = Visit;

    fn next(&mut self) -> Option<Visit> {
        if self.done {
            return None;
        }
        if self.pending_start {
            self.pending_start = false;
            if self.tree.edge_count() == 0 {
                self.done = true;
            }
            return Some(Visit {
                link: self.start,
                node: self.tree.link_raw(self.start).node(),
                edge: None,
            });
        }

        // Cross the current link's edge, then move one step around the
        // ring on the far side.
        let crossed = self.tree.link_raw(self.current).edge();
        let next = self.tree.next_raw(self.tree.outer_raw(self.current));
        if next == self.start {
            self.done = true;
        }
        self.current = next;
        Some(Visit {
            link: next,
            node: self.tree.link_raw(next).node(),
            edge: crossed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::common::CommonNodeData;
    use crate::topology::data::NodeData;

    fn named(name: &str) -> Option<Box<dyn NodeData>> {
        Some(Box::new(CommonNodeData::named(name)))
    }

    #[test]
    fn tour_length_is_2e_plus_1() {
        let mut t = Tree::with_root(named("r"));
        let root = t.root_node().unwrap();
        for name in ["a", "b", "c"] {
            t.attach_leaf(root, named(name), None).unwrap();
        }
        let visits: Vec<Visit> = EulerTour::new(&t).unwrap().collect();
        assert_eq!(visits.len(), 2 * t.edge_count() + 1);
        // Star tour: r a r b r c r.
        let names: Vec<String> = visits
            .iter()
            .map(|v| {
                t.node_data_as::<CommonNodeData>(v.node)
                    .unwrap()
                    .unwrap()
                    .name
                    .clone()
            })
            .collect();
        assert_eq!(names, ["r", "a", "r", "b", "r", "c", "r"]);
    }

    #[test]
    fn single_node_tour_has_length_one() {
        let t = Tree::with_root(named("only"));
        let visits: Vec<Visit> = EulerTour::new(&t).unwrap().collect();
        assert_eq!(visits.len(), 1);
    }

    #[test]
    fn every_edge_crossed_twice() {
        let mut t = Tree::with_root(named("r"));
        let root = t.root_node().unwrap();
        let (a, _) = t.attach_leaf(root, named("a"), None).unwrap();
        t.attach_leaf(a, named("b"), None).unwrap();

        let mut crossings = vec![0usize; t.edge_count()];
        for v in EulerTour::new(&t).unwrap() {
            if let Some(e) = v.edge {
                crossings[e.index()] += 1;
            }
        }
        assert!(crossings.iter().all(|&c| c == 2));
    }
}
