//! Level-order (breadth-first) traversal: nodes grouped by non-decreasing
//! depth, children in ring order, optionally bounded by a maximum depth.

use super::Visit;
use crate::topology::id::LinkId;
use crate::topology::tree::Tree;
use crate::tree_error::TreeError;
use std::collections::VecDeque;

/// A [`Visit`] plus the depth of the visited node below the traversal
/// start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelVisit {
    pub visit: Visit,
    pub depth: usize,
}

/// Lazy breadth-first iterator using an explicit link queue.
pub struct Levelorder<'t> {
    tree: &'t Tree,
    start: Option<Visit>,
    /// Down-links to cross, with the depth of the node on their far side.
    queue: VecDeque<(LinkId, usize)>,
    /// Inclusive depth bound; nodes deeper than this are never enqueued.
    max_depth: Option<usize>,
}

impl<'t> Levelorder<'t> {
    pub(crate) fn new(tree: &'t Tree, max_depth: Option<usize>) -> Result<Self, TreeError> {
        if tree.is_empty() {
            return Err(TreeError::EmptyTree);
        }
        Self::from_link(tree, tree.root_link()?, max_depth)
    }

    pub(crate) fn from_link(
        tree: &'t Tree,
        entry: LinkId,
        max_depth: Option<usize>,
    ) -> Result<Self, TreeError> {
        if tree.is_empty() {
            return Err(TreeError::EmptyTree);
        }
        tree.link(entry)?;
        let node = tree.link_raw(entry).node();
        let mut queue = VecDeque::new();
        if max_depth != Some(0) {
            for l in tree.ring(entry) {
                if tree.link_raw(l).edge().is_some() {
                    queue.push_back((l, 1));
                }
            }
        }
        Ok(Levelorder {
            tree,
            start: Some(Visit {
                link: entry,
                node,
                edge: None,
            }),
            queue,
            max_depth,
        })
    }
}

impl<'t> Iterator for Levelorder<'t> {
    type Item = LevelVisit;

    fn next(&mut self) -> Option<LevelVisit> {
        if let Some(start) = self.start.take() {
            return Some(LevelVisit {
                visit: start,
                depth: 0,
            });
        }
        let (down, depth) = self.queue.pop_front()?;
        let up = self.tree.outer_raw(down);
        let node = self.tree.link_raw(up).node();

        if self.max_depth.is_none_or(|m| depth < m) {
            for l in self.tree.ring(up).skip(1) {
                if self.tree.link_raw(l).edge().is_some() {
                    self.queue.push_back((l, depth + 1));
                }
            }
        }

        Some(LevelVisit {
            visit: Visit {
                link: up,
                node,
                edge: self.tree.link_raw(up).edge(),
            },
            depth,
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

    fn build_two_levels() -> Tree {
        let mut t = Tree::with_root(named("r"));
        let root = t.root_node().unwrap();
        let (a, _) = t.attach_leaf(root, named("a"), None).unwrap();
        t.attach_leaf(root, named("b"), None).unwrap();
        t.attach_leaf(a, named("c"), None).unwrap();
        t
    }

    #[test]
    fn breadth_first_in_ring_order() {
        let t = build_two_levels();
        let visited: Vec<(String, usize)> = Levelorder::new(&t, None)
            .unwrap()
            .map(|lv| {
                (
                    t.node_data_as::<CommonNodeData>(lv.visit.node)
                        .unwrap()
                        .unwrap()
                        .name
                        .clone(),
                    lv.depth,
                )
            })
            .collect();
        assert_eq!(
            visited,
            [
                ("r".to_string(), 0),
                ("a".to_string(), 1),
                ("b".to_string(), 1),
                ("c".to_string(), 2)
            ]
        );
    }

    #[test]
    fn depth_bound_is_inclusive() {
        let t = build_two_levels();
        let count = Levelorder::new(&t, Some(1)).unwrap().count();
        assert_eq!(count, 3);
        let only_root = Levelorder::new(&t, Some(0)).unwrap().count();
        assert_eq!(only_root, 1);
    }
}
