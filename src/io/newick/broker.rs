//! The broker: a flat, order-preserving intermediate between tree text and
//! tree topology.
//!
//! Text parses into broker elements and trees serialize out of them; the
//! broker is what lets structure be validated (and diagnosed) before a
//! single node, edge, or link is allocated.
//!
//! Elements are kept root-first: an element is pushed to the top whenever
//! its subtree closes during parsing, and a post-order writer pass pushes
//! parents on top of their already-pushed children, so both directions end
//! up with the root at the front. Within one parent, children sit in
//! reverse input order; the conversion in [`NewickBroker::to_tree`]
//! restores input order through its link stack.

use super::element::NewickBrokerElement;
use crate::topology::data::{EdgeData, NodeData};
use crate::topology::id::LinkId;
use crate::topology::tree::Tree;
use crate::tree_error::TreeError;
use itertools::Itertools;
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::collections::VecDeque;

/// Flat stack of broker elements, root at the top (front).
#[derive(Debug, Clone, Default)]
pub struct NewickBroker {
    stack: VecDeque<NewickBrokerElement>,
    /// Child counts per element, computed on demand.
    ranks: OnceCell<Vec<usize>>,
}

/// One defect found by [`NewickBroker::validate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BrokerIssue {
    /// An element's nesting rank is below the starting level: more groups
    /// were closed than opened.
    NegativeDepth { index: usize, depth: i32 },
    /// An element is nested more than one level below its predecessor,
    /// implying a node that does not exist.
    DepthJump { index: usize, from: i32, to: i32 },
    /// The top element is not at the starting level: some group was never
    /// closed.
    DanglingRoot { depth: i32 },
    /// A second element at the starting level: the sequence holds more
    /// than one tree.
    SecondRoot { index: usize },
}

impl std::fmt::Display for BrokerIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BrokerIssue::NegativeDepth { index, depth } => {
                write!(f, "element {index} at negative nesting rank {depth}")
            }
            BrokerIssue::DepthJump { index, from, to } => {
                write!(f, "element {index} jumps nesting rank from {from} to {to}")
            }
            BrokerIssue::DanglingRoot { depth } => {
                write!(f, "top element at rank {depth}, unclosed group")
            }
            BrokerIssue::SecondRoot { index } => {
                write!(f, "element {index} starts a second tree")
            }
        }
    }
}

/// Structured result of [`NewickBroker::validate`]: callers can inspect
/// every defect before deciding whether to abort a multi-tree read.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BrokerReport {
    pub issues: Vec<BrokerIssue>,
}

impl BrokerReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

impl std::fmt::Display for BrokerReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.issues.is_empty() {
            write!(f, "valid")
        } else {
            write!(f, "{}", self.issues.iter().join("; "))
        }
    }
}

impl NewickBroker {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------
    // Modifiers
    // ---------------------------------------------------------------------

    pub fn clear(&mut self) {
        self.stack.clear();
        self.ranks.take();
    }

    /// Pushes a finished element on top of the stack (toward the root end).
    pub fn push_top(&mut self, element: NewickBrokerElement) {
        self.stack.push_front(element);
        self.ranks.take();
    }

    /// Pushes an element at the bottom of the stack (the deep end).
    pub fn push_bottom(&mut self, element: NewickBrokerElement) {
        self.stack.push_back(element);
        self.ranks.take();
    }

    pub fn pop_top(&mut self) -> Option<NewickBrokerElement> {
        self.ranks.take();
        self.stack.pop_front()
    }

    pub fn pop_bottom(&mut self) -> Option<NewickBrokerElement> {
        self.ranks.take();
        self.stack.pop_back()
    }

    // ---------------------------------------------------------------------
    // Properties and element access
    // ---------------------------------------------------------------------

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Bounds-checked element access, root-first.
    pub fn at(&self, index: usize) -> Result<&NewickBrokerElement, TreeError> {
        self.stack.get(index).ok_or(TreeError::OutOfRange {
            kind: crate::tree_error::EntityKind::Node,
            index,
            size: self.stack.len(),
        })
    }

    /// The element nearest the root end.
    pub fn top(&self) -> Option<&NewickBrokerElement> {
        self.stack.front()
    }

    /// The element at the deep end.
    pub fn bottom(&self) -> Option<&NewickBrokerElement> {
        self.stack.back()
    }

    /// Iterates elements root-first; reversible for renderers that need
    /// the deep end first.
    pub fn iter(
        &self,
    ) -> impl DoubleEndedIterator<Item = &NewickBrokerElement> + ExactSizeIterator {
        self.stack.iter()
    }

    // ---------------------------------------------------------------------
    // Rank table
    // ---------------------------------------------------------------------

    /// Child counts per element, root-first. One stack pass, cached until
    /// the next modification.
    pub fn ranks(&self) -> &[usize] {
        self.ranks.get_or_init(|| {
            let mut ranks = vec![0usize; self.stack.len()];
            let mut parents: Vec<usize> = Vec::new();
            for (i, el) in self.stack.iter().enumerate() {
                while parents
                    .last()
                    .is_some_and(|&p| self.stack[p].depth >= el.depth)
                {
                    parents.pop();
                }
                if let Some(&p) = parents.last() {
                    ranks[p] += 1;
                }
                parents.push(i);
            }
            ranks
        })
    }

    /// Number of elements with no children.
    pub fn leaf_count(&self) -> usize {
        self.ranks().iter().filter(|&&r| r == 0).count()
    }

    /// Number of elements with children.
    pub fn inner_count(&self) -> usize {
        self.len() - self.leaf_count()
    }

    /// The highest child count in the sequence; 0 for an empty broker.
    pub fn max_rank(&self) -> usize {
        self.ranks().iter().copied().max().unwrap_or(0)
    }

    /// `true` if every inner element has exactly two children.
    pub fn is_bifurcating(&self) -> bool {
        self.max_rank() == 2 && self.ranks().iter().all(|&r| r == 0 || r == 2)
    }

    // ---------------------------------------------------------------------
    // Validation
    // ---------------------------------------------------------------------

    /// Checks that the element sequence can represent a single, properly
    /// nested tree. Reports every defect instead of stopping at the first,
    /// so reader pipelines can diagnose before deciding to abort.
    pub fn validate(&self) -> BrokerReport {
        let mut report = BrokerReport::default();
        let mut prev_depth = 0i32;
        for (i, el) in self.stack.iter().enumerate() {
            if el.depth < 0 {
                report.issues.push(BrokerIssue::NegativeDepth {
                    index: i,
                    depth: el.depth,
                });
            }
            if i == 0 {
                if el.depth != 0 {
                    report.issues.push(BrokerIssue::DanglingRoot { depth: el.depth });
                }
            } else {
                if el.depth == 0 {
                    report.issues.push(BrokerIssue::SecondRoot { index: i });
                }
                if el.depth > prev_depth + 1 {
                    report.issues.push(BrokerIssue::DepthJump {
                        index: i,
                        from: prev_depth,
                        to: el.depth,
                    });
                }
            }
            prev_depth = el.depth;
        }
        report
    }

    // ---------------------------------------------------------------------
    // Conversion to topology
    // ---------------------------------------------------------------------

    /// Builds a tree in one root-first pass over the elements, using an
    /// explicit stack of down-links that still await their child.
    ///
    /// Each element becomes one node; every element but the first also
    /// closes one down-link from the stack into a full edge. The root gets
    /// no up-link: its ring consists of its child links, the first of
    /// which becomes the tree's root link. A branch length on the root
    /// element has no edge to live on and is dropped with a warning.
    ///
    /// The hooks translate an element into the payloads to attach; they
    /// see every element, including the root.
    pub fn to_tree(
        &self,
        node_hook: &dyn Fn(&NewickBrokerElement) -> Option<Box<dyn NodeData>>,
        edge_hook: &dyn Fn(&NewickBrokerElement) -> Option<Box<dyn EdgeData>>,
    ) -> Result<Tree, TreeError> {
        let report = self.validate();
        if !report.is_valid() {
            return Err(TreeError::UnbalancedStructure(report.to_string()));
        }
        if self.is_empty() {
            return Ok(Tree::new());
        }

        let ranks = self.ranks().to_vec();
        let mut tree = Tree::new();
        let mut link_stack: Vec<LinkId> = Vec::new();

        for (i, el) in self.stack.iter().enumerate() {
            let node = tree.alloc_node(node_hook(el));

            let entry = if i == 0 {
                if el.branch_length.is_some() {
                    log::warn!("branch length on the root element has no edge; dropped");
                }
                None
            } else {
                let up = tree.alloc_link(node);
                let down = link_stack.pop().ok_or_else(|| {
                    TreeError::UnbalancedStructure("element without an open parent".into())
                })?;
                tree.link_raw_mut(up).outer = down;
                tree.link_raw_mut(down).outer = up;
                let edge = tree.alloc_edge(down, up, edge_hook(el));
                tree.link_raw_mut(up).edge = Some(edge);
                tree.link_raw_mut(down).edge = Some(edge);
                Some(up)
            };

            // Down-links for the children to come. Popped back-first, which
            // meets the reverse child order of the stack and restores input
            // order in the ring.
            let rank = ranks[i];
            let mut downs = Vec::with_capacity(rank);
            for _ in 0..rank {
                downs.push(tree.alloc_link(node));
            }

            match entry {
                Some(up) => {
                    let mut prev = up;
                    for &dl in &downs {
                        tree.link_raw_mut(prev).next = dl;
                        prev = dl;
                    }
                    tree.link_raw_mut(prev).next = up;
                    tree.nodes[node.index()].link = up;
                }
                None if rank == 0 => {
                    // Single-element broker: one node with its self-link.
                    let l = tree.alloc_link(node);
                    tree.nodes[node.index()].link = l;
                    tree.root_link = Some(l);
                }
                None => {
                    for (j, &dl) in downs.iter().enumerate() {
                        tree.link_raw_mut(dl).next = downs[(j + 1) % rank];
                    }
                    tree.nodes[node.index()].link = downs[0];
                    tree.root_link = Some(downs[0]);
                }
            }
            link_stack.extend(downs);
        }

        if !link_stack.is_empty() {
            return Err(TreeError::UnbalancedStructure(
                "open parent left without children".into(),
            ));
        }
        Ok(tree)
    }
}
