//! TreeError: unified error type for phylo-link public APIs.
//!
//! Every fallible operation in the library reports through this enum, so that
//! callers driving a multi-tree input stream can match on the failure class
//! (structural versus lexical versus index misuse) and decide whether to skip
//! to the next tree or abort.

use thiserror::Error;

/// Which of the three arena collections an index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Node,
    Edge,
    Link,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Node => write!(f, "node"),
            EntityKind::Edge => write!(f, "edge"),
            EntityKind::Link => write!(f, "link"),
        }
    }
}

/// Unified error type for tree topology, traversal, and Newick I/O operations.
#[derive(Debug, Error)]
pub enum TreeError {
    /// An index into one of a Tree's collections is out of bounds.
    #[error("{kind} index {index} out of range (size {size})")]
    OutOfRange {
        kind: EntityKind,
        index: usize,
        size: usize,
    },
    /// The operation requires a non-empty, well-formed tree.
    #[error("invalid tree: {0}")]
    InvalidTree(String),
    /// Grouping delimiters in the input do not nest into a single tree.
    #[error("unbalanced tree structure: {0}")]
    UnbalancedStructure(String),
    /// A token could not be classified as a valid label or numeric length.
    #[error("malformed label or length at {at}: {msg}")]
    MalformedLabelOrLength { at: String, msg: String },
    /// An iterator was constructed over a tree with zero nodes.
    #[error("cannot traverse an empty tree")]
    EmptyTree,
    /// The underlying byte source of a streaming read failed.
    #[error("input source error: {0}")]
    Io(#[from] std::io::Error),
}

impl PartialEq for TreeError {
    fn eq(&self, other: &Self) -> bool {
        use TreeError::*;
        match (self, other) {
            (
                OutOfRange { kind, index, size },
                OutOfRange {
                    kind: k,
                    index: i,
                    size: s,
                },
            ) => kind == k && index == i && size == s,
            (InvalidTree(a), InvalidTree(b)) => a == b,
            (UnbalancedStructure(a), UnbalancedStructure(b)) => a == b,
            (
                MalformedLabelOrLength { at, msg },
                MalformedLabelOrLength { at: a, msg: m },
            ) => at == a && msg == m,
            (EmptyTree, EmptyTree) => true,
            // io::Error carries no useful equality; treat same-kind as equal.
            (Io(a), Io(b)) => a.kind() == b.kind(),
            _ => false,
        }
    }
}
