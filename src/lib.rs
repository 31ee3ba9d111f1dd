//! # phylo-link
//!
//! phylo-link is a Rust library for working with the topology of
//! phylogenetic trees. It provides the in-memory tree representation
//! (nodes, edges, and the winged links connecting them), the Newick-style
//! textual serialization read and written through a flat broker
//! intermediate, and a family of traversal iterators (pre-order,
//! post-order, level-order, Euler tour) that operate over the topology
//! regardless of which per-node or per-edge data a consumer attaches.
//!
//! ## Design
//!
//! The cyclic Node↔Edge↔Link graph is stored as an arena of three dense,
//! index-addressed collections, so there are no ownership cycles and a
//! deep copy is an index-preserving clone. Payloads are opaque trait
//! objects with a clone-and-type-tag capability; the engine never looks
//! inside them.
//!
//! ## Concurrency
//!
//! Everything here is single-threaded and synchronous. Traversal iterators
//! hold a shared borrow of their tree, so the borrow checker rules out
//! mutation during an open traversal; callers needing parallel access
//! serialize externally or clone the tree per worker.
//!
//! ## Usage
//!
//! ```
//! use phylo_link::prelude::*;
//!
//! let tree = NewickReader::new().read_str("((A:0.2,B:0.3)C:0.5,D:0.8)root;")?;
//! assert_eq!(tree.node_count(), 5);
//! for visit in tree.preorder()? {
//!     let _ = tree.node_data_as::<CommonNodeData>(visit.node)?;
//! }
//! let text = NewickWriter::new().write_str(&tree)?;
//! assert_eq!(text, "((A:0.2,B:0.3)C:0.5,D:0.8)root;");
//! # Ok::<(), phylo_link::tree_error::TreeError>(())
//! ```

pub mod debug_invariants;
pub mod io;
pub mod topology;
pub mod traversal;
pub mod tree_error;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude importing the most-used types.
pub mod prelude {
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::io::newick::{
        BrokerReport, MissingLength, NewickBroker, NewickBrokerElement, NewickReader,
        NewickWriter, Quoting,
    };
    pub use crate::io::source::{ByteSource, InMemorySource, ReaderSource};
    pub use crate::topology::common::{CommonEdgeData, CommonNodeData};
    pub use crate::topology::data::{EdgeData, NodeData};
    pub use crate::topology::id::{EdgeId, LinkId, NodeId};
    pub use crate::topology::tree::Tree;
    pub use crate::topology::validation::validate_topology;
    pub use crate::traversal::{EulerTour, LevelVisit, Levelorder, Postorder, Preorder, Visit};
    pub use crate::tree_error::TreeError;
}
