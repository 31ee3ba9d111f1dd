//! Top-level module for the tree topology engine.
//!
//! This module provides the core types for representing a multifurcating
//! phylogenetic tree as a winged-link structure. It includes:
//! - Dense index handles for nodes, edges, and links
//! - The `Tree` arena with topology queries, payload attachment, rerooting,
//!   and attach/detach mutation
//! - Payload capability traits and the common name/branch-length payloads
//! - Whole-tree invariant validation
//!
//! Most users will interact with [`tree::Tree`] and the handle types; the
//! individual record types matter mainly when walking rings by hand.

pub mod common;
pub mod data;
pub mod edge;
pub mod id;
pub mod link;
pub mod mutation;
pub mod node;
pub mod reroot;
pub mod tree;
pub mod validation;

pub use common::{CommonEdgeData, CommonNodeData};
pub use data::{EdgeData, NodeData};
pub use edge::Edge;
pub use id::{EdgeId, LinkId, NodeId};
pub use link::Link;
pub use node::Node;
pub use tree::{Ring, Tree};
pub use validation::validate_topology;
