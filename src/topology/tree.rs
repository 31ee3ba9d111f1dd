//! The `Tree` arena: flat, densely-indexed collections of nodes, edges, and
//! links, plus the distinguished root link.
//!
//! All relations between the three entity kinds are arena positions
//! ([`NodeId`]/[`EdgeId`]/[`LinkId`]), never owning pointers, so the cyclic
//! Node↔Edge↔Link graph has no ownership cycles and a deep copy is an
//! index-preserving clone of three vectors.
//!
//! Shape invariants maintained by every completed mutation:
//!
//! 1. `outer(outer(l)) == l` for every link `l`.
//! 2. Following `next` from any link returns to it after exactly
//!    `degree(node)` steps.
//! 3. Every edge owns two links that are mutual `outer`s.
//! 4. Exactly one link is the root link; each edge's primary link is the one
//!    nearer the root.
//! 5. Collections are 0-indexed and dense; `link_count == 2 * edge_count`
//!    for every tree with at least one edge.
//!
//! Degenerate shapes: a tree with zero nodes is the valid empty tree and has
//! no root link; a tree with one node holds a single self-link
//! (`next == outer == self`, no edge) that serves as the root link, so the
//! traversal and serialization machinery needs no special cases.

use super::data::{EdgeData, NodeData};
use super::edge::Edge;
use super::id::{EdgeId, LinkId, NodeId};
use super::link::Link;
use super::node::Node;
use crate::tree_error::{EntityKind, TreeError};

#[derive(Debug, Clone, Default)]
pub struct Tree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) links: Vec<Link>,
    pub(crate) root_link: Option<LinkId>,
}

impl Tree {
    /// Creates the empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------
    // Counts
    // ---------------------------------------------------------------------

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// `true` for the zero-node tree.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ---------------------------------------------------------------------
    // Bounds-checked element access
    // ---------------------------------------------------------------------

    /// The node at position `index` in the node collection.
    pub fn node_at(&self, index: usize) -> Result<&Node, TreeError> {
        self.nodes.get(index).ok_or(TreeError::OutOfRange {
            kind: EntityKind::Node,
            index,
            size: self.nodes.len(),
        })
    }

    /// The edge at position `index` in the edge collection.
    pub fn edge_at(&self, index: usize) -> Result<&Edge, TreeError> {
        self.edges.get(index).ok_or(TreeError::OutOfRange {
            kind: EntityKind::Edge,
            index,
            size: self.edges.len(),
        })
    }

    /// The link at position `index` in the link collection.
    pub fn link_at(&self, index: usize) -> Result<&Link, TreeError> {
        self.links.get(index).ok_or(TreeError::OutOfRange {
            kind: EntityKind::Link,
            index,
            size: self.links.len(),
        })
    }

    /// The node behind a handle.
    #[inline]
    pub fn node(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.node_at(id.index())
    }

    /// The edge behind a handle.
    #[inline]
    pub fn edge(&self, id: EdgeId) -> Result<&Edge, TreeError> {
        self.edge_at(id.index())
    }

    /// The link behind a handle.
    #[inline]
    pub fn link(&self, id: LinkId) -> Result<&Link, TreeError> {
        self.link_at(id.index())
    }

    /// Handles of all nodes, in arena order.
    pub fn node_ids(&self) -> impl ExactSizeIterator<Item = NodeId> + use<> {
        (0..self.nodes.len()).map(NodeId::new)
    }

    /// Handles of all edges, in arena order.
    pub fn edge_ids(&self) -> impl ExactSizeIterator<Item = EdgeId> + use<> {
        (0..self.edges.len()).map(EdgeId::new)
    }

    /// Handles of all links, in arena order.
    pub fn link_ids(&self) -> impl ExactSizeIterator<Item = LinkId> + use<> {
        (0..self.links.len()).map(LinkId::new)
    }

    // ---------------------------------------------------------------------
    // Root
    // ---------------------------------------------------------------------

    /// The distinguished root link.
    pub fn root_link(&self) -> Result<LinkId, TreeError> {
        self.root_link
            .ok_or_else(|| TreeError::InvalidTree("empty tree has no root link".into()))
    }

    /// The node owning the root link.
    pub fn root_node(&self) -> Result<NodeId, TreeError> {
        let root = self.root_link()?;
        Ok(self.link_raw(root).node)
    }

    // ---------------------------------------------------------------------
    // Local topology queries
    // ---------------------------------------------------------------------

    /// Number of edges incident to a node, by ring walk: O(degree).
    pub fn degree(&self, node: NodeId) -> Result<usize, TreeError> {
        let start = self.node(node)?.link;
        Ok(self
            .ring(start)
            .filter(|&l| self.link_raw(l).edge.is_some())
            .count())
    }

    /// `true` if the node has at most one incident edge.
    pub fn is_leaf(&self, node: NodeId) -> Result<bool, TreeError> {
        let link = self.node(node)?.link;
        Ok(self.link_raw(link).next == link)
    }

    /// `true` if the node has more than one incident edge.
    pub fn is_inner(&self, node: NodeId) -> Result<bool, TreeError> {
        Ok(!self.is_leaf(node)?)
    }

    /// `true` if the node owns the root link.
    pub fn is_root(&self, node: NodeId) -> Result<bool, TreeError> {
        Ok(self.root_node()? == node)
    }

    /// Iterates the ring of links starting at `start`, in `next` order,
    /// visiting `start` first and stopping before it comes around again.
    pub fn ring(&self, start: LinkId) -> Ring<'_> {
        Ring {
            tree: self,
            start,
            current: Some(start),
        }
    }

    /// The ring of links around a node, starting at its primary link.
    pub fn node_links(&self, node: NodeId) -> Result<Ring<'_>, TreeError> {
        Ok(self.ring(self.node(node)?.link))
    }

    /// The node on the root side of an edge.
    pub fn primary_node(&self, edge: EdgeId) -> Result<NodeId, TreeError> {
        let e = self.edge(edge)?;
        Ok(self.link_raw(e.primary).node)
    }

    /// The node on the far side of an edge.
    pub fn secondary_node(&self, edge: EdgeId) -> Result<NodeId, TreeError> {
        let e = self.edge(edge)?;
        Ok(self.link_raw(e.secondary).node)
    }

    // ---------------------------------------------------------------------
    // Payload attachment
    // ---------------------------------------------------------------------

    /// Attaches a payload to a node, returning the previous one.
    pub fn set_node_data(
        &mut self,
        node: NodeId,
        data: Box<dyn NodeData>,
    ) -> Result<Option<Box<dyn NodeData>>, TreeError> {
        self.node(node)?;
        Ok(self.nodes[node.index()].data.replace(data))
    }

    /// Attaches a payload to an edge, returning the previous one.
    pub fn set_edge_data(
        &mut self,
        edge: EdgeId,
        data: Box<dyn EdgeData>,
    ) -> Result<Option<Box<dyn EdgeData>>, TreeError> {
        self.edge(edge)?;
        Ok(self.edges[edge.index()].data.replace(data))
    }

    /// The payload attached to a node, if any.
    pub fn node_data(&self, node: NodeId) -> Result<Option<&dyn NodeData>, TreeError> {
        Ok(self.node(node)?.data())
    }

    /// The payload attached to an edge, if any.
    pub fn edge_data(&self, edge: EdgeId) -> Result<Option<&dyn EdgeData>, TreeError> {
        Ok(self.edge(edge)?.data())
    }

    /// The node payload downcast to a concrete type, if attached and of
    /// that type.
    pub fn node_data_as<T: NodeData + 'static>(
        &self,
        node: NodeId,
    ) -> Result<Option<&T>, TreeError> {
        Ok(self.node(node)?.data().and_then(|d| d.downcast_ref::<T>()))
    }

    /// The edge payload downcast to a concrete type, if attached and of
    /// that type.
    pub fn edge_data_as<T: EdgeData + 'static>(
        &self,
        edge: EdgeId,
    ) -> Result<Option<&T>, TreeError> {
        Ok(self.edge(edge)?.data().and_then(|d| d.downcast_ref::<T>()))
    }

    /// Deep copy: clones the three arenas index-for-index and every payload
    /// through its clone capability.
    pub fn clone_tree(&self) -> Tree {
        self.clone()
    }

    // ---------------------------------------------------------------------
    // Crate-internal raw access for builders and traversals.
    // Callers must hold handles they obtained from this same tree state.
    // ---------------------------------------------------------------------

    #[inline]
    pub(crate) fn link_raw(&self, id: LinkId) -> &Link {
        &self.links[id.index()]
    }

    #[inline]
    pub(crate) fn link_raw_mut(&mut self, id: LinkId) -> &mut Link {
        &mut self.links[id.index()]
    }

    #[inline]
    pub(crate) fn next_raw(&self, id: LinkId) -> LinkId {
        self.links[id.index()].next
    }

    #[inline]
    pub(crate) fn outer_raw(&self, id: LinkId) -> LinkId {
        self.links[id.index()].outer
    }

    /// Allocates a node with no link yet; the caller must set `link` before
    /// the tree is observed.
    pub(crate) fn alloc_node(&mut self, data: Option<Box<dyn NodeData>>) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        // Placeholder until the caller wires the first link.
        self.nodes.push(Node {
            link: LinkId::new(u32::MAX as usize),
            data,
        });
        id
    }

    /// Allocates a link; relations are patched up by the caller.
    pub(crate) fn alloc_link(&mut self, node: NodeId) -> LinkId {
        let id = LinkId::new(self.links.len());
        self.links.push(Link {
            next: id,
            outer: id,
            node,
            edge: None,
        });
        id
    }

    /// Allocates an edge over an already-wired link pair.
    pub(crate) fn alloc_edge(
        &mut self,
        primary: LinkId,
        secondary: LinkId,
        data: Option<Box<dyn EdgeData>>,
    ) -> EdgeId {
        let id = EdgeId::new(self.edges.len());
        self.edges.push(Edge {
            primary,
            secondary,
            data,
        });
        id
    }
}

/// Iterator over the ring of links around one node.
pub struct Ring<'a> {
    tree: &'a Tree,
    start: LinkId,
    current: Option<LinkId>,
}

impl<'a> Iterator for Ring<'a> {
    type Item = LinkId;

    fn next(&mut self) -> Option<LinkId> {
        let current = self.current?;
        let next = self.tree.next_raw(current);
        self.current = if next == self.start { None } else { Some(next) };
        Some(current)
    }
}
