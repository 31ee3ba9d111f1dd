//! Topology mutation: attaching new leaves and detaching whole subtrees.
//!
//! Every operation here validates its inputs before touching the arenas, so
//! a failure leaves the tree exactly as it was. Successful operations leave
//! all shape invariants intact and the collections dense; detachment
//! compacts the arenas with index patching, so handles held before a
//! detach are invalidated.

use super::data::{EdgeData, NodeData};
use super::id::{EdgeId, LinkId, NodeId};
use super::tree::Tree;
use crate::debug_invariants::DebugInvariants;
use crate::tree_error::TreeError;

impl Tree {
    /// Creates a single-node tree: one node carrying `data`, owning one
    /// self-link that is the root link.
    pub fn with_root(data: Option<Box<dyn NodeData>>) -> Tree {
        let mut t = Tree::new();
        let n = t.alloc_node(data);
        let l = t.alloc_link(n);
        t.nodes[n.index()].link = l;
        t.root_link = Some(l);
        t
    }

    /// Attaches a new leaf below `target`, splicing the new link pair at
    /// the end of the target's ring (the leaf becomes the last child).
    /// Returns the new node and its edge.
    pub fn attach_leaf(
        &mut self,
        target: NodeId,
        node_data: Option<Box<dyn NodeData>>,
        edge_data: Option<Box<dyn EdgeData>>,
    ) -> Result<(NodeId, EdgeId), TreeError> {
        self.node(target)?;
        let entry = self.nodes[target.index()].link;

        let leaf = self.alloc_node(node_data);
        let up = self.alloc_link(leaf);
        self.nodes[leaf.index()].link = up;

        let down = if self.link_raw(entry).edge().is_none() {
            // The target is the lone node of a single-node tree; its bare
            // self-link becomes the down link of the first real edge.
            entry
        } else {
            let down = self.alloc_link(target);
            let mut pred = entry;
            while self.next_raw(pred) != entry {
                pred = self.next_raw(pred);
            }
            self.link_raw_mut(pred).next = down;
            self.link_raw_mut(down).next = entry;
            down
        };

        self.link_raw_mut(down).outer = up;
        self.link_raw_mut(up).outer = down;
        let edge = self.alloc_edge(down, up, edge_data);
        self.link_raw_mut(down).edge = Some(edge);
        self.link_raw_mut(up).edge = Some(edge);

        self.debug_assert_invariants();
        Ok((leaf, edge))
    }

    /// Splits `target` with a new inner node and hangs a new leaf off it.
    ///
    /// The root-side half of the split keeps the original edge handle and
    /// payload; the far half becomes a fresh edge with no payload. Returns
    /// `(inner node, leaf node, leaf edge)`.
    pub fn attach_leaf_on_edge(
        &mut self,
        target: EdgeId,
        inner_data: Option<Box<dyn NodeData>>,
        leaf_data: Option<Box<dyn NodeData>>,
        leaf_edge_data: Option<Box<dyn EdgeData>>,
    ) -> Result<(NodeId, NodeId, EdgeId), TreeError> {
        self.edge(target)?;
        let p = self.edges[target.index()].primary;
        let s = self.edges[target.index()].secondary;

        let inner = self.alloc_node(inner_data);
        let m_up = self.alloc_link(inner);
        let m_down = self.alloc_link(inner);
        let leaf = self.alloc_node(leaf_data);
        let m_leaf = self.alloc_link(inner);
        let u_leaf = self.alloc_link(leaf);

        // Ring of the inner node: toward root, toward the old child, leaf.
        self.link_raw_mut(m_up).next = m_down;
        self.link_raw_mut(m_down).next = m_leaf;
        self.link_raw_mut(m_leaf).next = m_up;
        self.nodes[inner.index()].link = m_up;
        self.nodes[leaf.index()].link = u_leaf;

        // Root-side half of the split keeps the original edge.
        self.link_raw_mut(p).outer = m_up;
        self.link_raw_mut(m_up).outer = p;
        self.link_raw_mut(m_up).edge = Some(target);
        self.edges[target.index()].secondary = m_up;

        // Far half becomes a new edge.
        let lower = self.alloc_edge(m_down, s, None);
        self.link_raw_mut(m_down).outer = s;
        self.link_raw_mut(s).outer = m_down;
        self.link_raw_mut(m_down).edge = Some(lower);
        self.link_raw_mut(s).edge = Some(lower);

        let leaf_edge = self.alloc_edge(m_leaf, u_leaf, leaf_edge_data);
        self.link_raw_mut(m_leaf).outer = u_leaf;
        self.link_raw_mut(u_leaf).outer = m_leaf;
        self.link_raw_mut(m_leaf).edge = Some(leaf_edge);
        self.link_raw_mut(u_leaf).edge = Some(leaf_edge);

        self.debug_assert_invariants();
        Ok((inner, leaf, leaf_edge))
    }

    /// Removes the edge and the entire subtree on its secondary (away from
    /// root) side, closing the ring gap on the primary side and compacting
    /// the arenas. Returns the number of removed nodes.
    ///
    /// If the primary-side node loses its last link it must be the only
    /// node left, and it collapses to the single-node representation.
    pub fn detach_subtree(&mut self, edge: EdgeId) -> Result<usize, TreeError> {
        self.edge(edge)?;
        let p = self.edges[edge.index()].primary;
        let s = self.edges[edge.index()].secondary;
        let parent = self.link_raw(p).node();

        // Mark everything at or below the secondary side as dead.
        let mut dead_links = vec![false; self.links.len()];
        let mut dead_nodes = vec![false; self.nodes.len()];
        let mut dead_edges = vec![false; self.edges.len()];
        dead_links[p.index()] = true;
        dead_edges[edge.index()] = true;
        let mut stack = vec![s];
        while let Some(entry) = stack.pop() {
            let node = self.link_raw(entry).node();
            dead_nodes[node.index()] = true;
            for l in self.ring(entry) {
                dead_links[l.index()] = true;
                if l != entry {
                    if let Some(e) = self.link_raw(l).edge() {
                        dead_edges[e.index()] = true;
                        stack.push(self.outer_raw(l));
                    }
                }
            }
        }
        let removed_nodes = dead_nodes.iter().filter(|&&d| d).count();

        // Close the ring gap on the parent side.
        let mut pred = p;
        while self.next_raw(pred) != p {
            pred = self.next_raw(pred);
        }
        if pred == p {
            // p was the parent's only link, so the parent is the root of
            // what remains; keep p alive as its bare self-link.
            dead_links[p.index()] = false;
            let l = self.link_raw_mut(p);
            l.outer = p;
            l.edge = None;
        } else {
            let after = self.next_raw(p);
            self.link_raw_mut(pred).next = after;
            if self.nodes[parent.index()].link == p {
                self.nodes[parent.index()].link = after;
            }
            if self.root_link == Some(p) {
                self.root_link = Some(after);
            }
        }

        // Compact the three arenas, patching surviving relations.
        let lmap = survivor_map(&dead_links);
        let nmap = survivor_map(&dead_nodes);
        let emap = survivor_map(&dead_edges);

        let old_links = std::mem::take(&mut self.links);
        self.links = old_links
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !dead_links[*i])
            .map(|(_, mut l)| {
                l.next = LinkId::new(lmap[l.next.index()]);
                l.outer = LinkId::new(lmap[l.outer.index()]);
                l.node = NodeId::new(nmap[l.node.index()]);
                l.edge = l.edge.map(|e| EdgeId::new(emap[e.index()]));
                l
            })
            .collect();

        let old_nodes = std::mem::take(&mut self.nodes);
        self.nodes = old_nodes
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !dead_nodes[*i])
            .map(|(_, mut n)| {
                n.link = LinkId::new(lmap[n.link.index()]);
                n
            })
            .collect();

        let old_edges = std::mem::take(&mut self.edges);
        self.edges = old_edges
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !dead_edges[*i])
            .map(|(_, mut e)| {
                e.primary = LinkId::new(lmap[e.primary.index()]);
                e.secondary = LinkId::new(lmap[e.secondary.index()]);
                e
            })
            .collect();

        self.root_link = self.root_link.map(|r| LinkId::new(lmap[r.index()]));

        self.debug_assert_invariants();
        Ok(removed_nodes)
    }
}

/// Maps old indices to post-compaction indices; dead slots get a sentinel
/// that no surviving relation refers to.
fn survivor_map(dead: &[bool]) -> Vec<usize> {
    let mut map = vec![usize::MAX; dead.len()];
    let mut next = 0;
    for (i, &d) in dead.iter().enumerate() {
        if !d {
            map[i] = next;
            next += 1;
        }
    }
    map
}
