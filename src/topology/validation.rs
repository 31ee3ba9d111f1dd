//! Whole-tree invariant checking.
//!
//! [`validate_topology`] walks every link, ring, and edge of a tree and
//! verifies the shape invariants documented on [`Tree`]. Mutation code runs
//! it in debug builds (see [`crate::debug_invariants`]); tests call it
//! directly after every operation under scrutiny.

use super::id::LinkId;
use super::tree::Tree;
use crate::tree_error::TreeError;

fn fail(msg: impl Into<String>) -> TreeError {
    TreeError::InvalidTree(msg.into())
}

/// Checks all shape invariants of a tree. O(nodes + links).
pub fn validate_topology(tree: &Tree) -> Result<(), TreeError> {
    let n_nodes = tree.node_count();
    let n_edges = tree.edge_count();
    let n_links = tree.link_count();

    if n_nodes == 0 {
        if n_edges != 0 || n_links != 0 {
            return Err(fail("empty tree with leftover edges or links"));
        }
        if tree.root_link.is_some() {
            return Err(fail("empty tree with a root link"));
        }
        return Ok(());
    }

    // Density and the winged-edge count relation. The single-node tree is
    // the one shape where a link exists without an edge.
    if n_nodes == 1 {
        if n_edges != 0 || n_links != 1 {
            return Err(fail("single-node tree must have exactly one self-link"));
        }
    } else if n_links != 2 * n_edges {
        return Err(fail(format!(
            "link count {n_links} != 2 * edge count {n_edges}"
        )));
    }

    // Relation targets must be in bounds before anything else walks them.
    for index in 0..n_links {
        let link = tree.link_at(index)?;
        if link.next().index() >= n_links || link.outer().index() >= n_links {
            return Err(fail(format!("link {index} references out-of-range link")));
        }
        if link.node().index() >= n_nodes {
            return Err(fail(format!("link {index} references out-of-range node")));
        }
        match link.edge() {
            Some(e) if e.index() >= n_edges => {
                return Err(fail(format!("link {index} references out-of-range edge")));
            }
            None if n_nodes > 1 => {
                return Err(fail(format!(
                    "link {index} has no edge in a multi-node tree"
                )));
            }
            _ => {}
        }
    }

    // Outer involution.
    for id in tree.link_ids() {
        let outer = tree.outer_raw(id);
        if tree.outer_raw(outer) != id {
            return Err(fail(format!("link {id}: outer(outer) != self")));
        }
    }

    // Edge / link mutuality.
    for id in tree.edge_ids() {
        let edge = tree.edge(id)?;
        let p = edge.primary_link();
        let s = edge.secondary_link();
        if tree.outer_raw(p) != s || tree.outer_raw(s) != p {
            return Err(fail(format!("edge {id}: links are not mutual outers")));
        }
        if tree.link_raw(p).edge() != Some(id) || tree.link_raw(s).edge() != Some(id) {
            return Err(fail(format!("edge {id}: links disown their edge")));
        }
    }

    // Ring closure: every link sits in exactly one node ring, reached from
    // that node's primary link, with a correct node back-reference.
    let mut ring_of = vec![usize::MAX; n_links];
    for node in tree.node_ids() {
        let start = tree.node(node)?.primary_link();
        if start.index() >= n_links {
            return Err(fail(format!("node {node} has an out-of-range primary link")));
        }
        let mut current = start;
        loop {
            if ring_of[current.index()] != usize::MAX {
                return Err(fail(format!(
                    "link {current} appears in more than one ring"
                )));
            }
            ring_of[current.index()] = node.index();
            if tree.link_raw(current).node() != node {
                return Err(fail(format!(
                    "link {current} in ring of node {node} points to another node"
                )));
            }
            current = tree.next_raw(current);
            if current == start {
                break;
            }
        }
    }
    if let Some(orphan) = ring_of.iter().position(|&r| r == usize::MAX) {
        return Err(fail(format!("link {orphan} is not part of any ring")));
    }

    // Root orientation and reachability: one pass outward from the root,
    // checking that every edge's primary link sits on the parent side and
    // every non-root node's primary link points toward the root.
    let root = tree.root_link()?;
    let root_node = tree.link_raw(root).node();
    if tree.node(root_node)?.primary_link() != root {
        return Err(fail("root node's primary link is not the root link"));
    }

    let mut visited = vec![false; n_nodes];
    visited[root_node.index()] = true;
    let mut stack: Vec<LinkId> = Vec::new();

    push_down_links(tree, root, false, &mut stack)?;

    while let Some(down) = stack.pop() {
        let up = tree.outer_raw(down);
        let child = tree.link_raw(up).node();
        if visited[child.index()] {
            return Err(fail(format!(
                "node {child} is reachable twice from the root"
            )));
        }
        visited[child.index()] = true;
        if tree.node(child)?.primary_link() != up {
            return Err(fail(format!(
                "node {child}: primary link does not point toward the root"
            )));
        }
        push_down_links(tree, up, true, &mut stack)?;
    }

    if let Some(unreached) = visited.iter().position(|&v| !v) {
        return Err(fail(format!(
            "node {unreached} is not reachable from the root"
        )));
    }

    Ok(())
}

/// Pushes the child-side links of one ring onto the traversal stack,
/// checking the primary designation of each incident edge on the way.
fn push_down_links(
    tree: &Tree,
    entry: LinkId,
    skip_entry: bool,
    stack: &mut Vec<LinkId>,
) -> Result<(), TreeError> {
    for l in tree.ring(entry) {
        if skip_entry && l == entry {
            continue;
        }
        if let Some(e) = tree.link_raw(l).edge() {
            if tree.edge(e)?.primary_link() != l {
                return Err(fail(format!(
                    "edge {e}: primary link is on the far side from the root"
                )));
            }
            stack.push(l);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tree_is_valid() {
        assert!(validate_topology(&Tree::new()).is_ok());
    }

    #[test]
    fn hand_built_pair_and_corruption() {
        // Two nodes, one edge, wired correctly, then corrupted.
        let mut t = Tree::new();
        let a = t.alloc_node(None);
        let b = t.alloc_node(None);
        let la = t.alloc_link(a);
        let lb = t.alloc_link(b);
        t.link_raw_mut(la).outer = lb;
        t.link_raw_mut(lb).outer = la;
        let e = t.alloc_edge(la, lb, None);
        t.link_raw_mut(la).edge = Some(e);
        t.link_raw_mut(lb).edge = Some(e);
        t.nodes[a.index()].link = la;
        t.nodes[b.index()].link = lb;
        t.root_link = Some(la);
        assert!(validate_topology(&t).is_ok());

        // Break the involution.
        t.link_raw_mut(lb).outer = lb;
        assert!(validate_topology(&t).is_err());
    }
}
