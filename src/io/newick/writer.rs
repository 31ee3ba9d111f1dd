//! Writing [`Tree`]s back to parenthesized text.
//!
//! The write path mirrors the read path through the same intermediate:
//! one post-order traversal flattens the tree into a broker (each finished
//! node pushed on top, reproducing the root-first broker order), then the
//! renderer walks the broker from the deep end and emits delimiters from
//! the depth deltas between consecutive elements.

use super::broker::NewickBroker;
use super::element::NewickBrokerElement;
use crate::topology::common::{CommonEdgeData, CommonNodeData};
use crate::topology::id::{EdgeId, NodeId};
use crate::topology::tree::Tree;
use crate::tree_error::TreeError;
use std::io;

/// When to wrap labels in quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quoting {
    /// Quote every non-empty label.
    Always,
    /// Quote only labels containing reserved characters.
    #[default]
    WhenNeeded,
}

/// Fills an element from a node's payload.
pub type NodeToElementHook = Box<dyn Fn(&Tree, NodeId, &mut NewickBrokerElement)>;
/// Fills an element from the payload of the edge leading to its node.
pub type EdgeToElementHook = Box<dyn Fn(&Tree, EdgeId, &mut NewickBrokerElement)>;

pub struct NewickWriter {
    enable_names: bool,
    enable_branch_lengths: bool,
    precision: usize,
    quoting: Quoting,
    node_hook: NodeToElementHook,
    edge_hook: EdgeToElementHook,
}

impl Default for NewickWriter {
    fn default() -> Self {
        NewickWriter {
            enable_names: true,
            enable_branch_lengths: true,
            precision: 6,
            quoting: Quoting::WhenNeeded,
            node_hook: Box::new(|tree, node, element| {
                if let Ok(Some(data)) = tree.node_data_as::<CommonNodeData>(node) {
                    element.name = data.name.clone();
                }
            }),
            edge_hook: Box::new(|tree, edge, element| {
                if let Ok(Some(data)) = tree.edge_data_as::<CommonEdgeData>(edge) {
                    element.branch_length = data.branch_length;
                }
            }),
        }
    }
}

impl std::fmt::Debug for NewickWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewickWriter")
            .field("enable_names", &self.enable_names)
            .field("enable_branch_lengths", &self.enable_branch_lengths)
            .field("precision", &self.precision)
            .field("quoting", &self.quoting)
            .finish_non_exhaustive()
    }
}

impl NewickWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit labels at all.
    pub fn with_names(mut self, value: bool) -> Self {
        self.enable_names = value;
        self
    }

    /// Emit `:length` suffixes at all.
    pub fn with_branch_lengths(mut self, value: bool) -> Self {
        self.enable_branch_lengths = value;
        self
    }

    /// Maximum number of fractional digits for branch lengths (trailing
    /// zeros are trimmed).
    pub fn with_precision(mut self, value: usize) -> Self {
        self.precision = value;
        self
    }

    pub fn with_quoting(mut self, value: Quoting) -> Self {
        self.quoting = value;
        self
    }

    /// Replaces the node-payload-to-element translation.
    pub fn with_node_hook(mut self, hook: NodeToElementHook) -> Self {
        self.node_hook = hook;
        self
    }

    /// Replaces the edge-payload-to-element translation.
    pub fn with_edge_hook(mut self, hook: EdgeToElementHook) -> Self {
        self.edge_hook = hook;
        self
    }

    // ---------------------------------------------------------------------
    // Writing
    // ---------------------------------------------------------------------

    /// Serializes a tree to text, terminator included.
    pub fn write_str(&self, tree: &Tree) -> Result<String, TreeError> {
        if tree.is_empty() {
            return Err(TreeError::InvalidTree("cannot serialize an empty tree".into()));
        }
        let broker = self.tree_to_broker(tree)?;
        Ok(self.render(&broker))
    }

    /// Serializes a tree into any byte sink.
    pub fn write_to<W: io::Write>(&self, tree: &Tree, mut sink: W) -> Result<(), TreeError> {
        let text = self.write_str(tree)?;
        sink.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Flattens a tree into a broker via one post-order traversal: each
    /// node is finished (children first) and pushed to the broker top.
    pub fn tree_to_broker(&self, tree: &Tree) -> Result<NewickBroker, TreeError> {
        let mut broker = NewickBroker::new();
        if tree.is_empty() {
            return Ok(broker);
        }

        // Depths fall out of one pre-order pass: a child is one below the
        // node on the root side of its entry edge.
        let mut depth = vec![0i32; tree.node_count()];
        for visit in tree.preorder()? {
            if let Some(e) = visit.edge {
                let parent = tree.primary_node(e)?;
                depth[visit.node.index()] = depth[parent.index()] + 1;
            }
        }

        for visit in tree.postorder()? {
            let mut element = NewickBrokerElement {
                depth: depth[visit.node.index()],
                ..Default::default()
            };
            (self.node_hook)(tree, visit.node, &mut element);
            if let Some(e) = visit.edge {
                (self.edge_hook)(tree, e, &mut element);
            }
            broker.push_top(element);
        }
        Ok(broker)
    }

    /// Renders a broker to text. Elements are walked from the deep end
    /// (the order they appeared in the input); group delimiters fall out
    /// of the depth difference between consecutive elements.
    pub fn render(&self, broker: &NewickBroker) -> String {
        let mut out = String::new();
        let mut previous: Option<i32> = None;
        for element in broker.iter().rev() {
            let depth = element.depth.max(0);
            match previous {
                None => {
                    for _ in 0..depth {
                        out.push('(');
                    }
                }
                Some(prev) => {
                    if depth > prev {
                        out.push(',');
                        for _ in 0..(depth - prev) {
                            out.push('(');
                        }
                    } else if depth == prev {
                        out.push(',');
                    } else {
                        for _ in 0..(prev - depth) {
                            out.push(')');
                        }
                    }
                }
            }
            self.render_element(element, &mut out);
            previous = Some(depth);
        }
        out.push(';');
        out
    }

    fn render_element(&self, element: &NewickBrokerElement, out: &mut String) {
        if self.enable_names && !element.name.is_empty() {
            self.render_label(&element.name, out);
        }
        if self.enable_branch_lengths {
            if let Some(length) = element.branch_length {
                out.push(':');
                out.push_str(&format_branch_length(length, self.precision));
            }
        }
        for comment in &element.comments {
            out.push('[');
            out.push_str(comment);
            out.push(']');
        }
        for tag in &element.tags {
            out.push('{');
            out.push_str(tag);
            out.push('}');
        }
    }

    fn render_label(&self, name: &str, out: &mut String) {
        let needs_quotes = match self.quoting {
            Quoting::Always => true,
            Quoting::WhenNeeded => name
                .chars()
                .any(|c| c.is_whitespace() || "()[]{}:;,'\"".contains(c)),
        };
        if needs_quotes {
            out.push('\'');
            out.push_str(&name.replace('\'', "''"));
            out.push('\'');
        } else {
            out.push_str(name);
        }
    }
}

/// Fixed-precision formatting with trailing zeros (and a bare trailing
/// dot) trimmed, so canonical inputs round-trip unchanged.
fn format_branch_length(value: f64, precision: usize) -> String {
    let mut s = format!("{value:.precision$}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    s
}
