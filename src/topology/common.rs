//! Default payload types attached by the Newick reader and understood by the
//! Newick writer: a taxon name per node, a branch length per edge.
//!
//! Consumers with richer data define their own [`NodeData`]/[`EdgeData`]
//! types and swap the reader/writer hooks; nothing in the engine depends on
//! these two beyond the default hooks.

use super::data::{EdgeData, NodeData};
use std::any::Any;

/// Node payload carrying the taxon or clade name. Empty for unnamed inner
/// nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonNodeData {
    pub name: String,
}

impl CommonNodeData {
    pub fn named(name: impl Into<String>) -> Self {
        CommonNodeData { name: name.into() }
    }
}

impl NodeData for CommonNodeData {
    fn clone_boxed(&self) -> Box<dyn NodeData> {
        Box::new(self.clone())
    }
    fn type_tag(&self) -> &'static str {
        "CommonNodeData"
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Edge payload carrying the branch length. `None` means the input did not
/// specify one and the reader was configured to keep it unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommonEdgeData {
    pub branch_length: Option<f64>,
}

impl CommonEdgeData {
    pub fn with_length(branch_length: f64) -> Self {
        CommonEdgeData {
            branch_length: Some(branch_length),
        }
    }
}

impl EdgeData for CommonEdgeData {
    fn clone_boxed(&self) -> Box<dyn EdgeData> {
        Box::new(self.clone())
    }
    fn type_tag(&self) -> &'static str {
        "CommonEdgeData"
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
