//! A connection between two nodes, realized as a pair of mutually-outer
//! links.
//!
//! The link nearer the root is the *primary* link, the other the
//! *secondary* link; rerooting swaps these designations without touching
//! the links themselves.

use super::data::EdgeData;
use super::id::LinkId;

#[derive(Debug, Clone)]
pub struct Edge {
    pub(crate) primary: LinkId,
    pub(crate) secondary: LinkId,
    pub(crate) data: Option<Box<dyn EdgeData>>,
}

impl Edge {
    /// The link of this edge on the side nearer the root.
    #[inline]
    pub fn primary_link(&self) -> LinkId {
        self.primary
    }

    /// The link of this edge on the side away from the root.
    #[inline]
    pub fn secondary_link(&self) -> LinkId {
        self.secondary
    }

    /// The attached payload, if any.
    #[inline]
    pub fn data(&self) -> Option<&(dyn EdgeData + 'static)> {
        self.data.as_deref()
    }

    /// Mutable access to the attached payload, if any.
    #[inline]
    pub fn data_mut(&mut self) -> Option<&mut (dyn EdgeData + 'static)> {
        self.data.as_deref_mut()
    }
}
