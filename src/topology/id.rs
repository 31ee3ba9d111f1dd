//! Dense index handles for tree entities.
//!
//! Every Node, Edge, and Link of a [`Tree`](crate::topology::tree::Tree) is
//! identified by its position in the owning arena. The handles below wrap
//! that position in a distinct `repr(transparent)` newtype so a node index
//! cannot be confused with a link index at a call site, at zero runtime cost.
//!
//! Handles are plain data: they stay valid exactly as long as the tree they
//! came from is not mutated, and they are meaningless across trees.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Wraps a raw arena position.
            #[inline]
            pub(crate) fn new(index: usize) -> Self {
                debug_assert!(index <= u32::MAX as usize);
                $name(index as u32)
            }

            /// Returns the position in the owning arena.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.0).finish()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id! {
    /// Handle of a topological vertex in a tree.
    NodeId
}

define_id! {
    /// Handle of a connection between two nodes.
    EdgeId
}

define_id! {
    /// Handle of one half of an edge, sitting in the ring of links around
    /// its node.
    LinkId
}

#[cfg(test)]
mod layout_tests {
    //! Compile-time assertions that handles stay word-cheap.
    use super::*;
    use static_assertions::assert_eq_size;

    assert_eq_size!(NodeId, u32);
    assert_eq_size!(EdgeId, u32);
    assert_eq_size!(LinkId, u32);
    // Option<EdgeId> is stored per link; it must not grow past a word.
    assert_eq_size!(Option<EdgeId>, u64);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn new_and_index() {
        let n = NodeId::new(42);
        assert_eq!(n.index(), 42);
    }

    #[test]
    fn debug_and_display() {
        let e = EdgeId::new(7);
        assert_eq!(format!("{:?}", e), "EdgeId(7)");
        assert_eq!(format!("{}", e), "7");
    }

    #[test]
    fn ordering_and_hash() {
        let a = LinkId::new(1);
        let b = LinkId::new(2);
        assert!(a < b);
        let mut set = HashSet::new();
        set.insert(a);
        set.insert(b);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn serde_roundtrip() {
        let n = NodeId::new(123);
        let s = serde_json::to_string(&n).unwrap();
        let back: NodeId = serde_json::from_str(&s).unwrap();
        assert_eq!(back, n);
    }
}
