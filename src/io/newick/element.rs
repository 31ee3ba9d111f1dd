//! One record of the broker: everything the text format says about a
//! single node, before (or after) any topology exists.

use serde::{Deserialize, Serialize};

/// A flattened tree node as it appears in the textual format.
///
/// `depth` is the nesting rank: the number of group openers minus closers
/// seen before this element. It can be negative for malformed input; the
/// broker's `validate()` reports such excursions instead of losing them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewickBrokerElement {
    /// Node label; empty for unnamed nodes.
    pub name: String,
    /// Branch length of the edge leading toward the root, if given.
    pub branch_length: Option<f64>,
    /// Nesting rank. The root sits at 0.
    pub depth: i32,
    /// Bracketed comment spans, verbatim, in input order.
    pub comments: Vec<String>,
    /// Brace tag spans, verbatim, in input order.
    pub tags: Vec<String>,
}

impl NewickBrokerElement {
    /// A leaf or inner element with just a name.
    pub fn named(name: impl Into<String>, depth: i32) -> Self {
        NewickBrokerElement {
            name: name.into(),
            depth,
            ..Default::default()
        }
    }
}
