//! Newick-style parenthesized tree format: lexer, broker, reader, writer.

pub mod broker;
pub mod element;
pub(crate) mod lexer;
pub mod reader;
pub mod writer;

pub use broker::{BrokerIssue, BrokerReport, NewickBroker};
pub use element::NewickBrokerElement;
pub use reader::{EdgeHook, MissingLength, NewickReader, NodeHook, TreeSequence};
pub use writer::{EdgeToElementHook, NewickWriter, NodeToElementHook, Quoting};
