//! Tree I/O: the textual serialization format and its byte sources.
//!
//! This module provides the Newick-style reader and writer, the broker
//! intermediate they share, and the byte-source abstraction that lets the
//! reader run over in-memory strings and forward-only streams alike.

pub mod newick;
pub mod source;

pub use newick::{
    BrokerIssue, BrokerReport, MissingLength, NewickBroker, NewickBrokerElement, NewickReader,
    NewickWriter, Quoting, TreeSequence,
};
pub use source::{ByteSource, InMemorySource, ReaderSource};
