//! Reading parenthesized tree text into [`Tree`]s.
//!
//! The pipeline per tree is: lexer → broker builder → broker validation →
//! broker-to-tree conversion. Structural imbalance is recorded in the
//! broker and surfaced by `validate()`; only lexical defects (bad
//! characters, unterminated spans, bad numbers under strict mode) and a
//! group reopened after the top-level close fail during the builder pass
//! itself.
//!
//! A reader is a reusable configuration object: construct once, read many
//! inputs, including lazily from a multi-tree stream via
//! [`NewickReader::trees`].

use super::broker::NewickBroker;
use super::element::NewickBrokerElement;
use super::lexer::{Lexer, Token, TokenKind};
use crate::io::source::{ByteSource, InMemorySource, ReaderSource};
use crate::topology::common::{CommonEdgeData, CommonNodeData};
use crate::topology::data::{EdgeData, NodeData};
use crate::topology::tree::Tree;
use crate::tree_error::TreeError;
use std::io;

/// What a missing branch length becomes on the edge payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingLength {
    /// Keep it unset (`None`), distinguishable from an explicit zero.
    #[default]
    Unset,
    /// Substitute `0.0`.
    Zero,
}

/// Translates a finished broker element into a node payload.
pub type NodeHook = Box<dyn Fn(&NewickBrokerElement) -> Option<Box<dyn NodeData>>>;
/// Translates a finished broker element into the payload of the edge
/// leading to its node.
pub type EdgeHook = Box<dyn Fn(&NewickBrokerElement) -> Option<Box<dyn EdgeData>>>;

pub struct NewickReader {
    enable_tags: bool,
    enable_comments: bool,
    strict_numbers: bool,
    missing_length: MissingLength,
    stop_at_semicolon: bool,
    node_hook: NodeHook,
    edge_hook: EdgeHook,
}

impl Default for NewickReader {
    fn default() -> Self {
        NewickReader {
            enable_tags: false,
            enable_comments: true,
            strict_numbers: true,
            missing_length: MissingLength::Unset,
            stop_at_semicolon: true,
            node_hook: Box::new(|el| {
                Some(Box::new(CommonNodeData::named(el.name.clone())) as Box<dyn NodeData>)
            }),
            edge_hook: Box::new(|el| {
                Some(Box::new(CommonEdgeData {
                    branch_length: el.branch_length,
                }) as Box<dyn EdgeData>)
            }),
        }
    }
}

impl std::fmt::Debug for NewickReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewickReader")
            .field("enable_tags", &self.enable_tags)
            .field("enable_comments", &self.enable_comments)
            .field("strict_numbers", &self.strict_numbers)
            .field("missing_length", &self.missing_length)
            .field("stop_at_semicolon", &self.stop_at_semicolon)
            .finish_non_exhaustive()
    }
}

impl NewickReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat `{...}` spans as per-element tags instead of label characters.
    pub fn with_tags(mut self, value: bool) -> Self {
        self.enable_tags = value;
        self
    }

    /// Capture `[...]` spans into elements; when off they are skipped.
    pub fn with_comments(mut self, value: bool) -> Self {
        self.enable_comments = value;
        self
    }

    /// Fail on an unparseable branch length instead of falling back to the
    /// missing-length default with a warning.
    pub fn with_strict_numbers(mut self, value: bool) -> Self {
        self.strict_numbers = value;
        self
    }

    /// What a missing branch length becomes on the edge payload.
    pub fn with_missing_length(mut self, value: MissingLength) -> Self {
        self.missing_length = value;
        self
    }

    /// Stop a single-tree read right after the terminator, leaving trailing
    /// input in the stream (the default). When off, trailing non-comment
    /// content is an error.
    pub fn with_stop_at_semicolon(mut self, value: bool) -> Self {
        self.stop_at_semicolon = value;
        self
    }

    /// Replaces the element-to-node-payload translation.
    pub fn with_node_hook(mut self, hook: NodeHook) -> Self {
        self.node_hook = hook;
        self
    }

    /// Replaces the element-to-edge-payload translation.
    pub fn with_edge_hook(mut self, hook: EdgeHook) -> Self {
        self.edge_hook = hook;
        self
    }

    // ---------------------------------------------------------------------
    // Reading
    // ---------------------------------------------------------------------

    /// Reads a single tree from a string.
    pub fn read_str(&self, text: &str) -> Result<Tree, TreeError> {
        let mut lexer = Lexer::new(InMemorySource::new(text), self.enable_tags);
        self.read_single(&mut lexer)
    }

    /// Reads a single tree from a byte stream.
    pub fn read_from<R: io::Read>(&self, reader: R) -> Result<Tree, TreeError> {
        let mut lexer = Lexer::new(ReaderSource::new(reader), self.enable_tags);
        self.read_single(&mut lexer)
    }

    /// Reads every tree from a string, eagerly.
    pub fn read_all(&self, text: &str) -> Result<Vec<Tree>, TreeError> {
        self.trees(InMemorySource::new(text)).collect()
    }

    /// Lazily reads `;`-terminated trees from a byte source. The sequence
    /// is forward-only and finite when the source is; dropping it mid-way
    /// simply stops reading.
    pub fn trees<S: ByteSource>(&self, source: S) -> TreeSequence<'_, S> {
        TreeSequence {
            reader: self,
            lexer: Lexer::new(source, self.enable_tags),
            done: false,
        }
    }

    fn read_single<S: ByteSource>(&self, lexer: &mut Lexer<S>) -> Result<Tree, TreeError> {
        let broker = self
            .parse_to_broker(lexer)?
            .ok_or_else(|| TreeError::InvalidTree("input contains no tree".into()))?;
        let tree = self.broker_to_tree(&broker)?;
        if !self.stop_at_semicolon {
            self.expect_no_trailing(lexer)?;
        }
        Ok(tree)
    }

    fn expect_no_trailing<S: ByteSource>(&self, lexer: &mut Lexer<S>) -> Result<(), TreeError> {
        loop {
            let tok = lexer.next_token()?;
            match tok.kind {
                TokenKind::End => return Ok(()),
                TokenKind::Comment => continue,
                _ => {
                    return Err(malformed(
                        &tok,
                        "trailing content after the tree terminator",
                    ));
                }
            }
        }
    }

    /// Converts a validated broker through this reader's hooks, resolving
    /// missing branch lengths first.
    pub(crate) fn broker_to_tree(&self, broker: &NewickBroker) -> Result<Tree, TreeError> {
        let default_length = match self.missing_length {
            MissingLength::Unset => None,
            MissingLength::Zero => Some(0.0),
        };
        let edge_hook = |el: &NewickBrokerElement| {
            if el.branch_length.is_none() && default_length.is_some() {
                let mut resolved = el.clone();
                resolved.branch_length = default_length;
                (self.edge_hook)(&resolved)
            } else {
                (self.edge_hook)(el)
            }
        };
        broker.to_tree(&|el| (self.node_hook)(el), &edge_hook)
    }

    /// Drives the lexer until one complete tree (through its `;`) has been
    /// flattened into a broker. `Ok(None)` means the input held no further
    /// tree, only whitespace and comments.
    pub(crate) fn parse_to_broker<S: ByteSource>(
        &self,
        lexer: &mut Lexer<S>,
    ) -> Result<Option<NewickBroker>, TreeError> {
        use TokenKind::*;

        let mut broker = NewickBroker::new();
        // The element currently receiving labels, lengths, comments, tags.
        let mut node: Option<NewickBrokerElement> = None;
        let mut depth: i32 = 0;
        let mut closed = false;
        let mut saw_content = false;
        let mut current = End;

        loop {
            let previous = current;
            let tok = lexer.next_token()?;
            current = tok.kind;

            match tok.kind {
                Unknown => {
                    return Err(malformed(
                        &tok,
                        format!("invalid character '{}'", tok.text),
                    ));
                }
                End => {
                    if !saw_content {
                        return Ok(None);
                    }
                    return Err(TreeError::UnbalancedStructure(
                        "tree text ends without the ';' terminator".into(),
                    ));
                }
                OpenParen => {
                    if !matches!(previous, End | OpenParen | Comma | Comment) {
                        return Err(malformed(&tok, "unexpected '('"));
                    }
                    if closed {
                        return Err(TreeError::UnbalancedStructure(format!(
                            "group reopened after the tree closed at {}",
                            tok.at()
                        )));
                    }
                    saw_content = true;
                    depth += 1;
                    continue;
                }
                Comment if previous == End => {
                    // A comment before any tree content belongs to nothing;
                    // drop it and stay "before the start".
                    current = End;
                    continue;
                }
                _ => {}
            }

            // Everything below contributes to the element currently being
            // assembled, creating it at the present nesting rank if the
            // previous token finished one.
            let el = node.get_or_insert_with(|| NewickBrokerElement {
                depth,
                ..Default::default()
            });

            match tok.kind {
                Label => {
                    if !matches!(previous, End | OpenParen | CloseParen | Comma | Comment) {
                        return Err(malformed(&tok, format!("unexpected label '{}'", tok.text)));
                    }
                    saw_content = true;
                    el.name = tok.text;
                }
                Length => {
                    if !matches!(previous, OpenParen | CloseParen | Label | Comma | Comment) {
                        return Err(malformed(&tok, "unexpected ':'"));
                    }
                    saw_content = true;
                    match tok.text.parse::<f64>() {
                        Ok(value) => {
                            if el.branch_length.is_some() {
                                log::warn!(
                                    "duplicate branch length at {}; keeping the first",
                                    tok.at()
                                );
                            } else {
                                el.branch_length = Some(value);
                            }
                        }
                        Err(_) => {
                            if self.strict_numbers {
                                return Err(malformed(
                                    &tok,
                                    format!("invalid branch length '{}'", tok.text),
                                ));
                            }
                            log::warn!(
                                "unparseable branch length '{}' at {}; treated as missing",
                                tok.text,
                                tok.at()
                            );
                        }
                    }
                }
                Tag => el.tags.push(tok.text),
                Comment => {
                    if self.enable_comments {
                        el.comments.push(tok.text);
                    }
                }
                Comma => {
                    if !matches!(
                        previous,
                        OpenParen | CloseParen | Label | Length | Comma | Tag | Comment
                    ) {
                        return Err(malformed(&tok, "unexpected ','"));
                    }
                    if let Some(finished) = node.take() {
                        broker.push_top(finished);
                    }
                }
                CloseParen => {
                    if !matches!(
                        previous,
                        OpenParen | CloseParen | Label | Length | Comma | Tag | Comment
                    ) {
                        return Err(malformed(&tok, "unexpected ')'"));
                    }
                    if let Some(finished) = node.take() {
                        broker.push_top(finished);
                    }
                    // A surplus ')' drives the rank negative; validate()
                    // reports it once the broker is complete.
                    depth -= 1;
                    if depth == 0 {
                        closed = true;
                    }
                }
                Semicolon => {
                    if !matches!(previous, CloseParen | Label | Length | Tag | Comment) {
                        return Err(malformed(&tok, "unexpected ';'"));
                    }
                    if let Some(finished) = node.take() {
                        broker.push_top(finished);
                    }
                    return Ok(Some(broker));
                }
                OpenParen | End | Unknown => unreachable!("handled above"),
            }
        }
    }
}

fn malformed(tok: &Token, msg: impl Into<String>) -> TreeError {
    TreeError::MalformedLabelOrLength {
        at: tok.at(),
        msg: msg.into(),
    }
}

/// Lazy sequence of trees from one multi-tree input, created by
/// [`NewickReader::trees`]. Yields one `Result<Tree, _>` per `;`-terminated
/// tree; ends at the first error or at end of input.
pub struct TreeSequence<'r, S: ByteSource> {
    reader: &'r NewickReader,
    lexer: Lexer<S>,
    done: bool,
}

impl<'r, S: ByteSource> Iterator for TreeSequence<'r, S> {
    type Item = Result<Tree, TreeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.parse_to_broker(&mut self.lexer) {
            Ok(None) => {
                self.done = true;
                None
            }
            Ok(Some(broker)) => Some(self.reader.broker_to_tree(&broker)),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
