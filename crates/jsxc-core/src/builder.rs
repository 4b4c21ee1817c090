//! Tree assembly from scanner events, using an explicit stack of open nodes.

use crate::attributes::{is_void_element, TagHeader};
use crate::node::{Node, Piece, TextSegment};
use crate::traits::NodeFactory;

/// Outcome of [`NodeBuilder::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opened {
    /// The node is open and accepts children
    Open,
    /// The node closed immediately (`/>` or void) inside a parent
    Leaf,
    /// The node closed immediately and is the root
    Root,
}

/// Outcome of [`NodeBuilder::close`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Closed {
    /// An inner node was closed
    Inner,
    /// The root was closed; the fragment is complete
    Root,
    /// A void element's closing tag with nothing to close
    IgnoredVoid,
    /// More closing tags than opening tags
    Unmatched,
}

/// Assembles one fragment's tree.
///
/// `stack` holds the open nodes, innermost last; its length is the current
/// nesting depth. Closed nodes are appended to the new innermost node, or
/// become the root when the stack empties.
pub struct NodeBuilder<'f> {
    factory: &'f dyn NodeFactory,
    stack: Vec<Node>,
    root: Option<Node>,
}

impl<'f> NodeBuilder<'f> {
    pub fn new(factory: &'f dyn NodeFactory) -> Self {
        Self {
            factory,
            stack: Vec::new(),
            root: None,
        }
    }

    /// Number of open nodes.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Name of the innermost open node.
    pub fn current_name(&self) -> Option<&str> {
        self.stack.last().and_then(Node::name)
    }

    /// Open a node for a scanned tag header.
    pub fn open(&mut self, header: TagHeader) -> Opened {
        let is_component = header.is_component();
        let TagHeader {
            name,
            attributes,
            self_closing,
            ..
        } = header;

        tracing::trace!(tag = %name, depth = self.depth(), self_closing, "open");

        let node = if is_component {
            self.factory.component(name, attributes, self_closing)
        } else {
            self.factory.element(name, attributes, self_closing)
        };

        if self_closing {
            self.attach(node);
            if self.stack.is_empty() {
                Opened::Root
            } else {
                Opened::Leaf
            }
        } else {
            self.stack.push(node);
            Opened::Open
        }
    }

    /// Close the innermost open node.
    ///
    /// The closing tag's name is not matched against the open node, except
    /// that a void element's closing tag (`</input>`) is ignored unless the
    /// open node has that name.
    pub fn close(&mut self, name: &str) -> Closed {
        if is_void_element(name) && self.current_name() != Some(name) {
            return Closed::IgnoredVoid;
        }

        let Some(node) = self.stack.pop() else {
            return Closed::Unmatched;
        };

        tracing::trace!(tag = %name, depth = self.depth(), "close");
        self.attach(node);

        if self.stack.is_empty() {
            Closed::Root
        } else {
            Closed::Inner
        }
    }

    /// Append a text node for `segments`, if there are any.
    pub fn text(&mut self, segments: Vec<TextSegment>) {
        if segments.is_empty() {
            return;
        }
        let node = self.factory.text(segments);
        self.attach(node);
    }

    /// Append an embedded-code node that contains nested fragments.
    pub fn raw_block(&mut self, source_text: String, pieces: Vec<Piece>) {
        let node = self.factory.raw_block(source_text, pieces);
        self.attach(node);
    }

    /// Close everything still open and return the root.
    pub fn finish(mut self) -> Option<Node> {
        while let Some(node) = self.stack.pop() {
            self.attach(node);
        }
        self.root
    }

    fn attach(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(parent) => match parent.children_mut() {
                Some(children) => children.push(node),
                None => {
                    tracing::debug!(parent = ?parent.name(), "parent cannot take children, dropping node");
                }
            },
            None if self.root.is_none() => self.root = Some(node),
            None => {
                tracing::debug!(node = ?node.name(), "fragment already has a root, dropping node");
            }
        }
    }
}
