//! Strategy interfaces for node construction and code generation.
//!
//! Both traits come with complete default methods. Implement only the
//! methods you want to change and pass the value to a
//! [`Transformer`](crate::Transformer).

use crate::config::Config;
use crate::node::{
    Attributes, Component, Element, Node, Piece, RawBlock, Text, TextSegment,
};
use crate::stringify;

/// Builds nodes as the parser reports tags, text and embedded markup.
pub trait NodeFactory: Send + Sync {
    fn element(&self, tag_name: String, attributes: Attributes, self_closing: bool) -> Node {
        Node::Element(Element {
            tag_name,
            attributes,
            children: Vec::new(),
            self_closing,
        })
    }

    fn component(&self, reference: String, attributes: Attributes, self_closing: bool) -> Node {
        Node::Component(Component {
            reference,
            attributes,
            children: Vec::new(),
            self_closing,
        })
    }

    fn text(&self, segments: Vec<TextSegment>) -> Node {
        Node::Text(Text { segments })
    }

    fn raw_block(&self, source_text: String, pieces: Vec<Piece>) -> Node {
        Node::RawBlock(RawBlock {
            source_text,
            pieces,
        })
    }
}

/// Renders nodes as factory-call source text.
///
/// `depth` is the number of enclosing elements and components; it drives
/// indentation in block-formatted child lists.
pub trait Stringifier: Send + Sync {
    fn node(&self, node: &Node, depth: usize, config: &Config) -> String {
        stringify::node(self, node, depth, config)
    }

    fn element(&self, element: &Element, depth: usize, config: &Config) -> String {
        stringify::element(self, element, depth, config)
    }

    fn component(&self, component: &Component, depth: usize, config: &Config) -> String {
        stringify::component(self, component, depth, config)
    }

    /// One text segment, wrapped in the text factory when configured.
    fn text(&self, segment: &TextSegment, config: &Config) -> String {
        stringify::text(segment, config)
    }

    /// The props argument: `null` or an object literal.
    fn props(&self, attributes: &Attributes, depth: usize, config: &Config) -> String {
        stringify::props(self, attributes, depth, config)
    }

    /// Everything after the props argument, including any leading comma.
    fn children(&self, children: &[Node], depth: usize, config: &Config) -> String {
        stringify::children(self, children, depth, config)
    }

    fn raw_block(&self, block: &RawBlock, depth: usize, config: &Config) -> String {
        stringify::raw_block(self, block, depth, config)
    }
}

/// The stock node factory.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultNodeFactory;

impl NodeFactory for DefaultNodeFactory {}

/// The stock code generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultStringifier;

impl Stringifier for DefaultStringifier {}
