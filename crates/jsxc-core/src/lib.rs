//! Markup-fragment to factory-call transpiler.
//!
//! This crate finds inline markup such as `<p class={name}>hello</p>` in
//! ordinary source text and rewrites each fragment as nested factory calls,
//! `h('p', {class: name}, 'hello')`. Factory names come from an explicit
//! [`Config`] or from a `@jsx Name` pragma comment in the input.

pub mod attributes;
pub mod builder;
pub mod config;
pub mod error;
pub mod locator;
pub mod node;
pub mod parser;
pub mod stream;
pub mod stringify;
pub mod text;
pub mod traits;
pub mod transform;

pub use config::{detect_pragma, Config, ConfigError, ParseMode};
pub use error::ParseError;
pub use locator::{Fragment, Span};
pub use node::{
    AttrValue, Attributes, Component, Element, Node, Piece, RawBlock, Text, TextSegment,
};
pub use parser::{parse_fragment, parse_fragment_with};
pub use stream::{CharStream, Position};
pub use stringify::render;
pub use traits::{DefaultNodeFactory, DefaultStringifier, NodeFactory, Stringifier};
pub use transform::{transform, transform_with, Transformer};
