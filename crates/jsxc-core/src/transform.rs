//! Whole-input transformation: locate fragments, parse, render, splice.

use crate::config::{Config, ParseMode};
use crate::error::ParseError;
use crate::locator;
use crate::node::{Node, Piece};
use crate::parser::parse_fragment_with;
use crate::traits::{DefaultNodeFactory, DefaultStringifier, NodeFactory, Stringifier};

/// A configuration bundled with node construction and code generation
/// strategies.
///
/// A `Transformer` holds no per-call state and can be shared between
/// threads; each call resolves its own `@jsx` pragma.
pub struct Transformer {
    config: Config,
    factory: Box<dyn NodeFactory>,
    stringifier: Box<dyn Stringifier>,
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Transformer {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            factory: Box::new(DefaultNodeFactory),
            stringifier: Box::new(DefaultStringifier),
        }
    }

    /// Replace the node factory.
    pub fn with_node_factory(mut self, factory: impl NodeFactory + 'static) -> Self {
        self.factory = Box::new(factory);
        self
    }

    /// Replace the stringifier.
    pub fn with_stringifier(mut self, stringifier: impl Stringifier + 'static) -> Self {
        self.stringifier = Box::new(stringifier);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Rewrite every fragment in `source` as factory calls.
    ///
    /// Text outside fragments is copied unchanged, including any pragma
    /// comment. Errors are only returned in strict mode.
    pub fn transform(&self, source: &str) -> Result<String, ParseError> {
        let config = self.config.resolve(source);
        let pieces = locator::split(source, self.factory.as_ref(), config.mode)?;

        let mut output = String::with_capacity(source.len());
        let mut fragments = 0usize;
        for piece in &pieces {
            match piece {
                Piece::Code(code) => output.push_str(code),
                Piece::Markup(node) => {
                    fragments += 1;
                    output.push_str(&self.stringifier.node(node, 0, &config));
                }
            }
        }

        tracing::debug!(fragments, bytes = source.len(), "transformed input");
        Ok(output)
    }

    /// Parse one isolated fragment with this transformer's factory and mode.
    pub fn parse_fragment(&self, text: &str) -> Result<Node, ParseError> {
        parse_fragment_with(text, self.factory.as_ref(), self.config.mode)
    }

    /// Render a tree with this transformer's stringifier and configuration.
    pub fn render(&self, node: &Node) -> String {
        self.stringifier.node(node, 0, &self.config)
    }
}

/// Transform `source` with the default configuration.
pub fn transform(source: &str) -> String {
    transform_with(source, &Config::default())
}

/// Transform `source` with `config`, falling back to lenient parsing.
///
/// For strict diagnostics use [`Transformer::transform`], which returns the
/// error instead.
pub fn transform_with(source: &str, config: &Config) -> String {
    match Transformer::new(config.clone()).transform(source) {
        Ok(output) => output,
        Err(err) => {
            tracing::debug!(error = %err, "strict transform failed, retrying leniently");
            let lenient = config.clone().with_mode(ParseMode::Lenient);
            Transformer::new(lenient)
                .transform(source)
                .unwrap_or_else(|_| source.to_string())
        }
    }
}
