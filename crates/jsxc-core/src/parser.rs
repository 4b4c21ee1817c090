//! Fragment parser: drives the tag and text scanners into a [`NodeBuilder`].

use std::mem;

use crate::attributes::{is_void_element, scan_tag_header};
use crate::builder::{Closed, NodeBuilder, Opened};
use crate::config::ParseMode;
use crate::error::ParseError;
use crate::locator;
use crate::node::{AttrValue, Node, RawBlock, TextSegment};
use crate::stream::CharStream;
use crate::text::{at_tag_boundary, scan_text};
use crate::traits::{DefaultNodeFactory, NodeFactory};

/// Parse one exact fragment such as `<p class={name}>hello</p>`.
///
/// Leading whitespace is skipped. Text after the root element is ignored in
/// lenient mode and rejected in strict mode.
pub fn parse_fragment(text: &str) -> Result<Node, ParseError> {
    parse_fragment_with(text, &DefaultNodeFactory, ParseMode::Lenient)
}

/// [`parse_fragment`] with an injected node factory and parse mode.
pub fn parse_fragment_with(
    text: &str,
    factory: &dyn NodeFactory,
    mode: ParseMode,
) -> Result<Node, ParseError> {
    let mut stream = CharStream::new(text);
    stream.skip_whitespace();

    if !at_tag_boundary(&stream) || stream.peek_nth(1) == Some('/') {
        return match (mode, stream.peek()) {
            (ParseMode::Strict, Some(found)) => Err(ParseError::UnexpectedCharacter {
                found,
                position: stream.location(),
            }),
            _ => Err(ParseError::NoFragment),
        };
    }

    let parsed = parse_root(text, stream.offset(), factory, mode)?;

    if mode == ParseMode::Strict {
        let mut tail = CharStream::at(text, parsed.end);
        tail.skip_whitespace();
        if !tail.eof() {
            return Err(ParseError::TrailingContent {
                position: tail.location(),
            });
        }
    }

    parsed.root.ok_or(ParseError::NoFragment)
}

/// A root element and the byte offset just past it.
#[derive(Debug)]
pub(crate) struct ParsedFragment {
    pub root: Option<Node>,
    pub end: usize,
}

/// Parse the element starting at byte `start` of `source` (which must be a
/// `<`) until it closes.
pub(crate) fn parse_root(
    source: &str,
    start: usize,
    factory: &dyn NodeFactory,
    mode: ParseMode,
) -> Result<ParsedFragment, ParseError> {
    FragmentParser {
        stream: CharStream::at(source, start),
        builder: NodeBuilder::new(factory),
        factory,
        mode,
    }
    .run()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    /// Text and expressions between tags
    Content,
    /// At the `<` of an opening tag
    TagOpen,
    /// At the `</` of a closing tag
    EndTag,
    Done,
}

struct FragmentParser<'a, 'f> {
    stream: CharStream<'a>,
    builder: NodeBuilder<'f>,
    factory: &'f dyn NodeFactory,
    mode: ParseMode,
}

impl FragmentParser<'_, '_> {
    fn run(mut self) -> Result<ParsedFragment, ParseError> {
        let mut state = ParserState::TagOpen;

        while state != ParserState::Done {
            state = match state {
                ParserState::Content => self.content()?,
                ParserState::TagOpen => self.tag_open()?,
                ParserState::EndTag => self.end_tag()?,
                ParserState::Done => ParserState::Done,
            };
        }

        if let Some(tag) = self.builder.current_name() {
            if self.mode == ParseMode::Strict {
                return Err(ParseError::UnclosedElement {
                    tag: tag.to_string(),
                    position: self.stream.location(),
                });
            }
            tracing::debug!(tag, "input ended with open elements, closing them");
        }

        Ok(ParsedFragment {
            end: self.stream.offset(),
            root: self.builder.finish(),
        })
    }

    fn content(&mut self) -> Result<ParserState, ParseError> {
        let segments = scan_text(&mut self.stream, self.mode)?;
        self.push_segments(segments)?;

        Ok(match self.stream.peek_nth(1) {
            _ if self.stream.eof() => ParserState::Done,
            Some('/') => ParserState::EndTag,
            _ => ParserState::TagOpen,
        })
    }

    fn tag_open(&mut self) -> Result<ParserState, ParseError> {
        self.stream.next();
        let mut header = scan_tag_header(&mut self.stream, self.mode)?;

        for (_, value) in header.attributes.iter_mut() {
            if let AttrValue::RawExpression(expr) = value {
                if locator::contains_fragment(expr) {
                    let source_text = mem::take(expr);
                    let pieces = locator::split(&source_text, self.factory, self.mode)?;
                    *value = AttrValue::Nested(RawBlock {
                        source_text,
                        pieces,
                    });
                }
            }
        }

        let terminated = header.terminated;
        Ok(match self.builder.open(header) {
            Opened::Root => ParserState::Done,
            _ if !terminated => ParserState::Done,
            Opened::Open | Opened::Leaf => ParserState::Content,
        })
    }

    fn end_tag(&mut self) -> Result<ParserState, ParseError> {
        let position = self.stream.location();
        self.stream.consume("</");
        self.stream.skip_whitespace();

        let name_start = self.stream.offset();
        while self
            .stream
            .peek()
            .is_some_and(|c| c != '>' && !c.is_whitespace())
        {
            self.stream.next();
        }
        let name = self.stream.slice(name_start, self.stream.offset());

        if !self.stream.skip_until('>', None) && self.mode == ParseMode::Strict {
            return Err(ParseError::UnterminatedTag {
                tag: format!("/{name}"),
                position,
            });
        }

        if self.mode == ParseMode::Strict {
            match self.builder.current_name() {
                None => {
                    return Err(ParseError::UnmatchedClosingTag {
                        name: name.to_string(),
                        position,
                    })
                }
                Some(open) if open != name && !is_void_element(name) => {
                    return Err(ParseError::MismatchedClosingTag {
                        expected: open.to_string(),
                        found: name.to_string(),
                        position,
                    })
                }
                Some(_) => {}
            }
        }

        Ok(match self.builder.close(name) {
            Closed::Root => ParserState::Done,
            Closed::Inner | Closed::IgnoredVoid => ParserState::Content,
            Closed::Unmatched => {
                tracing::debug!(tag = name, %position, "unmatched closing tag, stopping");
                ParserState::Done
            }
        })
    }

    /// Group segments into text nodes; expressions holding markup become
    /// raw blocks with their fragments parsed.
    fn push_segments(&mut self, segments: Vec<TextSegment>) -> Result<(), ParseError> {
        let mut run = Vec::new();

        for segment in segments {
            match segment {
                TextSegment::Expression(source_text) if locator::contains_fragment(&source_text) => {
                    self.builder.text(mem::take(&mut run));
                    let pieces = locator::split(&source_text, self.factory, self.mode)?;
                    self.builder.raw_block(source_text, pieces);
                }
                other => run.push(other),
            }
        }

        self.builder.text(run);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Piece, Text};

    fn lit(s: &str) -> TextSegment {
        TextSegment::Literal(s.to_string())
    }

    fn strict(text: &str) -> Result<Node, ParseError> {
        parse_fragment_with(text, &DefaultNodeFactory, ParseMode::Strict)
    }

    #[test]
    fn parses_element_with_text() {
        let node = parse_fragment(r#"<p class={name}>hello world</p>"#).unwrap();

        let Node::Element(p) = node else {
            panic!("expected element");
        };
        assert_eq!(p.tag_name, "p");
        assert_eq!(
            p.attributes.get("class"),
            Some(&AttrValue::RawExpression("name".into()))
        );
        assert_eq!(
            p.children,
            vec![Node::Text(Text {
                segments: vec![lit("hello world")]
            })]
        );
    }

    #[test]
    fn parses_components_and_self_closing_children() {
        let node = parse_fragment(r#"<B key="b"><A /></B>"#).unwrap();

        let Node::Component(b) = node else {
            panic!("expected component");
        };
        assert_eq!(b.reference, "B");
        assert_eq!(b.children.len(), 1);
        assert!(matches!(&b.children[0], Node::Component(a) if a.reference == "A" && a.self_closing));
    }

    #[test]
    fn parses_deep_nesting() {
        let node = parse_fragment("<div><section><ul><li>x</li></ul></section></div>").unwrap();

        let li = &node.children()[0].children()[0].children()[0];
        assert_eq!(li.name(), Some("li"));
        assert_eq!(li.children().len(), 1);
    }

    #[test]
    fn whitespace_only_lines_between_tags_are_dropped() {
        let node = parse_fragment("<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>").unwrap();

        assert_eq!(node.children().len(), 2);
        assert!(node.children().iter().all(|c| c.name() == Some("li")));
    }

    #[test]
    fn expression_with_markup_becomes_raw_block() {
        let node = parse_fragment("<div>{[<div></div>]}</div>").unwrap();

        let [Node::RawBlock(block)] = node.children() else {
            panic!("expected one raw block, got {:?}", node.children());
        };
        assert_eq!(block.source_text, "[<div></div>]");
        assert_eq!(block.pieces.len(), 3);
        assert_eq!(block.pieces[0], Piece::Code("[".into()));
        assert!(matches!(&block.pieces[1], Piece::Markup(n) if n.name() == Some("div")));
        assert_eq!(block.pieces[2], Piece::Code("]".into()));
    }

    #[test]
    fn text_around_raw_block_stays_separate() {
        let node = parse_fragment("<p>a {x} {ok && <b/>} c</p>").unwrap();
        let children = node.children();

        assert_eq!(children.len(), 3);
        assert_eq!(
            children[0],
            Node::Text(Text {
                segments: vec![
                    lit("a "),
                    TextSegment::Expression("x".into()),
                    lit(" "),
                ]
            })
        );
        assert!(matches!(children[1], Node::RawBlock(_)));
        assert_eq!(children[2], Node::Text(Text { segments: vec![lit(" c")] }));
    }

    #[test]
    fn attribute_expression_with_markup_is_nested() {
        let node = parse_fragment("<Card icon={<Icon name='x' />} />").unwrap();
        let attrs = node.attributes().unwrap();

        let Some(AttrValue::Nested(block)) = attrs.get("icon") else {
            panic!("expected nested attribute");
        };
        assert_eq!(block.pieces.len(), 1);
        assert!(matches!(&block.pieces[0], Piece::Markup(n) if n.name() == Some("Icon")));
    }

    #[test]
    fn void_elements_take_no_children() {
        let node = parse_fragment("<label><input type='text'>after</label>").unwrap();
        let children = node.children();

        assert_eq!(children.len(), 2);
        assert!(children[0].is_self_closing());
        assert!(children[0].children().is_empty());
        assert!(matches!(children[1], Node::Text(_)));
    }

    #[test]
    fn void_closing_tag_is_tolerated() {
        let node = parse_fragment("<p><input></input>x</p>").unwrap();

        assert_eq!(node.children().len(), 2);
    }

    #[test]
    fn lenient_unclosed_elements_are_closed_at_end() {
        let node = parse_fragment("<div><span>text").unwrap();

        assert_eq!(node.children()[0].name(), Some("span"));
        assert_eq!(node.children()[0].children().len(), 1);
    }

    #[test]
    fn lenient_unterminated_tag_keeps_attributes() {
        let node = parse_fragment("<div id='a' hidden").unwrap();

        assert_eq!(node.attributes().unwrap().len(), 2);
    }

    #[test]
    fn lenient_ignores_trailing_content() {
        let node = parse_fragment("<a/></b> trailing").unwrap();
        assert_eq!(node.name(), Some("a"));
    }

    #[test]
    fn closing_tag_names_are_not_matched_leniently() {
        let node = parse_fragment("<div><span>x</div></span>").unwrap();
        assert_eq!(node.name(), Some("div"));
        assert_eq!(node.children()[0].name(), Some("span"));
    }

    #[test]
    fn empty_input_has_no_fragment() {
        assert_eq!(parse_fragment("   "), Err(ParseError::NoFragment));
        assert_eq!(parse_fragment("just text"), Err(ParseError::NoFragment));
    }

    #[test]
    fn strict_rejects_mismatched_close() {
        let err = strict("<div><span>x</div>").unwrap_err();

        assert!(matches!(
            err,
            ParseError::MismatchedClosingTag { ref expected, ref found, position }
                if expected == "span" && found == "div" && position.offset == 12
        ));
    }

    #[test]
    fn strict_rejects_unclosed_element() {
        let err = strict("<div>\n<p>text</p>").unwrap_err();

        assert!(matches!(
            err,
            ParseError::UnclosedElement { ref tag, position } if tag == "div" && position.line == 2
        ));
    }

    #[test]
    fn strict_rejects_trailing_content() {
        let err = strict("<a></a> more").unwrap_err();
        assert!(matches!(err, ParseError::TrailingContent { position } if position.offset == 8));
    }

    #[test]
    fn strict_rejects_leading_text() {
        let err = strict("text <a/>").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedCharacter { found: 't', .. }));
    }

    #[test]
    fn closing_tag_may_have_whitespace_around_name() {
        let node = strict("<div><span>a</ span ></\tdiv>").unwrap();

        assert_eq!(node.name(), Some("div"));
        assert_eq!(node.children().len(), 1);
    }

    #[test]
    fn strict_accepts_well_formed_fragment() {
        let node = strict("  <ul>\n  <li>{item}</li>\n</ul>\n").unwrap();
        assert_eq!(node.children().len(), 1);
    }
}
