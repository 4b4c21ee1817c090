//! Span locator: finds markup fragments embedded in ordinary source text.
//!
//! This is a best-effort heuristic layered over the fragment parser. The
//! surrounding code is not parsed; the locator only skips string literals
//! and comments, and treats `<` followed by an identifier as the start of a
//! fragment when the previous token allows an expression to begin there.
//! The fragment ends where the parser closes its root element.

use crate::config::ParseMode;
use crate::error::ParseError;
use crate::node::{Node, Piece};
use crate::parser::parse_root;
use crate::stream::CharStream;
use crate::text::{is_identifier_part, is_identifier_start};
use crate::traits::NodeFactory;

/// Keywords after which an expression, and so markup, may follow.
const EXPRESSION_KEYWORDS: &[&str] = &[
    "return", "yield", "await", "default", "case", "else", "do", "in", "of", "typeof", "void",
    "delete", "throw",
];

/// Byte range of a located fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// A located and parsed fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment<'a> {
    pub span: Span,
    /// The fragment's text as written
    pub source: &'a str,
    pub root: Node,
}

/// Byte offset of the next fragment start at or after `from`.
pub fn find_start(text: &str, from: usize) -> Option<usize> {
    let mut stream = CharStream::at(text, from);
    let mut prev = None;
    let mut word = String::new();

    while let Some(ch) = stream.peek() {
        match ch {
            '\'' | '"' | '`' => {
                stream.next();
                skip_string(&mut stream, ch);
                prev = Some(ch);
            }
            '/' if stream.peek_nth(1) == Some('/') => {
                stream.skip_until('\n', None);
            }
            '/' if stream.peek_nth(1) == Some('*') => {
                stream.consume("/*");
                stream.skip_until('/', Some('*'));
            }
            '<' if stream.peek_nth(1).is_some_and(is_identifier_start)
                && may_begin_expression(prev, &word) =>
            {
                return Some(stream.offset());
            }
            c if c.is_whitespace() => {
                stream.next();
            }
            c => {
                if is_identifier_part(c) {
                    if !stream.previous().is_some_and(is_identifier_part) {
                        word.clear();
                    }
                    word.push(c);
                }
                prev = Some(c);
                stream.next();
            }
        }
    }

    None
}

/// True when `text` contains at least one fragment start.
pub fn contains_fragment(text: &str) -> bool {
    find_start(text, 0).is_some()
}

/// Locate and parse the next fragment at or after `from`.
pub fn next_fragment<'a>(
    text: &'a str,
    from: usize,
    factory: &dyn NodeFactory,
    mode: ParseMode,
) -> Result<Option<Fragment<'a>>, ParseError> {
    let mut from = from;

    while let Some(start) = find_start(text, from) {
        let parsed = parse_root(text, start, factory, mode)?;
        let span = Span {
            start,
            end: parsed.end,
        };

        match parsed.root {
            Some(root) => {
                tracing::debug!(start, end = span.end, tag = ?root.name(), "located fragment");
                return Ok(Some(Fragment {
                    span,
                    source: &text[start..span.end],
                    root,
                }));
            }
            None => from = start + 1,
        }
    }

    Ok(None)
}

/// Split `text` into verbatim code and parsed fragments, in order.
///
/// Empty code runs between adjacent fragments are omitted. Text without
/// fragments yields a single [`Piece::Code`] (or nothing when empty).
pub fn split(
    text: &str,
    factory: &dyn NodeFactory,
    mode: ParseMode,
) -> Result<Vec<Piece>, ParseError> {
    let mut pieces = Vec::new();
    let mut cursor = 0;

    while let Some(fragment) = next_fragment(text, cursor, factory, mode)? {
        if fragment.span.start > cursor {
            pieces.push(Piece::Code(text[cursor..fragment.span.start].to_string()));
        }
        cursor = fragment.span.end;
        pieces.push(Piece::Markup(fragment.root));
    }

    if cursor < text.len() {
        pieces.push(Piece::Code(text[cursor..].to_string()));
    }

    Ok(pieces)
}

fn may_begin_expression(prev: Option<char>, word: &str) -> bool {
    match prev {
        None => true,
        Some(c) if is_identifier_part(c) => EXPRESSION_KEYWORDS.contains(&word),
        // `/` opens a regex literal or divides; neither is followed by markup
        Some(')' | ']' | '/' | '\'' | '"' | '`') => false,
        Some(_) => true,
    }
}

/// Skip past the closing `quote`. Single and double quoted strings also end
/// at a line break.
fn skip_string(stream: &mut CharStream<'_>, quote: char) {
    while let Some(ch) = stream.next() {
        match ch {
            '\\' => {
                stream.next();
            }
            '\n' if quote != '`' => return,
            c if c == quote => return,
            _ => {}
        }
    }
}
