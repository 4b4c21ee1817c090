//! Text content scanning: literal runs, `{expressions}` and comments.

use crate::config::ParseMode;
use crate::error::ParseError;
use crate::node::TextSegment;
use crate::stream::{CharStream, Position};

/// A brace-delimited expression captured from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Expression<'a> {
    /// Code between the braces, untrimmed
    pub text: &'a str,
    /// False when input ended before the matching `}`
    pub terminated: bool,
    /// Position of the opening `{`
    pub start: Position,
}

/// Capture a `{...}` expression. `stream` must be positioned at the `{`.
///
/// Nesting is tracked with a brace counter only; quotes inside the
/// expression are not interpreted, so markup text such as `it's` nested in
/// the expression cannot derail the count.
pub(crate) fn capture_expression<'a>(stream: &mut CharStream<'a>) -> Expression<'a> {
    let start = stream.location();
    stream.next();
    let body = stream.offset();
    let mut depth = 1usize;

    while let Some(ch) = stream.next() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = stream.offset() - 1;
                    return Expression {
                        text: stream.slice(body, end),
                        terminated: true,
                        start,
                    };
                }
            }
            _ => {}
        }
    }

    Expression {
        text: stream.slice(body, stream.offset()),
        terminated: false,
        start,
    }
}

/// True when `expr` holds nothing but comments and whitespace, as in
/// `{/* note */}`.
pub(crate) fn is_comment_only(expr: &str) -> bool {
    let mut stream = CharStream::new(expr);
    loop {
        stream.skip_whitespace();
        if stream.consume("//") {
            stream.skip_until('\n', None);
        } else if stream.consume("/*") {
            stream.skip_until('/', Some('*'));
        } else {
            return stream.eof();
        }
    }
}

/// Whether the `<` at the cursor opens or closes a tag.
pub(crate) fn at_tag_boundary(stream: &CharStream<'_>) -> bool {
    stream.peek() == Some('<')
        && stream
            .peek_nth(1)
            .is_some_and(|c| c == '/' || is_identifier_start(c))
}

pub(crate) fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

pub(crate) fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Scan text content up to the next tag boundary or end of input.
///
/// Returns literal and expression segments in source order. Comments
/// (`<!-- -->`, `<!...>`, `/* */`, and `//` to end of line when it starts a
/// line or follows whitespace) are dropped, as are `{}` expressions holding
/// only comments. A `<` that does not start a tag stays literal.
pub fn scan_text(
    stream: &mut CharStream<'_>,
    mode: ParseMode,
) -> Result<Vec<TextSegment>, ParseError> {
    let mut segments = Vec::new();
    let mut literal = String::new();

    while let Some(ch) = stream.peek() {
        match ch {
            '<' if stream.starts_with("<!--") => {
                stream.consume("<!--");
                skip_html_comment(stream);
            }
            '<' if stream.peek_nth(1) == Some('!') => {
                stream.skip_until('>', None);
            }
            '<' if at_tag_boundary(stream) => break,
            '{' => {
                flush_literal(&mut literal, &mut segments);
                let expr = capture_expression(stream);
                if !expr.terminated && mode == ParseMode::Strict {
                    return Err(ParseError::UnbalancedBraces {
                        position: expr.start,
                    });
                }
                if !is_comment_only(expr.text) {
                    segments.push(TextSegment::Expression(expr.text.trim().to_string()));
                }
            }
            '/' if stream.peek_nth(1) == Some('*') => {
                stream.consume("/*");
                stream.skip_until('/', Some('*'));
            }
            '/' if stream.peek_nth(1) == Some('/') && starts_line_comment(stream) => {
                if stream.skip_until('\n', None) {
                    literal.push('\n');
                }
            }
            _ => {
                literal.push(ch);
                stream.next();
            }
        }
    }

    flush_literal(&mut literal, &mut segments);
    Ok(segments)
}

/// `//` only comments out text after whitespace or a tag/expression end,
/// so `http://example.com` stays literal.
fn starts_line_comment(stream: &CharStream<'_>) -> bool {
    stream
        .previous()
        .map_or(true, |c| c.is_whitespace() || c == '>' || c == '}')
}

fn skip_html_comment(stream: &mut CharStream<'_>) {
    while stream.skip_until('>', Some('-')) {
        if stream.consumed().ends_with("-->") {
            return;
        }
    }
}

fn flush_literal(literal: &mut String, segments: &mut Vec<TextSegment>) {
    if literal.is_empty() {
        return;
    }
    if let Some(text) = normalize_literal(literal) {
        segments.push(TextSegment::Literal(text));
    }
    literal.clear();
}

/// Apply JSX whitespace rules to a literal run.
///
/// Single-line text is kept as written. Multi-line text has each line
/// trimmed (the first only at its end, the last only at its start), blank
/// lines dropped, and the remaining lines joined with one space.
pub fn normalize_literal(raw: &str) -> Option<String> {
    if !raw.contains('\n') {
        return Some(raw.to_string());
    }

    let lines: Vec<&str> = raw.lines().collect();
    let last = lines.len().saturating_sub(1);
    let mut out = String::new();

    for (i, line) in lines.iter().enumerate() {
        let line = match (i == 0, i == last) {
            (true, _) => line.trim_end(),
            (false, true) => line.trim_start(),
            (false, false) => line.trim(),
        };
        if line.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(line);
    }

    // text ending in a newline has an empty last line that `lines` omits
    if raw.ends_with('\n') {
        out = out.trim_end().to_string();
    }

    (!out.is_empty()).then_some(out)
}
