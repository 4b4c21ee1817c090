//! Character cursor shared by the scanners and the span locator.

use std::fmt;

/// A location in the input, used for strict-mode diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Byte offset from the start of the input
    pub offset: usize,
    /// 1-based line number
    pub line: usize,
    /// 1-based column, counted in characters
    pub column: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Forward-only cursor over a `&str`.
///
/// Offsets are byte offsets into the original text so callers can slice the
/// source directly; line and column are tracked as characters are consumed.
#[derive(Debug, Clone)]
pub struct CharStream<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    prev: Option<char>,
}

impl<'a> CharStream<'a> {
    /// Create a stream positioned at the start of `src`.
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            column: 1,
            prev: None,
        }
    }

    /// Create a stream positioned at byte `offset` of `src`.
    ///
    /// The offset is clamped to the input length and moved back to the
    /// nearest character boundary.
    pub fn at(src: &'a str, offset: usize) -> Self {
        let mut offset = offset.min(src.len());
        while !src.is_char_boundary(offset) {
            offset -= 1;
        }

        let consumed = &src[..offset];
        let line = 1 + consumed.matches('\n').count();
        let line_start = consumed.rfind('\n').map_or(0, |i| i + 1);
        let column = 1 + consumed[line_start..].chars().count();

        Self {
            src,
            pos: offset,
            line,
            column,
            prev: consumed.chars().next_back(),
        }
    }

    /// Look at the next character without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Look `n` characters ahead (`peek_nth(0)` is `peek()`).
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    /// The most recently consumed character.
    pub fn previous(&self) -> Option<char> {
        self.prev
    }

    /// True once every character has been consumed.
    pub fn eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// Current byte offset.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Current offset with line and column.
    pub fn location(&self) -> Position {
        Position {
            offset: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    /// The whole input this stream reads from.
    pub fn source(&self) -> &'a str {
        self.src
    }

    /// Everything not yet consumed.
    pub fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    /// Everything already consumed.
    pub fn consumed(&self) -> &'a str {
        &self.src[..self.pos]
    }

    /// Slice of the input between two byte offsets.
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.src[start..end]
    }

    /// Whether the unconsumed input starts with `pattern`.
    pub fn starts_with(&self, pattern: &str) -> bool {
        self.rest().starts_with(pattern)
    }

    /// Consume `pattern` if the input starts with it.
    pub fn consume(&mut self, pattern: &str) -> bool {
        if !self.starts_with(pattern) {
            return false;
        }
        for _ in pattern.chars() {
            self.next();
        }
        true
    }

    /// Consume whitespace.
    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.next();
        }
    }

    /// Consume characters up to and including `target`.
    ///
    /// With `preceding` set, `target` only matches when the character consumed
    /// right before it (within this call) equals `preceding`, so
    /// `skip_until('/', Some('*'))` ends a block comment at `*/` and not at a
    /// lone `/`. Stops at end of input; returns whether `target` was found.
    pub fn skip_until(&mut self, target: char, preceding: Option<char>) -> bool {
        let mut before = None;
        while let Some(ch) = self.next() {
            if ch == target && preceding.map_or(true, |p| before == Some(p)) {
                return true;
            }
            before = Some(ch);
        }
        false
    }
}

impl Iterator for CharStream<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.prev = Some(ch);
        Some(ch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_line_and_column() {
        let mut stream = CharStream::new("ab\ncd");
        for _ in 0..4 {
            stream.next();
        }

        let pos = stream.location();
        assert_eq!(pos.offset, 4);
        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 2);
        assert_eq!(pos.to_string(), "2:2");
    }

    #[test]
    fn location_through_mutable_reference() {
        fn advance_and_locate(stream: &mut CharStream<'_>) -> Position {
            stream.next();
            stream.location()
        }

        let mut stream = CharStream::new("<a>");
        let pos = advance_and_locate(&mut stream);

        assert_eq!(pos.offset, 1);
        assert_eq!(pos.column, 2);
    }

    #[test]
    fn starts_mid_input() {
        let stream = CharStream::at("one\ntwo three", 8);

        assert_eq!(stream.peek(), Some('t'));
        assert_eq!(stream.previous(), Some(' '));
        assert_eq!(stream.location().line, 2);
        assert_eq!(stream.location().column, 5);
    }

    #[test]
    fn skip_until_stops_at_target() {
        let mut stream = CharStream::new("abc>def");

        assert!(stream.skip_until('>', None));
        assert_eq!(stream.rest(), "def");
    }

    #[test]
    fn skip_until_requires_preceding_character() {
        let mut stream = CharStream::new(" a / b */ rest");

        assert!(stream.skip_until('/', Some('*')));
        assert_eq!(stream.rest(), " rest");
    }

    #[test]
    fn skip_until_ignores_characters_consumed_earlier() {
        let mut stream = CharStream::new("/*/ still comment */x");
        stream.consume("/*");

        assert!(stream.skip_until('/', Some('*')));
        assert_eq!(stream.rest(), "x");
    }

    #[test]
    fn skip_until_terminates_at_end_of_input() {
        let mut stream = CharStream::new("no terminator here");

        assert!(!stream.skip_until('>', None));
        assert!(stream.eof());
        assert_eq!(stream.next(), None);
    }

    #[test]
    fn handles_multibyte_characters() {
        let mut stream = CharStream::new("é<");

        assert_eq!(stream.next(), Some('é'));
        assert_eq!(stream.offset(), 2);
        assert_eq!(stream.peek(), Some('<'));
        assert_eq!(stream.location().column, 2);
    }
}
