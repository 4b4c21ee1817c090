//! Tag header scanning: `<name attr="v" flag expr={x} />`.

use crate::config::ParseMode;
use crate::error::ParseError;
use crate::node::{AttrValue, Attributes};
use crate::stream::{CharStream, Position};
use crate::text::capture_expression;

/// Elements that never have children.
pub const VOID_ELEMENTS: [&str; 15] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Attributes rendered as boolean `true` when written without a value.
pub const BOOLEAN_ATTRIBUTES: &[&str] = &[
    "allowFullscreen",
    "async",
    "autofocus",
    "autoplay",
    "checked",
    "compact",
    "controls",
    "declare",
    "default",
    "defaultChecked",
    "defaultMuted",
    "defaultSelected",
    "defer",
    "disabled",
    "draggable",
    "enabled",
    "formNoValidate",
    "hidden",
    "indeterminate",
    "inert",
    "isMap",
    "itemScope",
    "loop",
    "multiple",
    "muted",
    "noHref",
    "noResize",
    "noShade",
    "noValidate",
    "noWrap",
    "open",
    "pauseOnExit",
    "readOnly",
    "required",
    "reversed",
    "scoped",
    "seamless",
    "selected",
    "sortable",
    "spellcheck",
    "translate",
    "trueSpeed",
    "typeMustMatch",
    "visible",
];

pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Case-insensitive, so `readonly` and `readOnly` both match.
pub fn is_boolean_attribute(name: &str) -> bool {
    BOOLEAN_ATTRIBUTES
        .iter()
        .any(|attr| attr.eq_ignore_ascii_case(name))
}

/// Whether a tag identifier names a component rather than an element.
///
/// Identifiers that lowercasing would change (`Button`, `myButton`) and
/// dotted references (`menu.Item`) are components.
pub fn is_component_name(name: &str) -> bool {
    name.contains('.') || name.to_lowercase() != name
}

/// A scanned tag header.
#[derive(Debug, Clone, PartialEq)]
pub struct TagHeader {
    pub name: String,
    pub attributes: Attributes,
    /// Explicit `/>` or a void element name
    pub self_closing: bool,
    /// False when input ended before the closing `>`
    pub terminated: bool,
}

impl TagHeader {
    pub fn is_component(&self) -> bool {
        is_component_name(&self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderState {
    TagName,
    BeforeAttributeName,
    AttributeName,
    AfterAttributeName,
    BeforeAttributeValue,
    QuotedValue(char),
    UnquotedValue,
    SelfClosingStart,
    Done,
}

/// Scan a tag header. `stream` must be positioned just after the `<`; on
/// return it is just past the terminating `>` (or at end of input).
pub fn scan_tag_header(
    stream: &mut CharStream<'_>,
    mode: ParseMode,
) -> Result<TagHeader, ParseError> {
    HeaderScanner::new(stream, mode).run()
}

struct HeaderScanner<'s, 'a> {
    stream: &'s mut CharStream<'a>,
    mode: ParseMode,
    start: Position,
    name: String,
    attr_name: String,
    value: String,
    attributes: Attributes,
    self_closing: bool,
}

impl<'s, 'a> HeaderScanner<'s, 'a> {
    fn new(stream: &'s mut CharStream<'a>, mode: ParseMode) -> Self {
        let start = stream.location();
        Self {
            stream,
            mode,
            start,
            name: String::new(),
            attr_name: String::new(),
            value: String::new(),
            attributes: Attributes::new(),
            self_closing: false,
        }
    }

    fn run(mut self) -> Result<TagHeader, ParseError> {
        let mut state = HeaderState::TagName;

        while state != HeaderState::Done {
            let Some(ch) = self.stream.peek() else {
                return self.unterminated(state);
            };
            state = self.step(state, ch)?;
        }

        Ok(self.finish(true))
    }

    /// One transition. Consumes `ch` unless the target state reprocesses it.
    fn step(&mut self, state: HeaderState, ch: char) -> Result<HeaderState, ParseError> {
        use HeaderState::*;

        let next = match (state, ch) {
            (TagName, '>') | (BeforeAttributeName, '>') => {
                self.stream.next();
                Done
            }
            (TagName, '/') | (BeforeAttributeName, '/') => {
                self.stream.next();
                SelfClosingStart
            }
            (TagName, c) if c.is_whitespace() => {
                self.stream.next();
                BeforeAttributeName
            }
            (TagName, c) => {
                self.stream.next();
                self.name.push(c);
                TagName
            }

            (BeforeAttributeName, c) if c.is_whitespace() => {
                self.stream.next();
                BeforeAttributeName
            }
            (BeforeAttributeName, '{') => {
                self.skip_unnamed_expression()?;
                BeforeAttributeName
            }
            (BeforeAttributeName, c) => {
                self.stream.next();
                self.attr_name.push(c);
                AttributeName
            }

            (AttributeName, '=') | (AfterAttributeName, '=') => {
                self.stream.next();
                BeforeAttributeValue
            }
            (AttributeName, '>') | (AttributeName, '/') => {
                self.commit(AttrValue::BooleanFlag);
                BeforeAttributeName
            }
            (AttributeName, c) if c.is_whitespace() => {
                self.stream.next();
                AfterAttributeName
            }
            (AttributeName, c) => {
                self.stream.next();
                self.attr_name.push(c);
                AttributeName
            }

            (AfterAttributeName, c) if c.is_whitespace() => {
                self.stream.next();
                AfterAttributeName
            }
            (AfterAttributeName, _) => {
                self.commit(AttrValue::BooleanFlag);
                BeforeAttributeName
            }

            (BeforeAttributeValue, c) if c.is_whitespace() => {
                self.stream.next();
                BeforeAttributeValue
            }
            (BeforeAttributeValue, quote @ ('"' | '\'' | '`')) => {
                self.stream.next();
                QuotedValue(quote)
            }
            (BeforeAttributeValue, '{') => {
                let expr = capture_expression(self.stream);
                if !expr.terminated && self.mode == ParseMode::Strict {
                    return Err(ParseError::UnbalancedBraces {
                        position: expr.start,
                    });
                }
                self.commit(AttrValue::RawExpression(expr.text.trim().to_string()));
                BeforeAttributeName
            }
            (BeforeAttributeValue, '/') if self.slash_closes_tag() => {
                self.strict_unexpected('/')?;
                self.stream.next();
                self.commit(AttrValue::StringLiteral(String::new()));
                SelfClosingStart
            }
            (BeforeAttributeValue, '>') => {
                self.strict_unexpected('>')?;
                self.commit(AttrValue::StringLiteral(String::new()));
                BeforeAttributeName
            }
            (BeforeAttributeValue, c) => {
                self.stream.next();
                self.value.push(c);
                UnquotedValue
            }

            (QuotedValue(quote), c) if c == quote => {
                self.stream.next();
                let value = std::mem::take(&mut self.value);
                self.commit(AttrValue::StringLiteral(value));
                BeforeAttributeName
            }
            (QuotedValue(quote), c) => {
                self.stream.next();
                self.value.push(c);
                QuotedValue(quote)
            }

            (UnquotedValue, c) if c.is_whitespace() || c == '>' => {
                let value = std::mem::take(&mut self.value);
                self.commit(AttrValue::StringLiteral(value));
                BeforeAttributeName
            }
            (UnquotedValue, '/') if self.slash_closes_tag() => {
                self.stream.next();
                let value = std::mem::take(&mut self.value);
                self.commit(AttrValue::StringLiteral(value));
                SelfClosingStart
            }
            (UnquotedValue, c) => {
                self.stream.next();
                self.value.push(c);
                UnquotedValue
            }

            (SelfClosingStart, '>') => {
                self.stream.next();
                self.self_closing = true;
                Done
            }
            (SelfClosingStart, c) if c.is_whitespace() => {
                self.stream.next();
                SelfClosingStart
            }
            (SelfClosingStart, c) => {
                // a stray `/` between attributes
                self.strict_unexpected(c)?;
                BeforeAttributeName
            }

            (Done, _) => Done,
        };

        Ok(next)
    }

    /// Store the pending attribute under the pending name.
    fn commit(&mut self, value: AttrValue) {
        let name = std::mem::take(&mut self.attr_name);
        self.value.clear();
        if !name.is_empty() {
            self.attributes.insert(name, value);
        }
    }

    /// A `/` at the cursor that ends the header rather than an unquoted value.
    fn slash_closes_tag(&self) -> bool {
        match self.stream.peek_nth(1) {
            None => true,
            Some(c) => c == '>' || c.is_whitespace(),
        }
    }

    /// `{...spread}` and other unnamed expressions have no props slot.
    fn skip_unnamed_expression(&mut self) -> Result<(), ParseError> {
        let position = self.stream.location();
        self.strict_unexpected('{')?;
        let expr = capture_expression(self.stream);
        tracing::debug!(
            expression = expr.text,
            %position,
            "dropping unnamed attribute expression"
        );
        Ok(())
    }

    fn strict_unexpected(&self, found: char) -> Result<(), ParseError> {
        match self.mode {
            ParseMode::Strict => Err(ParseError::UnexpectedCharacter {
                found,
                position: self.stream.location(),
            }),
            ParseMode::Lenient => Ok(()),
        }
    }

    /// End of input before `>`: keep whatever was scanned.
    fn unterminated(mut self, state: HeaderState) -> Result<TagHeader, ParseError> {
        if self.mode == ParseMode::Strict {
            return Err(ParseError::UnterminatedTag {
                tag: self.name,
                position: self.start,
            });
        }

        match state {
            HeaderState::AttributeName | HeaderState::AfterAttributeName => {
                self.commit(AttrValue::BooleanFlag);
            }
            HeaderState::QuotedValue(_) | HeaderState::UnquotedValue => {
                let value = std::mem::take(&mut self.value);
                self.commit(AttrValue::StringLiteral(value));
            }
            _ => {}
        }

        tracing::debug!(tag = %self.name, position = %self.start, "unterminated tag header");
        Ok(self.finish(false))
    }

    fn finish(self, terminated: bool) -> TagHeader {
        let void = !is_component_name(&self.name) && is_void_element(&self.name);
        TagHeader {
            self_closing: self.self_closing || void,
            name: self.name,
            attributes: self.attributes,
            terminated,
        }
    }
}
