//! Errors raised by the fragment parser in strict mode.

use crate::stream::Position;

/// A malformed-markup diagnostic.
///
/// Only [`ParseMode::Strict`](crate::ParseMode::Strict) surfaces these for
/// malformed markup; lenient parsing recovers instead and at most reports
/// [`ParseError::NoFragment`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unterminated tag `<{tag}` starting at {position}")]
    UnterminatedTag { tag: String, position: Position },

    #[error("Unbalanced braces in expression starting at {position}")]
    UnbalancedBraces { position: Position },

    #[error("Unexpected closing tag `</{name}>` at {position}")]
    UnmatchedClosingTag { name: String, position: Position },

    #[error("Closing tag `</{found}>` does not match `<{expected}>` at {position}")]
    MismatchedClosingTag {
        expected: String,
        found: String,
        position: Position,
    },

    #[error("Element `<{tag}>` is never closed (input ends at {position})")]
    UnclosedElement { tag: String, position: Position },

    #[error("Unexpected character `{found}` at {position}")]
    UnexpectedCharacter { found: char, position: Position },

    #[error("Unexpected content after fragment at {position}")]
    TrailingContent { position: Position },

    #[error("No markup fragment found")]
    NoFragment,
}

impl ParseError {
    /// Where the problem was detected, if the error has a location.
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::UnterminatedTag { position, .. }
            | Self::UnbalancedBraces { position }
            | Self::UnmatchedClosingTag { position, .. }
            | Self::MismatchedClosingTag { position, .. }
            | Self::UnclosedElement { position, .. }
            | Self::UnexpectedCharacter { position, .. }
            | Self::TrailingContent { position } => Some(*position),
            Self::NoFragment => None,
        }
    }
}
