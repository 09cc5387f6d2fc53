use thiserror::Error;
use trellis_common::{Position, ScanError};

use super::Combinator;

/// Malformed selector text, reported at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// Nothing but whitespace before the end of input or `{`.
    #[error("empty selector")]
    EmptySelector,

    /// `#`, `.` or `:` with no name after it.
    #[error("expected a name after '{prefix}' at {position}")]
    MissingName {
        /// The prefix character.
        prefix: char,
        /// Where the name was expected.
        position: Position,
    },

    /// A character that is not allowed where it appears, such as `)` after a
    /// tag name or text after a quoted attribute value.
    #[error("unexpected character {found:?} at {position}")]
    UnexpectedCharacter {
        /// The offending character.
        found: char,
        /// Position just after it.
        position: Position,
    },

    /// `[` without a matching `]`.
    #[error("unterminated attribute selector at {position}")]
    UnterminatedAttribute {
        /// Where the selector was cut off.
        position: Position,
    },

    /// `[]` or `[=v]`.
    #[error("attribute selector without a name at {position}")]
    EmptyAttributeName {
        /// Position of the closing `]`.
        position: Position,
    },

    /// More than one of `>`, `+`, `~` between two sequences.
    #[error("can't combine multiple combinators at {position}")]
    MultipleCombinators {
        /// Position of the second combinator.
        position: Position,
    },

    /// The selector starts with `>`, `+` or `~`.
    #[error("selector cannot start with combinator '{found}'")]
    LeadingCombinator {
        /// The combinator character.
        found: char,
    },

    /// The selector ends with `>`, `+` or `~`.
    #[error("selector ends with dangling combinator '{combinator}'")]
    DanglingCombinator {
        /// The trailing combinator.
        combinator: Combinator,
    },

    /// `a, b` is a selector group, which is not supported.
    #[error("selector groups are not supported (',' at {position})")]
    GroupsUnsupported {
        /// Position of the comma.
        position: Position,
    },

    /// The scanner refused a pushback.
    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// A selector that parsed but cannot be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// A pseudo-class other than `root`, `first-child`, `last-child`,
    /// `only-child` and `empty`.
    #[error("unsupported pseudo-class ':{0}'")]
    UnsupportedPseudoClass(String),

    /// Any pseudo-element.
    #[error("unsupported pseudo-element '::{0}'")]
    UnsupportedPseudoElement(String),
}
