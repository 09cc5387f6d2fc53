//! Parse errors.

use thiserror::Error;
use trellis_common::{Position, ScanError};
use trellis_dom::NodeId;

use crate::parser::{InsertionMode, TokenizerState};

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// An end tag did not name the open element.
    #[error("end tag </{found}> does not match open element <{open}>")]
    EndTagMismatch {
        /// Tag name of the element that was open.
        open: String,
        /// The end tag name as it was written.
        found: String,
    },

    /// An end tag appeared while no element was open.
    #[error("end tag </{found}> with no open element")]
    UnexpectedEndTag {
        /// The end tag name as it was written.
        found: String,
    },

    /// The input ended inside a tag, comment or doctype.
    #[error("unexpected end of input in {state} state")]
    UnexpectedEndOfInput {
        /// The tokenizer state the input ended in.
        state: TokenizerState,
    },

    /// The input ended inside a quoted attribute value.
    #[error("unterminated value for attribute '{name}'")]
    UnterminatedAttributeValue {
        /// The attribute being read.
        name: String,
    },

    /// `<!D` was not followed by the rest of `DOCTYPE`, or a doctype had
    /// unexpected content after its identifiers.
    #[error("malformed doctype: {found}")]
    MalformedDoctype {
        /// The text that broke the declaration.
        found: String,
    },

    /// Something other than `PUBLIC` or `SYSTEM` followed the doctype name.
    #[error("expected PUBLIC or SYSTEM in doctype, found '{keyword}'")]
    MalformedDoctypeKeyword {
        /// The six characters that were read instead.
        keyword: String,
    },

    /// The input ended inside a quoted doctype identifier.
    #[error("unterminated doctype identifier")]
    UnterminatedDoctypeIdentifier,

    /// A `PUBLIC` or `SYSTEM` keyword had no quoted identifier after it.
    #[error("missing quoted identifier after doctype keyword")]
    MissingDoctypeIdentifier,

    /// An attribute name occurred twice on one start tag (strict mode only).
    #[error("duplicate attribute '{name}' on <{tag}>")]
    DuplicateAttribute {
        /// The repeated attribute name.
        name: String,
        /// The start tag carrying it.
        tag: String,
    },

    /// A doctype appeared after the document had started (strict mode only).
    #[error("doctype in {mode} insertion mode")]
    MisplacedDoctype {
        /// The insertion mode at the time.
        mode: InsertionMode,
    },

    /// `<` was not followed by a tag name, `/`, `!` or `?` (strict mode only).
    #[error("invalid character '{found}' after '<'")]
    InvalidTagStart {
        /// The character after `<`.
        found: char,
    },

    /// The scanner refused to reconsume a character.
    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// A fatal parse error, with where it happened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at {position}: {kind}")]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// The node the parser was working on (the current node), if any.
    pub node: Option<NodeId>,
    /// Scanner position when the error was raised.
    pub position: Position,
}

impl ParseError {
    /// Create an error.
    #[must_use]
    pub const fn new(kind: ParseErrorKind, node: Option<NodeId>, position: Position) -> Self {
        Self {
            kind,
            node,
            position,
        }
    }
}
