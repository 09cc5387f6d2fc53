//! Markup tokenizer and tree builder for Trellis.
//!
//! # Scope
//!
//! This crate implements a simplified subset of the HTML tokenization and tree
//! construction algorithm:
//! - **Tokenizer**: a character-driven state machine over a position-tracked
//!   scanner. Tag, attribute, comment, bogus comment, doctype and raw text
//!   (`script`, `style`) states.
//! - **Tree builder**: insertion modes from Initial through AfterBody, a single
//!   `current` pointer instead of a stack of open elements, implied closing of
//!   `p` before block elements and implied end tags for `p`, `li`, `dt`, `dd` and
//!   `option`.
//!
//! There is no token stream: state handlers mutate the tree directly.
//!
//! # Not Implemented
//!
//! - Character references (`&amp;` stays as written)
//! - Encoding sniffing (input must be UTF-8)
//! - Error recovery: a structural error stops the parse
//!
//! ```
//! let tree = trellis_html::parse("<html><body>foo</body></html>").unwrap();
//! assert_eq!(tree.to_string(), "<html><body>foo</body></html>");
//! ```

use std::io::Read;

use thiserror::Error;
use trellis_dom::DomTree;

mod error;
/// Tokenizer states and tree construction.
pub mod parser;

pub use error::{ParseError, ParseErrorKind};
pub use parser::{HTMLParser, InsertionMode, TokenizerState, print_tree};

/// Errors from [`parse_reader`].
#[derive(Debug, Error)]
pub enum Error {
    /// The markup was read but could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The reader failed or produced invalid UTF-8.
    #[error("failed to read markup input: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse a complete document from a string.
///
/// # Errors
///
/// Returns the first structural [`ParseError`]. Use [`HTMLParser::run`] to keep
/// the partially built tree alongside the error.
pub fn parse(input: &str) -> Result<DomTree, ParseError> {
    let (tree, result) = HTMLParser::new(input).run();
    result.map(|()| tree)
}

/// Read all of `reader` as UTF-8 and parse it.
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails or the bytes are not UTF-8, and
/// [`Error::Parse`] for malformed markup.
pub fn parse_reader(mut reader: impl Read) -> Result<DomTree, Error> {
    let mut input = String::new();
    let _ = reader.read_to_string(&mut input)?;
    Ok(parse(&input)?)
}
