//! Helper functions for the tokenizer and tree builder.
//!
//! This module contains the utilities shared by every state handler:
//! - State transitions ("switch to", "reconsume in")
//! - Input handling ("consume the next input character")
//! - Error construction, including the strict-mode split between warnings and
//!   fatal errors
//! - The fixed element sets that drive tree construction

use trellis_common::warning::warn_once;

use super::core::{HTMLParser, InsertionMode};
use super::states::TokenizerState;
use crate::error::{ParseError, ParseErrorKind};

/// Elements whose content is raw text up to the matching end tag.
pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Elements that never have content. They are appended but never become the
/// current node.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Start tags that implicitly close an open `p` in body modes.
pub const P_CLOSING_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "div",
    "dl",
    "fieldset",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "ul",
];

/// Elements whose end tag may be omitted; an unrelated end tag closes them.
pub const IMPLIED_END_TAG_ELEMENTS: &[&str] = &["p", "li", "dt", "dd", "option"];

/// Elements that may appear inside `head` without leaving the InHead mode.
pub const HEAD_CONTENT_ELEMENTS: &[&str] = &[
    "base", "link", "meta", "noscript", "script", "style", "template", "title",
];

// =============================================================================
// State Transition Helpers
// =============================================================================

impl HTMLParser<'_> {
    /// "Switch to the X state"
    ///
    /// The next character is consumed on the next iteration of the main loop.
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// "Reconsume in the X state"
    ///
    /// Pushes the current input character back into the scanner so the new
    /// state sees it again.
    pub(super) fn reconsume_in(&mut self, new_state: TokenizerState) -> Result<(), ParseError> {
        self.scanner
            .unread_one()
            .map_err(|err| self.error(ParseErrorKind::Scan(err)))?;
        self.state = new_state;
        Ok(())
    }

    /// Stop the main loop after the current handler returns.
    pub(super) const fn stop(&mut self) {
        self.stopped = true;
    }
}

// =============================================================================
// Input Helpers
// =============================================================================

impl HTMLParser<'_> {
    /// "Consume the next input character"
    pub(super) fn consume(&mut self) -> Option<char> {
        self.scanner.read_one()
    }

    /// Tab, line feed, form feed, carriage return and space.
    pub(super) const fn is_whitespace_char(c: char) -> bool {
        matches!(c, ' ' | '\t' | '\n' | '\x0C' | '\r')
    }
}

// =============================================================================
// Error Helpers
// =============================================================================

impl HTMLParser<'_> {
    /// Build a fatal error at the current position, naming the current node.
    pub(super) fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, Some(self.current), self.scanner.position())
    }

    /// End of input where it is not allowed.
    pub(super) fn eof_error(&self) -> ParseError {
        self.error(ParseErrorKind::UnexpectedEndOfInput { state: self.state })
    }

    /// Report input that is accepted outside strict mode.
    ///
    /// Prints a deduplicated warning normally; with strict mode enabled the
    /// same condition is a fatal error.
    pub(super) fn recoverable(&self, kind: ParseErrorKind) -> Result<(), ParseError> {
        if self.strict_mode {
            return Err(self.error(kind));
        }
        warn_once("HTML", &format!("{kind} ({})", self.scanner.position()));
        Ok(())
    }
}

// =============================================================================
// Insertion Mode Helpers
// =============================================================================

impl InsertionMode {
    /// Modes that follow the "in body" rules for implied closing.
    #[must_use]
    pub const fn is_body_family(self) -> bool {
        matches!(
            self,
            Self::InBody
                | Self::InTable
                | Self::InCaption
                | Self::InColumnGroup
                | Self::InTableBody
                | Self::InRow
                | Self::InCell
                | Self::AfterBody
        )
    }

    /// Modes before the body has started.
    #[must_use]
    pub const fn is_before_body(self) -> bool {
        matches!(
            self,
            Self::Initial | Self::BeforeHtml | Self::BeforeHead | Self::InHead | Self::AfterHead
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_family_excludes_pre_body_and_text() {
        assert!(InsertionMode::InBody.is_body_family());
        assert!(InsertionMode::InCell.is_body_family());
        assert!(!InsertionMode::InHead.is_body_family());
        assert!(!InsertionMode::Text.is_body_family());
        assert!(InsertionMode::AfterHead.is_before_body());
    }

    #[test]
    fn test_element_sets_are_lowercase() {
        for set in [
            RAW_TEXT_ELEMENTS,
            VOID_ELEMENTS,
            P_CLOSING_ELEMENTS,
            IMPLIED_END_TAG_ELEMENTS,
            HEAD_CONTENT_ELEMENTS,
        ] {
            assert!(set.iter().all(|name| name.chars().all(|c| !c.is_ascii_uppercase())));
        }
    }
}
