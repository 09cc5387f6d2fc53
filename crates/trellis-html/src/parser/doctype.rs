//! Doctype states: `<!DOCTYPE name [PUBLIC|SYSTEM "id" ["id"]]>`.
//!
//! The keyword and the name are ASCII case-folded; identifiers are kept as
//! written. Anything the grammar does not allow is fatal.

use trellis_dom::{DoctypeData, DoctypeKeyword, NodeType};

use super::core::{HTMLParser, InsertionMode};
use super::states::TokenizerState;
use crate::error::{ParseError, ParseErrorKind};

impl HTMLParser<'_> {
    /// `<!D` has been read; the rest of `DOCTYPE` must follow.
    pub(super) fn handle_start_doctype_state(&mut self) -> Result<(), ParseError> {
        let mut seen = String::from("D");
        let mut input = self.current_input_character;
        for (i, expected) in "OCTYPE".chars().enumerate() {
            if i > 0 {
                input = self.consume();
            }
            match input {
                Some(c) if c.eq_ignore_ascii_case(&expected) => seen.push(c),
                Some(c) => {
                    seen.push(c);
                    return Err(self.error(ParseErrorKind::MalformedDoctype { found: seen }));
                }
                None => return Err(self.eof_error()),
            }
        }
        self.doctype = DoctypeData::default();
        self.switch_to(TokenizerState::Doctype);
        Ok(())
    }

    pub(super) fn handle_doctype_state(&mut self) -> Result<(), ParseError> {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeDoctypeName);
            }
            Some(_) => self.reconsume_in(TokenizerState::BeforeDoctypeName)?,
            None => return Err(self.eof_error()),
        }
        Ok(())
    }

    pub(super) fn handle_before_doctype_name_state(&mut self) -> Result<(), ParseError> {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => self.emit_doctype()?,
            Some(c) => {
                self.doctype.name.push(c.to_ascii_lowercase());
                self.switch_to(TokenizerState::DoctypeName);
            }
            None => return Err(self.eof_error()),
        }
        Ok(())
    }

    pub(super) fn handle_doctype_name_state(&mut self) -> Result<(), ParseError> {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::AfterDoctypeName);
            }
            Some('>') => self.emit_doctype()?,
            Some(c) => self.doctype.name.push(c.to_ascii_lowercase()),
            None => return Err(self.eof_error()),
        }
        Ok(())
    }

    /// After the name only `>` or a six-letter keyword may follow.
    pub(super) fn handle_after_doctype_name_state(&mut self) -> Result<(), ParseError> {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => self.emit_doctype()?,
            Some(first) => {
                let mut keyword = String::from(first);
                while keyword.chars().count() < 6 {
                    let Some(c) = self.consume() else {
                        return Err(self.eof_error());
                    };
                    keyword.push(c);
                }
                self.doctype.keyword = match keyword.to_ascii_uppercase().as_str() {
                    "PUBLIC" => Some(DoctypeKeyword::Public),
                    "SYSTEM" => Some(DoctypeKeyword::System),
                    _ => {
                        return Err(self.error(ParseErrorKind::MalformedDoctypeKeyword { keyword }));
                    }
                };
                self.switch_to(TokenizerState::AfterDoctype);
            }
            None => return Err(self.eof_error()),
        }
        Ok(())
    }

    pub(super) fn handle_after_doctype_state(&mut self) -> Result<(), ParseError> {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeDoctypeIdentifier);
            }
            Some(quote @ ('"' | '\'')) => {
                self.switch_to(TokenizerState::DoctypeIdentifierQuoted(quote));
            }
            Some('>') => return Err(self.error(ParseErrorKind::MissingDoctypeIdentifier)),
            // `PUBLICX`: the keyword was longer than six letters.
            Some(c) => {
                let keyword = self
                    .doctype
                    .keyword
                    .map_or_else(String::new, |k| format!("{}{c}", k.as_str()));
                return Err(self.error(ParseErrorKind::MalformedDoctypeKeyword { keyword }));
            }
            None => return Err(self.eof_error()),
        }
        Ok(())
    }

    pub(super) fn handle_before_doctype_identifier_state(&mut self) -> Result<(), ParseError> {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some(quote @ ('"' | '\'')) => {
                self.switch_to(TokenizerState::DoctypeIdentifierQuoted(quote));
            }
            Some(_) => return Err(self.error(ParseErrorKind::MissingDoctypeIdentifier)),
            None => return Err(self.eof_error()),
        }
        Ok(())
    }

    pub(super) fn handle_doctype_identifier_quoted_state(
        &mut self,
        quote: char,
    ) -> Result<(), ParseError> {
        match self.current_input_character {
            Some(c) if c == quote => self.switch_to(TokenizerState::AfterDoctypeIdentifier),
            Some(c) => match self.doctype.system_identifier.as_mut() {
                Some(system) => system.push(c),
                None => self.doctype.identifier.push(c),
            },
            None => return Err(self.error(ParseErrorKind::UnterminatedDoctypeIdentifier)),
        }
        Ok(())
    }

    /// A public identifier may be followed by a system identifier.
    pub(super) fn handle_after_doctype_identifier_state(&mut self) -> Result<(), ParseError> {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => self.emit_doctype()?,
            Some(quote @ ('"' | '\''))
                if self.doctype.keyword == Some(DoctypeKeyword::Public)
                    && self.doctype.system_identifier.is_none() =>
            {
                self.doctype.system_identifier = Some(String::new());
                self.switch_to(TokenizerState::DoctypeIdentifierQuoted(quote));
            }
            Some(c) => {
                return Err(self.error(ParseErrorKind::MalformedDoctype {
                    found: c.to_string(),
                }));
            }
            None => return Err(self.eof_error()),
        }
        Ok(())
    }

    /// Attach the completed doctype. Only the Initial mode accepts one; a
    /// later doctype is dropped with a warning.
    fn emit_doctype(&mut self) -> Result<(), ParseError> {
        self.switch_to(TokenizerState::Data);
        let doctype = std::mem::take(&mut self.doctype);
        if self.insertion_mode != InsertionMode::Initial {
            return self.recoverable(ParseErrorKind::MisplacedDoctype {
                mode: self.insertion_mode,
            });
        }
        let _ = self.add_child(NodeType::Doctype(doctype));
        self.insertion_mode = InsertionMode::BeforeHtml;
        Ok(())
    }
}
