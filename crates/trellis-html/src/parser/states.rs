//! The tokenizer state machine.
//!
//! Each handler looks at `current_input_character`, mutates the tree or the
//! pending tag/comment buffers, and picks the next state. Doctype and raw text
//! handlers live in their own modules.

use strum_macros::Display;

use trellis_dom::{Attribute, NodeType};

use super::core::{HTMLParser, PendingTag};
use crate::error::{ParseError, ParseErrorKind};

/// Tokenizer states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// Character data between tags.
    Data,
    /// After `<`.
    TagOpen,
    /// Reading a start or end tag name.
    TagName,
    /// Whitespace before an attribute name.
    BeforeAttributeName,
    /// Reading an attribute name.
    AttributeName,
    /// Whitespace after an attribute name.
    AfterAttributeName,
    /// After `=`, before the value.
    BeforeAttributeValue,
    /// Inside a value quoted with the given character.
    AttributeValueQuoted(char),
    /// Inside an unquoted value.
    AttributeValueUnquoted,
    /// Right after the closing quote of a value.
    AfterAttributeValueQuoted,
    /// After `/` inside a start tag.
    SelfClosingStartTag,
    /// After `</`.
    EndTagOpen,
    /// After an end tag name, skipping to `>`.
    AfterEndTagName,
    /// Inside `<?...>`, `<!x...>` or `</ ...>`.
    BogusComment,
    /// After `<!`.
    MarkupDeclarationOpen,
    /// After `<!-`.
    CommentStartDash,
    /// Inside `<!--...`.
    Comment,
    /// After a `-` inside a comment.
    CommentEndDash,
    /// After `--` inside a comment.
    CommentEnd,
    /// After `<!D`, reading the rest of `DOCTYPE`.
    StartDoctype,
    /// After `<!DOCTYPE`.
    Doctype,
    /// Whitespace before the doctype name.
    BeforeDoctypeName,
    /// Reading the doctype name.
    DoctypeName,
    /// After the doctype name.
    AfterDoctypeName,
    /// After `PUBLIC` or `SYSTEM`.
    AfterDoctype,
    /// Whitespace before a quoted identifier.
    BeforeDoctypeIdentifier,
    /// Inside an identifier quoted with the given character.
    DoctypeIdentifierQuoted(char),
    /// After the closing quote of an identifier.
    AfterDoctypeIdentifier,
    /// Raw text inside `script` or `style`.
    ScriptData,
    /// After `<` in raw text.
    ScriptDataLessThan,
    /// After `</` in raw text.
    ScriptDataEndTagOpen,
    /// Reading a possible end tag name in raw text.
    ScriptDataEndTagName,
}

impl HTMLParser<'_> {
    /// Run the handler for the current state on `current_input_character`.
    pub(super) fn step(&mut self) -> Result<(), ParseError> {
        match self.state {
            TokenizerState::Data => self.handle_data_state(),
            TokenizerState::TagOpen => self.handle_tag_open_state(),
            TokenizerState::TagName => self.handle_tag_name_state(),
            TokenizerState::BeforeAttributeName => self.handle_before_attribute_name_state(),
            TokenizerState::AttributeName => self.handle_attribute_name_state(),
            TokenizerState::AfterAttributeName => self.handle_after_attribute_name_state(),
            TokenizerState::BeforeAttributeValue => self.handle_before_attribute_value_state(),
            TokenizerState::AttributeValueQuoted(quote) => {
                self.handle_attribute_value_quoted_state(quote)
            }
            TokenizerState::AttributeValueUnquoted => {
                self.handle_attribute_value_unquoted_state()
            }
            TokenizerState::AfterAttributeValueQuoted => {
                self.handle_after_attribute_value_quoted_state()
            }
            TokenizerState::SelfClosingStartTag => self.handle_self_closing_start_tag_state(),
            TokenizerState::EndTagOpen => self.handle_end_tag_open_state(),
            TokenizerState::AfterEndTagName => self.handle_after_end_tag_name_state(),
            TokenizerState::BogusComment => self.handle_bogus_comment_state(),
            TokenizerState::MarkupDeclarationOpen => self.handle_markup_declaration_open_state(),
            TokenizerState::CommentStartDash => self.handle_comment_start_dash_state(),
            TokenizerState::Comment => self.handle_comment_state(),
            TokenizerState::CommentEndDash => self.handle_comment_end_dash_state(),
            TokenizerState::CommentEnd => self.handle_comment_end_state(),
            TokenizerState::StartDoctype => self.handle_start_doctype_state(),
            TokenizerState::Doctype => self.handle_doctype_state(),
            TokenizerState::BeforeDoctypeName => self.handle_before_doctype_name_state(),
            TokenizerState::DoctypeName => self.handle_doctype_name_state(),
            TokenizerState::AfterDoctypeName => self.handle_after_doctype_name_state(),
            TokenizerState::AfterDoctype => self.handle_after_doctype_state(),
            TokenizerState::BeforeDoctypeIdentifier => {
                self.handle_before_doctype_identifier_state()
            }
            TokenizerState::DoctypeIdentifierQuoted(quote) => {
                self.handle_doctype_identifier_quoted_state(quote)
            }
            TokenizerState::AfterDoctypeIdentifier => self.handle_after_doctype_identifier_state(),
            TokenizerState::ScriptData => self.handle_script_data_state(),
            TokenizerState::ScriptDataLessThan => self.handle_script_data_less_than_state(),
            TokenizerState::ScriptDataEndTagOpen => self.handle_script_data_end_tag_open_state(),
            TokenizerState::ScriptDataEndTagName => self.handle_script_data_end_tag_name_state(),
        }
    }

    fn handle_data_state(&mut self) -> Result<(), ParseError> {
        match self.current_input_character {
            Some('<') => self.switch_to(TokenizerState::TagOpen),
            Some(c) => self.append_char(c),
            None => self.stop(),
        }
        Ok(())
    }

    fn handle_tag_open_state(&mut self) -> Result<(), ParseError> {
        match self.current_input_character {
            Some('!') => self.switch_to(TokenizerState::MarkupDeclarationOpen),
            Some('/') => self.switch_to(TokenizerState::EndTagOpen),
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_tag = PendingTag::default();
                self.reconsume_in(TokenizerState::TagName)?;
            }
            Some('?') => {
                self.comment.clear();
                self.reconsume_in(TokenizerState::BogusComment)?;
            }
            // `a < b`: the `<` is text.
            Some(c) => {
                self.recoverable(ParseErrorKind::InvalidTagStart { found: c })?;
                self.append_char('<');
                self.reconsume_in(TokenizerState::Data)?;
            }
            None => return Err(self.eof_error()),
        }
        Ok(())
    }

    fn handle_tag_name_state(&mut self) -> Result<(), ParseError> {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                if self.current_tag.is_end {
                    self.switch_to(TokenizerState::AfterEndTagName);
                } else {
                    self.switch_to(TokenizerState::BeforeAttributeName);
                }
            }
            Some('/') => {
                if self.current_tag.is_end {
                    self.switch_to(TokenizerState::AfterEndTagName);
                } else {
                    self.switch_to(TokenizerState::SelfClosingStartTag);
                }
            }
            Some('>') => self.emit_current_tag()?,
            Some(c) => self.current_tag.name.push(c.to_ascii_lowercase()),
            None => return Err(self.eof_error()),
        }
        Ok(())
    }

    fn handle_before_attribute_name_state(&mut self) -> Result<(), ParseError> {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => self.emit_current_tag()?,
            Some('=') => {
                self.current_attribute = Some(Attribute::new("=", ""));
                self.switch_to(TokenizerState::AttributeName);
            }
            Some(_) => {
                self.current_attribute = Some(Attribute::new("", ""));
                self.reconsume_in(TokenizerState::AttributeName)?;
            }
            None => return Err(self.eof_error()),
        }
        Ok(())
    }

    fn handle_attribute_name_state(&mut self) -> Result<(), ParseError> {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::AfterAttributeName);
            }
            Some('/') => {
                self.finish_attribute()?;
                self.switch_to(TokenizerState::SelfClosingStartTag);
            }
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some('>') => {
                self.finish_attribute()?;
                self.emit_current_tag()?;
            }
            Some(c) => {
                if let Some(attr) = self.current_attribute.as_mut() {
                    attr.name.push(c.to_ascii_lowercase());
                }
            }
            None => return Err(self.eof_error()),
        }
        Ok(())
    }

    fn handle_after_attribute_name_state(&mut self) -> Result<(), ParseError> {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('/') => {
                self.finish_attribute()?;
                self.switch_to(TokenizerState::SelfClosingStartTag);
            }
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some('>') => {
                self.finish_attribute()?;
                self.emit_current_tag()?;
            }
            Some(_) => {
                self.finish_attribute()?;
                self.current_attribute = Some(Attribute::new("", ""));
                self.reconsume_in(TokenizerState::AttributeName)?;
            }
            None => return Err(self.eof_error()),
        }
        Ok(())
    }

    fn handle_before_attribute_value_state(&mut self) -> Result<(), ParseError> {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some(quote @ ('"' | '\'')) => {
                self.switch_to(TokenizerState::AttributeValueQuoted(quote));
            }
            Some('>') => {
                self.finish_attribute()?;
                self.emit_current_tag()?;
            }
            Some(_) => self.reconsume_in(TokenizerState::AttributeValueUnquoted)?,
            None => return Err(self.eof_error()),
        }
        Ok(())
    }

    fn handle_attribute_value_quoted_state(&mut self, quote: char) -> Result<(), ParseError> {
        match self.current_input_character {
            Some(c) if c == quote => {
                self.finish_attribute()?;
                self.switch_to(TokenizerState::AfterAttributeValueQuoted);
            }
            Some(c) => {
                if let Some(attr) = self.current_attribute.as_mut() {
                    attr.value.push(c);
                }
            }
            None => {
                let name = self
                    .current_attribute
                    .as_ref()
                    .map(|attr| attr.name.clone())
                    .unwrap_or_default();
                return Err(self.error(ParseErrorKind::UnterminatedAttributeValue { name }));
            }
        }
        Ok(())
    }

    fn handle_attribute_value_unquoted_state(&mut self) -> Result<(), ParseError> {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.finish_attribute()?;
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('>') => {
                self.finish_attribute()?;
                self.emit_current_tag()?;
            }
            Some(c) => {
                if let Some(attr) = self.current_attribute.as_mut() {
                    attr.value.push(c);
                }
            }
            None => return Err(self.eof_error()),
        }
        Ok(())
    }

    fn handle_after_attribute_value_quoted_state(&mut self) -> Result<(), ParseError> {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => self.emit_current_tag()?,
            // Missing whitespace between attributes.
            Some(_) => self.reconsume_in(TokenizerState::BeforeAttributeName)?,
            None => return Err(self.eof_error()),
        }
        Ok(())
    }

    fn handle_self_closing_start_tag_state(&mut self) -> Result<(), ParseError> {
        match self.current_input_character {
            Some('>') => {
                self.current_tag.self_closing = true;
                self.emit_current_tag()?;
            }
            Some(_) => self.reconsume_in(TokenizerState::BeforeAttributeName)?,
            None => return Err(self.eof_error()),
        }
        Ok(())
    }

    fn handle_end_tag_open_state(&mut self) -> Result<(), ParseError> {
        match self.current_input_character {
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_tag = PendingTag {
                    is_end: true,
                    ..PendingTag::default()
                };
                self.reconsume_in(TokenizerState::TagName)?;
            }
            // `</>` is dropped.
            Some('>') => self.switch_to(TokenizerState::Data),
            Some(_) => {
                self.comment.clear();
                self.reconsume_in(TokenizerState::BogusComment)?;
            }
            None => return Err(self.eof_error()),
        }
        Ok(())
    }

    fn handle_after_end_tag_name_state(&mut self) -> Result<(), ParseError> {
        match self.current_input_character {
            Some('>') => self.emit_current_tag()?,
            Some(_) => {}
            None => return Err(self.eof_error()),
        }
        Ok(())
    }

    fn handle_bogus_comment_state(&mut self) -> Result<(), ParseError> {
        match self.current_input_character {
            Some('>') => {
                let text = std::mem::take(&mut self.comment);
                let _ = self.add_sibling(NodeType::Comment(text));
                self.switch_to(TokenizerState::Data);
            }
            Some(c) => self.comment.push(c),
            None => return Err(self.eof_error()),
        }
        Ok(())
    }

    fn handle_markup_declaration_open_state(&mut self) -> Result<(), ParseError> {
        self.comment.clear();
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentStartDash),
            Some('D' | 'd') => self.switch_to(TokenizerState::StartDoctype),
            Some(_) => self.reconsume_in(TokenizerState::BogusComment)?,
            None => return Err(self.eof_error()),
        }
        Ok(())
    }

    fn handle_comment_start_dash_state(&mut self) -> Result<(), ParseError> {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::Comment),
            // `<!-x` is a bogus comment starting with the dash.
            Some(_) => {
                self.comment.push('-');
                self.reconsume_in(TokenizerState::BogusComment)?;
            }
            None => return Err(self.eof_error()),
        }
        Ok(())
    }

    fn handle_comment_state(&mut self) -> Result<(), ParseError> {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentEndDash),
            Some(c) => self.comment.push(c),
            None => return Err(self.eof_error()),
        }
        Ok(())
    }

    fn handle_comment_end_dash_state(&mut self) -> Result<(), ParseError> {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            Some(_) => {
                self.comment.push('-');
                self.reconsume_in(TokenizerState::Comment)?;
            }
            None => return Err(self.eof_error()),
        }
        Ok(())
    }

    fn handle_comment_end_state(&mut self) -> Result<(), ParseError> {
        match self.current_input_character {
            Some('>') => {
                let text = std::mem::take(&mut self.comment);
                let _ = self.add_child(NodeType::Comment(text));
                self.switch_to(TokenizerState::Data);
            }
            Some('-') => self.comment.push('-'),
            Some(_) => {
                self.comment.push_str("--");
                self.reconsume_in(TokenizerState::Comment)?;
            }
            None => return Err(self.eof_error()),
        }
        Ok(())
    }

    /// Store the attribute being read on the pending tag.
    ///
    /// A name that is already present keeps its first value.
    fn finish_attribute(&mut self) -> Result<(), ParseError> {
        let Some(attr) = self.current_attribute.take() else {
            return Ok(());
        };
        if self
            .current_tag
            .attrs
            .iter()
            .any(|existing| existing.name == attr.name)
        {
            return self.recoverable(ParseErrorKind::DuplicateAttribute {
                name: attr.name,
                tag: self.current_tag.name.clone(),
            });
        }
        self.current_tag.attrs.push(attr);
        Ok(())
    }

    fn emit_current_tag(&mut self) -> Result<(), ParseError> {
        if self.current_tag.is_end {
            self.emit_end_tag()
        } else {
            self.emit_start_tag();
            Ok(())
        }
    }
}
