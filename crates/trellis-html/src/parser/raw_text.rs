//! Raw text states for `script` and `style`.
//!
//! Everything up to the end tag naming the open raw text element is text.
//! `<` and `</` that do not start that end tag are written back into the text
//! unchanged.

use super::core::{HTMLParser, PendingTag};
use super::states::TokenizerState;
use crate::error::ParseError;

impl HTMLParser<'_> {
    pub(super) fn handle_script_data_state(&mut self) -> Result<(), ParseError> {
        match self.current_input_character {
            Some('<') => self.switch_to(TokenizerState::ScriptDataLessThan),
            Some(c) => self.append_char(c),
            None => self.stop(),
        }
        Ok(())
    }

    pub(super) fn handle_script_data_less_than_state(&mut self) -> Result<(), ParseError> {
        match self.current_input_character {
            Some('/') => {
                self.raw_text_end_tag.clear();
                self.switch_to(TokenizerState::ScriptDataEndTagOpen);
            }
            Some(_) => {
                self.append_char('<');
                self.reconsume_in(TokenizerState::ScriptData)?;
            }
            None => {
                self.append_char('<');
                self.stop();
            }
        }
        Ok(())
    }

    pub(super) fn handle_script_data_end_tag_open_state(&mut self) -> Result<(), ParseError> {
        match self.current_input_character {
            Some(c) if c.is_ascii_alphabetic() => {
                self.reconsume_in(TokenizerState::ScriptDataEndTagName)?;
            }
            Some(_) => {
                self.append_text("</");
                self.reconsume_in(TokenizerState::ScriptData)?;
            }
            None => return Err(self.eof_error()),
        }
        Ok(())
    }

    /// Only the end tag of the open element ends raw text. Any other name is
    /// text.
    pub(super) fn handle_script_data_end_tag_name_state(&mut self) -> Result<(), ParseError> {
        match self.current_input_character {
            Some(c) if c.is_ascii_alphabetic() => self.raw_text_end_tag.push(c),
            Some(c) if self.is_appropriate_end_tag() && (Self::is_whitespace_char(c) || c == '/') => {
                self.current_tag = self.raw_text_end_tag_token();
                self.switch_to(TokenizerState::AfterEndTagName);
            }
            Some('>') if self.is_appropriate_end_tag() => {
                self.current_tag = self.raw_text_end_tag_token();
                self.emit_end_tag()?;
            }
            Some(_) => {
                let text = format!("</{}", self.raw_text_end_tag);
                self.append_text(&text);
                self.reconsume_in(TokenizerState::ScriptData)?;
            }
            None => return Err(self.eof_error()),
        }
        Ok(())
    }

    fn is_appropriate_end_tag(&self) -> bool {
        self.tree
            .tag_name(self.current)
            .is_some_and(|open| open.eq_ignore_ascii_case(&self.raw_text_end_tag))
    }

    fn raw_text_end_tag_token(&mut self) -> PendingTag {
        PendingTag {
            name: std::mem::take(&mut self.raw_text_end_tag),
            is_end: true,
            ..PendingTag::default()
        }
    }
}
