//! Selector text to [`Chain`].
//!
//! The parser reads from a [`Scanner`] so a caller parsing a larger document
//! (a style sheet, say) can hand over its own scanner and continue after the
//! `{` that ends the selector.

use std::str::FromStr;

use trellis_common::Scanner;

use super::{
    AttrMatch, AttributeSelector, Chain, Combinator, Link, SelectorError, Sequence,
    SimpleSelector, Terminator,
};

/// Parse a whole selector string.
///
/// # Errors
///
/// Returns a [`SelectorError`] describing the first syntax problem.
pub fn parse_selector(input: &str) -> Result<(Chain, Terminator), SelectorError> {
    parse_selector_from(&mut Scanner::from_text(input))
}

/// Parse a selector from `scanner`, stopping at the end of input or before `{`.
///
/// On [`Terminator::EndOfSelector`] the next `read_one` on the scanner returns
/// the `{`.
///
/// # Errors
///
/// Returns a [`SelectorError`] describing the first syntax problem.
pub fn parse_selector_from<I: Iterator<Item = char>>(
    scanner: &mut Scanner<I>,
) -> Result<(Chain, Terminator), SelectorError> {
    SelectorParser { scanner }.parse_chain()
}

impl FromStr for Chain {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_selector(s).map(|(chain, _)| chain)
    }
}

/// What follows a sequence.
enum Step {
    Link(Combinator),
    End(Terminator),
}

struct SelectorParser<'s, I: Iterator<Item = char>> {
    scanner: &'s mut Scanner<I>,
}

/// Characters that end a sequence.
const fn is_sequence_end(c: char) -> bool {
    c.is_ascii_whitespace() || matches!(c, '>' | '+' | '~' | ',' | '{')
}

/// Identifier characters: ASCII alphanumerics, `-`, `_` and anything non-ASCII.
const fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_') || !c.is_ascii()
}

/// Operator for `~=` or `|=`, given the character before `=`.
const fn dash_or_contains(c: char) -> AttrMatch {
    if c == '~' {
        AttrMatch::Contains
    } else {
        AttrMatch::DashPrefix
    }
}

impl<I: Iterator<Item = char>> SelectorParser<'_, I> {
    fn parse_chain(&mut self) -> Result<(Chain, Terminator), SelectorError> {
        self.skip_whitespace()?;
        match self.scanner.read_one() {
            None => return Err(SelectorError::EmptySelector),
            Some('{') => {
                self.scanner.unread_one()?;
                return Err(SelectorError::EmptySelector);
            }
            Some(',') => {
                return Err(SelectorError::GroupsUnsupported {
                    position: self.scanner.position(),
                });
            }
            Some(found @ ('>' | '+' | '~')) => {
                return Err(SelectorError::LeadingCombinator { found });
            }
            Some(_) => self.scanner.unread_one()?,
        }

        let head = self.parse_sequence()?;
        let mut tail = Vec::new();
        loop {
            match self.parse_combinator()? {
                Step::Link(combinator) => {
                    let sequence = self.parse_sequence()?;
                    tail.push(Link {
                        combinator,
                        sequence,
                    });
                }
                Step::End(terminator) => return Ok((Chain { head, tail }, terminator)),
            }
        }
    }

    /// Whitespace alone is a descendant combinator; whitespace around `>`, `+`
    /// or `~` is insignificant.
    fn parse_combinator(&mut self) -> Result<Step, SelectorError> {
        let mut combinator = None;
        loop {
            match self.scanner.read_one() {
                Some(c) if c.is_ascii_whitespace() => {}
                Some(c @ ('>' | '+' | '~')) => {
                    if combinator.is_some() {
                        return Err(SelectorError::MultipleCombinators {
                            position: self.scanner.position(),
                        });
                    }
                    combinator = Some(match c {
                        '>' => Combinator::Child,
                        '+' => Combinator::AdjacentSibling,
                        _ => Combinator::Sibling,
                    });
                }
                Some(',') => {
                    return Err(SelectorError::GroupsUnsupported {
                        position: self.scanner.position(),
                    });
                }
                Some('{') => {
                    self.scanner.unread_one()?;
                    return Self::finish(combinator, Terminator::EndOfSelector);
                }
                None => return Self::finish(combinator, Terminator::EndOfInput),
                Some(_) => {
                    self.scanner.unread_one()?;
                    return Ok(Step::Link(combinator.unwrap_or(Combinator::Descendant)));
                }
            }
        }
    }

    fn finish(combinator: Option<Combinator>, terminator: Terminator) -> Result<Step, SelectorError> {
        match combinator {
            Some(combinator) => Err(SelectorError::DanglingCombinator { combinator }),
            None => Ok(Step::End(terminator)),
        }
    }

    fn parse_sequence(&mut self) -> Result<Sequence, SelectorError> {
        let mut simple_selectors = Vec::new();
        loop {
            let Some(c) = self.scanner.read_one() else {
                self.scanner.unread_one()?;
                break;
            };
            let simple = match c {
                '*' => SimpleSelector::Universal,
                '#' => SimpleSelector::Id(self.parse_name('#')?),
                '.' => SimpleSelector::Class(self.parse_name('.')?),
                ':' => {
                    if self.scanner.read_one() == Some(':') {
                        SimpleSelector::PseudoElement(self.parse_name(':')?)
                    } else {
                        self.scanner.unread_one()?;
                        SimpleSelector::PseudoClass(self.parse_name(':')?)
                    }
                }
                '[' => SimpleSelector::Attr(self.parse_attr()?),
                c if is_sequence_end(c) => {
                    self.scanner.unread_one()?;
                    break;
                }
                c if is_name_char(c) => {
                    let mut name = String::from(c);
                    name.push_str(&self.read_name()?);
                    SimpleSelector::Tag(name)
                }
                c => return Err(self.unexpected(c)),
            };
            simple_selectors.push(simple);
        }
        Ok(Sequence { simple_selectors })
    }

    fn parse_name(&mut self, prefix: char) -> Result<String, SelectorError> {
        let name = self.read_name()?;
        if name.is_empty() {
            return Err(SelectorError::MissingName {
                prefix,
                position: self.scanner.position(),
            });
        }
        Ok(name)
    }

    fn read_name(&mut self) -> Result<String, SelectorError> {
        let mut name = String::new();
        loop {
            match self.scanner.read_one() {
                Some(c) if is_name_char(c) => name.push(c),
                _ => {
                    self.scanner.unread_one()?;
                    return Ok(name);
                }
            }
        }
    }

    /// `[` has been read. ASCII whitespace is allowed around the name, the
    /// operator and the value; a quoted value must be followed by `]`.
    fn parse_attr(&mut self) -> Result<AttributeSelector, SelectorError> {
        self.skip_whitespace()?;
        let (name, operator) = self.read_attr_name()?;
        let match_type = match operator {
            Some(operator) => operator,
            None => {
                self.skip_whitespace()?;
                match self.read_in_attr()? {
                    ']' => AttrMatch::Presence,
                    '=' => AttrMatch::Exactly,
                    c @ ('~' | '|') => {
                        if self.scanner.read_one() != Some('=') {
                            return Err(self.unexpected(c));
                        }
                        dash_or_contains(c)
                    }
                    c => return Err(self.unexpected(c)),
                }
            }
        };
        if name.is_empty() {
            return Err(SelectorError::EmptyAttributeName {
                position: self.scanner.position(),
            });
        }
        let mut attr = AttributeSelector {
            name,
            value: String::new(),
            match_type,
            quote: None,
        };
        if match_type == AttrMatch::Presence {
            return Ok(attr);
        }

        self.skip_whitespace()?;
        match self.read_in_attr()? {
            quote @ ('"' | '\'') => {
                attr.quote = Some(quote);
                self.read_quoted(quote, &mut attr.value)?;
            }
            c if is_name_char(c) => {
                attr.value.push(c);
                attr.value.push_str(&self.read_name()?);
            }
            c => return Err(self.unexpected(c)),
        }
        self.skip_whitespace()?;
        match self.read_in_attr()? {
            ']' => Ok(attr),
            c => Err(self.unexpected(c)),
        }
    }

    /// Read an attribute name. A `~` or `|` followed by `=` ends the name and
    /// is returned as the operator; otherwise it is part of the name.
    fn read_attr_name(&mut self) -> Result<(String, Option<AttrMatch>), SelectorError> {
        let mut name = String::new();
        loop {
            match self.scanner.read_one() {
                Some(c) if is_name_char(c) => name.push(c),
                Some(c @ ('~' | '|')) => {
                    if self.scanner.read_one() == Some('=') {
                        return Ok((name, Some(dash_or_contains(c))));
                    }
                    self.scanner.unread_one()?;
                    name.push(c);
                }
                _ => {
                    self.scanner.unread_one()?;
                    return Ok((name, None));
                }
            }
        }
    }

    /// Next character inside `[...]`; end of input and `{` leave it unterminated.
    fn read_in_attr(&mut self) -> Result<char, SelectorError> {
        match self.scanner.read_one() {
            None | Some('{') => Err(self.unterminated_attribute()),
            Some(c) => Ok(c),
        }
    }

    fn read_quoted(&mut self, quote: char, value: &mut String) -> Result<(), SelectorError> {
        loop {
            match self.scanner.read_one() {
                Some(c) if c == quote => return Ok(()),
                Some(c) => value.push(c),
                None => return Err(self.unterminated_attribute()),
            }
        }
    }

    fn unexpected(&self, found: char) -> SelectorError {
        SelectorError::UnexpectedCharacter {
            found,
            position: self.scanner.position(),
        }
    }

    fn unterminated_attribute(&self) -> SelectorError {
        SelectorError::UnterminatedAttribute {
            position: self.scanner.position(),
        }
    }

    fn skip_whitespace(&mut self) -> Result<(), SelectorError> {
        loop {
            match self.scanner.read_one() {
                Some(c) if c.is_ascii_whitespace() => {}
                _ => {
                    self.scanner.unread_one()?;
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str) -> SimpleSelector {
        SimpleSelector::Tag(name.to_string())
    }

    #[test]
    fn test_child_chain_structure() {
        let (chain, terminator) = parse_selector("ul>li").unwrap();
        assert_eq!(terminator, Terminator::EndOfInput);
        assert_eq!(chain.head.simple_selectors, vec![tag("ul")]);
        assert_eq!(chain.tail.len(), 1);
        assert_eq!(chain.tail[0].combinator, Combinator::Child);
        assert_eq!(chain.tail[0].sequence.simple_selectors, vec![tag("li")]);
    }

    #[test]
    fn test_whitespace_around_combinator() {
        let (chain, _) = parse_selector("  ul  >  li  ").unwrap();
        assert_eq!(chain.to_string(), "ul>li");
    }

    #[test]
    fn test_stray_tilde_is_part_of_name() {
        let (chain, _) = parse_selector("[a~b]").unwrap();
        let SimpleSelector::Attr(attr) = &chain.head.simple_selectors[0] else {
            panic!("expected attribute selector");
        };
        assert_eq!(attr.name, "a~b");
        assert_eq!(attr.match_type, AttrMatch::Presence);
    }

    #[test]
    fn test_quoted_value() {
        let (chain, _) = parse_selector("a[title='x y']").unwrap();
        let SimpleSelector::Attr(attr) = &chain.head.simple_selectors[1] else {
            panic!("expected attribute selector");
        };
        assert_eq!(attr.value, "x y");
        assert_eq!(attr.quote, Some('\''));
        assert_eq!(chain.to_string(), "a[title='x y']");
    }

    #[test]
    fn test_from_str() {
        let chain: Chain = "div .x".parse().unwrap();
        assert_eq!(chain.tail[0].combinator, Combinator::Descendant);
    }
}
