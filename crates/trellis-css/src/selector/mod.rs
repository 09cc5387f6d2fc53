//! CSS selector model, parsing and matching.
//!
//! The supported grammar is a subset of
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/): type, universal,
//! id, class, attribute (`=`, `~=`, `|=`), pseudo-classes, pseudo-elements and
//! the four combinators. Selector groups (`a, b`) are not supported.

mod error;
mod matching;
mod parser;
mod specificity;

use std::fmt;

pub use error::{MatchError, SelectorError};
pub use parser::{parse_selector, parse_selector_from};
pub use specificity::Specificity;

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
///
/// A single condition on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    ///
    /// Examples: `div`, `li`
    Tag(String),

    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    ///
    /// Example: `*`
    Universal,

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    ///
    /// Example: `#main`
    Id(String),

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    ///
    /// Example: `.nav-item`
    Class(String),

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// Examples: `[href]`, `[class~=foo]`, `[lang|='en']`
    Attr(AttributeSelector),

    /// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    ///
    /// Only `root`, `first-child`, `last-child`, `only-child` and `empty` can
    /// be evaluated; the rest parse but fail at match time.
    PseudoClass(String),

    /// Pseudo-elements parse and print but never match.
    ///
    /// Example: `::first-line`
    PseudoElement(String),
}

/// How an attribute selector compares the attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrMatch {
    /// `[a]`: the attribute exists.
    Presence,
    /// `[a=v]`: the value is exactly `v`.
    Exactly,
    /// `[a~=v]`: `v` is one of the whitespace-separated words of the value.
    Contains,
    /// `[a|=v]`: the value is `v` or starts with `v-`.
    DashPrefix,
}

impl AttrMatch {
    /// The operator as written between name and value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Presence => "",
            Self::Exactly => "=",
            Self::Contains => "~=",
            Self::DashPrefix => "|=",
        }
    }
}

/// An attribute condition such as `[lang|="en"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    /// Attribute name.
    pub name: String,
    /// Comparison value; empty for [`AttrMatch::Presence`].
    pub value: String,
    /// Comparison operator.
    pub match_type: AttrMatch,
    /// The quote character the value was written with, kept for printing.
    pub quote: Option<char>,
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// Simple selectors written without a combinator between them, all of which
/// must hold for one element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sequence {
    /// The simple selectors, in source order.
    pub simple_selectors: Vec<SimpleSelector>,
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace: any proper descendant.
    Descendant,
    /// `>`: a direct child.
    Child,
    /// `+`: the immediately preceding or following sibling.
    AdjacentSibling,
    /// `~`: any sibling.
    Sibling,
}

impl Combinator {
    /// The combinator as printed in canonical form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Descendant => " ",
            Self::Child => ">",
            Self::AdjacentSibling => "+",
            Self::Sibling => "~",
        }
    }
}

/// One step of a chain: a combinator and the sequence it leads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Relationship to the previous stage's nodes.
    pub combinator: Combinator,
    /// Condition on the related nodes.
    pub sequence: Sequence,
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// A head sequence followed by zero or more links, evaluated left to right:
/// `div.container > ul li` is `div.container`, then `(Child, ul)`, then
/// `(Descendant, li)`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Chain {
    /// The leftmost sequence.
    pub head: Sequence,
    /// The remaining links, in source order.
    pub tail: Vec<Link>,
}

/// Why the selector parser stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// The input ran out.
    EndOfInput,
    /// A `{` was seen; it is left unread in the scanner.
    EndOfSelector,
}

impl fmt::Display for AttributeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}{}", self.name, self.match_type.as_str())?;
        match self.quote {
            Some(q) => write!(f, "{q}{}{q}]", self.value),
            None => write!(f, "{}]", self.value),
        }
    }
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(name) => f.write_str(name),
            Self::Universal => f.write_str("*"),
            Self::Id(id) => write!(f, "#{id}"),
            Self::Class(class) => write!(f, ".{class}"),
            Self::Attr(attr) => write!(f, "{attr}"),
            Self::PseudoClass(name) => write!(f, ":{name}"),
            Self::PseudoElement(name) => write!(f, "::{name}"),
        }
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for simple in &self.simple_selectors {
            write!(f, "{simple}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.combinator, self.sequence)
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.head)?;
        for link in &self.tail {
            write!(f, "{link}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_attribute_keeps_quote() {
        let attr = AttributeSelector {
            name: "lang".to_string(),
            value: "en".to_string(),
            match_type: AttrMatch::DashPrefix,
            quote: Some('"'),
        };
        assert_eq!(attr.to_string(), "[lang|=\"en\"]");
    }

    #[test]
    fn test_display_chain() {
        let chain = Chain {
            head: Sequence {
                simple_selectors: vec![SimpleSelector::Tag("ul".to_string())],
            },
            tail: vec![Link {
                combinator: Combinator::Descendant,
                sequence: Sequence {
                    simple_selectors: vec![
                        SimpleSelector::Tag("li".to_string()),
                        SimpleSelector::PseudoClass("first-child".to_string()),
                    ],
                },
            }],
        };
        assert_eq!(chain.to_string(), "ul li:first-child");
    }
}
