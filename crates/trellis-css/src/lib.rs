//! CSS selector engine for Trellis.
//!
//! Selectors are parsed from text into a [`Chain`](selector::Chain): a head
//! [`Sequence`](selector::Sequence) of simple selectors followed by
//! combinator/sequence links. A chain is evaluated front to back against a
//! [`DomTree`], producing the matching nodes in document order.
//!
//! ```
//! let tree = trellis_html::parse("<ul><li>a</li><li class='x'>b</li></ul>").unwrap();
//! let found = trellis_css::find_matches(&tree, "ul>li.x").unwrap();
//! assert_eq!(found.len(), 1);
//! ```

pub mod selector;

use thiserror::Error;
use trellis_dom::{DomTree, NodeId};

pub use selector::{
    AttrMatch, AttributeSelector, Chain, Combinator, Link, MatchError, SelectorError,
    Sequence, SimpleSelector, Specificity, Terminator, parse_selector, parse_selector_from,
};

/// Failure of a one-shot query: either the selector text or its evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The selector text could not be parsed.
    #[error("invalid selector: {0}")]
    Syntax(#[from] SelectorError),
    /// The selector parsed but uses something the matcher cannot evaluate.
    #[error("cannot evaluate selector: {0}")]
    Match(#[from] MatchError),
}

/// Parse `selector` and return every node under the document root it selects,
/// in document order.
///
/// Parsing stops at `{`, so `"p {"` selects like `"p"`.
///
/// # Errors
///
/// Returns [`QueryError::Syntax`] for malformed selector text and
/// [`QueryError::Match`] for unsupported pseudo-classes or pseudo-elements.
pub fn find_matches(tree: &DomTree, selector: &str) -> Result<Vec<NodeId>, QueryError> {
    let (chain, _) = parse_selector(selector)?;
    Ok(chain.find(tree, NodeId::ROOT)?)
}
