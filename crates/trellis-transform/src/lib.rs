//! Selector-driven rewriting of parsed documents.
//!
//! A [`Transformer`] owns a copy of a document. [`Transformer::apply`] runs a
//! [`TransformFn`] on every node a selector finds; the functions in [`funcs`]
//! build the common ones (append, replace, rewrite attributes, ...).
//!
//! ```
//! use trellis_transform::{Transformer, funcs};
//!
//! let doc = trellis_html::parse("<ul><li>a</li><li>b</li></ul>").unwrap();
//! let mut transformer = Transformer::new(&doc);
//! transformer
//!     .apply(&funcs::modify_attrib("class", "item"), "li")
//!     .unwrap();
//! assert_eq!(
//!     transformer.to_string(),
//!     "<ul><li class='item'>a</li><li class='item'>b</li></ul>"
//! );
//! ```

pub mod funcs;

use std::fmt;

use thiserror::Error;
use trellis_css::{Chain, QueryError};
use trellis_dom::{DomTree, NodeId};
use trellis_html::ParseError;

/// Errors raised while building or running transforms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// A selector failed to parse or evaluate.
    #[error(transparent)]
    Query(#[from] QueryError),
    /// A markup fragment failed to parse.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// `replace` or `copy_and` ran on a node without a parent.
    #[error("cannot replace the root node")]
    ReplaceRoot,
}

/// A rewrite of one node in place.
pub type TransformFn = Box<dyn Fn(&mut DomTree, NodeId) -> Result<(), TransformError>>;

/// A transform function bundled with the selector choosing its targets.
pub struct Transform {
    f: TransformFn,
    selector: Chain,
}

impl Transform {
    /// Bundle `f` with `selector`. The selector is parsed now.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Query`] if the selector does not parse.
    pub fn new(f: TransformFn, selector: &str) -> Result<Self, TransformError> {
        Ok(Self {
            f,
            selector: parse_chain(selector)?,
        })
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform")
            .field("selector", &self.selector.to_string())
            .finish_non_exhaustive()
    }
}

/// A document under transformation.
#[derive(Debug, Clone)]
pub struct Transformer {
    doc: DomTree,
}

impl Transformer {
    /// Start transforming a copy of `doc`; the original is left alone.
    #[must_use]
    pub fn new(doc: &DomTree) -> Self {
        Self { doc: doc.clone() }
    }

    /// The document in its current state.
    #[must_use]
    pub const fn doc(&self) -> &DomTree {
        &self.doc
    }

    /// Give up the transformer and keep the document.
    #[must_use]
    pub fn into_doc(self) -> DomTree {
        self.doc
    }

    /// Run `f` on every node `selector` finds, in document order.
    ///
    /// All targets are found before the first one is rewritten.
    ///
    /// # Errors
    ///
    /// Returns the selector's error, or the first error `f` returns. Nodes
    /// rewritten before the failure stay rewritten.
    pub fn apply(&mut self, f: &TransformFn, selector: &str) -> Result<&mut Self, TransformError> {
        let chain = parse_chain(selector)?;
        apply_chain(&mut self.doc, NodeId::ROOT, f, &chain)?;
        Ok(self)
    }

    /// Apply each transform in turn.
    ///
    /// # Errors
    ///
    /// Stops at the first failing transform.
    pub fn apply_all(&mut self, transforms: &[Transform]) -> Result<&mut Self, TransformError> {
        for transform in transforms {
            apply_chain(&mut self.doc, NodeId::ROOT, &transform.f, &transform.selector)?;
        }
        Ok(self)
    }
}

impl fmt::Display for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.doc)
    }
}

/// Parse markup into a fragment for the `funcs` that insert nodes.
///
/// # Errors
///
/// Returns [`TransformError::Parse`] for malformed markup.
pub fn fragment(html: &str) -> Result<DomTree, TransformError> {
    Ok(trellis_html::parse(html)?)
}

/// A fragment holding a single text node.
#[must_use]
pub fn text(data: &str) -> DomTree {
    let mut tree = DomTree::new();
    let id = tree.create_text(data);
    tree.append_child(NodeId::ROOT, id);
    tree
}

fn parse_chain(selector: &str) -> Result<Chain, TransformError> {
    let (chain, _) = trellis_css::parse_selector(selector).map_err(QueryError::from)?;
    Ok(chain)
}

fn apply_chain(
    doc: &mut DomTree,
    root: NodeId,
    f: &TransformFn,
    chain: &Chain,
) -> Result<(), TransformError> {
    let targets = chain.find(doc, root).map_err(QueryError::from)?;
    for id in targets {
        f(doc, id)?;
    }
    Ok(())
}
