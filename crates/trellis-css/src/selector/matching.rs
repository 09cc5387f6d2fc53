//! Evaluating selectors against a [`DomTree`].

use std::collections::HashSet;

use trellis_dom::{DomTree, ElementData, NodeId, NodeType};

use super::{
    AttrMatch, AttributeSelector, Chain, Combinator, Link, MatchError, Sequence, SimpleSelector,
};

impl SimpleSelector {
    /// Test one condition against an element.
    ///
    /// # Errors
    ///
    /// Pseudo-elements and pseudo-classes outside the supported set are
    /// reported rather than treated as non-matching.
    pub fn matches(
        &self,
        tree: &DomTree,
        id: NodeId,
        element: &ElementData,
    ) -> Result<bool, MatchError> {
        Ok(match self {
            Self::Tag(name) => element.tag_name.eq_ignore_ascii_case(name),
            Self::Universal => true,
            Self::Id(value) => element.id() == Some(value.as_str()),
            Self::Class(value) => element.classes().any(|class| class == value),
            Self::Attr(attr) => attr.matches(element),
            Self::PseudoClass(name) => matches_pseudo_class(tree, id, name)?,
            Self::PseudoElement(name) => {
                return Err(MatchError::UnsupportedPseudoElement(name.clone()));
            }
        })
    }
}

impl AttributeSelector {
    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        let Some(actual) = element.get_attribute(&self.name) else {
            return false;
        };
        match self.match_type {
            AttrMatch::Presence => true,
            AttrMatch::Exactly => actual == self.value,
            AttrMatch::Contains => actual.split_ascii_whitespace().any(|word| word == self.value),
            AttrMatch::DashPrefix => {
                actual == self.value
                    || actual
                        .strip_prefix(self.value.as_str())
                        .is_some_and(|rest| rest.starts_with('-'))
            }
        }
    }
}

/// Structural pseudo-classes look at every sibling and child, not only
/// elements: `<p>text<b></b></p>` has no `:first-child` element.
fn matches_pseudo_class(tree: &DomTree, id: NodeId, name: &str) -> Result<bool, MatchError> {
    let parent = tree.parent(id);
    Ok(match name {
        "root" => parent.is_none_or(|p| {
            tree.get(p)
                .is_some_and(|node| matches!(node.node_type, NodeType::Document))
        }),
        "first-child" => parent.is_some_and(|p| tree.first_child(p) == Some(id)),
        "last-child" => parent.is_some_and(|p| tree.last_child(p) == Some(id)),
        "only-child" => tree.prev_sibling(id).is_none() && tree.next_sibling(id).is_none(),
        "empty" => tree.children(id).is_empty(),
        _ => return Err(MatchError::UnsupportedPseudoClass(name.to_string())),
    })
}

impl Sequence {
    /// Whether every simple selector holds for `node`.
    ///
    /// `None` and non-element nodes never match. Evaluation stops at the first
    /// failing condition, so an unsupported pseudo-class after a failing tag
    /// is not reported.
    ///
    /// # Errors
    ///
    /// See [`SimpleSelector::matches`].
    pub fn matches(&self, tree: &DomTree, node: Option<NodeId>) -> Result<bool, MatchError> {
        let Some(id) = node else {
            return Ok(false);
        };
        let Some(element) = tree.as_element(id) else {
            return Ok(false);
        };
        for simple in &self.simple_selectors {
            if !simple.matches(tree, id, element)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn collect_matching(
        &self,
        tree: &DomTree,
        candidates: impl IntoIterator<Item = NodeId>,
        found: &mut Vec<NodeId>,
    ) -> Result<(), MatchError> {
        for id in candidates {
            if self.matches(tree, Some(id))? {
                found.push(id);
            }
        }
        Ok(())
    }
}

impl Link {
    /// Nodes related to `from` by the combinator that match the sequence, in
    /// document order.
    fn find_from(&self, tree: &DomTree, from: NodeId) -> Result<Vec<NodeId>, MatchError> {
        let mut found = Vec::new();
        match self.combinator {
            Combinator::Descendant => {
                self.sequence
                    .collect_matching(tree, tree.preorder(from).skip(1), &mut found)?;
            }
            Combinator::Child => {
                self.sequence
                    .collect_matching(tree, tree.children(from).iter().copied(), &mut found)?;
            }
            Combinator::AdjacentSibling => {
                self.sequence
                    .collect_matching(tree, tree.prev_sibling(from), &mut found)?;
                self.sequence
                    .collect_matching(tree, tree.next_sibling(from), &mut found)?;
            }
            Combinator::Sibling => {
                self.sequence
                    .collect_matching(tree, tree.preceding_siblings(from), &mut found)?;
                found.reverse();
                self.sequence
                    .collect_matching(tree, tree.following_siblings(from), &mut found)?;
            }
        }
        Ok(found)
    }
}

impl Chain {
    /// Every node under `root` (inclusive) the chain selects, in document
    /// order within each stage.
    ///
    /// The head is tested against a pre-order walk of `root`; each link then
    /// replaces the candidate set with the related nodes matching its
    /// sequence. A node reached from several candidates is reported once.
    ///
    /// # Errors
    ///
    /// Returns the first [`MatchError`] raised while evaluating.
    pub fn find(&self, tree: &DomTree, root: NodeId) -> Result<Vec<NodeId>, MatchError> {
        let mut found = Vec::new();
        self.head.collect_matching(tree, tree.preorder(root), &mut found)?;

        for link in &self.tail {
            if found.is_empty() {
                break;
            }
            let mut seen = HashSet::new();
            let mut next = Vec::new();
            for &candidate in &found {
                for id in link.find_from(tree, candidate)? {
                    if seen.insert(id) {
                        next.push(id);
                    }
                }
            }
            found = next;
        }
        Ok(found)
    }

    /// Whether `id` is among the nodes the chain selects from the document
    /// root.
    ///
    /// # Errors
    ///
    /// See [`Chain::find`].
    pub fn matches(&self, tree: &DomTree, id: NodeId) -> Result<bool, MatchError> {
        Ok(self.find(tree, NodeId::ROOT)?.contains(&id))
    }
}
