//! Node tree for the Trellis markup toolkit.
//!
//! This crate provides the arena-based tree that the markup parser builds and
//! the selector engine queries.
//!
//! # Design
//!
//! All nodes live in one `Vec` owned by [`DomTree`] and refer to each other by
//! [`NodeId`] index. A node owns its `children` list; `parent` and the sibling
//! links are plain indices used for upward and sideways traversal only, so there
//! is no reference cycle to manage and no aliasing between `&mut` borrows.
//!
//! Nodes are never freed individually. Removing a node detaches it (its parent
//! and sibling links are cleared and it disappears from its parent's children);
//! a detached node is unreachable from the root and is ignored by every walk.

mod mutation;
mod serialize;

pub use serialize::{NodeDisplay, RENDER_EXPLICIT_CLOSE};

/// A type-safe index into a [`DomTree`].
///
/// Ids are only meaningful for the tree that produced them. A cloned tree uses
/// the same numbering but shares no nodes with the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// A single node and its tree links.
#[derive(Debug, Clone)]
pub struct Node {
    /// What kind of node this is, with its payload.
    pub node_type: NodeType,

    /// Non-owning link to the parent. `None` for the root and for detached nodes.
    pub parent: Option<NodeId>,

    /// Owned, ordered children.
    pub children: Vec<NodeId>,

    /// The node immediately following this one in its parent's children.
    pub next_sibling: Option<NodeId>,

    /// The node immediately preceding this one in its parent's children.
    pub prev_sibling: Option<NodeId>,
}

impl Node {
    const fn new(node_type: NodeType) -> Self {
        Self {
            node_type,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        }
    }
}

/// The node kinds the parser produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeType {
    /// The tree root. Holds the top-level nodes of the parsed input.
    Document,
    /// An element with a tag name and attributes.
    Element(ElementData),
    /// Character data.
    Text(String),
    /// A `<!DOCTYPE ...>` declaration.
    Doctype(DoctypeData),
    /// A comment, including bogus comments such as `<?xml ...>`.
    Comment(String),
}

/// One `name='value'` pair on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name, ASCII-lowercased by the parser.
    pub name: String,
    /// Attribute value, exactly as written (no character references decoded).
    pub value: String,
}

impl Attribute {
    /// Create an attribute.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Element-specific data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementData {
    /// The element's tag name.
    pub tag_name: String,
    /// Attributes in source order. Names are compared ASCII case-insensitively.
    pub attrs: Vec<Attribute>,
}

impl ElementData {
    /// Create element data with no attributes.
    #[must_use]
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attrs: Vec::new(),
        }
    }

    /// Look up an attribute value by name, ignoring ASCII case.
    ///
    /// If the name occurs more than once the first occurrence wins.
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
            .map(|attr| attr.value.as_str())
    }

    /// Returns true if the element carries the named attribute.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.get_attribute(name).is_some()
    }

    /// Set an attribute, replacing the value of every attribute with the same
    /// name, or appending a new attribute if there is none.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        let mut found = false;
        for attr in &mut self.attrs {
            if attr.name.eq_ignore_ascii_case(name) {
                value.clone_into(&mut attr.value);
                found = true;
            }
        }
        if !found {
            self.attrs.push(Attribute::new(name, value));
        }
    }

    /// The value of the `id` attribute, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.get_attribute("id")
    }

    /// The whitespace-separated tokens of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.get_attribute("class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }
}

/// Which external identifier keyword a doctype uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoctypeKeyword {
    /// `PUBLIC "..."`
    Public,
    /// `SYSTEM "..."`
    System,
}

impl DoctypeKeyword {
    /// The keyword as it is written in markup.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "PUBLIC",
            Self::System => "SYSTEM",
        }
    }
}

/// Doctype-specific data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctypeData {
    /// The doctype name, e.g. `html`. ASCII-lowercased by the parser.
    pub name: String,
    /// `PUBLIC` or `SYSTEM`, if an external identifier follows the name.
    pub keyword: Option<DoctypeKeyword>,
    /// The first quoted identifier after the keyword.
    pub identifier: String,
    /// The second quoted identifier (the system identifier after a public one).
    pub system_identifier: Option<String>,
}

/// Arena-based node tree.
///
/// `Clone` copies the whole arena, so a cloned tree is completely independent
/// of the original.
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes, indexed by `NodeId`. The Document node is always at index 0.
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new tree with just the Document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeType::Document)],
        }
    }

    /// Get the root document node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    #[must_use]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Number of nodes in the arena, detached ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the Document node is never removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new, detached node and return its ID.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(node_type));
        id
    }

    /// Allocate a detached element with no attributes.
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.alloc(NodeType::Element(ElementData::new(tag_name)))
    }

    /// Allocate a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeType::Text(text.to_string()))
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.first().copied())
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.last().copied())
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// Returns true if `ancestor` is `id` or one of its ancestors.
    #[must_use]
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        id == ancestor || self.ancestors(id).any(|a| a == ancestor)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over preceding siblings, nearest first.
    #[must_use]
    pub fn preceding_siblings(&self, id: NodeId) -> SiblingIterator<'_> {
        SiblingIterator {
            tree: self,
            current: self.prev_sibling(id),
            forward: false,
        }
    }

    /// Iterate over following siblings, nearest first.
    #[must_use]
    pub fn following_siblings(&self, id: NodeId) -> SiblingIterator<'_> {
        SiblingIterator {
            tree: self,
            current: self.next_sibling(id),
            forward: true,
        }
    }

    /// Pre-order traversal of the subtree rooted at `id`, starting with `id`
    /// itself. Each call starts a fresh walk.
    #[must_use]
    pub fn preorder(&self, id: NodeId) -> PreorderIterator<'_> {
        PreorderIterator {
            tree: self,
            stack: if self.get(id).is_some() {
                vec![id]
            } else {
                Vec::new()
            },
        }
    }

    /// Call `visit` on every node of the subtree rooted at `id`, parents before
    /// children and children in list order.
    pub fn walk(&self, id: NodeId, mut visit: impl FnMut(NodeId)) {
        for node in self.preorder(id) {
            visit(node);
        }
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get mutable element data if this node is an element.
    #[must_use]
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| match &mut n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// The tag name of an element node.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.as_element(id).map(|e| e.tag_name.as_str())
    }

    /// The node's character data: tag name for elements, text for text and
    /// comment nodes, name for doctypes, empty for the document.
    #[must_use]
    pub fn data(&self, id: NodeId) -> &str {
        match self.get(id).map(|n| &n.node_type) {
            Some(NodeType::Element(e)) => &e.tag_name,
            Some(NodeType::Text(s) | NodeType::Comment(s)) => s,
            Some(NodeType::Doctype(d)) => &d.name,
            Some(NodeType::Document) | None => "",
        }
    }

    /// The first element child of the Document, usually `<html>`.
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .find(|&&id| self.as_element(id).is_some())
            .copied()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Iterator over the siblings on one side of a node, nearest first.
pub struct SiblingIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
    forward: bool,
}

impl Iterator for SiblingIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = if self.forward {
            self.tree.next_sibling(id)
        } else {
            self.tree.prev_sibling(id)
        };
        Some(id)
    }
}

/// Pre-order iterator over a subtree.
pub struct PreorderIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for PreorderIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        tree.append_child(NodeId::ROOT, html);
        let body = tree.create_element("body");
        tree.append_child(html, body);
        let text = tree.create_text("foo");
        tree.append_child(body, text);
        (tree, html, body, text)
    }

    #[test]
    fn test_preorder_visits_parents_first() {
        let (tree, html, body, text) = sample();
        let order: Vec<NodeId> = tree.preorder(NodeId::ROOT).collect();
        assert_eq!(order, vec![NodeId::ROOT, html, body, text]);
    }

    #[test]
    fn test_walk_is_restartable() {
        let (tree, ..) = sample();
        let mut first = Vec::new();
        tree.walk(NodeId::ROOT, |id| first.push(id));
        let mut second = Vec::new();
        tree.walk(NodeId::ROOT, |id| second.push(id));
        assert_eq!(first, second);
    }

    #[test]
    fn test_attribute_lookup_ignores_case() {
        let mut data = ElementData::new("a");
        data.attrs.push(Attribute::new("HREF", "x"));
        assert_eq!(data.get_attribute("href"), Some("x"));
        data.set_attribute("href", "y");
        assert_eq!(data.attrs.len(), 1);
        assert_eq!(data.get_attribute("Href"), Some("y"));
    }

    #[test]
    fn test_classes_split_on_whitespace() {
        let mut data = ElementData::new("a");
        data.set_attribute("class", " baz\tfoo  bar ");
        assert_eq!(data.classes().collect::<Vec<_>>(), vec!["baz", "foo", "bar"]);
    }

    #[test]
    fn test_data_per_node_kind() {
        let (tree, html, _, text) = sample();
        assert_eq!(tree.data(html), "html");
        assert_eq!(tree.data(text), "foo");
        assert_eq!(tree.data(NodeId::ROOT), "");
    }
}
