//! Serialization back to markup.

use std::fmt;

use crate::{DomTree, ElementData, NodeId, NodeType};

/// Elements that always render with an explicit end tag, even when empty.
///
/// `<textarea/>` is not a valid empty textarea in HTML, and an empty `script` or
/// `style` written self-closed would swallow the rest of the document when the
/// output is parsed again.
pub const RENDER_EXPLICIT_CLOSE: &[&str] = &["textarea", "script", "style"];

/// [`fmt::Display`] adapter that renders one node and its subtree.
pub struct NodeDisplay<'a> {
    tree: &'a DomTree,
    id: NodeId,
}

impl DomTree {
    /// Display adapter for the subtree rooted at `id`.
    #[must_use]
    pub const fn display(&self, id: NodeId) -> NodeDisplay<'_> {
        NodeDisplay { tree: self, id }
    }

    /// Render the subtree rooted at `id` as markup.
    #[must_use]
    pub fn serialize(&self, id: NodeId) -> String {
        self.display(id).to_string()
    }
}

impl fmt::Display for NodeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(self.tree, self.id, f)
    }
}

/// Renders the whole document.
impl fmt::Display for DomTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(self, NodeId::ROOT, f)
    }
}

fn write_attributes(element: &ElementData, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for attr in &element.attrs {
        write!(f, " {}='{}'", attr.name, attr.value)?;
    }
    Ok(())
}

fn write_children(tree: &DomTree, id: NodeId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for &child in tree.children(id) {
        write_node(tree, child, f)?;
    }
    Ok(())
}

fn write_node(tree: &DomTree, id: NodeId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let Some(node) = tree.get(id) else {
        return Ok(());
    };
    match &node.node_type {
        NodeType::Document => write_children(tree, id, f),
        NodeType::Text(text) => f.write_str(text),
        NodeType::Comment(text) => write!(f, "<!--{text}-->"),
        NodeType::Doctype(doctype) => {
            write!(f, "<!DOCTYPE {}", doctype.name)?;
            if let Some(keyword) = doctype.keyword {
                write!(f, " {} \"{}\"", keyword.as_str(), doctype.identifier)?;
                if let Some(system) = &doctype.system_identifier {
                    write!(f, " \"{system}\"")?;
                }
            }
            f.write_str(">")
        }
        NodeType::Element(element) => {
            write!(f, "<{}", element.tag_name)?;
            write_attributes(element, f)?;
            if node.children.is_empty() && !RENDER_EXPLICIT_CLOSE.contains(&element.tag_name.as_str())
            {
                return f.write_str("/>");
            }
            f.write_str(">")?;
            write_children(tree, id, f)?;
            write!(f, "</{}>", element.tag_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Attribute, DoctypeData, DoctypeKeyword, DomTree, NodeId, NodeType};

    #[test]
    fn test_childless_element_self_closes() {
        let mut tree = DomTree::new();
        let a = tree.create_element("a");
        tree.append_child(NodeId::ROOT, a);
        if let Some(data) = tree.as_element_mut(a) {
            data.attrs.push(Attribute::new("href", "x"));
            data.attrs.push(Attribute::new("class", "y z"));
        }
        assert_eq!(tree.to_string(), "<a href='x' class='y z'/>");
    }

    #[test]
    fn test_textarea_keeps_explicit_close() {
        let mut tree = DomTree::new();
        let textarea = tree.create_element("textarea");
        tree.append_child(NodeId::ROOT, textarea);
        assert_eq!(tree.to_string(), "<textarea></textarea>");
    }

    #[test]
    fn test_doctype_forms() {
        let mut tree = DomTree::new();
        let doctype = tree.alloc(NodeType::Doctype(DoctypeData {
            name: "html".to_string(),
            keyword: Some(DoctypeKeyword::Public),
            identifier: "-//W3C//DTD HTML 4.01//EN".to_string(),
            system_identifier: Some("http://www.w3.org/TR/html4/strict.dtd".to_string()),
        }));
        tree.append_child(NodeId::ROOT, doctype);
        assert_eq!(
            tree.to_string(),
            "<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01//EN\" \"http://www.w3.org/TR/html4/strict.dtd\">"
        );
    }

    #[test]
    fn test_nested_serialization() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        tree.append_child(NodeId::ROOT, div);
        let text = tree.create_text("hi");
        tree.append_child(div, text);
        let comment = tree.alloc(NodeType::Comment(" note ".to_string()));
        tree.append_child(div, comment);
        assert_eq!(tree.serialize(div), "<div>hi<!-- note --></div>");
    }
}
