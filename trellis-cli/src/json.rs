//! JSON view of a parsed tree for `--json`.

use serde::Serialize;
use trellis_dom::{DomTree, NodeId, NodeType};

/// One node and its subtree, borrowing from the tree.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JsonNode<'a> {
    Document {
        children: Vec<JsonNode<'a>>,
    },
    Element {
        tag: &'a str,
        attributes: Vec<JsonAttribute<'a>>,
        children: Vec<JsonNode<'a>>,
    },
    Text {
        data: &'a str,
    },
    Comment {
        data: &'a str,
    },
    Doctype {
        name: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        keyword: Option<&'static str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        identifier: Option<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        system_identifier: Option<&'a str>,
    },
}

#[derive(Debug, Serialize)]
pub struct JsonAttribute<'a> {
    name: &'a str,
    value: &'a str,
}

/// Build the JSON view of the subtree rooted at `id`.
pub fn node(tree: &DomTree, id: NodeId) -> Option<JsonNode<'_>> {
    Some(match &tree.get(id)?.node_type {
        NodeType::Document => JsonNode::Document {
            children: children(tree, id),
        },
        NodeType::Element(data) => JsonNode::Element {
            tag: &data.tag_name,
            attributes: data
                .attrs
                .iter()
                .map(|attr| JsonAttribute {
                    name: &attr.name,
                    value: &attr.value,
                })
                .collect(),
            children: children(tree, id),
        },
        NodeType::Text(data) => JsonNode::Text { data },
        NodeType::Comment(data) => JsonNode::Comment { data },
        NodeType::Doctype(doctype) => JsonNode::Doctype {
            name: &doctype.name,
            keyword: doctype.keyword.map(|keyword| keyword.as_str()),
            identifier: doctype.keyword.map(|_| doctype.identifier.as_str()),
            system_identifier: doctype.system_identifier.as_deref(),
        },
    })
}

fn children(tree: &DomTree, id: NodeId) -> Vec<JsonNode<'_>> {
    tree.children(id)
        .iter()
        .filter_map(|&child| node(tree, child))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_json() {
        let tree = trellis_html::parse("<a href='x'>hi</a><!--c-->").unwrap();
        let json = serde_json::to_value(node(&tree, NodeId::ROOT)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "document",
                "children": [
                    {
                        "type": "element",
                        "tag": "a",
                        "attributes": [{ "name": "href", "value": "x" }],
                        "children": [{ "type": "text", "data": "hi" }]
                    },
                    { "type": "comment", "data": "c" }
                ]
            })
        );
    }

    #[test]
    fn test_doctype_json() {
        let tree = trellis_html::parse("<!DOCTYPE html SYSTEM \"about:legacy-compat\">").unwrap();
        let json = serde_json::to_value(node(&tree, NodeId::ROOT)).unwrap();
        assert_eq!(
            json["children"][0],
            serde_json::json!({
                "type": "doctype",
                "name": "html",
                "keyword": "SYSTEM",
                "identifier": "about:legacy-compat"
            })
        );
    }
}
