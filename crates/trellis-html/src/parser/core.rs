use std::str::Chars;

use strum_macros::Display;

use trellis_common::Scanner;
use trellis_dom::{Attribute, DoctypeData, DomTree, ElementData, NodeId, NodeType};

use super::helpers::{
    HEAD_CONTENT_ELEMENTS, IMPLIED_END_TAG_ELEMENTS, P_CLOSING_ELEMENTS, RAW_TEXT_ELEMENTS,
    VOID_ELEMENTS,
};
use super::states::TokenizerState;
use crate::error::{ParseError, ParseErrorKind};

/// The insertion mode controls how start and end tags affect the tree.
///
/// Table modes and AfterBody share the InBody rules; they are tracked so that
/// diagnostics and the mode reset report where the parser is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InsertionMode {
    /// Nothing seen yet; a doctype is allowed here.
    Initial,
    /// After the doctype, before `<html>`.
    BeforeHtml,
    /// Inside `<html>`, before `<head>`.
    BeforeHead,
    /// Inside `<head>`.
    InHead,
    /// After `</head>`, before `<body>`.
    AfterHead,
    /// Inside `<body>` or any element outside the document skeleton.
    InBody,
    /// Inside a raw text element (`script`, `style`).
    Text,
    /// Inside `<table>`.
    InTable,
    /// Inside `<caption>`.
    InCaption,
    /// Inside `<colgroup>`.
    InColumnGroup,
    /// Inside `<tbody>`, `<thead>` or `<tfoot>`.
    InTableBody,
    /// Inside `<tr>`.
    InRow,
    /// Inside `<td>` or `<th>`.
    InCell,
    /// After `</body>`.
    AfterBody,
}

/// The tag being read by the tokenizer. It is turned into a tree change when
/// its `>` is consumed.
#[derive(Debug, Default)]
pub(super) struct PendingTag {
    pub(super) name: String,
    pub(super) attrs: Vec<Attribute>,
    pub(super) is_end: bool,
    pub(super) self_closing: bool,
}

/// Markup parser: tokenizer and tree builder in one state machine.
///
/// There is no stack of open elements. The parser keeps a single `current`
/// node: opening an element appends it to `current` and moves `current` down,
/// closing one moves `current` back up the parent link.
pub struct HTMLParser<'a> {
    pub(super) scanner: Scanner<Chars<'a>>,

    /// Tree under construction. `NodeId::ROOT` is the Document node.
    pub(super) tree: DomTree,

    /// Where new nodes are appended.
    pub(super) current: NodeId,

    pub(super) state: TokenizerState,

    /// The character the current state handler is looking at.
    pub(super) current_input_character: Option<char>,

    pub(super) insertion_mode: InsertionMode,

    /// Mode to return to when a raw text element closes.
    pub(super) original_insertion_mode: Option<InsertionMode>,

    pub(super) current_tag: PendingTag,

    /// Attribute being read: name, value.
    pub(super) current_attribute: Option<Attribute>,

    /// Text of the comment or bogus comment being read.
    pub(super) comment: String,

    pub(super) doctype: DoctypeData,

    /// End tag name read inside raw text, as written.
    pub(super) raw_text_end_tag: String,

    /// Whether we've stopped parsing.
    pub(super) stopped: bool,

    /// If true, recoverable oddities are fatal.
    pub(super) strict_mode: bool,
}

impl<'a> HTMLParser<'a> {
    /// Create a parser over `input`.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            scanner: Scanner::from_text(input),
            tree: DomTree::new(),
            current: NodeId::ROOT,
            state: TokenizerState::Data,
            current_input_character: None,
            insertion_mode: InsertionMode::Initial,
            original_insertion_mode: None,
            current_tag: PendingTag::default(),
            current_attribute: None,
            comment: String::new(),
            doctype: DoctypeData::default(),
            raw_text_end_tag: String::new(),
            stopped: false,
            strict_mode: false,
        }
    }

    /// Enable strict mode: duplicate attributes, misplaced doctypes and `<`
    /// without a tag name become fatal errors instead of warnings.
    #[must_use]
    pub const fn with_strict_mode(mut self) -> Self {
        self.strict_mode = true;
        self
    }

    /// Run the parser to the end of input or the first error.
    ///
    /// The tree is returned in both cases; after an error it holds everything
    /// built up to that point.
    pub fn run(mut self) -> (DomTree, Result<(), ParseError>) {
        let result = self.drive();
        (self.tree, result)
    }

    fn drive(&mut self) -> Result<(), ParseError> {
        while !self.stopped {
            self.current_input_character = self.consume();
            self.step()?;
        }
        Ok(())
    }

    /// The current insertion mode.
    #[must_use]
    pub const fn insertion_mode(&self) -> InsertionMode {
        self.insertion_mode
    }
}

// =============================================================================
// Tree Construction
// =============================================================================

impl HTMLParser<'_> {
    /// Append a text character to `current`, extending its last child if that
    /// is already a text node.
    pub(super) fn append_char(&mut self, c: char) {
        let mut buf = [0; 4];
        self.append_text(c.encode_utf8(&mut buf));
    }

    pub(super) fn append_text(&mut self, text: &str) {
        let last = self.tree.last_child(self.current);
        if let Some(NodeType::Text(data)) = last
            .and_then(|id| self.tree.get_mut(id))
            .map(|node| &mut node.node_type)
        {
            data.push_str(text);
            return;
        }
        let id = self.tree.create_text(text);
        self.tree.append_child(self.current, id);
    }

    /// Append a new element to `current` and make it the current node.
    fn push_element(&mut self, data: ElementData) -> NodeId {
        let id = self.tree.alloc(NodeType::Element(data));
        self.tree.append_child(self.current, id);
        self.current = id;
        id
    }

    /// Move `current` to its parent and recompute the insertion mode.
    pub(super) fn pop_element(&mut self) {
        self.current = self.tree.parent(self.current).unwrap_or(NodeId::ROOT);
        match self.original_insertion_mode.take() {
            Some(mode) => self.insertion_mode = mode,
            None => self.reset_insertion_mode(),
        }
    }

    /// Attach a node next to the current node: as a child of its parent, or of
    /// the root if the current node is the root.
    pub(super) fn add_sibling(&mut self, node_type: NodeType) -> NodeId {
        let parent = self.tree.parent(self.current).unwrap_or(NodeId::ROOT);
        let id = self.tree.alloc(node_type);
        self.tree.append_child(parent, id);
        id
    }

    /// Attach a node as the last child of the current node.
    pub(super) fn add_child(&mut self, node_type: NodeType) -> NodeId {
        let id = self.tree.alloc(node_type);
        self.tree.append_child(self.current, id);
        id
    }

    fn current_tag_name(&self) -> Option<&str> {
        self.tree.tag_name(self.current)
    }

    /// Derive the insertion mode from the current node by climbing parent
    /// links until a landmark element is found.
    pub(super) fn reset_insertion_mode(&mut self) {
        let started_in_element = self.current != NodeId::ROOT;
        let mut node = Some(self.current);
        while let Some(id) = node {
            if let Some(tag) = self.tree.tag_name(id) {
                let mode = match tag {
                    "td" | "th" => Some(InsertionMode::InCell),
                    "tr" => Some(InsertionMode::InRow),
                    "tbody" | "thead" | "tfoot" => Some(InsertionMode::InTableBody),
                    "caption" => Some(InsertionMode::InCaption),
                    "colgroup" => Some(InsertionMode::InColumnGroup),
                    "table" => Some(InsertionMode::InTable),
                    "head" => Some(InsertionMode::InHead),
                    "body" => Some(InsertionMode::InBody),
                    "html" => Some(self.mode_inside_html(id)),
                    _ => None,
                };
                if let Some(mode) = mode {
                    self.insertion_mode = mode;
                    return;
                }
            }
            node = self.tree.parent(id);
        }

        self.insertion_mode = if started_in_element {
            InsertionMode::InBody
        } else if self.tree.document_element().is_some() {
            InsertionMode::AfterBody
        } else if self
            .tree
            .children(NodeId::ROOT)
            .iter()
            .any(|&id| matches!(self.tree.get(id).map(|n| &n.node_type), Some(NodeType::Doctype(_))))
        {
            InsertionMode::BeforeHtml
        } else {
            InsertionMode::Initial
        };
    }

    fn mode_inside_html(&self, html: NodeId) -> InsertionMode {
        let has_child = |name: &str| {
            self.tree
                .children(html)
                .iter()
                .any(|&id| self.tree.tag_name(id) == Some(name))
        };
        if has_child("body") {
            InsertionMode::AfterBody
        } else if has_child("head") {
            InsertionMode::AfterHead
        } else {
            InsertionMode::BeforeHead
        }
    }

    /// Insertion mode after a start tag named `name` has been inserted.
    fn mode_for_start_tag(&self, name: &str) -> InsertionMode {
        match name {
            "html" => InsertionMode::BeforeHead,
            "head" => InsertionMode::InHead,
            "body" => InsertionMode::InBody,
            "table" => InsertionMode::InTable,
            "caption" => InsertionMode::InCaption,
            "colgroup" => InsertionMode::InColumnGroup,
            "tbody" | "thead" | "tfoot" => InsertionMode::InTableBody,
            "tr" => InsertionMode::InRow,
            "td" | "th" => InsertionMode::InCell,
            _ if self.insertion_mode == InsertionMode::InHead
                && HEAD_CONTENT_ELEMENTS.contains(&name) =>
            {
                InsertionMode::InHead
            }
            _ if self.insertion_mode.is_before_body() => InsertionMode::InBody,
            _ => self.insertion_mode,
        }
    }

    /// Insert the start tag that was just completed.
    pub(super) fn emit_start_tag(&mut self) {
        self.switch_to(TokenizerState::Data);
        let tag = std::mem::take(&mut self.current_tag);
        let name = tag.name;

        if self.insertion_mode.is_body_family()
            && self.current_tag_name() == Some("p")
            && P_CLOSING_ELEMENTS.contains(&name.as_str())
        {
            self.pop_element();
        }

        let mode = self.mode_for_start_tag(&name);
        let data = ElementData {
            tag_name: name,
            attrs: tag.attrs,
        };

        if tag.self_closing || VOID_ELEMENTS.contains(&data.tag_name.as_str()) {
            let _ = self.add_child(NodeType::Element(data));
            self.insertion_mode = mode;
            return;
        }

        let is_raw_text = RAW_TEXT_ELEMENTS.contains(&data.tag_name.as_str());
        let _ = self.push_element(data);
        if is_raw_text {
            self.original_insertion_mode = Some(mode);
            self.insertion_mode = InsertionMode::Text;
            self.switch_to(TokenizerState::ScriptData);
        } else {
            self.insertion_mode = mode;
        }
    }

    /// Close the element named by the end tag that was just completed.
    ///
    /// The name must match the current node, ASCII case-insensitively. In body
    /// modes an open `p`, `li`, `dt`, `dd` or `option` that does not match is
    /// closed implicitly and the comparison retried. If the retry finds no
    /// match, the parser is put back on the element that was open and the
    /// error names it.
    pub(super) fn emit_end_tag(&mut self) -> Result<(), ParseError> {
        self.switch_to(TokenizerState::Data);
        let tag = std::mem::take(&mut self.current_tag);
        let Some(open) = self.current_tag_name().map(str::to_string) else {
            return Err(self.error(ParseErrorKind::UnexpectedEndTag { found: tag.name }));
        };
        let saved = (self.current, self.insertion_mode, self.original_insertion_mode);

        loop {
            let Some(name) = self.current_tag_name() else {
                break;
            };
            if name.eq_ignore_ascii_case(&tag.name) {
                self.pop_element();
                return Ok(());
            }
            if !(self.insertion_mode.is_body_family() && IMPLIED_END_TAG_ELEMENTS.contains(&name)) {
                break;
            }
            self.pop_element();
        }

        (self.current, self.insertion_mode, self.original_insertion_mode) = saved;
        Err(self.error(ParseErrorKind::EndTagMismatch {
            open,
            found: tag.name,
        }))
    }
}

/// Print the subtree rooted at `id`, one node per line, indented by depth.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    let prefix = "  ".repeat(indent);
    if let Some(node) = tree.get(id) {
        match &node.node_type {
            NodeType::Document => {
                println!("{prefix}Document");
            }
            NodeType::Element(data) => {
                if data.attrs.is_empty() {
                    println!("{prefix}<{}>", data.tag_name);
                } else {
                    let attrs: Vec<String> = data
                        .attrs
                        .iter()
                        .map(|attr| {
                            if attr.value.is_empty() {
                                attr.name.clone()
                            } else {
                                format!("{}=\"{}\"", attr.name, attr.value)
                            }
                        })
                        .collect();
                    println!("{prefix}<{} {}>", data.tag_name, attrs.join(" "));
                }
            }
            NodeType::Text(data) => {
                let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
                println!("{prefix}\"{display}\"");
            }
            NodeType::Comment(data) => {
                println!("{prefix}<!-- {data} -->");
            }
            NodeType::Doctype(doctype) => {
                println!("{prefix}<!DOCTYPE {}>", doctype.name);
            }
        }
        for &child_id in tree.children(id) {
            print_tree(tree, child_id, indent + 1);
        }
    }
}
