//! Integration tests for the markup parser.

use trellis_dom::{DoctypeKeyword, DomTree, Node, NodeId, NodeType};
use trellis_html::{
    Error, HTMLParser, InsertionMode, ParseErrorKind, TokenizerState, parse, parse_reader,
};

/// Helper to parse markup that must be well formed
fn parse_ok(html: &str) -> DomTree {
    match parse(html) {
        Ok(tree) => tree,
        Err(err) => panic!("failed to parse {html:?}: {err}"),
    }
}

/// Helper to get the error kind for markup that must fail
fn parse_err(html: &str) -> ParseErrorKind {
    match parse(html) {
        Ok(tree) => panic!("expected {html:?} to fail, got {tree}"),
        Err(err) => err.kind,
    }
}

/// Helper to get element by tag name (first match, depth-first)
fn find_element(tree: &DomTree, from: NodeId, tag: &str) -> Option<NodeId> {
    tree.preorder(from).find(|&id| tree.tag_name(id) == Some(tag))
}

/// Helper to get a node reference
fn get_node(tree: &DomTree, id: NodeId) -> &Node {
    tree.get(id).expect("Node not found")
}

/// Data of each child of `id`
fn child_data(tree: &DomTree, id: NodeId) -> Vec<&str> {
    tree.children(id).iter().map(|&c| tree.data(c)).collect()
}

// ========== structure ==========

#[test]
fn test_snippet() {
    let tree = parse_ok("<a></a>");
    assert!(matches!(get_node(&tree, NodeId::ROOT).node_type, NodeType::Document));
    assert_eq!(child_data(&tree, NodeId::ROOT), vec!["a"]);
    let a = tree.children(NodeId::ROOT)[0];
    assert!(tree.children(a).is_empty());
}

#[test]
fn test_simple_document() {
    let tree = parse_ok("<html><body>foo</body></html>");
    let html = find_element(&tree, NodeId::ROOT, "html").unwrap();
    assert_eq!(tree.parent(html), Some(NodeId::ROOT));
    assert_eq!(child_data(&tree, html), vec!["body"]);
    let body = tree.children(html)[0];
    assert_eq!(child_data(&tree, body), vec!["foo"]);
    assert_eq!(tree.as_text(tree.children(body)[0]), Some("foo"));
}

#[test]
fn test_siblings() {
    let tree = parse_ok("<html><body><a>foo</a><div>bar</div></body></html>");
    let body = find_element(&tree, NodeId::ROOT, "body").unwrap();
    assert_eq!(child_data(&tree, body), vec!["a", "div"]);
    let [a, div] = tree.children(body) else {
        panic!("expected two children");
    };
    assert_eq!(tree.next_sibling(*a), Some(*div));
    assert_eq!(tree.prev_sibling(*div), Some(*a));
}

#[test]
fn test_tag_names_are_lowercased() {
    let tree = parse_ok("<DIV><SpAn></span></Div>");
    assert_eq!(tree.to_string(), "<div><span/></div>");
}

#[test]
fn test_walk_order() {
    let tree = parse_ok("<html><body><a>foo</a><div>bar</div></body></html>");
    let html = find_element(&tree, NodeId::ROOT, "html").unwrap();
    let mut seen = Vec::new();
    tree.walk(html, |id| seen.push(tree.data(id).to_string()));
    assert_eq!(seen, vec!["html", "body", "a", "foo", "div", "bar"]);
}

#[test]
fn test_clone_is_deep() {
    let tree = parse_ok("<html><body><a>foo</a><div>bar</div></body></html>");
    let mut copy = tree.clone();
    let body = find_element(&copy, NodeId::ROOT, "body").unwrap();
    copy.remove_children(body);

    let original_body = find_element(&tree, NodeId::ROOT, "body").unwrap();
    assert_eq!(child_data(&tree, original_body), vec!["a", "div"]);
    assert_eq!(copy.to_string(), "<html><body/></html>");
}

#[test]
fn test_serialization_round_trip() {
    let html = "<html><head><title>T</title></head><body><p class='x'>a</p><!--c--></body></html>";
    assert_eq!(parse_ok(html).to_string(), html);
}

// ========== attributes ==========

#[test]
fn test_attributes() {
    let tree = parse_ok("<a HREF=\"x\" class=y checked></a>");
    let a = find_element(&tree, NodeId::ROOT, "a").unwrap();
    let data = tree.as_element(a).unwrap();
    assert_eq!(data.get_attribute("href"), Some("x"));
    assert_eq!(data.get_attribute("class"), Some("y"));
    assert_eq!(data.get_attribute("checked"), Some(""));
    assert_eq!(tree.to_string(), "<a href='x' class='y' checked=''/>");
}

#[test]
fn test_duplicate_attribute_first_wins() {
    let tree = parse_ok("<a id=\"1\" id=\"2\"></a>");
    let a = find_element(&tree, NodeId::ROOT, "a").unwrap();
    let data = tree.as_element(a).unwrap();
    assert_eq!(data.attrs.len(), 1);
    assert_eq!(data.get_attribute("id"), Some("1"));
}

#[test]
fn test_duplicate_attribute_strict() {
    let (_, result) = HTMLParser::new("<a id=\"1\" id=\"2\"></a>")
        .with_strict_mode()
        .run();
    let err = result.unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::DuplicateAttribute {
            name: "id".to_string(),
            tag: "a".to_string()
        }
    );
}

#[test]
fn test_unterminated_attribute_value() {
    assert_eq!(
        parse_err("<a href='x"),
        ParseErrorKind::UnterminatedAttributeValue {
            name: "href".to_string()
        }
    );
}

// ========== void, self-closing and implied tags ==========

#[test]
fn test_meta_and_link_are_void() {
    let tree = parse_ok(
        "<html><head><meta><link href='foo'></head><body><div>foo</div></body></html>",
    );
    let html = find_element(&tree, NodeId::ROOT, "html").unwrap();
    assert_eq!(child_data(&tree, html), vec!["head", "body"]);
    let head = tree.children(html)[0];
    assert_eq!(child_data(&tree, head), vec!["meta", "link"]);
    let link = tree.children(head)[1];
    assert_eq!(tree.as_element(link).unwrap().get_attribute("href"), Some("foo"));
    let div = find_element(&tree, NodeId::ROOT, "div").unwrap();
    assert_eq!(child_data(&tree, div), vec!["foo"]);
}

#[test]
fn test_self_closing_does_not_become_current() {
    let tree = parse_ok("<div><span/>x<br>y</div>");
    let div = find_element(&tree, NodeId::ROOT, "div").unwrap();
    assert_eq!(child_data(&tree, div), vec!["span", "x", "br", "y"]);
}

#[test]
fn test_unclosed_p_before_block() {
    let tree = parse_ok("<html><body><p>foo<article></article></body></html>");
    let body = find_element(&tree, NodeId::ROOT, "body").unwrap();
    assert_eq!(child_data(&tree, body), vec!["p", "article"]);
    let p = tree.children(body)[0];
    assert_eq!(child_data(&tree, p), vec!["foo"]);

    let tree = parse_ok("<html><body><p><article></article></body></html>");
    let body = find_element(&tree, NodeId::ROOT, "body").unwrap();
    assert_eq!(child_data(&tree, body), vec!["p", "article"]);
    assert!(tree.children(tree.children(body)[0]).is_empty());
}

#[test]
fn test_unclosed_p_at_end_of_body() {
    let tree = parse_ok("<html><body><p>foo</body></html>");
    let body = find_element(&tree, NodeId::ROOT, "body").unwrap();
    assert_eq!(child_data(&tree, body), vec!["p"]);
    assert_eq!(child_data(&tree, tree.children(body)[0]), vec!["foo"]);
}

#[test]
fn test_implied_li_end() {
    let tree = parse_ok("<body><ul><li>a</ul></body>");
    let ul = find_element(&tree, NodeId::ROOT, "ul").unwrap();
    assert_eq!(child_data(&tree, ul), vec!["li"]);
    assert_eq!(tree.to_string(), "<body><ul><li>a</li></ul></body>");
}

#[test]
fn test_p_closed_inside_table_cell() {
    let tree = parse_ok("<table><tr><td><p>a<div>b</div></td></tr></table>");
    let td = find_element(&tree, NodeId::ROOT, "td").unwrap();
    assert_eq!(child_data(&tree, td), vec!["p", "div"]);
}

// ========== end tags ==========

#[test]
fn test_end_tag_mismatch() {
    let err = parse("<a>foo</b>").unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::EndTagMismatch {
            open: "a".to_string(),
            found: "b".to_string()
        }
    );
    let message = err.to_string();
    assert!(message.contains("<a>"));
    assert!(message.contains("</b>"));
}

#[test]
fn test_end_tag_mismatch_after_implied_close() {
    let (tree, result) = HTMLParser::new("<p>foo</b>").run();
    let err = result.unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::EndTagMismatch {
            open: "p".to_string(),
            found: "b".to_string()
        }
    );
    assert_eq!(err.node, find_element(&tree, NodeId::ROOT, "p"));
}

#[test]
fn test_end_tag_mismatch_names_innermost_open_element() {
    let (tree, result) = HTMLParser::new("<div><p>x</span></div>").run();
    let err = result.unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::EndTagMismatch {
            open: "p".to_string(),
            found: "span".to_string()
        }
    );
    assert_eq!(err.node, find_element(&tree, NodeId::ROOT, "p"));
}

#[test]
fn test_end_tag_case_insensitive() {
    let tree = parse_ok("<foo></FoO>");
    assert_eq!(child_data(&tree, NodeId::ROOT), vec!["foo"]);
}

#[test]
fn test_truncated_and_long_end_tags_fail() {
    for input in ["<foo></fo>", "<foo></fooo>", "<foo></bar>"] {
        let (tree, result) = HTMLParser::new(input).run();
        let err = result.unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::EndTagMismatch { .. }), "{input}");
        // The partial tree and the open element are kept.
        let foo = find_element(&tree, NodeId::ROOT, "foo").unwrap();
        assert_eq!(err.node, Some(foo));
    }
}

#[test]
fn test_end_tag_at_end_of_input() {
    assert_eq!(
        parse_err("<foo></foo"),
        ParseErrorKind::UnexpectedEndOfInput {
            state: TokenizerState::TagName
        }
    );
}

#[test]
fn test_end_tag_without_open_element() {
    assert_eq!(
        parse_err("</a>"),
        ParseErrorKind::UnexpectedEndTag {
            found: "a".to_string()
        }
    );
}

#[test]
fn test_error_position() {
    let err = parse("<a>\n</b>").unwrap_err();
    assert_eq!(err.position.line, 2);
    assert_eq!(err.position.column, 4);
}

// ========== comments ==========

#[test]
fn test_comment() {
    let tree = parse_ok(
        "<html><head><!-- comment --></head><body><div>foo</div></body></html>",
    );
    let head = find_element(&tree, NodeId::ROOT, "head").unwrap();
    assert_eq!(child_data(&tree, head), vec![" comment "]);
    let comment = tree.children(head)[0];
    assert!(matches!(get_node(&tree, comment).node_type, NodeType::Comment(_)));
}

#[test]
fn test_bogus_comment_is_sibling_of_current() {
    let tree = parse_ok("<div><?php echo 1 ?></div>");
    assert_eq!(child_data(&tree, NodeId::ROOT), vec!["div", "?php echo 1 ?"]);

    let tree = parse_ok("<?xml version=\"1.0\"?><a></a>");
    assert_eq!(child_data(&tree, NodeId::ROOT), vec!["?xml version=\"1.0\"?", "a"]);
}

#[test]
fn test_unterminated_comment() {
    assert_eq!(
        parse_err("<!-- open"),
        ParseErrorKind::UnexpectedEndOfInput {
            state: TokenizerState::Comment
        }
    );
}

// ========== raw text ==========

#[test]
fn test_script_document() {
    let tree = parse_ok("<html><body><script> if (foo < 10) { }</script></body></html>");
    let body = find_element(&tree, NodeId::ROOT, "body").unwrap();
    assert_eq!(child_data(&tree, body), vec!["script"]);
    let script = tree.children(body)[0];
    assert_eq!(child_data(&tree, script), vec![" if (foo < 10) { }"]);
}

#[test]
fn test_script_only_document() {
    let tree = parse_ok("<script> if (foo < 10) { var x = '<foo></foo>' }</script>");
    assert_eq!(child_data(&tree, NodeId::ROOT), vec!["script"]);
    let script = tree.children(NodeId::ROOT)[0];
    assert_eq!(
        child_data(&tree, script),
        vec![" if (foo < 10) { var x = '<foo></foo>' }"]
    );
}

#[test]
fn test_style_keeps_markup_characters() {
    let tree = parse_ok("<style>p > a { color: red }</style><p>x</p>");
    let style = find_element(&tree, NodeId::ROOT, "style").unwrap();
    assert_eq!(child_data(&tree, style), vec!["p > a { color: red }"]);
    assert_eq!(child_data(&tree, NodeId::ROOT), vec!["style", "p"]);
}

#[test]
fn test_script_end_of_input() {
    let tree = parse_ok("<script>var a <");
    let script = find_element(&tree, NodeId::ROOT, "script").unwrap();
    assert_eq!(child_data(&tree, script), vec!["var a <"]);

    assert_eq!(
        parse_err("<script>a</"),
        ParseErrorKind::UnexpectedEndOfInput {
            state: TokenizerState::ScriptDataEndTagOpen
        }
    );
}

#[test]
fn test_empty_script_renders_explicit_close() {
    let tree = parse_ok("<script></script>");
    assert_eq!(tree.to_string(), "<script></script>");
}

// ========== doctype ==========

#[test]
fn test_doctype() {
    let tree = parse_ok("<!DOCTYPE HTML><html></html>");
    let doctype = tree.children(NodeId::ROOT)[0];
    let NodeType::Doctype(data) = &get_node(&tree, doctype).node_type else {
        panic!("expected a doctype");
    };
    assert_eq!(data.name, "html");
    assert_eq!(data.keyword, None);
    assert_eq!(tree.to_string(), "<!DOCTYPE html><html/>");
}

#[test]
fn test_doctype_public_with_system_identifier() {
    let input = "<!doctype html public \"-//W3C//DTD HTML 4.01//EN\" \"http://www.w3.org/TR/html4/strict.dtd\">";
    let tree = parse_ok(input);
    let NodeType::Doctype(data) = &get_node(&tree, tree.children(NodeId::ROOT)[0]).node_type
    else {
        panic!("expected a doctype");
    };
    assert_eq!(data.keyword, Some(DoctypeKeyword::Public));
    assert_eq!(data.identifier, "-//W3C//DTD HTML 4.01//EN");
    assert_eq!(
        data.system_identifier.as_deref(),
        Some("http://www.w3.org/TR/html4/strict.dtd")
    );
}

#[test]
fn test_doctype_system() {
    let tree = parse_ok("<!DOCTYPE html SYSTEM 'about:legacy-compat'>");
    assert_eq!(
        tree.to_string(),
        "<!DOCTYPE html SYSTEM \"about:legacy-compat\">"
    );
}

#[test]
fn test_malformed_doctypes() {
    assert!(matches!(
        parse_err("<!DOCTXPE html>"),
        ParseErrorKind::MalformedDoctype { .. }
    ));
    assert_eq!(
        parse_err("<!DOCTYPE html PUBLIK \"x\">"),
        ParseErrorKind::MalformedDoctypeKeyword {
            keyword: "PUBLIK".to_string()
        }
    );
    assert_eq!(
        parse_err("<!DOCTYPE html PUBLIC \"x"),
        ParseErrorKind::UnterminatedDoctypeIdentifier
    );
    assert_eq!(
        parse_err("<!DOCTYPE html SYSTEM>"),
        ParseErrorKind::MissingDoctypeIdentifier
    );
}

#[test]
fn test_misplaced_doctype() {
    let tree = parse_ok("<html><!DOCTYPE html></html>");
    assert_eq!(tree.to_string(), "<html/>");

    let (_, result) = HTMLParser::new("<html><!DOCTYPE html></html>")
        .with_strict_mode()
        .run();
    assert_eq!(
        result.unwrap_err().kind,
        ParseErrorKind::MisplacedDoctype {
            mode: InsertionMode::BeforeHead
        }
    );
}

// ========== recoverable input ==========

#[test]
fn test_less_than_without_tag_is_text() {
    let tree = parse_ok("a < b");
    assert_eq!(child_data(&tree, NodeId::ROOT), vec!["a < b"]);

    let (_, result) = HTMLParser::new("a < b").with_strict_mode().run();
    assert_eq!(
        result.unwrap_err().kind,
        ParseErrorKind::InvalidTagStart { found: ' ' }
    );
}

#[test]
fn test_parse_reader() {
    let tree = parse_reader("<p>hi</p>".as_bytes()).unwrap();
    assert_eq!(tree.to_string(), "<p>hi</p>");

    let invalid: &[u8] = &[b'<', b'p', b'>', 0xff, 0xfe];
    assert!(matches!(parse_reader(invalid), Err(Error::Io(_))));
    assert!(matches!(parse_reader("<a></b>".as_bytes()), Err(Error::Parse(_))));
}
