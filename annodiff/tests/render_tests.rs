//! End-to-end rendering tests, from diff trees to plain text and HTML.

use annodiff::{
    Anchor, Annotation, Attribute, CanonicalNode, DiffNode, Node, NodeKind, RenderError,
    RenderOptions, Segment, StyleKind, render, render_json, render_lines, render_page,
};
use facet_testhelpers::test;

fn sample_document() -> CanonicalNode {
    Node::document(vec![
        Node::prolog(vec![Attribute::new("version", "\"1.0\"")]),
        Node::element(
            "catalog",
            vec![Attribute::new("lang", "\"en\"")],
            vec![
                Node::comment(" books "),
                Node::element(
                    "book",
                    vec![
                        Attribute::new("id", "\"bk101\""),
                        Attribute::new("isbn", "\"978-0-00-000000-0\""),
                        Attribute::new("shelf", "\"fiction\""),
                    ],
                    vec![Node::element("title", vec![], vec![Node::chardata("Dune")])],
                ),
                Node::element(
                    "book",
                    vec![Attribute::new("id", "\"bk102\"")],
                    vec![
                        Node::element("title", vec![], vec![Node::chardata("Emma")]),
                        Node::element("author", vec![], vec![Node::chardata("Austen")]),
                    ],
                ),
            ],
        ),
    ])
}

/// Single-line serialization of a canonical tree, independent of the renderer.
fn serialize(node: &CanonicalNode, out: &mut String) {
    fn attributes(attrs: &[Attribute<()>]) -> String {
        attrs
            .iter()
            .map(|a| format!("{}={}", a.name, a.value.text))
            .collect::<Vec<_>>()
            .join(" ")
    }
    match &node.kind {
        NodeKind::Document(children) => children.iter().for_each(|c| serialize(c, out)),
        NodeKind::Prolog(attrs) => out.push_str(&format!("<?xml {}?>", attributes(attrs))),
        NodeKind::Element(element) => {
            out.push('<');
            out.push_str(&element.tag);
            if !element.attributes.is_empty() {
                out.push(' ');
                out.push_str(&attributes(&element.attributes));
            }
            if element.content.is_empty() {
                out.push_str("/>");
            } else {
                out.push('>');
                element.content.iter().for_each(|c| serialize(c, out));
                out.push_str(&format!("</{}>", element.tag));
            }
        }
        NodeKind::CharData(text) => out.push_str(text),
        NodeKind::Comment(text) => out.push_str(&format!("<!--{text}-->")),
    }
}

fn without_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn move_pair_tree() -> DiffNode {
    Node::element(
        "root",
        vec![],
        vec![
            Node::element("b", vec![], vec![]).annotated(Annotation::MoveFrom { move_id: 0 }),
            Node::element("a", vec![], vec![]),
            Node::element("b", vec![], vec![]).annotated(Annotation::MoveTo { move_id: 0 }),
        ],
    )
}

#[test]
fn test_unchanged_tree_has_no_markup() {
    let tree = sample_document().into_unchanged();

    let plain = render(&tree, &RenderOptions::plain()).unwrap();
    assert!(!plain.contains("[("), "unexpected markup in:\n{plain}");
    assert!(!plain.contains('#'));

    let html = render(&tree, &RenderOptions::html()).unwrap();
    assert!(!html.contains("<span"));
    assert!(!html.contains("<connection"));
}

#[test]
fn test_unchanged_tree_matches_structural_serialization() {
    let canonical = sample_document();
    let mut expected = String::new();
    serialize(&canonical, &mut expected);

    let plain = render(&canonical.into_unchanged(), &RenderOptions::plain()).unwrap();
    assert_eq!(without_whitespace(&plain), without_whitespace(&expected));
}

#[test]
fn test_unchanged_tree_layout() {
    let plain = render(&sample_document().into_unchanged(), &RenderOptions::plain()).unwrap();
    assert_eq!(
        plain,
        "<?xml version=\"1.0\"?>\n\
         <catalog lang=\"en\">\n\
         \x20   <!-- books -->\n\
         \x20   <book\n\
         \x20           id=\"bk101\"\n\
         \x20           isbn=\"978-0-00-000000-0\"\n\
         \x20           shelf=\"fiction\"><title>Dune</title></book>\n\
         \x20   <book id=\"bk102\">\n\
         \x20       <title>Emma</title>\n\
         \x20       <author>Austen</author>\n\
         \x20   </book>\n\
         </catalog>"
    );
}

#[test]
fn test_create_element() {
    let tree: DiffNode =
        Node::element("a", vec![Attribute::new("b", "\"1\"")], vec![]).annotated(Annotation::Create);
    assert_eq!(
        render(&tree, &RenderOptions::plain()).unwrap(),
        "[(+) <a b=\"1\"/>]"
    );
}

#[test]
fn test_modify_tag() {
    let tree: DiffNode = Node::element("newtag", vec![Attribute::new("x", "\"1\"")], vec![])
        .annotated(Annotation::Modify {
            old_value: "oldtag".to_string(),
        });
    assert_eq!(
        render(&tree, &RenderOptions::plain()).unwrap(),
        "[(MODIFY) oldtag => <newtag x=\"1\"/>]"
    );

    let html = render(&tree, &RenderOptions::html()).unwrap();
    assert_eq!(
        html,
        "<p style=\"text-indent:0px\"><span class=\"modify\"><span class=\"strike\">oldtag</span>\
         &lt;newtag x=\"1\"/&gt;</span></p>"
    );
}

#[test]
fn test_move_pair_yields_one_connector_and_two_anchors() {
    let output = render_lines(&move_pair_tree(), &RenderOptions::html()).unwrap();

    let anchors: Vec<Anchor> = output
        .lines
        .iter()
        .flat_map(|line| &line.segments)
        .filter_map(|segment| match segment {
            Segment::Anchor(anchor) => Some(*anchor),
            _ => None,
        })
        .collect();
    assert_eq!(anchors, vec![Anchor::End(0), Anchor::Origin(0)]);
    assert_eq!(output.connectors.len(), 1);
    assert_eq!(output.connectors[0].move_id, 0);
}

#[test]
fn test_move_pair_connection_element() {
    let html = render(&move_pair_tree(), &RenderOptions::html()).unwrap();
    assert_eq!(html.matches("<connection ").count(), 1);
    assert!(html.contains(
        "<connection from=\"#move_from_0\" to=\"#move_to_0\" fromX=\"0\" toX=\"0\" \
         fromY=\"0.5\" toY=\"0.5\" tail></connection>"
    ));
    assert!(html.contains("<span id=\"move_from_0\"></span>"));
    assert!(html.contains("<span id=\"move_to_0\"></span>"));
}

#[test]
fn test_styles_balance_on_every_line() {
    let tree: DiffNode = Node::element(
        "r",
        vec![],
        vec![
            Node::element(
                "kept",
                vec![],
                vec![
                    Node::chardata("new text").annotated(Annotation::Modify {
                        old_value: "old text".to_string(),
                    }),
                    Node::comment("gone").annotated(Annotation::Delete),
                ],
            )
            .annotated(Annotation::MoveTo { move_id: 3 }),
            Node::element("kept", vec![], vec![]).annotated(Annotation::MoveFrom { move_id: 3 }),
            Node::element(
                "fresh",
                vec![],
                vec![Node::chardata("a"), Node::chardata("b")],
            )
            .annotated(Annotation::Create),
        ],
    );

    let output = render_lines(&tree, &RenderOptions::plain()).unwrap();
    for (i, line) in output.lines.iter().enumerate() {
        let mut stack: Vec<StyleKind> = Vec::new();
        for segment in &line.segments {
            match segment {
                Segment::Open(kind) => stack.push(*kind),
                Segment::Close(kind) => {
                    assert_eq!(stack.pop(), Some(*kind), "mismatched close on line {i}")
                }
                _ => {}
            }
        }
        assert!(stack.is_empty(), "line {i} left styles open");
    }

    let html = render(&tree, &RenderOptions::html()).unwrap();
    for line in html.lines() {
        assert_eq!(
            line.matches("<span").count(),
            line.matches("</span>").count(),
            "unbalanced spans in {line}"
        );
    }
}

#[test]
fn test_attribute_threshold() {
    // `x="` + 35 characters + `"` is 39 characters long.
    let short = format!("\"{}\"", "a".repeat(35));
    let tree: DiffNode = Node::element("e", vec![Attribute::new("x", short.as_str())], vec![]);
    assert_eq!(
        render(&tree, &RenderOptions::plain()).unwrap(),
        format!("<e x={short}/>")
    );

    let long = format!("\"{}\"", "a".repeat(36));
    let tree: DiffNode = Node::element("e", vec![Attribute::new("x", long.as_str())], vec![]);
    assert_eq!(
        render(&tree, &RenderOptions::plain()).unwrap(),
        format!("<e\n        x={long}/>")
    );
}

#[test]
fn test_attribute_threshold_is_configurable() {
    let tree: DiffNode = Node::element(
        "e",
        vec![Attribute::new("a", "\"1\""), Attribute::new("b", "\"2\"")],
        vec![],
    );
    let options = RenderOptions::plain()
        .with_attribute_wrap_threshold(5)
        .with_indent("\t");
    assert_eq!(
        render(&tree, &options).unwrap(),
        "<e\n\t\ta=\"1\"\n\t\tb=\"2\"/>"
    );
}

#[test]
fn test_page_wraps_html_body() {
    let page = render_page(&move_pair_tree(), &RenderOptions::plain()).unwrap();
    assert!(page.starts_with("<html>\n<head>\n"));
    assert!(page.contains("<link rel=\"stylesheet\" href=\"proof_html_stylesheet.css\">"));
    assert!(page.contains("<script type=\"text/javascript\" src=\"domarrow.js\"></script>"));
    assert!(page.contains("<p style=\"text-indent:50px\"><span id=\"move_to_0\"></span>"));
    assert!(page.ends_with("</body>\n</html>\n"));
}

#[test]
fn test_render_json() {
    let json = r#"{"label": "ELEMENT", "value": "a", "referenceType": "DELETE", "children": [
        {"label": "CHARDATA", "value": "x", "referenceType": "DELETE"}
    ]}"#;
    assert_eq!(
        render_json(json, &RenderOptions::plain()).unwrap(),
        "[(-) <a>x</a>]"
    );
}

#[test]
fn test_render_json_rejects_invalid_json() {
    let err = render_json("{not json", &RenderOptions::plain()).unwrap_err();
    assert!(matches!(err, RenderError::Decode { .. }), "got {err:?}");
}

#[test]
fn test_render_json_rejects_unknown_label() {
    let err = render_json(r#"{"label": "ENTITY", "value": "x"}"#, &RenderOptions::plain())
        .unwrap_err();
    assert!(matches!(err, RenderError::MalformedTree { .. }), "got {err:?}");
}

#[test]
fn test_render_json_rejects_move_without_id() {
    let json = r#"{"label": "ELEMENT", "value": "a", "referenceType": "MOVE_TO"}"#;
    let err = render_json(json, &RenderOptions::plain()).unwrap_err();
    assert!(matches!(err, RenderError::MalformedTree { .. }), "got {err:?}");
}

#[test]
fn test_unpaired_move_fails() {
    let tree: DiffNode = Node::element(
        "r",
        vec![],
        vec![Node::element("b", vec![], vec![]).annotated(Annotation::MoveTo { move_id: 5 })],
    );
    for options in [RenderOptions::plain(), RenderOptions::html()] {
        let err = render(&tree, &options).unwrap_err();
        assert_eq!(err, RenderError::UnresolvedMoveAnchor { move_id: 5 });
        assert_eq!(err.to_string(), "move 5 has only one of its two anchors");
    }
}
