//! End-to-end tests for the transformer.

use serde_json::{Value, json};

use super::*;
use crate::mdast::{MarkdownOptions, NodeKind, count_kind, from_markdown, visit_kind};

fn stub_context() -> PageContext {
    PageContext::new()
        .with_id("home")
        .with_relative_url(|u, id| format!("{u}?from={id}"))
}

fn tree(value: Value) -> Node {
    serde_json::from_value(value).unwrap()
}

fn run(context: PageContext, tree: &mut Node) -> TransformStats {
    Transformer::new(context).run(tree, &FileContext::default())
}

// =============================================================================
// Headings
// =============================================================================

#[test]
fn test_heading_ids_cleared_everywhere() {
    let mut t = tree(json!({
        "type": "root",
        "children": [
            {"type": "heading", "depth": 1, "data": {"id": "a"},
             "children": [{"type": "text", "value": "A"}]},
            {"type": "blockquote", "children": [
                {"type": "heading", "depth": 2, "data": {"hProperties": {"id": "b"}},
                 "children": [{"type": "text", "value": "B"}]}
            ]}
        ]
    }));

    run(PageContext::default(), &mut t);

    visit_kind(&t, &NodeKind::Heading, &mut |h| {
        let data = h.data.as_ref().unwrap();
        assert!(data.id.is_none());
        assert!(h.h_property("id").is_none());
    });
}

#[test]
fn test_heading_class_extraction() {
    let mut t = tree(json!({
        "type": "root",
        "children": [{
            "type": "heading", "depth": 2,
            "children": [
                {"type": "linkReference", "label": "3", "identifier": "3",
                 "referenceType": "shortcut", "children": [{"type": "text", "value": "3"}]},
                {"type": "text", "value": " Title"}
            ]
        }]
    }));

    let stats = run(PageContext::default(), &mut t);

    let h = &t.children()[0];
    assert_eq!(stats.headings, 1);
    assert_eq!(h.h_property("class"), Some(&json!("display-3")));
    assert_eq!(h.children().len(), 1);
    assert_eq!(h.children()[0].value.as_deref(), Some(" Title"));
}

#[test]
fn test_heading_single_child_unchanged_structurally() {
    let mut t = Node::root(vec![Node::heading(
        1,
        vec![Node::link_reference("3", vec![])],
    )]);

    run(PageContext::default(), &mut t);

    let h = &t.children()[0];
    assert_eq!(h.children().len(), 1);
    assert!(h.children()[0].is(&NodeKind::LinkReference));
    assert!(h.h_property("class").is_none());
}

// =============================================================================
// Links
// =============================================================================

#[test]
fn test_link_rules() {
    let mut t = Node::root(vec![Node::paragraph(vec![
        Node::link("https://example.com/x", vec![]),
        Node::link("/docs/page", vec![]),
        Node::link("#section", vec![]),
    ])]);

    let stats = run(stub_context(), &mut t);
    let links = t.children()[0].children();

    assert_eq!(stats.links, 2);

    assert_eq!(links[0].url.as_deref(), Some("https://example.com/x"));
    assert_eq!(links[0].h_property("rel"), Some(&json!("external")));

    assert_eq!(links[1].url.as_deref(), Some("/docs/page?from=home"));
    assert!(links[1].h_property("rel").is_none());

    assert_eq!(links[2].url.as_deref(), Some("#section"));
    assert!(links[2].h_property("rel").is_none());
}

#[test]
fn test_links_inside_headings_processed() {
    let mut t = Node::root(vec![Node::heading(
        2,
        vec![
            Node::link_reference("2", vec![]),
            Node::link("https://x.y", vec![Node::text("out")]),
        ],
    )]);

    run(stub_context(), &mut t);

    let h = &t.children()[0];
    assert_eq!(h.h_property("class"), Some(&json!("display-2")));
    assert_eq!(h.children()[0].h_property("rel"), Some(&json!("external")));
}

// =============================================================================
// Entities
// =============================================================================

#[test]
fn test_entity_split() {
    let mut t = Node::root(vec![Node::paragraph(vec![Node::text("a — b \"c\"")])]);

    run(PageContext::default(), &mut t);

    let got: Vec<(String, String)> = t.children()[0]
        .children()
        .iter()
        .map(|c| (c.kind.to_string(), c.value.clone().unwrap_or_default()))
        .collect();
    let want = [
        ("text", "a "),
        ("html", "&mdash;"),
        ("text", " b "),
        ("html", "&quot;"),
        ("text", "c"),
        ("html", "&quot;"),
    ]
    .map(|(k, v)| (k.to_string(), v.to_string()));

    assert_eq!(got, want);
}

#[test]
fn test_entity_passthrough_byte_identical() {
    let mut t = Node::root(vec![Node::paragraph(vec![Node::text("no entities here")])]);
    let before = serde_json::to_string(&t).unwrap();

    let stats = run(PageContext::default(), &mut t);

    assert_eq!(stats.paragraphs, 0);
    assert_eq!(serde_json::to_string(&t).unwrap(), before);
}

#[test]
fn test_entity_pass_idempotent() {
    let mut t = Node::root(vec![Node::paragraph(vec![
        Node::text("It's — really... \"done\""),
        Node::literal(NodeKind::InlineCode, "x'y"),
    ])]);

    let transformer = Transformer::new(PageContext::default());
    transformer.transform(&mut t, &FileContext::default());
    let once = t.clone();
    transformer.transform(&mut t, &FileContext::default());

    assert_eq!(t, once);
}

#[test]
fn test_mixed_kind_paragraph_only_text_tokenized() {
    let mut t = Node::root(vec![Node::paragraph(vec![
        Node::text("use "),
        Node::literal(NodeKind::InlineCode, "\"raw\""),
        Node::text(" — done"),
        Node::parent(NodeKind::Emphasis, vec![Node::text("it's")]),
    ])]);

    run(PageContext::default(), &mut t);
    let children = t.children()[0].children();

    assert_eq!(children[1].kind, NodeKind::InlineCode);
    assert_eq!(children[1].value.as_deref(), Some("\"raw\""));
    // Emphasis is not a paragraph: its text is left alone
    let em = children.last().unwrap();
    assert!(em.is(&NodeKind::Emphasis));
    assert_eq!(em.children()[0].value.as_deref(), Some("it's"));
}

// =============================================================================
// Composition
// =============================================================================

#[test]
fn test_passes_can_be_disabled() {
    let mut t = Node::root(vec![
        Node::heading(1, vec![Node::link_reference("1", vec![]), Node::text("T")]),
        Node::paragraph(vec![
            Node::link("https://a.b", vec![]),
            Node::text("x — y"),
        ]),
    ]);
    let before = t.clone();

    let none = Passes {
        heading: false,
        link: false,
        entity: false,
    };
    let stats = Transformer::new(stub_context())
        .with_passes(none)
        .run(&mut t, &FileContext::default());

    assert!(stats.is_empty());
    assert_eq!(t, before);
}

#[test]
fn test_transform_fn_from_factory() {
    let f = transformer(stub_context());
    let mut t = Node::root(vec![Node::paragraph(vec![Node::link("/a", vec![])])]);

    f(&mut t, &FileContext::new("a.md"));

    assert_eq!(
        t.children()[0].children()[0].url.as_deref(),
        Some("/a?from=home")
    );
}

#[test]
fn test_shared_across_threads() {
    let transformer = Transformer::new(stub_context());

    std::thread::scope(|s| {
        for i in 0..4 {
            let transformer = &transformer;
            s.spawn(move || {
                let mut t = Node::root(vec![Node::paragraph(vec![
                    Node::link(format!("/p{i}"), vec![]),
                    Node::text("a — b"),
                ])]);
                let stats = transformer.run(&mut t, &FileContext::default());
                assert_eq!(stats.links, 1);
                assert_eq!(stats.paragraphs, 1);
            });
        }
    });
}

#[test]
fn test_markdown_end_to_end() {
    let source = "# [2] Welcome {#welcome}\n\nSee [docs](/docs/intro), [home](https://example.com) and [top](#top) — it's \"easy\"...\n";
    let mut t = from_markdown(source, &MarkdownOptions::all());

    let stats = run(stub_context(), &mut t);

    assert_eq!(
        stats,
        TransformStats {
            headings: 1,
            links: 2,
            paragraphs: 1,
        }
    );

    let h = &t.children()[0];
    assert_eq!(h.h_property("class"), Some(&json!("display-2")));
    assert!(h.h_property("id").is_none());
    assert_eq!(h.text_content().trim(), "Welcome");

    let p = &t.children()[1];
    assert_eq!(count_kind(p, &NodeKind::Html), 5);
    assert!(p.children().iter().all(|c| c.position.is_none()));
    assert_eq!(
        p.children()
            .iter()
            .filter_map(|c| c.url.as_deref())
            .collect::<Vec<_>>(),
        ["/docs/intro?from=home", "https://example.com", "#top"]
    );
}

#[test]
fn test_tight_list_item_entities_encoded() {
    let mut t = from_markdown("- it's — fine\n", &MarkdownOptions::all());

    let stats = run(PageContext::default(), &mut t);
    assert_eq!(stats.paragraphs, 1);

    let item = &t.children()[0].children()[0];
    let p = &item.children()[0];
    assert!(p.is(&NodeKind::Paragraph));

    let got: Vec<(&str, &str)> = p
        .children()
        .iter()
        .map(|c| (c.kind.as_str(), c.value.as_deref().unwrap_or_default()))
        .collect();
    assert_eq!(
        got,
        [
            ("text", "it"),
            ("html", "&apos;"),
            ("text", "s "),
            ("html", "&mdash;"),
            ("text", " fine"),
        ]
    );
}
