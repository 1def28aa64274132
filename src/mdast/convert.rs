//! Markdown to mdast conversion using pulldown-cmark.

use std::ops::Range;

use pulldown_cmark::{
    Alignment, BrokenLink, CodeBlockKind, CowStr, Event, HeadingLevel, LinkType, Options, Parser,
    Tag, TagEnd,
};
use serde_json::Value;

use super::{Node, NodeKind, Point, Position};

/// Options for markdown conversion
#[derive(Debug, Clone, Default)]
pub struct MarkdownOptions {
    /// Enable tables extension
    pub tables: bool,
    /// Enable footnotes extension
    pub footnotes: bool,
    /// Enable strikethrough extension
    pub strikethrough: bool,
    /// Enable task lists extension
    pub task_lists: bool,
    /// Enable heading attributes extension (e.g., `# Heading {#custom-id}`)
    pub heading_attributes: bool,
}

impl MarkdownOptions {
    /// Create options with all extensions enabled
    pub fn all() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            task_lists: true,
            heading_attributes: true,
        }
    }

    /// Convert to pulldown-cmark Options
    fn to_pulldown_options(&self) -> Options {
        let mut opts = Options::empty();
        if self.tables {
            opts.insert(Options::ENABLE_TABLES);
        }
        if self.footnotes {
            opts.insert(Options::ENABLE_FOOTNOTES);
        }
        if self.strikethrough {
            opts.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.task_lists {
            opts.insert(Options::ENABLE_TASKLISTS);
        }
        if self.heading_attributes {
            opts.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        }
        opts
    }
}

// =============================================================================
// Line index
// =============================================================================

/// Byte offset → (line, column) lookup.
struct LineIndex<'a> {
    source: &'a str,
    /// Byte offset where each line starts.
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(source: &'a str) -> Self {
        let mut starts = vec![0];
        starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self { source, starts }
    }

    fn point(&self, offset: usize) -> Point {
        let line = self.starts.partition_point(|&start| start <= offset);
        let line_start = self.starts[line - 1];
        let column = self
            .source
            .get(line_start..offset)
            .map_or(offset - line_start, |s| s.chars().count());

        Point {
            line,
            column: column + 1,
            offset: Some(offset),
        }
    }

    fn position(&self, range: &Range<usize>) -> Position {
        Position {
            start: self.point(range.start),
            end: self.point(range.end),
        }
    }
}

// =============================================================================
// Converter
// =============================================================================

/// Markdown to mdast converter
struct MarkdownConverter<'a> {
    index: LineIndex<'a>,
    /// Stack of open parent nodes
    stack: Vec<Node>,
    /// Root children (collected when stack is empty)
    root_children: Vec<Node>,
    /// Stack depth of the paragraph opened around tight list item content
    implicit_paragraph: Option<usize>,
}

impl<'a> MarkdownConverter<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            index: LineIndex::new(source),
            stack: Vec::new(),
            root_children: Vec::new(),
            implicit_paragraph: None,
        }
    }

    fn convert(mut self, markdown: &str, options: &MarkdownOptions) -> Node {
        let parser = Parser::new_with_broken_link_callback(
            markdown,
            options.to_pulldown_options(),
            Some(keep_unresolved_reference),
        );

        for (event, range) in parser.into_offset_iter() {
            self.handle_event(event, range);
        }

        let position = self.index.position(&(0..markdown.len()));
        Node::root(self.root_children).with_position(position)
    }

    /// Handle a single pulldown-cmark event
    fn handle_event(&mut self, event: Event, range: Range<usize>) {
        if is_inline(&event) {
            self.open_implicit_paragraph(&range);
        } else if matches!(
            event,
            Event::Start(_) | Event::End(TagEnd::Item) | Event::Rule | Event::Html(_)
        ) {
            self.close_implicit_paragraph();
        }

        match event {
            Event::Start(tag) => self.start_tag(tag, &range),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.add_text(text.as_ref(), &range),
            Event::Code(code) => {
                self.add_leaf(Node::literal(NodeKind::InlineCode, code.as_ref()), &range)
            }
            Event::Html(html) | Event::InlineHtml(html) => self.add_html(html.as_ref(), &range),
            Event::SoftBreak => self.add_text("\n", &range),
            Event::HardBreak => self.add_leaf(Node::new(NodeKind::Break), &range),
            Event::Rule => self.add_leaf(Node::new(NodeKind::ThematicBreak), &range),
            Event::FootnoteReference(name) => {
                let node = Node {
                    label: Some(name.to_string()),
                    ..Node::new(NodeKind::FootnoteReference)
                }
                .with_field("identifier", name.to_lowercase());
                self.add_leaf(node, &range);
            }
            Event::TaskListMarker(checked) => self.mark_task(checked),
            Event::InlineMath(math) => {
                let node = Node::literal(NodeKind::Other("inlineMath".into()), math.as_ref());
                self.add_leaf(node, &range);
            }
            Event::DisplayMath(math) => {
                let node = Node::literal(NodeKind::Other("math".into()), math.as_ref());
                self.add_leaf(node, &range);
            }
        }
    }

    /// Tight list items carry bare inline content: wrap it in a paragraph
    fn open_implicit_paragraph(&mut self, range: &Range<usize>) {
        if self.implicit_paragraph.is_some()
            || !self.stack.last().is_some_and(|n| n.is(&NodeKind::ListItem))
        {
            return;
        }
        self.implicit_paragraph = Some(self.stack.len());
        let node = Node::paragraph(vec![]).with_position(self.index.position(range));
        self.stack.push(node);
    }

    fn close_implicit_paragraph(&mut self) {
        let Some(depth) = self.implicit_paragraph.take() else {
            return;
        };
        if self.stack.len() != depth + 1 {
            return;
        }
        let Some(mut paragraph) = self.stack.pop() else {
            return;
        };

        let end = paragraph
            .children()
            .last()
            .and_then(|c| c.position.as_ref())
            .map(|p| p.end);
        if let (Some(end), Some(position)) = (end, paragraph.position.as_mut()) {
            position.end = end;
        }
        self.add_node(paragraph);
    }

    /// Open a parent (or literal block) node
    fn start_tag(&mut self, tag: Tag, range: &Range<usize>) {
        let node = tag_to_node(tag).with_position(self.index.position(range));
        self.stack.push(node);
    }

    /// Close the innermost open node
    fn end_tag(&mut self, tag: TagEnd) {
        let Some(mut node) = self.stack.pop() else {
            return;
        };

        if matches!(tag, TagEnd::Image) {
            // mdast images carry their description as `alt`, not children
            let alt = node.text_content();
            node.children = None;
            node.rest.insert("alt".into(), alt.into());
        }

        self.add_node(node);
    }

    /// Add text, appending to an open literal or merging with a preceding text node
    fn add_text(&mut self, text: &str, range: &Range<usize>) {
        if text.is_empty() {
            return;
        }

        if let Some(value) = self.open_literal() {
            value.push_str(text);
            return;
        }

        let end = self.index.point(range.end);
        if let Some(last) = self.current_children().last_mut()
            && last.is(&NodeKind::Text)
            && let Some(value) = last.value.as_mut()
        {
            value.push_str(text);
            if let Some(position) = last.position.as_mut() {
                position.end = end;
            }
            return;
        }

        let node = Node::text(text).with_position(self.index.position(range));
        self.add_node(node);
    }

    /// Add raw HTML, either into an open HTML block or as an inline node
    fn add_html(&mut self, html: &str, range: &Range<usize>) {
        match self.open_literal() {
            Some(value) => value.push_str(html),
            None => self.add_leaf(Node::html(html), range),
        }
    }

    /// Record a task list checkbox on the enclosing list item
    fn mark_task(&mut self, checked: bool) {
        if let Some(item) = self
            .stack
            .iter_mut()
            .rev()
            .find(|node| node.is(&NodeKind::ListItem))
        {
            item.rest.insert("checked".into(), checked.into());
        }
    }

    fn add_leaf(&mut self, node: Node, range: &Range<usize>) {
        let node = node.with_position(self.index.position(range));
        self.add_node(node);
    }

    /// Value of the innermost open node if it is a literal (code, html, yaml)
    fn open_literal(&mut self) -> Option<&mut String> {
        self.stack.last_mut().and_then(|node| node.value.as_mut())
    }

    fn current_children(&mut self) -> &mut Vec<Node> {
        match self.stack.last_mut() {
            Some(node) => node.children.get_or_insert_with(Vec::new),
            None => &mut self.root_children,
        }
    }

    /// Add a node to current context (top of stack or root)
    fn add_node(&mut self, node: Node) {
        self.current_children().push(node);
    }
}

/// Turn unresolved `[label]` references into reference links whose
/// destination is the label itself.
fn keep_unresolved_reference<'a>(link: BrokenLink<'a>) -> Option<(CowStr<'a>, CowStr<'a>)> {
    Some((link.reference, CowStr::Borrowed("")))
}

/// Convert a pulldown-cmark Tag to an open mdast node
fn tag_to_node(tag: Tag) -> Node {
    match tag {
        // Block elements
        Tag::Paragraph => Node::paragraph(vec![]),
        Tag::Heading {
            level, id, classes, ..
        } => {
            let mut node = Node::heading(heading_depth(level), vec![]);
            if let Some(id) = id {
                node.h_properties_mut().insert("id".into(), id.to_string().into());
            }
            if !classes.is_empty() {
                let class = classes.iter().map(|c| c.as_ref()).collect::<Vec<_>>().join(" ");
                node.h_properties_mut().insert("class".into(), class.into());
            }
            node
        }
        Tag::BlockQuote(_) => Node::parent(NodeKind::Blockquote, vec![]),
        Tag::CodeBlock(kind) => {
            let node = Node::literal(NodeKind::Code, "");
            match kind {
                CodeBlockKind::Fenced(info) if !info.is_empty() => {
                    let (lang, meta) = info.split_once(' ').unwrap_or((info.as_ref(), ""));
                    let node = node.with_field("lang", lang);
                    if meta.trim().is_empty() {
                        node
                    } else {
                        node.with_field("meta", meta.trim())
                    }
                }
                _ => node,
            }
        }
        Tag::HtmlBlock => Node::literal(NodeKind::Html, ""),
        Tag::List(start) => {
            let node = Node::parent(NodeKind::List, vec![])
                .with_field("ordered", start.is_some())
                .with_field("spread", false);
            match start {
                Some(n) => node.with_field("start", n),
                None => node,
            }
        }
        Tag::Item => Node::parent(NodeKind::ListItem, vec![]).with_field("spread", false),
        Tag::FootnoteDefinition(name) => Node {
            label: Some(name.to_string()),
            ..Node::parent(NodeKind::FootnoteDefinition, vec![])
        }
        .with_field("identifier", name.to_lowercase()),

        // Table elements
        Tag::Table(alignments) => {
            let align: Vec<Value> = alignments
                .iter()
                .map(|a| match a {
                    Alignment::None => Value::Null,
                    Alignment::Left => "left".into(),
                    Alignment::Center => "center".into(),
                    Alignment::Right => "right".into(),
                })
                .collect();
            Node::parent(NodeKind::Table, vec![]).with_field("align", align)
        }
        // mdast has no head wrapper: the head is the first row
        Tag::TableHead | Tag::TableRow => Node::parent(NodeKind::TableRow, vec![]),
        Tag::TableCell => Node::parent(NodeKind::TableCell, vec![]),

        // Inline elements
        Tag::Emphasis => Node::parent(NodeKind::Emphasis, vec![]),
        Tag::Strong => Node::parent(NodeKind::Strong, vec![]),
        Tag::Strikethrough => Node::parent(NodeKind::Delete, vec![]),
        Tag::Link {
            link_type,
            dest_url,
            title,
            ..
        } => match reference_type(link_type) {
            Some(reference_type) => {
                Node::link_reference(dest_url.to_string(), vec![])
                    .with_field("identifier", dest_url.to_lowercase())
                    .with_field("referenceType", reference_type)
            }
            None => {
                let node = Node::link(dest_url.to_string(), vec![]);
                if title.is_empty() {
                    node
                } else {
                    node.with_field("title", title.to_string())
                }
            }
        },
        Tag::Image {
            dest_url, title, ..
        } => {
            let node = Node {
                url: Some(dest_url.to_string()),
                ..Node::parent(NodeKind::Image, vec![])
            };
            if title.is_empty() {
                node
            } else {
                node.with_field("title", title.to_string())
            }
        }

        // Frontmatter
        Tag::MetadataBlock(_) => Node::literal(NodeKind::Other("yaml".into()), ""),

        // Definition list (extended syntax)
        Tag::DefinitionList => Node::parent(NodeKind::Other("descriptionList".into()), vec![]),
        Tag::DefinitionListTitle => {
            Node::parent(NodeKind::Other("descriptionTerm".into()), vec![])
        }
        Tag::DefinitionListDefinition => {
            Node::parent(NodeKind::Other("descriptionDetails".into()), vec![])
        }

        // Extended inline elements
        Tag::Superscript => Node::parent(NodeKind::Other("superscript".into()), vec![]),
        Tag::Subscript => Node::parent(NodeKind::Other("subscript".into()), vec![]),
    }
}

/// Events that only occur as phrasing content
fn is_inline(event: &Event) -> bool {
    matches!(
        event,
        Event::Text(_)
            | Event::Code(_)
            | Event::InlineHtml(_)
            | Event::SoftBreak
            | Event::HardBreak
            | Event::FootnoteReference(_)
            | Event::InlineMath(_)
            | Event::DisplayMath(_)
            | Event::Start(
                Tag::Emphasis
                    | Tag::Strong
                    | Tag::Strikethrough
                    | Tag::Link { .. }
                    | Tag::Image { .. }
                    | Tag::Superscript
                    | Tag::Subscript
            )
    )
}

/// mdast `referenceType` for links whose label had no definition
fn reference_type(link_type: LinkType) -> Option<&'static str> {
    match link_type {
        LinkType::ShortcutUnknown => Some("shortcut"),
        LinkType::CollapsedUnknown => Some("collapsed"),
        LinkType::ReferenceUnknown => Some("full"),
        _ => None,
    }
}

/// Convert heading level to mdast depth
fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Convert a markdown string to an mdast root node
pub fn from_markdown(markdown: &str, options: &MarkdownOptions) -> Node {
    MarkdownConverter::new(markdown).convert(markdown, options)
}

/// Convert markdown with default options
pub fn from_markdown_default(markdown: &str) -> Node {
    from_markdown(markdown, &MarkdownOptions::default())
}
