//! mdast node shape.
//!
//! A single struct carries every node kind: the fields the passes touch are
//! explicit, everything else (`depth`, `title`, `identifier`, ...) rides
//! along in [`Node::rest`] and is serialized back untouched.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attribute mapping consumed by the serializer (`class`, `rel`, `id`, ...).
pub type HProperties = Map<String, Value>;

// =============================================================================
// NodeKind
// =============================================================================

macro_rules! node_kinds {
    ($($variant:ident => $tag:literal),* $(,)?) => {
        /// The `type` tag of a node.
        ///
        /// Tags outside the known set are kept as [`NodeKind::Other`] so that
        /// trees produced by parser extensions survive a round trip.
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        #[derive(Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum NodeKind {
            $($variant,)*
            Other(String),
        }

        impl NodeKind {
            /// The mdast tag string.
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $tag,)*
                    Self::Other(tag) => tag,
                }
            }
        }

        impl From<String> for NodeKind {
            fn from(tag: String) -> Self {
                match tag.as_str() {
                    $($tag => Self::$variant,)*
                    _ => Self::Other(tag),
                }
            }
        }
    };
}

node_kinds! {
    Root => "root",
    Paragraph => "paragraph",
    Heading => "heading",
    ThematicBreak => "thematicBreak",
    Blockquote => "blockquote",
    List => "list",
    ListItem => "listItem",
    Table => "table",
    TableRow => "tableRow",
    TableCell => "tableCell",
    Html => "html",
    Code => "code",
    Definition => "definition",
    FootnoteDefinition => "footnoteDefinition",
    Text => "text",
    Emphasis => "emphasis",
    Strong => "strong",
    Delete => "delete",
    InlineCode => "inlineCode",
    Break => "break",
    Link => "link",
    Image => "image",
    LinkReference => "linkReference",
    ImageReference => "imageReference",
    FootnoteReference => "footnoteReference",
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl From<&str> for NodeKind {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Position
// =============================================================================

/// A place in the source file (1-indexed line and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub line: usize,
    pub column: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

/// Source span of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub start: Point,
    pub end: Point,
}

// =============================================================================
// Data
// =============================================================================

/// Rendering hints attached to a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Data {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    #[serde(
        rename = "hProperties",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub h_properties: Option<HProperties>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

// =============================================================================
// Node
// =============================================================================

/// One element of the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub kind: NodeKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Data>,

    /// Fields this crate does not interpret.
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl Node {
    /// Bare node of the given kind with no fields set.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: None,
            value: None,
            url: None,
            label: None,
            position: None,
            data: None,
            rest: Map::new(),
        }
    }

    /// Parent node (has a `children` list).
    pub fn parent(kind: NodeKind, children: Vec<Node>) -> Self {
        Self {
            children: Some(children),
            ..Self::new(kind)
        }
    }

    /// Literal node (has a `value`).
    pub fn literal(kind: NodeKind, value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::new(kind)
        }
    }

    pub fn root(children: Vec<Node>) -> Self {
        Self::parent(NodeKind::Root, children)
    }

    pub fn paragraph(children: Vec<Node>) -> Self {
        Self::parent(NodeKind::Paragraph, children)
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::literal(NodeKind::Text, value)
    }

    pub fn html(value: impl Into<String>) -> Self {
        Self::literal(NodeKind::Html, value)
    }

    pub fn heading(depth: u8, children: Vec<Node>) -> Self {
        let mut node = Self::parent(NodeKind::Heading, children);
        node.rest.insert("depth".into(), depth.into());
        node
    }

    pub fn link(url: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::parent(NodeKind::Link, children)
        }
    }

    pub fn link_reference(label: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::parent(NodeKind::LinkReference, children)
        }
    }

    /// Attach a source position.
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Set an uninterpreted field (`depth`, `title`, `lang`, ...).
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.rest.insert(key.to_string(), value.into());
        self
    }

    #[inline]
    pub fn is(&self, kind: &NodeKind) -> bool {
        &self.kind == kind
    }

    /// Children, or an empty slice for leaf nodes.
    #[inline]
    pub fn children(&self) -> &[Node] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Heading depth (`1`-`6`) if recorded.
    pub fn depth(&self) -> Option<u64> {
        self.rest.get("depth").and_then(Value::as_u64)
    }

    /// `data`, created empty on first use.
    pub fn data_mut(&mut self) -> &mut Data {
        self.data.get_or_insert_with(Data::default)
    }

    /// `data.hProperties`, creating both levels on first use.
    pub fn h_properties_mut(&mut self) -> &mut HProperties {
        self.data_mut().h_properties.get_or_insert_with(Map::new)
    }

    /// Read one `data.hProperties` entry.
    pub fn h_property(&self, key: &str) -> Option<&Value> {
        self.data
            .as_ref()
            .and_then(|data| data.h_properties.as_ref())
            .and_then(|props| props.get(key))
    }

    /// Concatenated `value` of every descendant literal.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(value) = &self.value {
            out.push_str(value);
        }
        for child in self.children() {
            child.collect_text(out);
        }
    }
}
