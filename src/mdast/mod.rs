//! mdast document tree.
//!
//! # Modules
//!
//! - `node`: [`Node`] shape, [`NodeKind`] tags, [`Data`] rendering hints
//! - `visit`: kind-filtered pre-order traversal
//! - `convert`: markdown → mdast via `pulldown-cmark`

pub mod convert;
mod node;
mod visit;

use std::path::Path;

use thiserror::Error;

pub use convert::{MarkdownOptions, from_markdown};
pub use node::{Data, HProperties, Node, NodeKind, Point, Position};
pub use visit::{count_kind, visit_kind, visit_kind_mut};

// =============================================================================
// Errors
// =============================================================================

/// Errors reading or writing a serialized tree.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("invalid mdast JSON")]
    Json(#[from] serde_json::Error),

    #[error("top-level node must be `root`, found `{0}`")]
    NotRoot(String),

    #[error("unsupported input `{0}` (expected .json or .md)")]
    UnknownFormat(String),
}

// =============================================================================
// Input formats
// =============================================================================

/// How an input file is turned into a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Serialized mdast.
    Json,
    /// Markdown source, parsed with [`from_markdown`].
    Markdown,
}

impl InputFormat {
    /// Detect format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, TreeError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("md" | "markdown") => Ok(Self::Markdown),
            _ => Err(TreeError::UnknownFormat(path.display().to_string())),
        }
    }
}

/// Parse input text into a root node.
pub fn parse_tree(content: &str, format: InputFormat) -> Result<Node, TreeError> {
    match format {
        InputFormat::Json => from_json(content),
        InputFormat::Markdown => Ok(from_markdown(content, &MarkdownOptions::all())),
    }
}

/// Decode a serialized mdast tree.
pub fn from_json(content: &str) -> Result<Node, TreeError> {
    let tree: Node = serde_json::from_str(content)?;
    if !tree.is(&NodeKind::Root) {
        return Err(TreeError::NotRoot(tree.kind.to_string()));
    }
    Ok(tree)
}

/// Encode a tree as JSON.
pub fn to_json(tree: &Node, pretty: bool) -> Result<String, TreeError> {
    let json = if pretty {
        serde_json::to_string_pretty(tree)?
    } else {
        serde_json::to_string(tree)?
    };
    Ok(json)
}
