//! mdpass - post-processing passes for markdown syntax trees.
//!
//! Normalizes headings, classifies and relativizes links, and encodes
//! typographic characters as HTML entities in an mdast tree.

pub mod config;
pub mod core;
pub mod logger;
pub mod mdast;
pub mod pipeline;

pub use mdast::{Node, NodeKind};
pub use pipeline::{FileContext, PageContext, TransformStats, Transformer, transformer};
