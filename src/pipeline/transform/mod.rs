//! Tree passes.
//!
//! Each pass mutates the tree in place and is independent of the others.
//!
//! # Modules
//!
//! - `heading`: Clears heading ids, extracts a display class from a leading label reference
//! - `link`: Marks external links, relativizes site links
//! - `entity`: Encodes typographic entities in paragraph text

mod entity;
mod heading;
mod link;

pub use entity::{EntityTransform, encode_paragraph};
pub use heading::{HeadingTransform, normalize_heading};
pub use link::{LinkOutcome, LinkTransform, process_link};

use crate::mdast::Node;

/// A single in-place pass over a tree.
pub trait Transform {
    /// Short name used in log lines.
    const NAME: &'static str;

    /// Run the pass, returning how many nodes it changed.
    fn apply(&self, tree: &mut Node) -> usize;
}
