//! Heading normalization (id removal, display class from a level label).
//!
//! `# [3] Title` parses as a heading whose first child is the
//! `linkReference` `3`; the label picks the display class and the
//! reference itself is dropped.

use serde_json::Value;

use super::Transform;
use crate::core::HeadingLevels;
use crate::mdast::{Node, NodeKind, visit_kind_mut};

/// Normalizes every heading in the tree.
pub struct HeadingTransform<'a> {
    levels: &'a HeadingLevels,
}

impl<'a> HeadingTransform<'a> {
    pub fn new(levels: &'a HeadingLevels) -> Self {
        Self { levels }
    }
}

impl Transform for HeadingTransform<'_> {
    const NAME: &'static str = "heading";

    /// Returns the number of headings that received a class.
    fn apply(&self, tree: &mut Node) -> usize {
        let mut classed = 0;
        visit_kind_mut(tree, &NodeKind::Heading, &mut |node| {
            if normalize_heading(node, self.levels) {
                classed += 1;
            }
        });
        classed
    }
}

/// Clear heading ids and extract the level label, if any.
///
/// Returns true when a leading `linkReference` was consumed.
pub fn normalize_heading(node: &mut Node, levels: &HeadingLevels) -> bool {
    let data = node.data_mut();
    data.id = None;
    data.h_properties
        .get_or_insert_with(Default::default)
        .shift_remove("id");

    let Some(children) = node.children.as_mut() else {
        return false;
    };
    if children.len() < 2 || !children[0].is(&NodeKind::LinkReference) {
        return false;
    }

    let label = children.remove(0).label;
    // Unknown labels store an explicit null: present, but no class applied
    let class = label
        .as_deref()
        .and_then(|label| levels.class_for(label))
        .map_or(Value::Null, Value::from);

    node.h_properties_mut().insert("class".into(), class);
    true
}
