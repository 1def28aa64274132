//! Typographic entity encoding for paragraph text.
//!
//! A paragraph qualifies when any direct `text` child contains an entity
//! literal. Its children are then rebuilt: every child loses `position`,
//! `text` children containing entities are split into alternating `text`
//! and `html` nodes, and everything else is carried over unchanged.
//! Non-`text` children are never tokenized, even when they carry a `value`
//! (`inlineCode`, inline `html`).

use super::Transform;
use crate::core::EntityTable;
use crate::mdast::{Node, NodeKind, visit_kind_mut};

/// Encodes entities in every paragraph of the tree.
pub struct EntityTransform<'a> {
    table: &'a EntityTable,
}

impl<'a> EntityTransform<'a> {
    pub fn new(table: &'a EntityTable) -> Self {
        Self { table }
    }
}

impl Transform for EntityTransform<'_> {
    const NAME: &'static str = "entity";

    /// Returns the number of paragraphs rebuilt.
    fn apply(&self, tree: &mut Node) -> usize {
        let mut rebuilt = 0;
        visit_kind_mut(tree, &NodeKind::Paragraph, &mut |node| {
            if encode_paragraph(node, self.table) {
                rebuilt += 1;
            }
        });
        rebuilt
    }
}

/// Rebuild a paragraph's children if any text child holds an entity.
///
/// Returns false (and leaves the node untouched) otherwise.
pub fn encode_paragraph(node: &mut Node, table: &EntityTable) -> bool {
    let Some(children) = node.children.as_mut() else {
        return false;
    };

    let qualifies = children
        .iter()
        .any(|child| has_entity_text(child, table));
    if !qualifies {
        return false;
    }

    let mut rebuilt = Vec::with_capacity(children.len() * 2);
    for mut child in std::mem::take(children) {
        child.position = None;

        if !has_entity_text(&child, table) {
            rebuilt.push(child);
            continue;
        }

        let value = child.value.unwrap_or_default();
        for token in table.tokenize(&value) {
            if !token.text.is_empty() {
                rebuilt.push(Node::text(token.text));
            }
            if let Some(entity) = token.entity {
                rebuilt.push(Node::html(entity.encoded));
            }
        }
    }

    *children = rebuilt;
    true
}

/// A `text` node whose value contains at least one entity literal.
fn has_entity_text(node: &Node, table: &EntityTable) -> bool {
    node.is(&NodeKind::Text)
        && node
            .value
            .as_deref()
            .is_some_and(|value| !value.is_empty() && table.contains_entity(value))
}
