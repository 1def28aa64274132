//! Pre-order tree traversal filtered by node kind.

use super::{Node, NodeKind};

/// Call `f` on every node of `kind`, in document order.
///
/// `f` runs before the node's children are walked, so children it adds,
/// removes or replaces are what the traversal then descends into.
pub fn visit_kind_mut<F>(node: &mut Node, kind: &NodeKind, f: &mut F)
where
    F: FnMut(&mut Node),
{
    if node.is(kind) {
        f(node);
    }

    if let Some(children) = node.children.as_mut() {
        for child in children {
            visit_kind_mut(child, kind, f);
        }
    }
}

/// Read-only counterpart of [`visit_kind_mut`].
pub fn visit_kind<'a, F>(node: &'a Node, kind: &NodeKind, f: &mut F)
where
    F: FnMut(&'a Node),
{
    if node.is(kind) {
        f(node);
    }
    for child in node.children() {
        visit_kind(child, kind, f);
    }
}

/// Number of nodes of `kind` in the tree.
pub fn count_kind(node: &Node, kind: &NodeKind) -> usize {
    let mut count = 0;
    visit_kind(node, kind, &mut |_| count += 1);
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        Node::root(vec![
            Node::paragraph(vec![
                Node::text("a"),
                Node::link("/x", vec![Node::text("b")]),
            ]),
            Node::paragraph(vec![Node::text("c")]),
        ])
    }

    #[test]
    fn test_visit_document_order() {
        let tree = sample();
        let mut seen = Vec::new();
        visit_kind(&tree, &NodeKind::Text, &mut |n| {
            seen.push(n.value.clone().unwrap_or_default())
        });
        assert_eq!(seen, ["a", "b", "c"]);
    }

    #[test]
    fn test_visit_descends_into_replaced_children() {
        let mut tree = sample();
        visit_kind_mut(&mut tree, &NodeKind::Paragraph, &mut |p| {
            p.children = Some(vec![Node::text("new")]);
        });

        assert_eq!(count_kind(&tree, &NodeKind::Link), 0);
        assert_eq!(tree.text_content(), "newnew");
    }

    #[test]
    fn test_count_kind() {
        let tree = sample();
        assert_eq!(count_kind(&tree, &NodeKind::Paragraph), 2);
        assert_eq!(count_kind(&tree, &NodeKind::Heading), 0);
    }
}
