//! Link target processing.
//!
//! Links are resolved based on their syntax using [`LinkKind`]:
//!
//! | LinkKind   | Example        | Result                                   |
//! |------------|----------------|------------------------------------------|
//! | `External` | `https://...`  | URL kept, `rel="external"` added         |
//! | `Fragment` | `#section`     | Preserved as-is                          |
//! | `Site`     | `/docs/page`   | Relativized for the current page         |
//!
//! Relativization needs both a relativization function and a page id; when
//! either is missing, site links are left untouched.

use super::Transform;
use crate::core::LinkKind;
use crate::mdast::{Node, NodeKind, visit_kind_mut};
use crate::pipeline::PageContext;

/// What happened to one link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// No target.
    Skipped,
    /// Marked `rel="external"`.
    External,
    /// Target rewritten by the relativization function.
    Relativized,
    /// Fragment, or no collaborator available.
    Unchanged,
}

/// Classifies and rewrites every link in the tree.
pub struct LinkTransform<'a> {
    context: &'a PageContext,
}

impl<'a> LinkTransform<'a> {
    pub fn new(context: &'a PageContext) -> Self {
        Self { context }
    }
}

impl Transform for LinkTransform<'_> {
    const NAME: &'static str = "link";

    /// Returns the number of links marked external or relativized.
    fn apply(&self, tree: &mut Node) -> usize {
        let mut changed = 0;
        visit_kind_mut(tree, &NodeKind::Link, &mut |node| {
            if matches!(
                process_link(node, self.context),
                LinkOutcome::External | LinkOutcome::Relativized
            ) {
                changed += 1;
            }
        });
        changed
    }
}

/// Apply the first matching rule to a single link node.
pub fn process_link(node: &mut Node, context: &PageContext) -> LinkOutcome {
    let Some(url) = node.url.clone() else {
        return LinkOutcome::Skipped;
    };

    match LinkKind::parse(&url) {
        None => LinkOutcome::Skipped,
        Some(LinkKind::External(_)) => {
            node.h_properties_mut()
                .insert("rel".into(), "external".into());
            LinkOutcome::External
        }
        Some(LinkKind::Fragment(_)) => LinkOutcome::Unchanged,
        Some(LinkKind::Site(target)) => match context.relativize(target) {
            Some(relative) => {
                node.url = Some(relative);
                LinkOutcome::Relativized
            }
            None => LinkOutcome::Unchanged,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stub_context() -> PageContext {
        PageContext::new()
            .with_id("home")
            .with_relative_url(|u, id| format!("{u}?from={id}"))
    }

    #[test]
    fn test_external_marked() {
        let mut node = Node::link("https://example.com/x", vec![]);
        assert_eq!(
            process_link(&mut node, &stub_context()),
            LinkOutcome::External
        );
        assert_eq!(node.url.as_deref(), Some("https://example.com/x"));
        assert_eq!(node.h_property("rel"), Some(&json!("external")));
    }

    #[test]
    fn test_external_without_collaborators() {
        let mut node = Node::link("http://example.com", vec![]);
        assert_eq!(
            process_link(&mut node, &PageContext::default()),
            LinkOutcome::External
        );
        assert_eq!(node.h_property("rel"), Some(&json!("external")));
    }

    #[test]
    fn test_site_link_relativized() {
        let mut node = Node::link("/docs/page", vec![]);
        assert_eq!(
            process_link(&mut node, &stub_context()),
            LinkOutcome::Relativized
        );
        assert_eq!(node.url.as_deref(), Some("/docs/page?from=home"));
        assert!(node.data.is_none());
    }

    #[test]
    fn test_fragment_untouched() {
        let mut node = Node::link("#section", vec![]);
        assert_eq!(
            process_link(&mut node, &stub_context()),
            LinkOutcome::Unchanged
        );
        assert_eq!(node.url.as_deref(), Some("#section"));
        assert!(node.h_property("rel").is_none());
    }

    #[test]
    fn test_missing_id_leaves_url() {
        let ctx = PageContext::new().with_relative_url(|u, id| format!("{u}?from={id}"));
        let mut node = Node::link("/docs/page", vec![]);
        assert_eq!(process_link(&mut node, &ctx), LinkOutcome::Unchanged);
        assert_eq!(node.url.as_deref(), Some("/docs/page"));
    }

    #[test]
    fn test_missing_function_leaves_url() {
        let ctx = PageContext::new().with_id("home");
        let mut node = Node::link("docs/page", vec![]);
        assert_eq!(process_link(&mut node, &ctx), LinkOutcome::Unchanged);
        assert_eq!(node.url.as_deref(), Some("docs/page"));
    }

    #[test]
    fn test_empty_and_absent_url_skipped() {
        let mut empty = Node::link("", vec![]);
        assert_eq!(
            process_link(&mut empty, &stub_context()),
            LinkOutcome::Skipped
        );
        assert_eq!(empty.url.as_deref(), Some(""));

        let mut absent = Node::new(NodeKind::Link);
        assert_eq!(
            process_link(&mut absent, &stub_context()),
            LinkOutcome::Skipped
        );
        assert!(absent.data.is_none());
    }

    #[test]
    fn test_other_schemes_go_through_relativizer() {
        let mut node = Node::link("mailto:me@example.com", vec![]);
        process_link(&mut node, &stub_context());
        assert_eq!(
            node.url.as_deref(),
            Some("mailto:me@example.com?from=home")
        );
    }

    #[test]
    fn test_existing_props_survive() {
        let mut node: Node = serde_json::from_value(json!({
            "type": "link",
            "url": "https://a.b",
            "data": {"hProperties": {"target": "_blank"}}
        }))
        .unwrap();

        process_link(&mut node, &stub_context());
        assert_eq!(node.h_property("target"), Some(&json!("_blank")));
        assert_eq!(node.h_property("rel"), Some(&json!("external")));
    }

    #[test]
    fn test_apply_counts_changes() {
        let mut tree = Node::root(vec![Node::paragraph(vec![
            Node::link("https://a.b", vec![]),
            Node::link("#x", vec![]),
            Node::link("/y", vec![]),
        ])]);

        assert_eq!(LinkTransform::new(&stub_context()).apply(&mut tree), 2);
    }
}
