//! Tree transformation pipeline.
//!
//! A [`Transformer`] closes over the page context and the fixed tables
//! (heading levels, entities) and runs the enabled passes over any number
//! of trees:
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  tree ─▶ heading ─▶ link ─▶ entity ─▶ tree │
//! └──────────────────────────────────────────┘
//! ```
//!
//! The tables are read-only after construction, so one transformer can be
//! shared across threads as long as each call gets its own tree.

mod context;
pub mod transform;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::{ENTITIES, EntityTable, HeadingLevels};
use crate::debug;
use crate::mdast::Node;

pub use context::{
    PageContext, PageRegistry, ParseYamlFn, RelativeUrlFn, RenderMarkupFn, Store, StoreGetFn,
    StoreSetFn,
};
pub use transform::{EntityTransform, HeadingTransform, LinkTransform, Transform};

// =============================================================================
// Types
// =============================================================================

/// Which passes run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Passes {
    pub heading: bool,
    pub link: bool,
    pub entity: bool,
}

impl Default for Passes {
    fn default() -> Self {
        Self {
            heading: true,
            link: true,
            entity: true,
        }
    }
}

/// The file a tree came from. Opaque to the passes.
#[derive(Debug, Clone, Default)]
pub struct FileContext {
    pub path: Option<PathBuf>,
}

impl FileContext {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Path for log lines.
    pub fn display(&self) -> String {
        self.path
            .as_deref()
            .map(Path::display)
            .map_or_else(|| "<tree>".to_string(), |p| p.to_string())
    }
}

/// Per-pass change counts from one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformStats {
    /// Headings that received a class.
    pub headings: usize,
    /// Links marked external or relativized.
    pub links: usize,
    /// Paragraphs rebuilt with entities.
    pub paragraphs: usize,
}

impl TransformStats {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl std::ops::AddAssign for TransformStats {
    fn add_assign(&mut self, other: Self) {
        self.headings += other.headings;
        self.links += other.links;
        self.paragraphs += other.paragraphs;
    }
}

// =============================================================================
// Transformer
// =============================================================================

/// Runs the heading, link and entity passes over trees.
#[derive(Debug, Clone)]
pub struct Transformer {
    context: PageContext,
    levels: HeadingLevels,
    entities: &'static EntityTable,
    passes: Passes,
}

impl Transformer {
    pub fn new(context: PageContext) -> Self {
        Self {
            context,
            levels: HeadingLevels::default(),
            entities: &ENTITIES,
            passes: Passes::default(),
        }
    }

    /// Restrict which passes run.
    pub fn with_passes(mut self, passes: Passes) -> Self {
        self.passes = passes;
        self
    }

    pub fn context(&self) -> &PageContext {
        &self.context
    }

    pub fn passes(&self) -> Passes {
        self.passes
    }

    /// Transform `tree` in place, returning what changed.
    pub fn run(&self, tree: &mut Node, file: &FileContext) -> TransformStats {
        let mut stats = TransformStats::default();

        if self.passes.heading {
            stats.headings = self.apply(HeadingTransform::new(&self.levels), tree, file);
        }
        if self.passes.link {
            stats.links = self.apply(LinkTransform::new(&self.context), tree, file);
        }
        if self.passes.entity {
            stats.paragraphs = self.apply(EntityTransform::new(self.entities), tree, file);
        }

        stats
    }

    /// Transform `tree` in place.
    #[inline]
    pub fn transform(&self, tree: &mut Node, file: &FileContext) {
        self.run(tree, file);
    }

    /// Turn into a plain transform function.
    pub fn into_fn(self) -> impl Fn(&mut Node, &FileContext) + Send + Sync {
        move |tree: &mut Node, file: &FileContext| self.transform(tree, file)
    }

    fn apply<T: Transform>(&self, pass: T, tree: &mut Node, file: &FileContext) -> usize {
        let changed = pass.apply(tree);
        debug!(T::NAME; "{}: {} node(s) changed", file.display(), changed);
        changed
    }
}

/// Build a transform function closing over `context`.
pub fn transformer(context: PageContext) -> impl Fn(&mut Node, &FileContext) + Send + Sync {
    Transformer::new(context).into_fn()
}
