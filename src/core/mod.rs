//! Core types - pure abstractions shared across the codebase.

pub mod entity;
mod heading;
mod link;
pub mod url;

pub use entity::{ENTITIES, Entity, EntityTable, Token};
pub use heading::HeadingLevels;
pub use link::LinkKind;
pub use url::{page_id_for, relative_url};
