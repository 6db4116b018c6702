//! Entity tree
//!
//! Entities live in an arena owned by [`EntityTree`] and refer to each other
//! through [`EntityId`] handles. Every non-root entity has exactly one parent;
//! scenes are the roots. Absolute position, scale and alpha are derived from
//! the local values once per tick and never edited directly.

mod id;
mod node;
mod tree;
pub(crate) mod update;

pub use id::EntityId;
pub use node::{
    Entity, ImageSource, LabelData, NodeKind, SceneData, ShapeData, ShapeKind, SpriteData,
};
pub use tree::EntityTree;
