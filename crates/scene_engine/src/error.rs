//! Engine error types
//!
//! Every variant is a programmer or configuration error: the program asked
//! for something that cannot exist. None of them is retried.

use thiserror::Error;

use crate::config::ConfigError;
use crate::entity::EntityId;

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Handle does not refer to a live entity
    #[error("Entity {0:?} is not part of the game")]
    EntityNotFound(EntityId),

    /// Name lookup found nothing
    #[error("No entity named '{0}'")]
    UnknownEntityName(String),

    /// Name lookup found more than one entity
    #[error("Entity name '{name}' is not unique ({count} matches)")]
    DuplicateEntityName {
        /// Requested name
        name: String,
        /// Number of entities carrying it
        count: usize,
    },

    /// Scene was never added to the game
    #[error("Scene '{0}' has not been added to the game")]
    SceneNotRegistered(String),

    /// Operation requires a scene entity
    #[error("Entity '{0}' is not a scene")]
    NotAScene(String),

    /// Tree edit would break the single-parent or acyclic invariant
    #[error("Invalid tree operation: {0}")]
    InvalidHierarchy(String),

    /// Action definition cannot be compiled
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Layout constraint cannot be resolved
    #[error("Invalid layout constraint on '{entity}': {reason}")]
    InvalidConstraint {
        /// Focal entity name
        entity: String,
        /// What is wrong with it
        reason: String,
    },

    /// Sibling constraints depend on each other in a loop
    #[error("Layout constraint cycle among: {}", .0.join(", "))]
    ConstraintCycle(Vec<String>),

    /// Configuration values are out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration could not be loaded or saved
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
