//! Declarative layout constraints
//!
//! An entity either sits at its local position or pins its edges to edges of
//! its parent or of other entities. Siblings that pin to each other are
//! placed in dependency order, so every target is already positioned for the
//! current tick when its dependents are resolved.

mod constraint;
pub(crate) mod ordering;
pub(crate) mod resolver;

pub use constraint::{Axis, Constraint, ConstraintTarget, ConstraintType, Layout};
