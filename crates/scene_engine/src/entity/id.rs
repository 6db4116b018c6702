//! Entity handles

slotmap::new_key_type! {
    /// Generational handle to an entity in an [`EntityTree`](super::EntityTree)
    ///
    /// Handles of removed entities never alias newly created ones.
    pub struct EntityId;
}
