//! Arena-backed entity tree

use slotmap::SlotMap;

use crate::entity::{Entity, EntityId};
use crate::error::EngineError;

/// Owns every entity of a game and the parent/child links between them
#[derive(Debug, Default)]
pub struct EntityTree {
    entities: SlotMap<EntityId, Entity>,
}

impl EntityTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a detached entity and return its handle
    pub fn insert(&mut self, mut entity: Entity) -> EntityId {
        entity.parent = None;
        entity.children.clear();
        self.entities.insert(entity)
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the tree holds no entities
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Whether the handle refers to a live entity
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Look up an entity; `None` if it was removed
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Look up an entity mutably; `None` if it was removed
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Look up an entity, failing with a descriptive error
    pub fn entity(&self, id: EntityId) -> Result<&Entity, EngineError> {
        self.entities.get(id).ok_or(EngineError::EntityNotFound(id))
    }

    /// Look up an entity mutably, failing with a descriptive error
    pub fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity, EngineError> {
        self.entities.get_mut(id).ok_or(EngineError::EntityNotFound(id))
    }

    /// Iterate over all entities in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities.iter()
    }

    /// Parent of an entity
    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.entities.get(id).and_then(|entity| entity.parent)
    }

    /// Children of an entity in declaration order; empty for unknown handles
    pub fn children(&self, id: EntityId) -> &[EntityId] {
        self.entities.get(id).map_or(&[][..], |entity| entity.children.as_slice())
    }

    /// Whether `ancestor` is `id` itself or one of its ancestors
    pub fn is_ancestor_or_self(&self, ancestor: EntityId, id: EntityId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Topmost ancestor of an entity (the scene for attached entities)
    pub fn root_of(&self, id: EntityId) -> EntityId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Attach a detached entity as the last child of `parent`
    pub fn add_child(&mut self, parent: EntityId, child: EntityId) -> Result<(), EngineError> {
        self.entity(parent)?;
        let child_entity = self.entity(child)?;

        if let Some(existing) = child_entity.parent {
            return Err(EngineError::InvalidHierarchy(format!(
                "'{}' already has parent '{}'",
                child_entity.name,
                self.entity(existing)?.name
            )));
        }
        if child_entity.is_scene() {
            return Err(EngineError::InvalidHierarchy(format!(
                "scene '{}' cannot be a child",
                child_entity.name
            )));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(EngineError::InvalidHierarchy(format!(
                "'{}' cannot be added below itself",
                child_entity.name
            )));
        }

        self.entity_mut(child)?.parent = Some(parent);
        self.entity_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Insert an entity and attach it below `parent` in one step
    pub fn spawn_child(&mut self, parent: EntityId, entity: Entity) -> Result<EntityId, EngineError> {
        self.entity(parent)?;
        let id = self.insert(entity);
        if let Err(err) = self.add_child(parent, id) {
            self.entities.remove(id);
            return Err(err);
        }
        Ok(id)
    }

    /// Detach an entity from its parent without removing it
    pub fn detach(&mut self, id: EntityId) -> Result<(), EngineError> {
        if let Some(parent) = self.entity(id)?.parent {
            if let Some(parent_entity) = self.entities.get_mut(parent) {
                parent_entity.children.retain(|child| *child != id);
            }
            self.entity_mut(id)?.parent = None;
        }
        Ok(())
    }

    /// Remove an entity with its whole subtree; returns the removed handles
    ///
    /// Removed entities drop their action runs with them.
    pub fn remove(&mut self, id: EntityId) -> Result<Vec<EntityId>, EngineError> {
        self.detach(id)?;
        let removed = self.descendants(id);
        for node in &removed {
            self.entities.remove(*node);
        }
        Ok(removed)
    }

    /// The entity and all its descendants in depth-first pre-order
    pub fn descendants(&self, root: EntityId) -> Vec<EntityId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if let Some(entity) = self.entities.get(node) {
                out.push(node);
                stack.extend(entity.children.iter().rev().copied());
            }
        }
        out
    }

    /// All entities carrying this name
    pub fn find_all_by_name(&self, name: &str) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, entity)| entity.name == name)
            .map(|(id, _)| id)
            .collect()
    }

    /// The single entity carrying this name
    ///
    /// Fails when the name is missing or shared by several entities.
    pub fn find_by_name(&self, name: &str) -> Result<EntityId, EngineError> {
        let matches = self.find_all_by_name(name);
        match matches.as_slice() {
            [id] => Ok(*id),
            [] => Err(EngineError::UnknownEntityName(name.to_string())),
            _ => Err(EngineError::DuplicateEntityName {
                name: name.to_string(),
                count: matches.len(),
            }),
        }
    }

    /// Entity names for diagnostics
    pub(crate) fn names(&self, ids: &[EntityId]) -> Vec<String> {
        ids.iter()
            .map(|id| {
                self.entities
                    .get(*id)
                    .map_or_else(|| format!("{id:?}"), |entity| entity.name.clone())
            })
            .collect()
    }
}
