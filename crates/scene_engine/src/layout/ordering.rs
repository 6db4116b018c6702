//! Sibling update order

use std::collections::{HashMap, VecDeque};

use crate::entity::{EntityId, EntityTree};
use crate::error::EngineError;

/// Order in which `siblings` must be placed so constraint targets come first
///
/// Edges run from each sibling to the siblings its constraints reference.
/// Kahn's algorithm lists dependents before their dependencies, so the result
/// is reversed. Without any edge the declaration order is kept. Siblings left
/// over after the sort form a cycle and are reported by name.
pub(crate) fn update_order(tree: &EntityTree, siblings: &[EntityId]) -> Result<Vec<EntityId>, EngineError> {
    let index: HashMap<EntityId, usize> = siblings.iter().enumerate().map(|(i, id)| (*id, i)).collect();

    let mut edges: Vec<Vec<usize>> = vec![Vec::new(); siblings.len()];
    let mut indegree = vec![0usize; siblings.len()];
    let mut has_edges = false;
    for (from, id) in siblings.iter().enumerate() {
        let Some(entity) = tree.get(*id) else {
            continue;
        };
        for target in entity.layout().constraints().iter().filter_map(|c| c.target_entity()) {
            if let Some(&to) = index.get(&target) {
                if to != from && !edges[from].contains(&to) {
                    edges[from].push(to);
                    indegree[to] += 1;
                    has_edges = true;
                }
            }
        }
    }

    if !has_edges {
        return Ok(siblings.to_vec());
    }

    let mut queue: VecDeque<usize> = (0..siblings.len()).filter(|i| indegree[*i] == 0).collect();
    let mut sorted = Vec::with_capacity(siblings.len());
    while let Some(node) = queue.pop_front() {
        sorted.push(node);
        for &next in &edges[node] {
            indegree[next] -= 1;
            if indegree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    if sorted.len() < siblings.len() {
        let stuck: Vec<EntityId> = (0..siblings.len())
            .filter(|i| indegree[*i] > 0)
            .map(|i| siblings[i])
            .collect();
        return Err(EngineError::ConstraintCycle(tree.names(&stuck)));
    }

    Ok(sorted.into_iter().rev().map(|i| siblings[i]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use crate::foundation::math::Vec4;
    use crate::layout::{resolver, Layout};

    fn scene() -> (EntityTree, EntityId) {
        let mut tree = EntityTree::new();
        let scene = tree.insert(Entity::scene("scene", Vec4::zeros()));
        (tree, scene)
    }

    fn init_children(tree: &mut EntityTree, parent: EntityId) {
        for child in tree.children(parent).to_vec() {
            resolver::initialize(tree, child).unwrap();
        }
    }

    #[test]
    fn test_declaration_order_without_constraints() {
        let (mut tree, scene) = scene();
        let a = tree.spawn_child(scene, Entity::composite("a")).unwrap();
        let b = tree.spawn_child(scene, Entity::composite("b")).unwrap();
        let c = tree.spawn_child(scene, Entity::composite("c")).unwrap();

        assert_eq!(update_order(&tree, &[a, b, c]).unwrap(), vec![a, b, c]);
    }

    #[test]
    fn test_dependencies_come_first() {
        let (mut tree, scene) = scene();
        let a = tree
            .spawn_child(scene, Entity::composite("a").with_layout(Layout::new().top_to_bottom_of("b")))
            .unwrap();
        let b = tree
            .spawn_child(scene, Entity::composite("b").with_layout(Layout::new().top_to_bottom_of("c")))
            .unwrap();
        let c = tree.spawn_child(scene, Entity::composite("c")).unwrap();
        init_children(&mut tree, scene);

        assert_eq!(update_order(&tree, tree.children(scene)).unwrap(), vec![c, b, a]);
    }

    #[test]
    fn test_cycle_names_members() {
        let (mut tree, scene) = scene();
        tree.spawn_child(scene, Entity::composite("a").with_layout(Layout::new().top_to_bottom_of("b")))
            .unwrap();
        tree.spawn_child(scene, Entity::composite("b").with_layout(Layout::new().top_to_bottom_of("a")))
            .unwrap();
        tree.spawn_child(scene, Entity::composite("free")).unwrap();
        init_children(&mut tree, scene);

        match update_order(&tree, tree.children(scene)) {
            Err(EngineError::ConstraintCycle(mut names)) => {
                names.sort();
                assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
            }
            other => panic!("expected a cycle, got {other:?}"),
        }
    }
}
