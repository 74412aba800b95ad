//! In-memory entity hierarchy

use std::collections::HashMap;

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EntityId;
use crate::contracts::{SceneGraph, TransformStore};
use crate::transform::Transform;

/// A scene entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    /// Local transform (relative to the parent)
    pub transform: Transform,
    /// Half extents of the preview box, in local units
    pub half_extents: Vec3,
    /// Preview color (RGBA)
    pub color: [f32; 4],
    /// Cached world matrix, refreshed by [`Scene::update_world_transforms`]
    #[serde(skip, default = "identity")]
    pub world_matrix: Mat4,
}

fn identity() -> Mat4 {
    Mat4::IDENTITY
}

impl Entity {
    /// Create a new entity with an identity transform
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            transform: Transform::IDENTITY,
            half_extents: Vec3::splat(0.5),
            color: [0.7, 0.7, 0.7, 1.0],
            world_matrix: Mat4::IDENTITY,
        }
    }

    /// Builder: set the local transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Builder: set the preview color
    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    /// Builder: set the preview half extents
    pub fn with_half_extents(mut self, half_extents: Vec3) -> Self {
        self.half_extents = half_extents;
        self
    }
}

/// Scene hierarchy
#[derive(Debug, Clone, Default)]
pub struct Scene {
    entities: HashMap<EntityId, Entity>,
    /// Parent mapping: child -> parent
    parent: HashMap<EntityId, EntityId>,
    /// Children mapping: parent -> children (insertion order)
    children: HashMap<EntityId, Vec<EntityId>>,
    /// Root entities (insertion order)
    roots: Vec<EntityId>,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the scene has no entities
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Insert a root entity
    pub fn insert(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        self.entities.insert(id, entity);
        self.roots.push(id);
        self.update_world_transforms();
        id
    }

    /// Insert an entity below `parent`
    pub fn insert_child(&mut self, parent: EntityId, entity: Entity) -> Result<EntityId, SceneError> {
        if !self.entities.contains_key(&parent) {
            return Err(SceneError::EntityNotFound(parent));
        }
        let id = entity.id;
        self.entities.insert(id, entity);
        self.parent.insert(id, parent);
        self.children.entry(parent).or_default().push(id);
        self.update_world_transforms();
        Ok(id)
    }

    /// Move an entity under a new parent (or to the root with `None`)
    pub fn set_parent(&mut self, id: EntityId, parent: Option<EntityId>) -> Result<(), SceneError> {
        if !self.entities.contains_key(&id) {
            return Err(SceneError::EntityNotFound(id));
        }
        if let Some(new_parent) = parent {
            if !self.entities.contains_key(&new_parent) {
                return Err(SceneError::EntityNotFound(new_parent));
            }
            if new_parent == id || self.ancestors(new_parent).contains(&id) {
                return Err(SceneError::WouldCreateCycle);
            }
        }

        self.detach(id);
        match parent {
            Some(new_parent) => {
                self.parent.insert(id, new_parent);
                self.children.entry(new_parent).or_default().push(id);
            }
            None => self.roots.push(id),
        }
        self.update_world_transforms();
        Ok(())
    }

    /// Remove an entity. Its children become roots.
    pub fn remove(&mut self, id: EntityId) -> Result<Entity, SceneError> {
        let entity = self
            .entities
            .remove(&id)
            .ok_or(SceneError::EntityNotFound(id))?;
        self.detach(id);
        for child in self.children.remove(&id).unwrap_or_default() {
            self.parent.remove(&child);
            self.roots.push(child);
        }
        self.update_world_transforms();
        Ok(entity)
    }

    fn detach(&mut self, id: EntityId) {
        if let Some(old_parent) = self.parent.remove(&id) {
            if let Some(siblings) = self.children.get_mut(&old_parent) {
                siblings.retain(|&c| c != id);
            }
        } else {
            self.roots.retain(|&r| r != id);
        }
    }

    /// Chain of ancestors from the direct parent up to the root
    pub fn ancestors(&self, id: EntityId) -> Vec<EntityId> {
        let mut chain = Vec::new();
        let mut current = id;
        while let Some(&p) = self.parent.get(&current) {
            chain.push(p);
            current = p;
        }
        chain
    }

    /// Get an entity
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Get a mutable entity. Call [`Scene::update_world_transforms`] after
    /// changing its transform.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Root entities
    pub fn roots(&self) -> &[EntityId] {
        &self.roots
    }

    /// Children of an entity
    pub fn children(&self, id: EntityId) -> &[EntityId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate over all entities (unordered)
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Recompute every cached world matrix from the roots down
    pub fn update_world_transforms(&mut self) {
        for root in self.roots.clone() {
            self.update_transform_recursive(root, Mat4::IDENTITY);
        }
    }

    fn update_transform_recursive(&mut self, id: EntityId, parent_transform: Mat4) {
        let world = match self.entities.get_mut(&id) {
            Some(entity) => {
                entity.world_matrix = parent_transform * entity.transform.to_matrix();
                entity.world_matrix
            }
            None => return,
        };

        // Collect first to release the borrow on `children`
        let children: Vec<EntityId> = self.children(id).to_vec();
        for child in children {
            self.update_transform_recursive(child, world);
        }
    }
}

impl SceneGraph for Scene {
    fn world_matrix(&self, id: EntityId) -> Option<Mat4> {
        self.entities.get(&id).map(|e| e.world_matrix)
    }

    fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.parent.get(&id).copied()
    }

    fn recompute_world_matrices(&mut self) {
        self.update_world_transforms();
    }
}

impl TransformStore for Scene {
    fn transform(&self, id: EntityId) -> Option<Transform> {
        self.entities.get(&id).map(|e| e.transform)
    }

    fn set_transform(&mut self, id: EntityId, transform: Transform) -> bool {
        match self.entities.get_mut(&id) {
            Some(entity) => {
                entity.transform = transform;
                true
            }
            None => false,
        }
    }
}

/// Scene-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum SceneError {
    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),
    #[error("Reparenting would create a cycle")]
    WouldCreateCycle,
}
