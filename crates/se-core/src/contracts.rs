//! Collaborator contracts consumed by the gizmo subsystem
//!
//! The gizmos never own an entity's transform. They read the authoritative
//! world matrix through [`SceneGraph`], write local fields through
//! [`TransformStore`], and then ask the scene to recompute world matrices
//! before forcing a render through [`RenderSync`].

use glam::{Mat4, Vec3};

use crate::EntityId;
use crate::transform::Transform;

/// Read access to the scene hierarchy
pub trait SceneGraph {
    /// Authoritative world matrix, `None` for unknown entities
    fn world_matrix(&self, id: EntityId) -> Option<Mat4>;

    /// Parent of an entity, `None` for roots and unknown entities
    fn parent(&self, id: EntityId) -> Option<EntityId>;

    /// World position of an entity
    fn world_position(&self, id: EntityId) -> Option<Vec3> {
        self.world_matrix(id).map(|m| m.w_axis.truncate())
    }

    /// World matrix of the parent frame (identity for roots)
    fn parent_world_matrix(&self, id: EntityId) -> Mat4 {
        self.parent(id)
            .and_then(|parent| self.world_matrix(parent))
            .unwrap_or(Mat4::IDENTITY)
    }

    /// Recompute cached world matrices after local transforms changed
    fn recompute_world_matrices(&mut self);
}

/// Read/write access to the transform component (local space)
pub trait TransformStore {
    /// Current local transform
    fn transform(&self, id: EntityId) -> Option<Transform>;

    /// Overwrite the local transform. Returns false for unknown entities.
    fn set_transform(&mut self, id: EntityId, transform: Transform) -> bool;
}

/// Scene access needed by an active drag
pub trait EditorScene: SceneGraph + TransformStore {}

impl<T: SceneGraph + TransformStore> EditorScene for T {}

/// Render scheduling hooks
pub trait RenderSync {
    /// Schedule a UI refresh on the next frame
    fn notify(&mut self);

    /// Re-render the 3D scene synchronously, inside the current event handler
    fn force_immediate_render_tick(&mut self);
}

/// Undo history
pub trait UndoHistory {
    /// Record one completed edit
    fn commit(&mut self, label: &str);
}
