//! Gizmo error types

use se_core::EntityId;

/// Errors raised by the drag state machines.
///
/// None of these are fatal: the host logs them and the next frame simply
/// recomputes from fresh inputs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GizmoError {
    /// `begin_drag` while a drag is running
    #[error("A drag is already active")]
    DragAlreadyActive,
    /// A drag step or end without a running drag
    #[error("No drag is active")]
    NoActiveDrag,
    /// The dragged entity has no world matrix
    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),
    /// The pointer ray is parallel to the drag plane or points away from it
    #[error("Pointer ray missed the drag plane")]
    RayMissed,
    /// The handle collapses on screen (axis seen end-on, behind the camera)
    #[error("Handle is degenerate in the current view")]
    DegenerateHandle,
}

/// Result alias for gizmo operations
pub type GizmoResult<T> = Result<T, GizmoError>;
