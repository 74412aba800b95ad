//! Scene Editor Core
//!
//! Data model and collaborator contracts shared by the gizmo subsystem and
//! the editor frontend.
//!
//! - [`Transform`] - local position / Euler rotation / scale component
//! - [`SceneGraph`], [`TransformStore`] - scene queries and transform writes
//! - [`RenderSync`], [`UndoHistory`] - render scheduling and history commits
//! - [`Scene`] - in-memory entity hierarchy implementing the scene contracts

pub mod contracts;
pub mod scene;
pub mod transform;

pub use contracts::{EditorScene, RenderSync, SceneGraph, TransformStore, UndoHistory};
pub use scene::{Entity, Scene, SceneError};
pub use transform::{EulerOrder, Transform};

/// Identifier of an entity in the scene
pub type EntityId = uuid::Uuid;
