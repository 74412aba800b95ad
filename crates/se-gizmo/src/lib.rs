//! Transform gizmos
//!
//! Screen-space-aware translate / rotate / scale handles for the scene
//! editor. The crate has no UI toolkit dependency: gizmos read the scene
//! through the `se-core` contracts, emit a depth-sorted [`DrawList`] each
//! frame, and turn pointer input into constrained transform edits.
//!
//! - [`math`] - projection, ray construction, ray-plane intersection
//! - [`camera`] - orbit camera and the per-frame [`ViewContext`]
//! - [`basis`] - gizmo origin / axes / screen-consistent scale
//! - [`opacity`] - fade-out of handles seen edge-on or end-on
//! - [`geometry`] - procedural handle meshes and the torus cache
//! - [`render`] - painter's-algorithm volumetric renderer
//! - [`translate`], [`rotate`], [`scale`] - drag state machines
//! - [`host`] - mounts one gizmo for the selection and keeps it in sync

pub mod basis;
pub mod camera;
pub mod collision;
pub mod config;
pub mod constants;
pub mod drag;
pub mod error;
pub mod geometry;
pub mod handle;
pub mod host;
pub mod math;
pub mod opacity;
pub mod render;
pub mod rotate;
pub mod scale;
pub mod translate;
mod visual;

pub use basis::{GizmoBasis, TransformSpace};
pub use camera::{OrbitCamera, ViewContext, ViewPreset};
pub use config::{ArrowHead, CenterHandle, ConfigError, GizmoConfig, PlaneHandle};
pub use error::{GizmoError, GizmoResult};
pub use geometry::{Face, Frame, Mesh, TorusCache};
pub use handle::{Axis, GizmoHandle, HandleState, PlaneAxes, RotateHandle, ScaleHandle, TranslateHandle};
pub use host::{GizmoHost, Tool};
pub use math::{Plane, Ray, ScreenPoint, Viewport};
pub use render::{Color, DepthSortedBatch, DrawCommand, DrawList, Stroke};
pub use rotate::RotateGizmo;
pub use scale::ScaleGizmo;
pub use translate::TranslateGizmo;
