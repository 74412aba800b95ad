//! Gizmo host
//!
//! Mounts at most one gizmo for the active tool and single selection, routes
//! captured pointer input to it, and polls the scene for transform changes
//! made outside a drag.

use glam::{Mat4, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use se_core::{EditorScene, EntityId, RenderSync, UndoHistory};

use crate::basis::{GizmoBasis, TransformSpace};
use crate::camera::ViewContext;
use crate::config::GizmoConfig;
use crate::constants::interaction::SYNC_EPSILON;
use crate::drag::PointerCapture;
use crate::error::{GizmoError, GizmoResult};
use crate::geometry::TorusCache;
use crate::handle::GizmoHandle;
use crate::render::DrawList;
use crate::rotate::RotateGizmo;
use crate::scale::ScaleGizmo;
use crate::translate::TranslateGizmo;

/// Active editor tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tool {
    /// Selection only, no gizmo mounted
    #[default]
    Select,
    /// Translate gizmo
    Translate,
    /// Rotate gizmo
    Rotate,
    /// Scale gizmo
    Scale,
}

impl Tool {
    /// All tools, in toolbar order
    pub const ALL: [Tool; 4] = [Tool::Select, Tool::Translate, Tool::Rotate, Tool::Scale];

    /// Toolbar label
    pub fn label(self) -> &'static str {
        match self {
            Tool::Select => "Select",
            Tool::Translate => "Move",
            Tool::Rotate => "Rotate",
            Tool::Scale => "Scale",
        }
    }
}

#[derive(Debug, Clone)]
enum Mounted {
    Translate(TranslateGizmo),
    Rotate(RotateGizmo),
    Scale(ScaleGizmo),
}

impl Mounted {
    fn new(tool: Tool, id: EntityId) -> Option<Self> {
        match tool {
            Tool::Select => None,
            Tool::Translate => Some(Self::Translate(TranslateGizmo::new(id))),
            Tool::Rotate => Some(Self::Rotate(RotateGizmo::new(id))),
            Tool::Scale => Some(Self::Scale(ScaleGizmo::new(id))),
        }
    }

    fn entity(&self) -> EntityId {
        match self {
            Self::Translate(g) => g.entity(),
            Self::Rotate(g) => g.entity(),
            Self::Scale(g) => g.entity(),
        }
    }

    fn is_dragging(&self) -> bool {
        match self {
            Self::Translate(g) => g.is_dragging(),
            Self::Rotate(g) => g.is_dragging(),
            Self::Scale(g) => g.is_dragging(),
        }
    }

    fn hovered(&self) -> Option<GizmoHandle> {
        match self {
            Self::Translate(g) => g.hovered().map(GizmoHandle::Translate),
            Self::Rotate(g) => g.hovered().map(GizmoHandle::Rotate),
            Self::Scale(g) => g.hovered().map(GizmoHandle::Scale),
        }
    }

    fn active(&self) -> Option<GizmoHandle> {
        match self {
            Self::Translate(g) => g.active().map(GizmoHandle::Translate),
            Self::Rotate(g) => g.active().map(GizmoHandle::Rotate),
            Self::Scale(g) => g.active().map(GizmoHandle::Scale),
        }
    }

    fn pick(
        &self,
        basis: &GizmoBasis,
        ctx: &ViewContext,
        config: &GizmoConfig,
        cursor: Vec2,
    ) -> Option<GizmoHandle> {
        match self {
            Self::Translate(g) => g.pick(basis, ctx, config, cursor).map(GizmoHandle::Translate),
            Self::Rotate(g) => g.pick(basis, ctx, config, cursor).map(GizmoHandle::Rotate),
            Self::Scale(g) => g.pick(basis, ctx, config, cursor).map(GizmoHandle::Scale),
        }
    }

    /// Returns whether the hovered handle changed
    fn set_hovered(&mut self, handle: Option<GizmoHandle>) -> bool {
        if self.hovered() == handle {
            return false;
        }
        match (self, handle) {
            (Self::Translate(g), Some(GizmoHandle::Translate(h))) => g.set_hovered(Some(h)),
            (Self::Rotate(g), Some(GizmoHandle::Rotate(h))) => g.set_hovered(Some(h)),
            (Self::Scale(g), Some(GizmoHandle::Scale(h))) => g.set_hovered(Some(h)),
            (Self::Translate(g), _) => g.set_hovered(None),
            (Self::Rotate(g), _) => g.set_hovered(None),
            (Self::Scale(g), _) => g.set_hovered(None),
        }
        true
    }

    fn begin_drag(
        &mut self,
        scene: &dyn EditorScene,
        basis: &GizmoBasis,
        ctx: &ViewContext,
        config: &GizmoConfig,
        handle: GizmoHandle,
        cursor: Vec2,
    ) -> GizmoResult<()> {
        match (self, handle) {
            (Self::Translate(g), GizmoHandle::Translate(h)) => {
                g.begin_drag(scene, basis, ctx, h, cursor)
            }
            (Self::Rotate(g), GizmoHandle::Rotate(h)) => g.begin_drag(scene, basis, ctx, h, cursor),
            (Self::Scale(g), GizmoHandle::Scale(h)) => {
                g.begin_drag(scene, basis, ctx, config, h, cursor)
            }
            _ => Err(GizmoError::DegenerateHandle),
        }
    }

    fn drag_to(
        &mut self,
        scene: &mut dyn EditorScene,
        render: &mut dyn RenderSync,
        ctx: &ViewContext,
        config: &GizmoConfig,
        cursor: Vec2,
    ) -> GizmoResult<()> {
        match self {
            Self::Translate(g) => g.drag_to(scene, render, ctx, config, cursor).map(|_| ()),
            Self::Rotate(g) => g.drag_to(scene, render, ctx, config, cursor).map(|_| ()),
            Self::Scale(g) => g.drag_to(scene, render, ctx, config, cursor).map(|_| ()),
        }
    }

    fn end_drag(
        &mut self,
        scene: &dyn EditorScene,
        history: &mut dyn UndoHistory,
    ) -> GizmoResult<bool> {
        match self {
            Self::Translate(g) => g.end_drag(scene, history),
            Self::Rotate(g) => g.end_drag(scene, history),
            Self::Scale(g) => g.end_drag(scene, history),
        }
    }

    fn abort(&mut self) {
        match self {
            Self::Translate(g) => g.abort(),
            Self::Rotate(g) => g.abort(),
            Self::Scale(g) => g.abort(),
        }
    }
}

/// Owner of the mounted gizmo and the pointer capture
#[derive(Debug, Default)]
pub struct GizmoHost {
    tool: Tool,
    space: TransformSpace,
    target: Option<EntityId>,
    mounted: Option<Mounted>,
    capture: PointerCapture,
    torus_cache: TorusCache,
    /// World matrix seen by the last sync
    last_world: Option<Mat4>,
}

impl GizmoHost {
    /// Host with the select tool and nothing mounted
    pub fn new() -> Self {
        Self::default()
    }

    /// Active tool
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switch tools, remounting the gizmo for the current target
    pub fn set_tool(
        &mut self,
        tool: Tool,
        scene: &dyn EditorScene,
        history: &mut dyn UndoHistory,
    ) {
        if tool == self.tool {
            return;
        }
        self.finish_drag(scene, history);
        self.tool = tool;
        self.remount();
    }

    /// Space chosen by the user
    pub fn space(&self) -> TransformSpace {
        self.space
    }

    /// Choose the transform space; takes effect on the next frame
    pub fn set_space(&mut self, space: TransformSpace) {
        self.space = space;
    }

    /// Advance to the next transform space
    pub fn cycle_space(&mut self) -> TransformSpace {
        self.space = self.space.next();
        self.space
    }

    /// Space the mounted gizmo uses; gimbal only applies to rotation
    pub fn effective_space(&self) -> TransformSpace {
        match self.tool {
            Tool::Rotate => self.space,
            _ => self.space.without_gimbal(),
        }
    }

    /// Update the selection. A gizmo is mounted only for exactly one entity.
    ///
    /// A selection change ends any drag in progress, committing it if the
    /// transform moved.
    pub fn set_selection(
        &mut self,
        selection: &[EntityId],
        scene: &dyn EditorScene,
        history: &mut dyn UndoHistory,
    ) {
        let target = match selection {
            [id] => Some(*id),
            _ => None,
        };
        if target == self.target {
            return;
        }
        self.finish_drag(scene, history);
        self.target = target;
        self.remount();
    }

    /// Entity of the mounted gizmo
    pub fn mounted_entity(&self) -> Option<EntityId> {
        self.mounted.as_ref().map(Mounted::entity)
    }

    /// Whether the mounted gizmo is mid-drag
    pub fn is_dragging(&self) -> bool {
        self.mounted.as_ref().is_some_and(Mounted::is_dragging)
    }

    /// Whether pointer events belong to the host until release
    pub fn has_capture(&self) -> bool {
        self.capture.is_held()
    }

    /// Handle under the pointer
    pub fn hovered(&self) -> Option<GizmoHandle> {
        self.mounted.as_ref().and_then(Mounted::hovered)
    }

    /// Handle being dragged
    pub fn active(&self) -> Option<GizmoHandle> {
        self.mounted.as_ref().and_then(Mounted::active)
    }

    /// Number of cached ring meshes
    pub fn cached_rings(&self) -> usize {
        self.torus_cache.len()
    }

    fn remount(&mut self) {
        self.mounted = self.target.and_then(|id| Mounted::new(self.tool, id));
        self.last_world = None;
        debug!(tool = ?self.tool, target = ?self.target, "Gizmo remounted");
    }

    fn finish_drag(&mut self, scene: &dyn EditorScene, history: &mut dyn UndoHistory) {
        self.capture.release();
        if let Some(mounted) = self.mounted.as_mut()
            && mounted.is_dragging()
            && let Err(e) = mounted.end_drag(scene, history)
        {
            warn!("Failed to finish drag: {e}");
        }
    }

    fn basis(&self, scene: &dyn EditorScene, ctx: &ViewContext) -> Option<GizmoBasis> {
        let id = self.mounted_entity()?;
        GizmoBasis::from_scene(scene, id, ctx.camera_position, self.effective_space())
    }

    /// Per-frame sync against the authoritative world matrix.
    ///
    /// Skipped while dragging. Returns true and calls
    /// [`RenderSync::notify`] when the matrix moved by more than the sync
    /// tolerance since the last call.
    pub fn sync(&mut self, scene: &dyn EditorScene, render: &mut dyn RenderSync) -> bool {
        if self.is_dragging() {
            return false;
        }
        let Some(id) = self.mounted_entity() else {
            self.last_world = None;
            return false;
        };
        let world = scene.world_matrix(id);
        let changed = match (self.last_world, world) {
            (Some(old), Some(new)) => !old.abs_diff_eq(new, SYNC_EPSILON),
            (None, None) => false,
            _ => true,
        };
        self.last_world = world;
        if changed {
            debug!(%id, "External transform change");
            render.notify();
        }
        changed
    }

    /// Press on a handle. Returns true if a drag started and took the capture.
    pub fn pointer_down(
        &mut self,
        scene: &dyn EditorScene,
        ctx: &ViewContext,
        config: &GizmoConfig,
        cursor: Vec2,
    ) -> bool {
        if self.capture.is_held() {
            return false;
        }
        let Some(basis) = self.basis(scene, ctx) else {
            return false;
        };
        let Some(mounted) = self.mounted.as_mut() else {
            return false;
        };
        let Some(handle) = mounted.pick(&basis, ctx, config, cursor) else {
            return false;
        };
        match mounted.begin_drag(scene, &basis, ctx, config, handle, cursor) {
            Ok(()) => self.capture.acquire(),
            Err(e) => {
                debug!(?handle, "Drag not started: {e}");
                false
            }
        }
    }

    /// Pointer motion: drives the drag while captured, otherwise updates
    /// hover. Returns true when the view needs a repaint.
    pub fn pointer_move(
        &mut self,
        scene: &mut dyn EditorScene,
        render: &mut dyn RenderSync,
        ctx: &ViewContext,
        config: &GizmoConfig,
        cursor: Vec2,
    ) -> bool {
        if self.capture.is_held() {
            let Some(mounted) = self.mounted.as_mut() else {
                self.capture.release();
                return false;
            };
            return match mounted.drag_to(scene, render, ctx, config, cursor) {
                Ok(()) => true,
                Err(GizmoError::EntityNotFound(id)) => {
                    warn!(%id, "Entity vanished mid-drag, aborting");
                    mounted.abort();
                    self.capture.release();
                    true
                }
                Err(e) => {
                    // Transform stays as it was for this frame
                    debug!("Drag step skipped: {e}");
                    false
                }
            };
        }

        let basis = self.basis(scene, ctx);
        let Some(mounted) = self.mounted.as_mut() else {
            return false;
        };
        let hovered = basis.and_then(|basis| mounted.pick(&basis, ctx, config, cursor));
        let changed = mounted.set_hovered(hovered);
        if changed {
            render.notify();
        }
        changed
    }

    /// Release the pointer, ending the drag. Returns true if history was
    /// committed.
    pub fn pointer_up(&mut self, scene: &dyn EditorScene, history: &mut dyn UndoHistory) -> bool {
        if !self.capture.release() {
            return false;
        }
        // The drag's own writes are not an external change
        self.last_world = self
            .mounted_entity()
            .and_then(|id| scene.world_matrix(id));
        match self.mounted.as_mut().map(|m| m.end_drag(scene, history)) {
            Some(Ok(committed)) => committed,
            Some(Err(e)) => {
                debug!("Pointer released without drag: {e}");
                false
            }
            None => false,
        }
    }

    /// Draw commands for the mounted gizmo, empty when nothing is mounted or
    /// the entity has no world matrix
    pub fn draw(
        &mut self,
        scene: &dyn EditorScene,
        ctx: &ViewContext,
        config: &GizmoConfig,
    ) -> DrawList {
        let mut out = DrawList::new();
        let Some(basis) = self.basis(scene, ctx) else {
            return out;
        };
        match self.mounted.as_ref() {
            Some(Mounted::Translate(g)) => g.draw(&basis, ctx, config, &mut out),
            Some(Mounted::Rotate(g)) => g.draw(&basis, ctx, config, &mut self.torus_cache, &mut out),
            Some(Mounted::Scale(g)) => g.draw(&basis, ctx, config, &mut out),
            None => {}
        }
        out
    }
}
