//! Application state

mod history;
mod preview;

use std::sync::Arc;

use glam::Vec3;
use parking_lot::Mutex;
use se_core::{
    Entity, EntityId, RenderSync, Scene, SceneGraph, Transform, TransformStore, UndoHistory,
};
use se_gizmo::{GizmoHost, OrbitCamera, Tool, TransformSpace};

pub use history::{HistoryEntry, HistoryLog};
pub use preview::{ScenePreview, pick_entity};

/// Actions that can be triggered from UI
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Replace the selection
    Select(Vec<EntityId>),
    /// Switch the active tool
    SetTool(Tool),
    /// Set the transform space
    SetSpace(TransformSpace),
    /// Advance to the next transform space
    CycleSpace,
    /// Add a box at the origin (as a child of the selection, if any)
    AddBox,
    /// Delete the selected entities
    DeleteSelected,
    /// Reset the selected entities to the identity transform
    ResetTransform,
    /// Frame the selection, or the whole scene
    FocusSelection,
    /// Overwrite an entity's local transform from the property editor
    SetTransform { id: EntityId, transform: Transform },
    /// Record the property edits made since the last commit
    CommitTransformEdit,
    /// Rename an entity
    Rename { id: EntityId, name: String },
}

/// Render collaborator handed to the gizmo host.
///
/// `notify` schedules a repaint. `force_immediate_render_tick` marks the
/// scene preview stale; the viewport rebuilds it before anything of the
/// current frame is painted.
#[derive(Debug, Default)]
pub struct FrameSync {
    repaint: bool,
    preview_stale: bool,
    forced_ticks: u64,
}

impl FrameSync {
    /// Consume the repaint request
    pub fn take_repaint(&mut self) -> bool {
        std::mem::take(&mut self.repaint)
    }

    /// Consume the stale-preview flag
    pub fn take_preview_stale(&mut self) -> bool {
        std::mem::take(&mut self.preview_stale)
    }

    /// Forced render ticks since startup
    pub fn forced_ticks(&self) -> u64 {
        self.forced_ticks
    }
}

impl RenderSync for FrameSync {
    fn notify(&mut self) {
        self.repaint = true;
    }

    fn force_immediate_render_tick(&mut self) {
        self.preview_stale = true;
        self.forced_ticks += 1;
    }
}

/// Application state
pub struct AppState {
    pub scene: Scene,
    pub selection: Vec<EntityId>,
    pub history: HistoryLog,
    pub host: GizmoHost,
    pub camera: OrbitCamera,
    pub sync: FrameSync,
    pub preview: ScenePreview,
    pending_actions: Vec<AppAction>,
    boxes_added: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Create an empty state
    pub fn new() -> Self {
        let mut camera = OrbitCamera::new(1.0);
        camera.orbit(0.6, 0.45);
        Self {
            scene: Scene::new(),
            selection: Vec::new(),
            history: HistoryLog::new(),
            host: GizmoHost::new(),
            camera,
            sync: FrameSync::default(),
            preview: ScenePreview::default(),
            pending_actions: Vec::new(),
            boxes_added: 0,
        }
    }

    /// A small scene with a parented pair and a rotated box
    pub fn with_demo_scene() -> Self {
        let mut state = Self::new();
        let scene = &mut state.scene;

        let base = scene.insert(
            Entity::new("Base")
                .with_half_extents(Vec3::new(1.5, 0.2, 1.5))
                .with_color([0.55, 0.57, 0.6, 1.0]),
        );
        let arm = Entity::new("Arm")
            .with_transform(Transform {
                position: Vec3::new(0.8, 1.0, 0.0),
                rotation: Vec3::new(0.0, 0.0, 0.35),
                ..Transform::IDENTITY
            })
            .with_half_extents(Vec3::new(0.2, 0.8, 0.2))
            .with_color([0.85, 0.45, 0.2, 1.0]);
        if let Err(e) = scene.insert_child(base, arm) {
            tracing::warn!("Failed to build demo scene: {}", e);
        }
        scene.insert(
            Entity::new("Crate")
                .with_transform(Transform {
                    position: Vec3::new(-2.5, 0.5, 1.0),
                    rotation: Vec3::new(0.0, 0.6, 0.0),
                    ..Transform::IDENTITY
                })
                .with_color([0.3, 0.55, 0.85, 1.0]),
        );
        scene.update_world_transforms();
        state
    }

    /// Queue an action
    pub fn queue_action(&mut self, action: AppAction) {
        self.pending_actions.push(action);
    }

    /// Take pending actions
    pub fn take_pending_actions(&mut self) -> Vec<AppAction> {
        std::mem::take(&mut self.pending_actions)
    }

    /// Entity if exactly one is selected
    pub fn single_selection(&self) -> Option<EntityId> {
        match self.selection.as_slice() {
            [id] => Some(*id),
            _ => None,
        }
    }

    /// Apply an action
    pub fn apply(&mut self, action: AppAction) {
        tracing::debug!(?action, "Applying action");
        let edits_scene = matches!(
            action,
            AppAction::AddBox
                | AppAction::DeleteSelected
                | AppAction::ResetTransform
                | AppAction::SetTransform { .. }
                | AppAction::Rename { .. }
        );
        match action {
            AppAction::Select(ids) => self.select(ids),
            AppAction::SetTool(tool) => {
                self.host.set_tool(tool, &self.scene, &mut self.history);
            }
            AppAction::SetSpace(space) => self.host.set_space(space),
            AppAction::CycleSpace => {
                let space = self.host.cycle_space();
                tracing::info!("Transform space: {}", space.label());
            }
            AppAction::AddBox => self.add_box(),
            AppAction::DeleteSelected => self.delete_selected(),
            AppAction::ResetTransform => self.reset_transform(),
            AppAction::FocusSelection => self.focus_selection(),
            AppAction::SetTransform { id, transform } => {
                // Picked up by the gizmo host as an external change
                if self.scene.set_transform(id, transform) {
                    self.scene.recompute_world_matrices();
                }
            }
            AppAction::CommitTransformEdit => self.history.commit("Edit Transform"),
            AppAction::Rename { id, name } => {
                if let Some(entity) = self.scene.get_mut(id) {
                    entity.name = name;
                }
            }
        }
        if edits_scene {
            self.preview.invalidate();
        }
        self.sync.notify();
    }

    fn select(&mut self, ids: Vec<EntityId>) {
        self.selection = ids
            .into_iter()
            .filter(|id| self.scene.get(*id).is_some())
            .collect();
        self.host
            .set_selection(&self.selection, &self.scene, &mut self.history);
    }

    fn add_box(&mut self) {
        self.boxes_added += 1;
        let entity = Entity::new(format!("Box {}", self.boxes_added));
        let id = match self.single_selection() {
            Some(parent) => match self.scene.insert_child(parent, entity.clone()) {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!("Failed to add child: {}", e);
                    self.scene.insert(entity)
                }
            },
            None => self.scene.insert(entity),
        };
        self.history.commit("Add Box");
        self.select(vec![id]);
    }

    fn delete_selected(&mut self) {
        let ids = std::mem::take(&mut self.selection);
        // Unmount before the entities disappear
        self.host.set_selection(&[], &self.scene, &mut self.history);
        let mut removed = 0;
        for id in ids {
            match self.scene.remove(id) {
                Ok(_) => removed += 1,
                Err(e) => tracing::debug!("Skipping delete: {}", e),
            }
        }
        if removed > 0 {
            self.scene.update_world_transforms();
            self.history.commit("Delete");
        }
    }

    fn reset_transform(&mut self) {
        let mut changed = false;
        for &id in &self.selection {
            if self.scene.transform(id).is_some_and(|t| t != Transform::IDENTITY) {
                changed |= self.scene.set_transform(id, Transform::IDENTITY);
            }
        }
        if changed {
            self.scene.recompute_world_matrices();
            self.history.commit("Reset Transform");
        }
    }

    fn focus_selection(&mut self) {
        let points: Vec<Vec3> = if self.selection.is_empty() {
            self.scene.iter().map(|e| e.world_matrix.w_axis.truncate()).collect()
        } else {
            self.selection
                .iter()
                .filter_map(|id| self.scene.world_position(*id))
                .collect()
        };
        if points.is_empty() {
            return;
        }
        let center = points.iter().copied().sum::<Vec3>() / points.len() as f32;
        let radius = points
            .iter()
            .map(|p| p.distance(center))
            .fold(1.0_f32, f32::max);
        self.camera.fit_all(center, radius);
    }
}

pub type SharedAppState = Arc<Mutex<AppState>>;

/// Create a new shared app state holding the demo scene
pub fn create_shared_state() -> SharedAppState {
    Arc::new(Mutex::new(AppState::with_demo_scene()))
}
