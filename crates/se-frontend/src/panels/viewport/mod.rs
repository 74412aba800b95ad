//! 3D Viewport panel

mod paint;

use glam::Vec2;
use se_gizmo::{OrbitCamera, Tool, TransformSpace, ViewContext, ViewPreset, Viewport};

use crate::config::SharedConfig;
use crate::panels::Panel;
use crate::state::{AppAction, AppState, SharedAppState, pick_entity};

use paint::paint_draw_list;

const ORBIT_SENSITIVITY: f32 = 0.005;
const ZOOM_SENSITIVITY: f32 = 0.01;
const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(32, 33, 36);

/// 3D viewport panel
pub struct ViewportPanel {
    /// Whether the current primary press started a gizmo drag
    press_on_gizmo: bool,
}

impl ViewportPanel {
    /// Create a viewport with no press in flight
    pub fn new() -> Self {
        Self {
            press_on_gizmo: false,
        }
    }

    fn toolbar(&self, ui: &mut egui::Ui, state: &mut AppState, config: &SharedConfig) {
        ui.horizontal(|ui| {
            let current = state.host.tool();
            for tool in Tool::ALL {
                if ui.selectable_label(current == tool, tool.label()).clicked() && current != tool {
                    state.apply(AppAction::SetTool(tool));
                }
            }

            ui.separator();

            let space = state.host.space();
            egui::ComboBox::from_id_salt("transform_space")
                .selected_text(space.label())
                .show_ui(ui, |ui| {
                    for option in TransformSpace::ALL {
                        if ui.selectable_label(space == option, option.label()).clicked() {
                            state.apply(AppAction::SetSpace(option));
                        }
                    }
                });
            if state.host.tool() != Tool::Rotate && space == TransformSpace::Gimbal {
                ui.weak("(local for move/scale)");
            }

            ui.separator();

            let mut snap = config.read().snap_enabled;
            if ui.checkbox(&mut snap, "Snap").changed() {
                config.write().snap_enabled = snap;
            }

            ui.separator();

            ui.label("View:");
            for preset in ViewPreset::ALL {
                if ui.button(preset.label()).clicked() {
                    state.camera.set_view(preset);
                }
            }
            if ui.button("Fit").clicked() {
                state.apply(AppAction::FocusSelection);
            }
        });
    }

    fn handle_camera(ui: &egui::Ui, response: &egui::Response, camera: &mut OrbitCamera) {
        // The camera stays live during a gizmo drag; the next pointer move
        // picks up the new view
        if response.dragged_by(egui::PointerButton::Middle) {
            let delta = response.drag_delta();
            if ui.input(|i| i.modifiers.shift) {
                camera.pan(delta.x, delta.y);
            } else {
                camera.orbit(-delta.x * ORBIT_SENSITIVITY, delta.y * ORBIT_SENSITIVITY);
            }
        }

        if response.dragged_by(egui::PointerButton::Secondary) {
            let delta = response.drag_delta();
            camera.orbit(-delta.x * ORBIT_SENSITIVITY, delta.y * ORBIT_SENSITIVITY);
        }

        if response.hovered() {
            let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll_delta != 0.0 {
                camera.zoom(scroll_delta * ZOOM_SENSITIVITY);
            }
        }
    }

    fn handle_shortcuts(ui: &egui::Ui, state: &mut AppState) {
        let actions = ui.input(|i| {
            let mut actions = Vec::new();
            for (key, tool) in [
                (egui::Key::Q, Tool::Select),
                (egui::Key::W, Tool::Translate),
                (egui::Key::E, Tool::Rotate),
                (egui::Key::R, Tool::Scale),
            ] {
                if i.key_pressed(key) {
                    actions.push(AppAction::SetTool(tool));
                }
            }
            if i.key_pressed(egui::Key::G) {
                actions.push(AppAction::CycleSpace);
            }
            if i.key_pressed(egui::Key::F) {
                actions.push(AppAction::FocusSelection);
            }
            if i.key_pressed(egui::Key::Delete) {
                actions.push(AppAction::DeleteSelected);
            }
            actions
        });
        for action in actions {
            state.apply(action);
        }
    }

    /// Route primary-button input to the gizmo host.
    ///
    /// While the host holds the pointer capture, moves and the release are
    /// delivered wherever the pointer is, even outside the viewport.
    fn handle_gizmo_input(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        state: &mut AppState,
        ctx: &ViewContext,
        config: &se_gizmo::GizmoConfig,
    ) {
        let origin = response.rect.min;
        let to_local = |p: egui::Pos2| Vec2::new(p.x - origin.x, p.y - origin.y);
        let (latest, pressed, released) = ui.input(|i| {
            (
                i.pointer.latest_pos(),
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
            )
        });

        if state.host.has_capture() {
            if let Some(pos) = latest {
                state.host.pointer_move(
                    &mut state.scene,
                    &mut state.sync,
                    ctx,
                    config,
                    to_local(pos),
                );
            }
            // A forced tick re-renders the scene before this frame paints
            if state.sync.take_preview_stale() {
                state.preview.rebuild(&state.scene, &state.selection, ctx);
            }
            if released {
                state.host.pointer_up(&state.scene, &mut state.history);
                state.preview.invalidate();
                self.press_on_gizmo = false;
            }
            return;
        }

        if pressed && response.hovered() {
            self.press_on_gizmo = latest
                .is_some_and(|pos| state.host.pointer_down(&state.scene, ctx, config, to_local(pos)));
        } else if let Some(pos) = response.hover_pos() {
            state.host.pointer_move(
                &mut state.scene,
                &mut state.sync,
                ctx,
                config,
                to_local(pos),
            );
        }

        if response.clicked_by(egui::PointerButton::Primary)
            && !std::mem::take(&mut self.press_on_gizmo)
            && let Some(pos) = response.interact_pointer_pos()
        {
            let hit = pick_entity(&state.scene, ctx, to_local(pos));
            let additive = ui.input(|i| i.modifiers.shift);
            let selection = match (hit, additive) {
                (Some(id), true) => {
                    let mut selection = state.selection.clone();
                    if let Some(index) = selection.iter().position(|&s| s == id) {
                        selection.remove(index);
                    } else {
                        selection.push(id);
                    }
                    selection
                }
                (Some(id), false) => vec![id],
                (None, true) => state.selection.clone(),
                (None, false) => Vec::new(),
            };
            state.apply(AppAction::Select(selection));
        }
    }

    fn status_overlay(painter: &egui::Painter, rect: egui::Rect, state: &AppState) {
        let hovered = state
            .host
            .active()
            .or(state.host.hovered())
            .map(|h| format!("  |  {h:?}"))
            .unwrap_or_default();
        let text = format!(
            "{}  |  {}  |  {} selected{}",
            state.host.tool().label(),
            state.host.effective_space().label(),
            state.selection.len(),
            hovered,
        );
        painter.text(
            rect.left_bottom() + egui::vec2(8.0, -8.0),
            egui::Align2::LEFT_BOTTOM,
            text,
            egui::FontId::monospace(12.0),
            egui::Color32::from_gray(180),
        );
    }
}

impl Default for ViewportPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel for ViewportPanel {
    fn name(&self) -> &str {
        "3D Viewport"
    }

    fn ui(&mut self, ui: &mut egui::Ui, app_state: &SharedAppState, config: &SharedConfig) {
        let mut guard = app_state.lock();
        let state = &mut *guard;

        self.toolbar(ui, state, config);

        let available_size = ui.available_size();
        if available_size.x < 1.0 || available_size.y < 1.0 {
            return;
        }
        let (response, painter) =
            ui.allocate_painter(available_size, egui::Sense::click_and_drag());
        let rect = response.rect;
        painter.rect_filled(rect, 0.0, BACKGROUND);

        // One configuration snapshot per frame
        let gizmo_config = config.read().clone();
        let viewport = Viewport::new(rect.width(), rect.height());
        state.camera.update_aspect(viewport.aspect());
        Self::handle_camera(ui, &response, &mut state.camera);
        let ctx = state.camera.view_context(viewport);

        self.handle_gizmo_input(ui, &response, state, &ctx, &gizmo_config);
        if response.hovered() && !state.host.has_capture() {
            Self::handle_shortcuts(ui, state);
        }

        // Pick up edits made outside the gizmo
        if state.host.sync(&state.scene, &mut state.sync) {
            state.preview.invalidate();
        }

        state.preview.ensure(&state.scene, &state.selection, &ctx);
        paint_draw_list(&painter, rect.min, state.preview.draw_list());

        let gizmo = state.host.draw(&state.scene, &ctx, &gizmo_config);
        paint_draw_list(&painter.with_clip_rect(rect), rect.min, &gizmo);

        Self::status_overlay(&painter, rect, state);

        if state.sync.take_repaint() || state.host.has_capture() {
            ui.ctx().request_repaint();
        }

        response.context_menu(|ui| {
            if ui.button("Add Box").clicked() {
                state.apply(AppAction::AddBox);
                ui.close_menu();
            }
            if ui.button("Reset Transform").clicked() {
                state.apply(AppAction::ResetTransform);
                ui.close_menu();
            }
            if ui.button("Delete").clicked() {
                state.apply(AppAction::DeleteSelected);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Frame Selection").clicked() {
                state.apply(AppAction::FocusSelection);
                ui.close_menu();
            }
        });
    }
}
