//! Outliner panel: entity tree and transform properties

use egui::Ui;
use glam::Vec3;
use se_core::{EntityId, EulerOrder, Scene, Transform};

use crate::config::SharedConfig;
use crate::panels::Panel;
use crate::state::{AppAction, SharedAppState};

/// Entity tree with a property editor for the single selection
pub struct OutlinerPanel {
    /// Name buffer for the entity being renamed
    rename: Option<(EntityId, String)>,
    /// Property edits not yet committed
    dirty: bool,
}

impl OutlinerPanel {
    /// Create the panel with nothing being renamed
    pub fn new() -> Self {
        Self {
            rename: None,
            dirty: false,
        }
    }
}

impl Default for OutlinerPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel for OutlinerPanel {
    fn name(&self) -> &str {
        "Outliner"
    }

    fn ui(&mut self, ui: &mut Ui, app_state: &SharedAppState, _config: &SharedConfig) {
        let state = app_state.lock();
        let selection = state.selection.clone();
        let single = state.single_selection();
        let editing = single.and_then(|id| {
            state
                .scene
                .get(id)
                .map(|e| (id, e.name.clone(), e.transform))
        });
        let gizmo_busy = state.host.is_dragging();

        let mut actions = Vec::new();

        ui.horizontal(|ui| {
            ui.heading(self.name());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add_enabled(!selection.is_empty(), egui::Button::new("Delete"))
                    .clicked()
                {
                    actions.push(AppAction::DeleteSelected);
                }
                if ui.button("Add Box").clicked() {
                    actions.push(AppAction::AddBox);
                }
            });
        });
        ui.separator();

        if state.scene.is_empty() {
            ui.weak("Scene is empty.\nAdd a box to get started.");
        } else {
            egui::ScrollArea::vertical()
                .id_salt("outliner_scroll")
                .max_height(ui.available_height() * 0.5)
                .show(ui, |ui| {
                    for &root in state.scene.roots() {
                        entity_row(ui, &state.scene, root, &selection, &mut actions);
                    }
                });
        }
        drop(state);

        if let Some((id, name, transform)) = editing {
            ui.separator();
            self.rename_field(ui, id, &name, &mut actions);
            ui.add_enabled_ui(!gizmo_busy, |ui| {
                self.transform_editor(ui, id, transform, &mut actions);
            });
        } else if selection.len() > 1 {
            ui.separator();
            ui.weak(format!("{} entities selected", selection.len()));
        }

        if !actions.is_empty() {
            let mut state = app_state.lock();
            for action in actions {
                state.queue_action(action);
            }
        }
    }
}

impl OutlinerPanel {
    fn rename_field(&mut self, ui: &mut Ui, id: EntityId, name: &str, actions: &mut Vec<AppAction>) {
        if self.rename.as_ref().is_none_or(|(current, _)| *current != id) {
            self.rename = Some((id, name.to_owned()));
        }
        let Some((_, buffer)) = self.rename.as_mut() else {
            return;
        };
        ui.horizontal(|ui| {
            ui.label("Name:");
            let response = ui.text_edit_singleline(buffer);
            if response.lost_focus() && buffer.as_str() != name && !buffer.trim().is_empty() {
                actions.push(AppAction::Rename {
                    id,
                    name: buffer.trim().to_owned(),
                });
            }
        });
    }
}

fn entity_row(ui: &mut Ui, scene: &Scene, id: EntityId, selection: &[EntityId], actions: &mut Vec<AppAction>) {
    let Some(entity) = scene.get(id) else {
        return;
    };
    let selected = selection.contains(&id);
    let children = scene.children(id);

    let select = |ui: &mut Ui, actions: &mut Vec<AppAction>| {
        let response = ui.selectable_label(selected, &entity.name);
        if response.clicked() {
            let additive = ui.input(|i| i.modifiers.shift);
            let ids = if additive {
                let mut ids = selection.to_vec();
                if selected {
                    ids.retain(|&s| s != id);
                } else {
                    ids.push(id);
                }
                ids
            } else {
                vec![id]
            };
            actions.push(AppAction::Select(ids));
        }
    };

    if children.is_empty() {
        ui.horizontal(|ui| {
            ui.add_space(18.0);
            select(ui, actions);
        });
        return;
    }

    egui::collapsing_header::CollapsingState::load_with_default_open(ui.ctx(), ui.make_persistent_id(id), true)
        .show_header(ui, |ui| select(ui, actions))
        .body(|ui| {
            for &child in children {
                entity_row(ui, scene, child, selection, actions);
            }
        });
}

impl OutlinerPanel {
    fn transform_editor(&mut self, ui: &mut Ui, id: EntityId, transform: Transform, actions: &mut Vec<AppAction>) {
        let mut edited = transform;
        let mut degrees = transform.rotation * (180.0 / std::f32::consts::PI);
        let mut changed = false;
        let mut finished = false;

        egui::Grid::new("transform_grid")
            .num_columns(4)
            .spacing([4.0, 4.0])
            .show(ui, |ui| {
                for (label, values, speed, suffix) in [
                    ("Position", &mut edited.position, 0.01, ""),
                    ("Rotation", &mut degrees, 0.5, "\u{00b0}"),
                    ("Scale", &mut edited.scale, 0.01, ""),
                ] {
                    ui.label(label);
                    for value in [&mut values.x, &mut values.y, &mut values.z] {
                        let response = ui.add(egui::DragValue::new(value).speed(speed).suffix(suffix));
                        changed |= response.changed();
                        finished |= response.drag_stopped() || response.lost_focus();
                    }
                    ui.end_row();
                }
            });

        let mut order = edited.rotation_order;
        ui.horizontal(|ui| {
            ui.label("Rotation order:");
            egui::ComboBox::from_id_salt("rotation_order")
                .selected_text(order.label())
                .show_ui(ui, |ui| {
                    for option in EulerOrder::ALL {
                        ui.selectable_value(&mut order, option, option.label());
                    }
                });
        });

        if changed {
            edited.rotation = degrees * (std::f32::consts::PI / 180.0);
        }
        if order != edited.rotation_order {
            // Same orientation, re-expressed in the new order
            let rotation = edited.quat();
            edited.rotation_order = order;
            edited.set_quat(rotation);
            changed = true;
            finished = true;
        }

        if changed {
            actions.push(AppAction::SetTransform { id, transform: edited });
            self.dirty = true;
        }
        if finished && std::mem::take(&mut self.dirty) {
            actions.push(AppAction::CommitTransformEdit);
        }

        if ui.button("Reset").clicked() {
            actions.push(AppAction::ResetTransform);
        }
    }
}
