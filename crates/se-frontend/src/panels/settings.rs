//! Gizmo settings panel

use se_gizmo::{ArrowHead, CenterHandle, GizmoConfig, PlaneHandle};

use crate::config::{SharedConfig, export_json, import_json};
use crate::panels::Panel;
use crate::state::SharedAppState;

/// Side panel editing the shared [`GizmoConfig`]
#[derive(Default)]
pub struct GizmoSettingsPanel {
    /// Result of the last export, shown under the buttons
    status: Option<String>,
    /// Pasted JSON waiting to be applied
    import_buffer: String,
}

impl GizmoSettingsPanel {
    /// Create the panel with no pending import
    pub fn new() -> Self {
        Self::default()
    }

    fn shapes(ui: &mut egui::Ui, cfg: &mut GizmoConfig) -> bool {
        let mut changed = false;
        ui.collapsing("Shapes", |ui| {
            egui::Grid::new("gizmo_shapes").num_columns(2).show(ui, |ui| {
                ui.label("Arrow head:");
                egui::ComboBox::from_id_salt("arrow_head")
                    .selected_text(cfg.arrow_head.as_str())
                    .show_ui(ui, |ui| {
                        for &shape in ArrowHead::ALL {
                            changed |= ui
                                .selectable_value(&mut cfg.arrow_head, shape, shape.as_str())
                                .changed();
                        }
                    });
                ui.end_row();

                ui.label("Center handle:");
                egui::ComboBox::from_id_salt("center_handle")
                    .selected_text(cfg.center_handle.as_str())
                    .show_ui(ui, |ui| {
                        for &shape in CenterHandle::ALL {
                            changed |= ui
                                .selectable_value(&mut cfg.center_handle, shape, shape.as_str())
                                .changed();
                        }
                    });
                ui.end_row();

                ui.label("Plane handle:");
                egui::ComboBox::from_id_salt("plane_handle")
                    .selected_text(cfg.plane_handle.as_str())
                    .show_ui(ui, |ui| {
                        for &shape in PlaneHandle::ALL {
                            changed |= ui
                                .selectable_value(&mut cfg.plane_handle, shape, shape.as_str())
                                .changed();
                        }
                    });
                ui.end_row();
            });
        });
        changed
    }

    fn sizes(ui: &mut egui::Ui, cfg: &mut GizmoConfig) -> bool {
        let mut changed = false;
        ui.collapsing("Sizes", |ui| {
            for (value, range, label) in [
                (&mut cfg.arrow_length, 0.3..=2.0, "Arrow length"),
                (&mut cfg.head_length, 0.05..=0.5, "Head length"),
                (&mut cfg.head_radius, 0.02..=0.2, "Head radius"),
                (&mut cfg.shaft_radius, 0.005..=0.05, "Shaft radius"),
                (&mut cfg.center_size, 0.02..=0.2, "Center size"),
                (&mut cfg.plane_size, 0.05..=0.5, "Plane size"),
                (&mut cfg.plane_offset, 0.05..=1.0, "Plane offset"),
                (&mut cfg.scale_handle_size, 0.02..=0.2, "Scale cube"),
            ] {
                changed |= ui.add(egui::Slider::new(value, range).text(label)).changed();
            }
        });
        ui.collapsing("Rings", |ui| {
            changed |= ui
                .add(egui::Slider::new(&mut cfg.ring_radius, 0.3..=2.0).text("Ring radius"))
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut cfg.ring_tube_radius, 0.005..=0.08).text("Tube radius"))
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut cfg.view_ring_factor, 1.0..=1.6).text("View ring factor"))
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut cfg.ring_segments, 12..=128).text("Ring segments"))
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut cfg.tube_segments, 3..=16).text("Tube segments"))
                .changed();
        });
        changed
    }

    fn colors(ui: &mut egui::Ui, cfg: &mut GizmoConfig) -> bool {
        let mut changed = false;
        ui.collapsing("Colors", |ui| {
            egui::Grid::new("gizmo_colors").num_columns(2).show(ui, |ui| {
                for (i, axis) in ["X", "Y", "Z"].into_iter().enumerate() {
                    ui.label(format!("{axis} axis:"));
                    changed |= ui.color_edit_button_rgba_unmultiplied(&mut cfg.axis_colors[i]).changed();
                    ui.end_row();
                }
                for (color, label) in [
                    (&mut cfg.view_color, "View ring:"),
                    (&mut cfg.center_color, "Center:"),
                    (&mut cfg.hover_color, "Hover:"),
                    (&mut cfg.active_color, "Active:"),
                    (&mut cfg.sector_color, "Sector:"),
                ] {
                    ui.label(label);
                    changed |= ui.color_edit_button_rgba_unmultiplied(color).changed();
                    ui.end_row();
                }
            });
            changed |= ui
                .add(egui::Slider::new(&mut cfg.hover_thickness, 1.0..=3.0).text("Hover thickness"))
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut cfg.active_thickness, 1.0..=3.0).text("Active thickness"))
                .changed();
        });
        changed
    }

    fn toggles(ui: &mut egui::Ui, cfg: &mut GizmoConfig) -> bool {
        let mut changed = false;
        ui.collapsing("Display", |ui| {
            for (value, label) in [
                (&mut cfg.show_plane_handles, "Plane handles"),
                (&mut cfg.show_center_handle, "Center handle"),
                (&mut cfg.show_view_ring, "View ring"),
                (&mut cfg.show_rotation_sector, "Rotation sector"),
                (&mut cfg.show_angle_readout, "Angle readout"),
                (&mut cfg.show_axis_labels, "Axis labels"),
            ] {
                changed |= ui.checkbox(value, label).changed();
            }
        });
        ui.collapsing("Snapping", |ui| {
            changed |= ui.checkbox(&mut cfg.snap_enabled, "Enabled").changed();
            ui.add_enabled_ui(cfg.snap_enabled, |ui| {
                changed |= ui
                    .add(egui::Slider::new(&mut cfg.translate_snap, 0.01..=2.0).text("Move"))
                    .changed();
                changed |= ui
                    .add(
                        egui::Slider::new(&mut cfg.rotate_snap_degrees, 1.0..=90.0)
                            .text("Rotate")
                            .suffix("\u{00b0}"),
                    )
                    .changed();
                changed |= ui
                    .add(egui::Slider::new(&mut cfg.scale_snap, 0.01..=1.0).text("Scale"))
                    .changed();
            });
        });
        changed
    }
}

impl Panel for GizmoSettingsPanel {
    fn name(&self) -> &str {
        "Gizmo Settings"
    }

    fn ui(&mut self, ui: &mut egui::Ui, _app_state: &SharedAppState, config: &SharedConfig) {
        ui.heading(self.name());
        ui.separator();

        egui::ScrollArea::vertical().show(ui, |ui| {
            let mut cfg = config.write();
            let mut changed = Self::shapes(ui, &mut cfg);
            changed |= Self::sizes(ui, &mut cfg);
            changed |= Self::colors(ui, &mut cfg);
            changed |= Self::toggles(ui, &mut cfg);
            if changed {
                ui.ctx().request_repaint();
            }
        });

        ui.separator();

        ui.horizontal(|ui| {
            if ui.button("Reset to Defaults").clicked() {
                *config.write() = GizmoConfig::default();
                self.status = None;
            }
            if ui.button("Copy JSON").clicked() {
                match export_json(&config.read()) {
                    Ok(json) => {
                        ui.ctx().copy_text(json);
                        self.status = Some("Copied to clipboard".to_owned());
                    }
                    Err(e) => {
                        tracing::error!("Failed to export gizmo config: {}", e);
                        self.status = Some(format!("Export failed: {e}"));
                    }
                }
            }
        });

        ui.collapsing("Import JSON", |ui| {
            ui.add(
                egui::TextEdit::multiline(&mut self.import_buffer)
                    .code_editor()
                    .desired_rows(4)
                    .desired_width(f32::INFINITY),
            );
            if ui.button("Apply").clicked() {
                match import_json(&self.import_buffer) {
                    Ok(imported) => {
                        *config.write() = imported;
                        self.import_buffer.clear();
                        self.status = Some("Configuration imported".to_owned());
                    }
                    Err(e) => {
                        tracing::warn!("Rejected gizmo config: {}", e);
                        self.status = Some(format!("Invalid JSON: {e}"));
                    }
                }
            }
        });

        if let Some(status) = &self.status {
            ui.weak(status);
        }
    }
}
