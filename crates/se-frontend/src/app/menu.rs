//! Menu bar rendering

use se_gizmo::{Tool, TransformSpace};

use crate::state::{AppAction, SharedAppState};

/// Render the menu bar and return any triggered action
pub fn render_menu_bar(ctx: &egui::Context, app_state: &SharedAppState) -> Option<MenuAction> {
    let mut menu_action = None;

    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("New Scene").clicked() {
                    menu_action = Some(MenuAction::NewScene);
                    ui.close_menu();
                }
                #[cfg(not(target_arch = "wasm32"))]
                {
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                }
            });

            ui.menu_button("Edit", |ui| {
                for (label, action) in [
                    ("Add Box", AppAction::AddBox),
                    ("Reset Transform", AppAction::ResetTransform),
                    ("Delete Selected", AppAction::DeleteSelected),
                ] {
                    if ui.button(label).clicked() {
                        app_state.lock().queue_action(action);
                        ui.close_menu();
                    }
                }
            });

            ui.menu_button("Gizmo", |ui| {
                let (tool, space) = {
                    let state = app_state.lock();
                    (state.host.tool(), state.host.space())
                };
                for option in Tool::ALL {
                    if ui.radio(tool == option, option.label()).clicked() {
                        app_state.lock().queue_action(AppAction::SetTool(option));
                        ui.close_menu();
                    }
                }
                ui.separator();
                for option in TransformSpace::ALL {
                    if ui.radio(space == option, option.label()).clicked() {
                        app_state.lock().queue_action(AppAction::SetSpace(option));
                        ui.close_menu();
                    }
                }
            });

            ui.menu_button("View", |ui| {
                if ui.button("Frame Selection").clicked() {
                    app_state.lock().queue_action(AppAction::FocusSelection);
                    ui.close_menu();
                }
                if ui.button("Toggle Side Panels").clicked() {
                    menu_action = Some(MenuAction::ToggleSidePanels);
                    ui.close_menu();
                }
            });
        });
    });

    menu_action
}

/// Actions triggered by the menu that the app handles itself
pub enum MenuAction {
    NewScene,
    ToggleSidePanels,
}
