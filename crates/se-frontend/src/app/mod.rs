//! Main application module

mod menu;

use crate::config::{SharedConfig, create_shared_config};
use crate::panels::{GizmoSettingsPanel, HistoryPanel, OutlinerPanel, Panel, ViewportPanel};
use crate::state::{AppAction, AppState, SharedAppState, create_shared_state};

pub use menu::{MenuAction, render_menu_bar};

/// Main application
pub struct SceneEditorApp {
    app_state: SharedAppState,
    config: SharedConfig,
    outliner: OutlinerPanel,
    history: HistoryPanel,
    settings: GizmoSettingsPanel,
    viewport: ViewportPanel,
    show_side_panels: bool,
}

impl SceneEditorApp {
    /// Create a new app
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        tracing::info!("Starting scene editor");
        Self {
            app_state: create_shared_state(),
            config: create_shared_config(),
            outliner: OutlinerPanel::new(),
            history: HistoryPanel::new(),
            settings: GizmoSettingsPanel::new(),
            viewport: ViewportPanel::new(),
            show_side_panels: true,
        }
    }

    /// Process pending actions
    fn process_actions(&mut self) {
        let mut state = self.app_state.lock();
        for action in state.take_pending_actions() {
            state.apply(action);
        }
    }

    fn handle_menu_action(&mut self, action: MenuAction) {
        match action {
            MenuAction::NewScene => {
                let mut state = self.app_state.lock();
                // Finish any drag against the old scene first
                state.apply(AppAction::Select(Vec::new()));
                *state = AppState::new();
                tracing::info!("New scene");
            }
            MenuAction::ToggleSidePanels => {
                self.show_side_panels = !self.show_side_panels;
            }
        }
    }
}

impl eframe::App for SceneEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_actions();

        if let Some(menu_action) = render_menu_bar(ctx, &self.app_state) {
            self.handle_menu_action(menu_action);
        }

        if self.show_side_panels {
            egui::SidePanel::left("outliner_panel")
                .resizable(true)
                .default_width(260.0)
                .show(ctx, |ui| {
                    self.outliner.ui(ui, &self.app_state, &self.config);
                    ui.separator();
                    self.history.ui(ui, &self.app_state, &self.config);
                });

            egui::SidePanel::right("settings_panel")
                .resizable(true)
                .default_width(280.0)
                .show(ctx, |ui| {
                    self.settings.ui(ui, &self.app_state, &self.config);
                });
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                self.viewport.ui(ui, &self.app_state, &self.config);
            });
    }
}
