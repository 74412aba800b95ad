//! Commit history panel

use crate::config::SharedConfig;
use crate::panels::Panel;
use crate::state::SharedAppState;

/// Read-only list of committed edits
pub struct HistoryPanel;

impl HistoryPanel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HistoryPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel for HistoryPanel {
    fn name(&self) -> &str {
        "History"
    }

    fn ui(&mut self, ui: &mut egui::Ui, app_state: &SharedAppState, _config: &SharedConfig) {
        let mut state = app_state.lock();

        ui.horizontal(|ui| {
            ui.heading(self.name());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("Clear").clicked() {
                    state.history.clear();
                }
            });
        });
        ui.label(format!("{} commits", state.history.commits()));
        ui.separator();

        if state.history.last().is_none() {
            ui.weak("Nothing committed yet");
            return;
        }

        egui::ScrollArea::vertical()
            .id_salt("history_scroll")
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for entry in state.history.entries() {
                    ui.monospace(format!("{:>4}  {}", entry.index, entry.label));
                }
            });
    }
}
