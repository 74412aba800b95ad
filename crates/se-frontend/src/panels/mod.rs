//! UI panels

mod history;
mod outliner;
mod settings;
mod viewport;

pub use history::HistoryPanel;
pub use outliner::OutlinerPanel;
pub use settings::GizmoSettingsPanel;
pub use viewport::ViewportPanel;

use crate::config::SharedConfig;
use crate::state::SharedAppState;

/// Panel trait for the editor's side and center panels
pub trait Panel {
    /// Panel name for headings
    fn name(&self) -> &str;

    /// Draw the panel UI
    fn ui(&mut self, ui: &mut egui::Ui, app_state: &SharedAppState, config: &SharedConfig);
}
