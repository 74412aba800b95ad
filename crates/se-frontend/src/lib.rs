//! Scene Editor Frontend
//!
//! egui application hosting the transform gizmos over a preview of the
//! scene.

pub mod app;
pub mod config;
pub mod panels;
pub mod state;

// Re-exports for convenience
pub use app::SceneEditorApp;
pub use config::{SharedConfig, create_shared_config};
pub use state::{AppAction, AppState, SharedAppState};
