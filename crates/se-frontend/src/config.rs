//! Gizmo configuration shared across panels
//!
//! The configuration lives in memory for the session only. The settings
//! panel edits it in place; the viewport reads it once per frame.

use std::sync::Arc;

use parking_lot::RwLock;
use se_gizmo::GizmoConfig;

/// Process-wide gizmo configuration
pub type SharedConfig = Arc<RwLock<GizmoConfig>>;

/// Create the shared configuration with default values
pub fn create_shared_config() -> SharedConfig {
    Arc::new(RwLock::new(GizmoConfig::default()))
}

/// Serialize a configuration as pretty JSON
pub fn export_json(config: &GizmoConfig) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(config)
}

/// Parse a configuration from JSON, sanitizing out-of-range values.
///
/// Unknown shape names fall back to their defaults instead of failing.
pub fn import_json(json: &str) -> Result<GizmoConfig, serde_json::Error> {
    serde_json::from_str::<GizmoConfig>(json).map(|config| config.sanitized())
}

#[cfg(test)]
mod tests {
    use super::*;
    use se_gizmo::ArrowHead;

    #[test]
    fn test_export_import_keeps_edits() {
        let config = GizmoConfig {
            arrow_head: ArrowHead::Rhombus,
            ring_radius: 1.3,
            ..GizmoConfig::default()
        };
        let json = export_json(&config).unwrap();
        let parsed = import_json(&json).unwrap();
        assert_eq!(parsed.arrow_head, ArrowHead::Rhombus);
        assert_eq!(parsed.ring_radius, 1.3);
    }

    #[test]
    fn test_import_sanitizes_sizes() {
        let parsed = import_json(r#"{"arrow_length": -2.0, "arrow_head": "SPIRAL"}"#).unwrap();
        assert_eq!(parsed.arrow_length, GizmoConfig::default().arrow_length);
        assert_eq!(parsed.arrow_head, ArrowHead::default());
    }
}
