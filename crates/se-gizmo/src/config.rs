//! Gizmo configuration
//!
//! One process-wide, user-editable set of shapes, sizes, colors and toggles.
//! Sizes are expressed in gizmo units, which the basis scale converts to
//! world units every frame.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::geometry;
use crate::render::Color;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A shape name that matches no variant
    #[error("Unknown {kind} '{value}'")]
    UnknownVariant {
        /// Which setting was being parsed
        kind: &'static str,
        /// The rejected input
        value: String,
    },
}

/// Closed shape enums. Parsing is case-insensitive; the serde path falls back
/// to the default variant instead of failing.
macro_rules! shape_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            #[default] $default:ident => $default_str:literal,
            $($variant:ident => $str:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            #[doc = concat!("`", $default_str, "` (default)")]
            #[default]
            $default,
            $(
                #[doc = concat!("`", $str, "`")]
                $variant
            ),+
        }

        impl $name {
            /// All variants, in display order
            pub const ALL: &'static [$name] = &[$name::$default, $($name::$variant),+];

            /// Canonical name
            pub fn as_str(self) -> &'static str {
                match self {
                    $name::$default => $default_str,
                    $($name::$variant => $str),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| ConfigError::UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                value.parse().unwrap_or_else(|e| {
                    warn!("{e}, using {}", Self::default());
                    Self::default()
                })
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }
    };
}

shape_enum! {
    /// Arrowhead of the translate gizmo
    ArrowHead, "arrowhead" {
        #[default] Cone => "CONE",
        Tetrahedron => "TETRAHEDRON",
        Rhombus => "RHOMBUS",
        Cube => "CUBE",
    }
}

shape_enum! {
    /// Free-move / uniform-scale center handle
    CenterHandle, "center handle" {
        #[default] Cube => "CUBE",
        Sphere => "SPHERE",
        Octahedron => "OCTAHEDRON",
        QuadCircle => "QUAD_CIRCLE",
    }
}

shape_enum! {
    /// Two-axis plane handle
    PlaneHandle, "plane handle" {
        #[default] Square => "SQUARE",
        Circle => "CIRCLE",
    }
}

/// Gizmo configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GizmoConfig {
    /// Arrowhead shape at the end of translate axes
    pub arrow_head: ArrowHead,
    /// Shape of the free-move / uniform-scale handle
    pub center_handle: CenterHandle,
    /// Shape of the two-axis plane handles
    pub plane_handle: PlaneHandle,

    /// Axis length (tip of the arrowhead)
    pub arrow_length: f32,
    /// Length of the arrowhead along the axis
    pub head_length: f32,
    /// Base radius of the arrowhead
    pub head_radius: f32,
    /// Radius of axis shafts
    pub shaft_radius: f32,
    /// Radius of the center handle
    pub center_size: f32,
    /// Edge length of plane handles
    pub plane_size: f32,
    /// Distance of plane handles from the origin along both of their axes
    pub plane_offset: f32,
    /// Half extent of the cubes at the end of scale axes
    pub scale_handle_size: f32,

    /// Radius of the axis rings
    pub ring_radius: f32,
    /// Tube radius of the ring tori
    pub ring_tube_radius: f32,
    /// View ring radius relative to `ring_radius`
    pub view_ring_factor: f32,
    /// Segments around each ring
    pub ring_segments: u32,
    /// Segments around the tube of each ring
    pub tube_segments: u32,

    /// X, Y and Z handle colors
    pub axis_colors: [Color; 3],
    /// Color of the camera-facing view ring
    pub view_color: Color,
    /// Color of the center handle
    pub center_color: Color,
    /// Color of the hovered handle
    pub hover_color: Color,
    /// Color of the handle being dragged
    pub active_color: Color,
    /// Fill of the rotation sweep sector
    pub sector_color: Color,
    /// Thickness multiplier of hovered handles
    pub hover_thickness: f32,
    /// Thickness multiplier of the handle being dragged
    pub active_thickness: f32,

    /// Draw and pick the plane handles
    pub show_plane_handles: bool,
    /// Draw and pick the center handle
    pub show_center_handle: bool,
    /// Draw and pick the view ring
    pub show_view_ring: bool,
    /// Fill the swept sector while rotating
    pub show_rotation_sector: bool,
    /// Show the angle label while rotating
    pub show_angle_readout: bool,
    /// Label axis tips with X / Y / Z
    pub show_axis_labels: bool,

    /// Quantize drags to the steps below
    pub snap_enabled: bool,
    /// Translation step in world units
    pub translate_snap: f32,
    /// Rotation step in degrees
    pub rotate_snap_degrees: f32,
    /// Scale step
    pub scale_snap: f32,
}

impl Default for GizmoConfig {
    fn default() -> Self {
        Self {
            arrow_head: ArrowHead::Cone,
            center_handle: CenterHandle::Cube,
            plane_handle: PlaneHandle::Square,
            arrow_length: 1.0,
            head_length: 0.22,
            head_radius: 0.07,
            shaft_radius: 0.015,
            center_size: 0.08,
            plane_size: 0.22,
            plane_offset: 0.3,
            scale_handle_size: 0.06,
            ring_radius: 0.9,
            ring_tube_radius: 0.02,
            view_ring_factor: 1.2,
            ring_segments: geometry::RING_SEGMENTS,
            tube_segments: geometry::TUBE_SEGMENTS,
            axis_colors: [
                [0.90, 0.25, 0.25, 1.0],
                [0.35, 0.80, 0.25, 1.0],
                [0.25, 0.45, 0.95, 1.0],
            ],
            view_color: [0.85, 0.85, 0.85, 1.0],
            center_color: [0.90, 0.90, 0.90, 1.0],
            hover_color: [1.0, 0.85, 0.2, 1.0],
            active_color: [1.0, 0.65, 0.1, 1.0],
            sector_color: [1.0, 0.85, 0.2, 0.25],
            hover_thickness: 1.5,
            active_thickness: 2.0,
            show_plane_handles: true,
            show_center_handle: true,
            show_view_ring: true,
            show_rotation_sector: true,
            show_angle_readout: true,
            show_axis_labels: true,
            snap_enabled: false,
            translate_snap: 0.25,
            rotate_snap_degrees: 15.0,
            scale_snap: 0.1,
        }
    }
}

fn positive_or(value: &mut f32, fallback: f32, name: &str) {
    if !value.is_finite() || *value <= 0.0 {
        warn!("Invalid gizmo config {name} = {value}, using {fallback}");
        *value = fallback;
    }
}

impl GizmoConfig {
    /// Copy with every size field forced positive and finite
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let mut config = self.clone();
        for (value, fallback, name) in [
            (&mut config.arrow_length, defaults.arrow_length, "arrow_length"),
            (&mut config.head_length, defaults.head_length, "head_length"),
            (&mut config.head_radius, defaults.head_radius, "head_radius"),
            (&mut config.shaft_radius, defaults.shaft_radius, "shaft_radius"),
            (&mut config.center_size, defaults.center_size, "center_size"),
            (&mut config.plane_size, defaults.plane_size, "plane_size"),
            (&mut config.plane_offset, defaults.plane_offset, "plane_offset"),
            (&mut config.scale_handle_size, defaults.scale_handle_size, "scale_handle_size"),
            (&mut config.ring_radius, defaults.ring_radius, "ring_radius"),
            (&mut config.ring_tube_radius, defaults.ring_tube_radius, "ring_tube_radius"),
            (&mut config.view_ring_factor, defaults.view_ring_factor, "view_ring_factor"),
            (&mut config.hover_thickness, defaults.hover_thickness, "hover_thickness"),
            (&mut config.active_thickness, defaults.active_thickness, "active_thickness"),
            (&mut config.translate_snap, defaults.translate_snap, "translate_snap"),
            (&mut config.rotate_snap_degrees, defaults.rotate_snap_degrees, "rotate_snap_degrees"),
            (&mut config.scale_snap, defaults.scale_snap, "scale_snap"),
        ] {
            positive_or(value, fallback, name);
        }
        if config.ring_segments < 3 {
            warn!("Invalid gizmo config ring_segments = {}", config.ring_segments);
            config.ring_segments = defaults.ring_segments;
        }
        if config.tube_segments < 3 {
            warn!("Invalid gizmo config tube_segments = {}", config.tube_segments);
            config.tube_segments = defaults.tube_segments;
        }
        config
    }

    /// Translation snap increment, `None` when snapping is off
    pub fn translate_step(&self) -> Option<f32> {
        self.snap_enabled.then_some(self.translate_snap)
    }

    /// Rotation snap increment in degrees, `None` when snapping is off
    pub fn rotate_step_degrees(&self) -> Option<f32> {
        self.snap_enabled.then_some(self.rotate_snap_degrees)
    }

    /// Scale snap increment, `None` when snapping is off
    pub fn scale_step(&self) -> Option<f32> {
        self.snap_enabled.then_some(self.scale_snap)
    }

    /// Color of axis `index`
    pub fn axis_color(&self, index: usize) -> Color {
        self.axis_colors[index.min(2)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_parsing() {
        assert_eq!("cone".parse::<ArrowHead>(), Ok(ArrowHead::Cone));
        assert_eq!(" RHOMBUS ".parse::<ArrowHead>(), Ok(ArrowHead::Rhombus));
        assert_eq!("quad_circle".parse::<CenterHandle>(), Ok(CenterHandle::QuadCircle));
        assert!(matches!(
            "pyramid".parse::<ArrowHead>(),
            Err(ConfigError::UnknownVariant { kind: "arrowhead", .. })
        ));
    }

    #[test]
    fn test_unknown_shape_fails_closed() {
        let json = r#"{ "arrow_head": "PYRAMID", "plane_handle": "CIRCLE" }"#;
        let config: GizmoConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.arrow_head, ArrowHead::Cone);
        assert_eq!(config.plane_handle, PlaneHandle::Circle);
        // Missing fields take their defaults
        assert_eq!(config.ring_radius, GizmoConfig::default().ring_radius);
    }

    #[test]
    fn test_serialize_round_trip() {
        let config = GizmoConfig {
            arrow_head: ArrowHead::Tetrahedron,
            center_handle: CenterHandle::Octahedron,
            snap_enabled: true,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"TETRAHEDRON\""));
        let back: GizmoConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_sanitized_replaces_invalid_sizes() {
        let config = GizmoConfig {
            ring_radius: -1.0,
            head_length: f32::NAN,
            plane_size: 0.0,
            ring_segments: 1,
            arrow_length: 1.4,
            ..Default::default()
        }
        .sanitized();
        let defaults = GizmoConfig::default();
        assert_eq!(config.ring_radius, defaults.ring_radius);
        assert_eq!(config.head_length, defaults.head_length);
        assert_eq!(config.plane_size, defaults.plane_size);
        assert_eq!(config.ring_segments, geometry::RING_SEGMENTS);
        assert_eq!(defaults.tube_segments, geometry::TUBE_SEGMENTS);
        assert_eq!(config.arrow_length, 1.4);
    }

    #[test]
    fn test_snap_steps_follow_toggle() {
        let mut config = GizmoConfig::default();
        assert_eq!(config.translate_step(), None);
        config.snap_enabled = true;
        assert_eq!(config.rotate_step_degrees(), Some(15.0));
    }
}
