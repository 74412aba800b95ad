//! Gizmo constants
//!
//! Thresholds in this module control when handles become unreachable versus
//! visually cluttered; changing them changes interaction behavior.

/// Projection and intersection tolerances
pub mod math {
    /// Below this `|dot(normal, direction)|` a ray is treated as parallel to a plane
    pub const PARALLEL_EPSILON: f32 = 1e-6;
    /// `|w|` below this is a degenerate projection
    pub const W_EPSILON: f32 = 1e-8;
}

/// Basis builder constants
pub mod basis {
    /// World-space gizmo size per unit of camera distance
    pub const SCREEN_SCALE_FACTOR: f32 = 0.15;
    /// Camera-to-origin distance floor, keeps the scale strictly positive
    pub const MIN_CAMERA_DISTANCE: f32 = 1e-3;
    /// Columns shorter than this fall back to the world axis in local mode
    pub const MIN_AXIS_LENGTH: f32 = 1e-6;
}

/// Axis / plane fade thresholds
pub mod opacity {
    /// Axis alignment where fading starts
    pub const AXIS_FADE_START: f32 = 0.90;
    /// Axis alignment where the handle is fully hidden
    pub const AXIS_FADE_END: f32 = 0.99;
    /// Plane alignment where fading starts
    pub const PLANE_FADE_START: f32 = 0.2;
    /// Plane alignment where the handle is fully hidden
    pub const PLANE_FADE_END: f32 = 0.1;
    /// Handles below this opacity are neither drawn nor pickable
    pub const VISIBILITY_CUTOFF: f32 = 0.05;
}

/// Geometry generation defaults
pub mod geometry {
    /// Cone arrowhead segments
    pub const CONE_SEGMENTS: u32 = 8;
    /// Arrow shaft prism sides
    pub const SHAFT_SIDES: u32 = 6;
    /// Ring segments around the torus
    pub const RING_SEGMENTS: u32 = 48;
    /// Tube segments around the torus cross-section
    pub const TUBE_SEGMENTS: u32 = 8;
    /// Segments of flat circular handles
    pub const DISC_SEGMENTS: u32 = 16;
    /// Torus cache key precision (three decimals)
    pub const CACHE_KEY_SCALE: f32 = 1000.0;
}

/// Directional light used by the volumetric renderer
pub mod shading {
    /// Light direction (normalized at use)
    pub const LIGHT_DIRECTION: [f32; 3] = [0.4, 0.8, 0.6];
    /// Ambient term
    pub const AMBIENT: f32 = 0.55;
    /// Diffuse term
    pub const DIFFUSE: f32 = 0.45;
    /// Intensity that maps to the unshaded base color
    pub const NEUTRAL_INTENSITY: f32 = 0.8;
    /// Outline width of shaded faces, in pixels
    pub const EDGE_WIDTH: f32 = 0.5;
}

/// Interaction constants
pub mod interaction {
    /// Scale floor, prevents inverted or degenerate meshes
    pub const MIN_SCALE: f32 = 0.01;
    /// Handles projected shorter than this (pixels) cannot start a scale drag
    pub const MIN_HANDLE_PIXELS: f32 = 4.0;
    /// Pixel length floor used for screen-space scale sensitivity
    pub const SCALE_REFERENCE_PIXELS: f32 = 40.0;
    /// Tolerance when deciding whether a drag changed the transform
    pub const CHANGE_EPSILON: f32 = 1e-6;
    /// Per-element tolerance of the host's external-change detection
    pub const SYNC_EPSILON: f32 = 1e-4;
    /// Screen-space pick tolerance of the view ring, in pixels
    pub const VIEW_RING_PICK_PIXELS: f32 = 6.0;
    /// Ring hit tolerance as a fraction of the gizmo scale
    pub const RING_HIT_THICKNESS: f32 = 0.08;
    /// Axis shaft hit radius as a fraction of the gizmo scale
    pub const AXIS_HIT_RADIUS: f32 = 0.07;
}
