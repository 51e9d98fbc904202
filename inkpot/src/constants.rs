//! Shared constants for atlas packing and glyph styling.
//!
//! Single source of truth for the coverage bands and SDF defaults.

/// Default atlas width in pixels.
pub const DEFAULT_ATLAS_WIDTH: usize = 512;

/// Default atlas height in pixels.
pub const DEFAULT_ATLAS_HEIGHT: usize = 512;

/// Largest atlas the grow policy will allocate by default.
pub const MAX_ATLAS_SIZE: usize = 8192;

/// Coverage at or above this value is drawn fully opaque.
pub const OPAQUE_THRESHOLD: u8 = 160;

/// Coverage at or below this value keeps its raw alpha.
pub const FAINT_THRESHOLD: u8 = 60;

/// Width of the anti-aliased edge band, in coverage units.
pub const EDGE_BAND: f32 = 60.0;

/// Smoothstep edges applied to the normalized band distance.
pub const EDGE_SMOOTH_LOW: f32 = 0.75;
pub const EDGE_SMOOTH_HIGH: f32 = 1.0;

/// SDF padding around each rasterized glyph, in pixels.
pub const SDF_PADDING: u32 = 5;

/// SDF value written exactly on the outline.
pub const SDF_ON_EDGE_VALUE: u8 = 255;

/// SDF value change per pixel of distance from the outline.
pub const SDF_PIXEL_DIST_SCALE: f32 = 255.0 / 5.0;
