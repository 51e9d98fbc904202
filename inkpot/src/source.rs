//! Glyph source abstraction.
//!
//! Font parsing, outline rasterization and kerning live behind
//! [`GlyphSource`]. The renderer only consumes metrics in font units and
//! 8-bit signed-distance bitmaps.

use serde::{Deserialize, Serialize};

use crate::constants::{SDF_ON_EDGE_VALUE, SDF_PADDING, SDF_PIXEL_DIST_SCALE};
use crate::error::RenderResult;

/// Font-wide vertical metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VMetrics {
    pub ascent: i32,
    /// Typically negative.
    pub descent: i32,
    pub line_gap: i32,
}

impl VMetrics {
    /// Scale to pixels, truncating toward zero.
    pub fn scaled(&self, scale: f32) -> VMetrics {
        VMetrics {
            ascent: (self.ascent as f32 * scale) as i32,
            descent: (self.descent as f32 * scale) as i32,
            line_gap: (self.line_gap as f32 * scale) as i32,
        }
    }
}

/// Per-glyph horizontal metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HMetrics {
    pub advance_width: i32,
    pub left_side_bearing: i32,
}

impl HMetrics {
    /// Scale to pixels, truncating toward zero.
    pub fn scaled(&self, scale: f32) -> HMetrics {
        HMetrics {
            advance_width: (self.advance_width as f32 * scale) as i32,
            left_side_bearing: (self.left_side_bearing as f32 * scale) as i32,
        }
    }
}

/// Parameters for signed-distance-field rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdfParams {
    /// Extra pixels around the glyph box.
    pub padding: u32,
    /// Value written exactly on the outline.
    pub on_edge_value: u8,
    /// Value change per pixel of distance; positive inside the outline.
    pub pixel_dist_scale: f32,
}

impl Default for SdfParams {
    fn default() -> Self {
        Self {
            padding: SDF_PADDING,
            on_edge_value: SDF_ON_EDGE_VALUE,
            pixel_dist_scale: SDF_PIXEL_DIST_SCALE,
        }
    }
}

/// An owned 8-bit SDF bitmap. Dropping it releases the buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SdfBitmap {
    /// Row-major values, `width * height` bytes.
    pub coverage: Vec<u8>,
    pub width: usize,
    pub height: usize,
    /// Bitmap origin relative to the pen, y pointing down.
    pub offset_x: i32,
    pub offset_y: i32,
}

/// A font that can report metrics and rasterize glyphs.
pub trait GlyphSource {
    /// Scale factor mapping font units to the given pixel height
    /// (ascent to descent).
    fn scale_for_pixel_height(&self, pixel_height: f32) -> f32;

    /// Font-wide vertical metrics in font units.
    fn v_metrics(&self) -> VMetrics;

    /// Horizontal metrics for `codepoint` in font units.
    fn h_metrics(&self, codepoint: char) -> HMetrics;

    /// Kerning adjustment between two codepoints in font units.
    fn kern_advance(&self, left: char, right: char) -> i32;

    /// Rasterize `codepoint` as a signed distance field.
    ///
    /// Returns `None` for glyphs without an outline, such as space.
    fn rasterize_sdf(&self, codepoint: char, scale: f32, params: &SdfParams) -> Option<SdfBitmap>;
}

/// A glyph source that can be built from raw font file bytes.
pub trait FontLoader: GlyphSource + Sized {
    fn from_font_bytes(bytes: Vec<u8>) -> RenderResult<Self>;
}
