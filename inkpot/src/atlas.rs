//! Glyph atlas with shelf packing.
//!
//! Glyph bitmaps are packed left to right into rows ("shelves"); a new
//! shelf starts below the tallest glyph of the current one when the next
//! glyph does not fit horizontally. The atlas is append-only: placements
//! never move, even when the overflow policy grows the backing canvas.
//!
//! One atlas holds glyphs for exactly one font at one size. Codepoints are
//! the only key.

use std::collections::HashMap;
use std::path::Path;

use crate::canvas::Canvas;
use crate::config::OverflowPolicy;
use crate::constants::{EDGE_BAND, EDGE_SMOOTH_HIGH, EDGE_SMOOTH_LOW, FAINT_THRESHOLD, OPAQUE_THRESHOLD};
use crate::error::{RenderError, RenderResult};
use crate::pixel::Pixel;
use crate::region::Region;

/// Placement of a glyph in the atlas plus its layout offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GlyphInfo {
    /// Atlas position.
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
    /// Bitmap origin relative to the pen on the baseline, y pointing down.
    pub offset_x: i32,
    pub offset_y: i32,
}

impl GlyphInfo {
    /// Whether the glyph has no pixels (e.g. space).
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Shelf packing cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShelfCursor {
    /// Next free x in the current shelf.
    pub row_x: usize,
    /// Top of the current shelf.
    pub row_y: usize,
    /// Tallest glyph placed in the current shelf.
    pub row_height: usize,
}

impl ShelfCursor {
    /// Reserve `width x height` in an atlas of the given size.
    ///
    /// The cursor only moves when the glyph fits.
    fn try_place(&mut self, width: usize, height: usize, atlas_width: usize, atlas_height: usize) -> Option<(usize, usize)> {
        let mut next = *self;
        if next.row_x + width > atlas_width {
            next.row_x = 0;
            next.row_y += next.row_height;
            next.row_height = 0;
        }

        if width > atlas_width || next.row_y + height > atlas_height {
            return None;
        }

        let pos = (next.row_x, next.row_y);
        next.row_x += width;
        next.row_height = next.row_height.max(height);
        *self = next;
        Some(pos)
    }
}

/// Atlas usage statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AtlasStats {
    /// Number of glyphs recorded.
    pub glyph_count: usize,
    /// Number of times the backing canvas was grown.
    pub grows: usize,
}

/// Hermite interpolation of `x` between `edge0` and `edge1`.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Map one coverage/SDF byte to the stored atlas color.
///
/// Three bands: opaque white at or above 160, a black-to-white edge ramp
/// keeping the raw alpha strictly between 60 and 160, and white with the
/// raw alpha at or below 60.
pub fn coverage_to_pixel(value: u8) -> Pixel {
    if value >= OPAQUE_THRESHOLD {
        Pixel::WHITE
    } else if value > FAINT_THRESHOLD {
        let distance = (value - FAINT_THRESHOLD).min(OPAQUE_THRESHOLD - value) as f32 / EDGE_BAND;
        let t = smoothstep(EDGE_SMOOTH_LOW, EDGE_SMOOTH_HIGH, distance);
        Pixel::lerp(&Pixel::new(0, 0, 0, value), &Pixel::new(255, 255, 255, value), t)
    } else {
        Pixel::new(255, 255, 255, value)
    }
}

/// A canvas of packed glyphs and the codepoint lookup table.
#[derive(Debug, Clone)]
pub struct Atlas {
    canvas: Canvas,
    /// Fast lookup for ASCII codepoints.
    ascii: [Option<GlyphInfo>; 128],
    /// Everything else.
    glyphs: HashMap<char, GlyphInfo>,
    cursor: ShelfCursor,
    overflow: OverflowPolicy,
    stats: AtlasStats,
}

impl Atlas {
    /// Create an atlas that reports [`RenderError::AtlasFull`] when full.
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_policy(width, height, OverflowPolicy::Fail)
    }

    pub fn with_policy(width: usize, height: usize, overflow: OverflowPolicy) -> Self {
        Self {
            canvas: Canvas::new(width, height),
            ascii: [None; 128],
            glyphs: HashMap::new(),
            cursor: ShelfCursor::default(),
            overflow,
            stats: AtlasStats::default(),
        }
    }

    pub fn width(&self) -> usize {
        self.canvas.width()
    }

    pub fn height(&self) -> usize {
        self.canvas.height()
    }

    /// The backing canvas.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn cursor(&self) -> ShelfCursor {
        self.cursor
    }

    pub fn stats(&self) -> AtlasStats {
        self.stats
    }

    /// Number of recorded glyphs.
    pub fn len(&self) -> usize {
        self.stats.glyph_count
    }

    pub fn is_empty(&self) -> bool {
        self.stats.glyph_count == 0
    }

    /// Placement metadata for `codepoint`, if cached.
    #[inline]
    pub fn glyph_info(&self, codepoint: char) -> Option<GlyphInfo> {
        if codepoint.is_ascii() {
            return self.ascii[codepoint as usize];
        }
        self.glyphs.get(&codepoint).copied()
    }

    pub fn contains(&self, codepoint: char) -> bool {
        self.glyph_info(codepoint).is_some()
    }

    /// Cache lookup only: the glyph's atlas region and placement.
    ///
    /// Zero-area glyphs return an empty region.
    pub fn get_glyph(&self, codepoint: char) -> Option<(Region<'_>, GlyphInfo)> {
        let info = self.glyph_info(codepoint)?;
        if info.is_empty() {
            return Some((Region::empty(), info));
        }
        let region = self.canvas.view(info.x, info.y, info.width, info.height).ok()?;
        Some((region, info))
    }

    /// Pack a coverage bitmap into the atlas and record it under `codepoint`.
    ///
    /// `coverage` is row-major with at least `width * height` bytes; a shorter
    /// buffer fails with [`RenderError::CoverageTooShort`] before anything is
    /// placed. Re-adding a codepoint records a new slot and leaks the old one.
    pub fn add_glyph(
        &mut self,
        codepoint: char,
        coverage: &[u8],
        width: usize,
        height: usize,
        offset_x: i32,
        offset_y: i32,
    ) -> RenderResult<GlyphInfo> {
        let (x, y) = if width == 0 || height == 0 {
            (self.cursor.row_x, self.cursor.row_y)
        } else {
            if coverage.len() < width * height {
                return Err(RenderError::CoverageTooShort {
                    codepoint,
                    width,
                    height,
                    len: coverage.len(),
                });
            }
            let (x, y) = self.place(codepoint, width, height)?;
            let mut region = self.canvas.view_mut(x, y, width, height)?;
            for (row, src) in coverage.chunks_exact(width).take(height).enumerate() {
                for (pixel, &value) in region.row_mut(row)?.iter_mut().zip(src) {
                    *pixel = coverage_to_pixel(value);
                }
            }
            (x, y)
        };

        let info = GlyphInfo {
            x,
            y,
            width,
            height,
            offset_x,
            offset_y,
        };
        if self.record(codepoint, info).is_none() {
            self.stats.glyph_count += 1;
        }

        tracing::debug!(
            "Packed glyph {:?}: {}x{} @ {},{} (offset {},{})",
            codepoint,
            width,
            height,
            x,
            y,
            offset_x,
            offset_y
        );
        Ok(info)
    }

    /// Store `info`, returning the previous entry.
    fn record(&mut self, codepoint: char, info: GlyphInfo) -> Option<GlyphInfo> {
        if codepoint.is_ascii() {
            return self.ascii[codepoint as usize].replace(info);
        }
        self.glyphs.insert(codepoint, info)
    }

    /// Find space for a glyph, growing the canvas if the policy allows.
    fn place(&mut self, codepoint: char, width: usize, height: usize) -> RenderResult<(usize, usize)> {
        loop {
            if let Some(pos) = self.cursor.try_place(width, height, self.width(), self.height()) {
                return Ok(pos);
            }

            let (max_width, max_height) = match self.overflow {
                OverflowPolicy::Fail => (self.width(), self.height()),
                OverflowPolicy::Grow { max_width, max_height } => (max_width, max_height),
            };

            if width > max_width {
                return Err(RenderError::GlyphTooLarge {
                    codepoint,
                    width,
                    height,
                    atlas_width: max_width,
                });
            }

            if !self.grow(max_width, max_height)? {
                tracing::warn!(
                    "Atlas full ({}x{}): cannot place {}x{} glyph {:?}",
                    self.width(),
                    self.height(),
                    width,
                    height,
                    codepoint
                );
                return Err(RenderError::AtlasFull {
                    codepoint,
                    width,
                    height,
                });
            }
        }
    }

    /// Double the canvas within the given bounds, copying existing glyphs
    /// to the same coordinates. Returns false when already at the bounds.
    fn grow(&mut self, max_width: usize, max_height: usize) -> RenderResult<bool> {
        let (width, height) = self.canvas.size();
        let new_width = (width * 2).max(1).min(max_width).max(width);
        let new_height = (height * 2).max(1).min(max_height).max(height);
        if new_width == width && new_height == height {
            return Ok(false);
        }

        let mut grown = Canvas::new(new_width, new_height);
        self.canvas
            .full_view()
            .copy_to(&mut grown.view_mut(0, 0, width, height)?)?;
        self.canvas = grown;
        self.stats.grows += 1;

        tracing::warn!("Atlas grown from {}x{} to {}x{}", width, height, new_width, new_height);
        Ok(true)
    }

    /// Encode the atlas canvas as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        self.canvas.save_png(path)
    }
}
