//! Text renderer - lays out a line of text and composites cached glyphs.
//!
//! Glyphs are rasterized lazily through the [`GlyphSource`] and packed into
//! one [`Atlas`] per font size. Loading a new font discards every atlas.

use std::collections::HashMap;
use std::path::Path;

use crate::atlas::Atlas;
use crate::canvas::Canvas;
use crate::config::RendererConfig;
use crate::error::{RenderError, RenderResult};
use crate::region::Region;
use crate::source::{FontLoader, GlyphSource, SdfParams};

/// Cache counters across all renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub cache_hits: u64,
    pub cache_misses: u64,
}

/// Pixel metrics of a laid-out line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextMetrics {
    /// Total pen advance.
    pub width: i32,
    pub ascent: i32,
    pub descent: i32,
    pub line_gap: i32,
}

impl TextMetrics {
    pub fn line_height(&self) -> i32 {
        self.ascent - self.descent + self.line_gap
    }
}

/// Atlas key for a font size. Distinct sizes never share bitmaps.
#[inline]
fn size_key(font_size: f32) -> u32 {
    font_size.to_bits()
}

/// Renders single lines of text onto an owned output canvas.
pub struct TextRenderer<S> {
    source: Option<S>,
    config: RendererConfig,
    /// Output bitmap.
    canvas: Canvas,
    /// One atlas per exact font size.
    atlases: HashMap<u32, Atlas>,
    /// Size key of the most recently used atlas.
    current: Option<u32>,
    stats: RenderStats,
}

impl<S: GlyphSource> TextRenderer<S> {
    /// Create a renderer whose atlases are `atlas_width x atlas_height`.
    pub fn new(atlas_width: usize, atlas_height: usize) -> Self {
        Self::with_config(RendererConfig {
            atlas_width,
            atlas_height,
            ..RendererConfig::default()
        })
    }

    pub fn with_config(config: RendererConfig) -> Self {
        Self {
            source: None,
            config,
            canvas: Canvas::default(),
            atlases: HashMap::new(),
            current: None,
            stats: RenderStats::default(),
        }
    }

    /// Builder-style [`set_source`](Self::set_source).
    pub fn with_source(mut self, source: S) -> Self {
        self.set_source(source);
        self
    }

    /// Replace the glyph source, discarding all cached glyphs.
    pub fn set_source(&mut self, source: S) {
        self.source = Some(source);
        self.atlases.clear();
        self.current = None;
    }

    pub fn source(&self) -> Option<&S> {
        self.source.as_ref()
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// (Re)allocate the output canvas, cleared to transparent.
    pub fn create_bitmap(&mut self, width: usize, height: usize) {
        self.canvas.resize(width, height);
    }

    /// The output canvas.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Atlas holding glyphs for `font_size`, if any were rendered.
    pub fn atlas(&self, font_size: f32) -> Option<&Atlas> {
        self.atlases.get(&size_key(font_size))
    }

    /// The most recently used atlas.
    pub fn current_atlas(&self) -> Option<&Atlas> {
        self.current.and_then(|key| self.atlases.get(&key))
    }

    /// Draw `text` on one line with its top-left pen position at `(x, y)`.
    ///
    /// Returns the pen x after the last glyph. A packing failure aborts the
    /// remaining glyphs; glyphs already drawn stay on the canvas.
    pub fn render_text(&mut self, text: &str, x: i32, y: i32, font_size: f32) -> RenderResult<i32> {
        let source = self.source.as_ref().ok_or(RenderError::FontNotLoaded)?;
        let scale = source.scale_for_pixel_height(font_size);
        let ascent = source.v_metrics().scaled(scale).ascent;

        let key = size_key(font_size);
        self.current = Some(key);
        let atlas = self
            .atlases
            .entry(key)
            .or_insert_with(|| Atlas::with_policy(self.config.atlas_width, self.config.atlas_height, self.config.overflow));

        let chars: Vec<char> = text.chars().collect();
        let mut pen_x = x;
        for (i, &c) in chars.iter().enumerate() {
            let metrics = source.h_metrics(c).scaled(scale);

            ensure_glyph(source, atlas, &mut self.stats, c, scale, &self.config.sdf)?;
            if let Some((glyph, info)) = atlas.get_glyph(c) {
                if !glyph.is_empty() {
                    let dest_x = pen_x + metrics.left_side_bearing + info.offset_x;
                    let dest_y = y + ascent + info.offset_y;
                    blend_clipped(&glyph, &mut self.canvas, dest_x, dest_y)?;
                }
            }

            pen_x = advance(source, pen_x, metrics.advance_width + metrics.left_side_bearing, scale, c, chars.get(i + 1));
        }

        Ok(pen_x)
    }

    /// Lay out `text` without drawing or touching any atlas.
    pub fn measure_text(&self, text: &str, font_size: f32) -> RenderResult<TextMetrics> {
        let source = self.source.as_ref().ok_or(RenderError::FontNotLoaded)?;
        let scale = source.scale_for_pixel_height(font_size);
        let v = source.v_metrics().scaled(scale);

        let chars: Vec<char> = text.chars().collect();
        let mut pen_x = 0;
        for (i, &c) in chars.iter().enumerate() {
            let metrics = source.h_metrics(c).scaled(scale);
            pen_x = advance(source, pen_x, metrics.advance_width + metrics.left_side_bearing, scale, c, chars.get(i + 1));
        }

        Ok(TextMetrics {
            width: pen_x,
            ascent: v.ascent,
            descent: v.descent,
            line_gap: v.line_gap,
        })
    }

    /// Rasterize and pack glyphs ahead of time. Returns how many were new.
    pub fn precache(&mut self, chars: impl IntoIterator<Item = char>, font_size: f32) -> RenderResult<usize> {
        let source = self.source.as_ref().ok_or(RenderError::FontNotLoaded)?;
        let scale = source.scale_for_pixel_height(font_size);
        let atlas = self
            .atlases
            .entry(size_key(font_size))
            .or_insert_with(|| Atlas::with_policy(self.config.atlas_width, self.config.atlas_height, self.config.overflow));

        let before = atlas.len();
        for c in chars {
            ensure_glyph(source, atlas, &mut self.stats, c, scale, &self.config.sdf)?;
        }
        Ok(atlas.len() - before)
    }

    /// Pre-cache printable ASCII.
    pub fn precache_ascii(&mut self, font_size: f32) -> RenderResult<usize> {
        self.precache((32u8..=126u8).map(|b| b as char), font_size)
    }

    /// Encode the output canvas as a PNG file.
    pub fn export_canvas(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        self.canvas.save_png(path)
    }

    /// Encode the most recently used atlas as a PNG file.
    pub fn export_atlas(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        self.current_atlas().ok_or(RenderError::NoAtlas)?.save_png(path)
    }
}

impl<S: FontLoader> TextRenderer<S> {
    /// Read a font file and make it the glyph source.
    ///
    /// On failure the previous source, if any, stays in place.
    pub fn load_font(&mut self, path: impl AsRef<Path>) -> RenderResult<()> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let size = bytes.len();
        let source = S::from_font_bytes(bytes)?;
        self.set_source(source);
        tracing::info!("Loaded font {:?} ({} bytes)", path, size);
        Ok(())
    }
}

/// Rasterize `c` into `atlas` unless it is already cached.
fn ensure_glyph<S: GlyphSource>(
    source: &S,
    atlas: &mut Atlas,
    stats: &mut RenderStats,
    c: char,
    scale: f32,
    sdf: &SdfParams,
) -> RenderResult<()> {
    if atlas.contains(c) {
        stats.cache_hits += 1;
        return Ok(());
    }

    stats.cache_misses += 1;
    tracing::debug!("Glyph cache miss for {:?}", c);
    match source.rasterize_sdf(c, scale, sdf) {
        Some(bitmap) => {
            atlas.add_glyph(c, &bitmap.coverage, bitmap.width, bitmap.height, bitmap.offset_x, bitmap.offset_y)?;
        }
        None => {
            atlas.add_glyph(c, &[], 0, 0, 0, 0)?;
        }
    }
    Ok(())
}

/// Move the pen past `c`, applying kerning against the following character.
fn advance<S: GlyphSource>(source: &S, pen_x: i32, step: i32, scale: f32, c: char, next: Option<&char>) -> i32 {
    let pen_x = pen_x + step;
    match next {
        Some(&next) => (pen_x as f32 + scale * source.kern_advance(c, next) as f32) as i32,
        None => pen_x,
    }
}

/// Blend `glyph` onto `canvas` at `(dest_x, dest_y)`, clipped to the canvas.
fn blend_clipped(glyph: &Region<'_>, canvas: &mut Canvas, dest_x: i32, dest_y: i32) -> RenderResult<()> {
    let (width, height) = glyph.size();
    let x0 = dest_x.max(0) as i64;
    let y0 = dest_y.max(0) as i64;
    let x1 = (dest_x as i64 + width as i64).min(canvas.width() as i64);
    let y1 = (dest_y as i64 + height as i64).min(canvas.height() as i64);
    if x1 <= x0 || y1 <= y0 {
        tracing::trace!("Glyph at ({}, {}) falls outside the canvas", dest_x, dest_y);
        return Ok(());
    }

    let (w, h) = ((x1 - x0) as usize, (y1 - y0) as usize);
    let src = glyph.sub_region((x0 - dest_x as i64) as usize, (y0 - dest_y as i64) as usize, w, h)?;
    let mut dst = canvas.view_mut(x0 as usize, y0 as usize, w, h)?;
    src.blend_to(&mut dst)
}
