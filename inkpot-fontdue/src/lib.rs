//! fontdue-backed glyph source for inkpot.
//!
//! Parses TrueType/OpenType fonts with fontdue, reports metrics in font
//! units and turns fontdue's coverage bitmaps into padded signed distance
//! fields.

mod sdf;

use fontdue::{Font, FontSettings};
use inkpot::{FontLoader, GlyphSource, HMetrics, RenderError, RenderResult, SdfBitmap, SdfParams, VMetrics};

pub use sdf::coverage_to_sdf;

/// A parsed font used as an inkpot [`GlyphSource`].
pub struct FontdueSource {
    font: Font,
    units_per_em: f32,
    v_metrics: VMetrics,
}

impl FontdueSource {
    /// Parse font file bytes.
    pub fn from_bytes(bytes: &[u8]) -> RenderResult<Self> {
        let font = Font::from_bytes(bytes, FontSettings::default()).map_err(|e| RenderError::FontLoad(e.to_string()))?;
        let units_per_em = font.units_per_em();
        let line = font
            .horizontal_line_metrics(units_per_em)
            .ok_or_else(|| RenderError::FontLoad("font has no horizontal line metrics".to_string()))?;

        let v_metrics = VMetrics {
            ascent: line.ascent.round() as i32,
            descent: line.descent.round() as i32,
            line_gap: line.line_gap.round() as i32,
        };
        tracing::debug!(
            "Parsed font: {} glyphs, {} units/em, ascent {}, descent {}",
            font.glyph_count(),
            units_per_em,
            v_metrics.ascent,
            v_metrics.descent
        );

        Ok(Self {
            font,
            units_per_em,
            v_metrics,
        })
    }

    pub fn units_per_em(&self) -> f32 {
        self.units_per_em
    }
}

impl GlyphSource for FontdueSource {
    fn scale_for_pixel_height(&self, pixel_height: f32) -> f32 {
        let extent = self.v_metrics.ascent - self.v_metrics.descent;
        if extent <= 0 {
            return 0.0;
        }
        pixel_height / extent as f32
    }

    fn v_metrics(&self) -> VMetrics {
        self.v_metrics
    }

    fn h_metrics(&self, codepoint: char) -> HMetrics {
        let metrics = self.font.metrics(codepoint, self.units_per_em);
        HMetrics {
            advance_width: metrics.advance_width.round() as i32,
            left_side_bearing: metrics.bounds.xmin.round() as i32,
        }
    }

    fn kern_advance(&self, left: char, right: char) -> i32 {
        self.font
            .horizontal_kern(left, right, self.units_per_em)
            .map(|k| k.round() as i32)
            .unwrap_or(0)
    }

    fn rasterize_sdf(&self, codepoint: char, scale: f32, params: &SdfParams) -> Option<SdfBitmap> {
        let (metrics, coverage) = self.font.rasterize(codepoint, scale * self.units_per_em);
        if metrics.width == 0 || metrics.height == 0 {
            return None;
        }

        let (sdf, width, height) = coverage_to_sdf(&coverage, metrics.width, metrics.height, params);
        let pad = params.padding as i32;
        Some(SdfBitmap {
            coverage: sdf,
            width,
            height,
            offset_x: metrics.xmin - pad,
            // fontdue's ymin is the bitmap bottom above the baseline.
            offset_y: -(metrics.ymin + metrics.height as i32) - pad,
        })
    }
}

impl FontLoader for FontdueSource {
    fn from_font_bytes(bytes: Vec<u8>) -> RenderResult<Self> {
        Self::from_bytes(&bytes)
    }
}
