//! Integration tests for text rendering through the glyph atlas.
//!
//! These tests drive `TextRenderer` with a deterministic monospace glyph
//! source so that every placement can be computed by hand:
//!
//! - 1024 font units from descent to ascent, so 16px gives a scale of 1/64
//! - advance 640 (10px), left side bearing 64 (1px), ascent 768 (12px)
//! - every glyph except space is a solid 6x10 box offset by (-1, -10)
//! - the only kerning pair is ('A', 'B') at -64 units (-1px)

use std::cell::RefCell;

use inkpot::{
    FontLoader, GlyphSource, HMetrics, OverflowPolicy, Pixel, RenderError, RenderResult, RendererConfig, SdfBitmap,
    SdfParams, TextRenderer, VMetrics,
};

const GLYPH_W: usize = 6;
const GLYPH_H: usize = 10;

/// Monospace glyph source that records every rasterization request.
#[derive(Default)]
struct MonoSource {
    rasterized: RefCell<Vec<(char, f32)>>,
    last_params: RefCell<Option<SdfParams>>,
}

impl MonoSource {
    fn rasterized(&self) -> Vec<char> {
        self.rasterized.borrow().iter().map(|(c, _)| *c).collect()
    }
}

impl GlyphSource for MonoSource {
    fn scale_for_pixel_height(&self, pixel_height: f32) -> f32 {
        let v = self.v_metrics();
        pixel_height / (v.ascent - v.descent) as f32
    }

    fn v_metrics(&self) -> VMetrics {
        VMetrics {
            ascent: 768,
            descent: -256,
            line_gap: 0,
        }
    }

    fn h_metrics(&self, _codepoint: char) -> HMetrics {
        HMetrics {
            advance_width: 640,
            left_side_bearing: 64,
        }
    }

    fn kern_advance(&self, left: char, right: char) -> i32 {
        if (left, right) == ('A', 'B') { -64 } else { 0 }
    }

    fn rasterize_sdf(&self, codepoint: char, scale: f32, params: &SdfParams) -> Option<SdfBitmap> {
        self.rasterized.borrow_mut().push((codepoint, scale));
        *self.last_params.borrow_mut() = Some(*params);
        if codepoint.is_whitespace() {
            return None;
        }
        Some(SdfBitmap {
            coverage: vec![255; GLYPH_W * GLYPH_H],
            width: GLYPH_W,
            height: GLYPH_H,
            offset_x: -1,
            offset_y: -10,
        })
    }
}

impl FontLoader for MonoSource {
    fn from_font_bytes(bytes: Vec<u8>) -> RenderResult<Self> {
        if bytes.starts_with(b"MONO") {
            Ok(MonoSource::default())
        } else {
            Err(RenderError::FontLoad("missing MONO header".to_string()))
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Test harness owning a renderer over `MonoSource`.
struct RenderTest {
    renderer: TextRenderer<MonoSource>,
}

impl RenderTest {
    fn new(atlas_width: usize, atlas_height: usize) -> Self {
        Self::with_config(RendererConfig {
            atlas_width,
            atlas_height,
            ..RendererConfig::default()
        })
    }

    fn with_config(config: RendererConfig) -> Self {
        init_tracing();
        let mut renderer = TextRenderer::with_config(config).with_source(MonoSource::default());
        renderer.create_bitmap(512, 128);
        Self { renderer }
    }

    fn render(&mut self, text: &str, x: i32, y: i32) -> i32 {
        let result = self.renderer.render_text(text, x, y, 16.0);
        assert!(result.is_ok(), "render of {:?} failed: {:?}", text, result.err());
        result.unwrap()
    }

    fn rasterized(&self) -> Vec<char> {
        self.renderer.source().expect("source loaded").rasterized()
    }

    /// Coordinates of every pixel with non-zero alpha.
    fn painted(&self) -> Vec<(usize, usize)> {
        let canvas = self.renderer.canvas();
        let mut out = Vec::new();
        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                if !canvas.get(x, y).unwrap().is_transparent() {
                    out.push((x, y));
                }
            }
        }
        out
    }

    /// Assert that the canvas is opaque white exactly inside the given boxes.
    fn expect_boxes(&self, boxes: &[(usize, usize)]) {
        let inside = |x: usize, y: usize| {
            boxes
                .iter()
                .any(|&(bx, by)| (bx..bx + GLYPH_W).contains(&x) && (by..by + GLYPH_H).contains(&y))
        };
        for (x, y) in self.painted() {
            assert!(inside(x, y), "unexpected pixel at ({}, {})", x, y);
        }
        for &(bx, by) in boxes {
            for y in by..by + GLYPH_H {
                for x in bx..bx + GLYPH_W {
                    assert_eq!(self.renderer.canvas().get(x, y), Some(&Pixel::WHITE), "at ({}, {})", x, y);
                }
            }
        }
    }
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn test_render_ab() {
    let mut t = RenderTest::new(512, 512);
    let pen = t.render("AB", 8, 8);

    let atlas = t.renderer.atlas(16.0).expect("atlas for 16px");
    assert_eq!(atlas.len(), 2);
    let a = atlas.glyph_info('A').unwrap();
    assert_eq!((a.x, a.y, a.width, a.height), (0, 0, GLYPH_W, GLYPH_H));
    let b = atlas.glyph_info('B').unwrap();
    assert_eq!((b.x, b.y), (GLYPH_W, 0));

    // 'A': 8 + lsb 1 + offset -1 = 8; y: 8 + ascent 12 + offset -10 = 10.
    // Pen: 8 + 10 + 1 = 19, kerned by -1 to 18; 'B' lands at 18.
    t.expect_boxes(&[(8, 10), (18, 10)]);
    assert_eq!(pen, 29);
}

#[test]
fn test_kerning_uses_next_character() {
    let mut t = RenderTest::new(512, 512);
    // Only the pair at index 1 -> 2 is ('A', 'B').
    let pen = t.render("AAB", 0, 0);
    assert_eq!(pen, 32);

    let metrics = t.renderer.measure_text("AAB", 16.0).unwrap();
    assert_eq!(metrics.width, 32);
}

#[test]
fn test_space_advances_without_drawing() {
    let mut t = RenderTest::new(512, 512);
    t.render("A A", 8, 8);

    let atlas = t.renderer.atlas(16.0).unwrap();
    assert_eq!(atlas.len(), 2);
    let (region, info) = atlas.get_glyph(' ').unwrap();
    assert!(region.is_empty());
    assert!(info.is_empty());

    // Two 11px steps for 'A' and ' '.
    t.expect_boxes(&[(8, 10), (30, 10)]);
}

#[test]
fn test_glyphs_clip_to_canvas() {
    let mut t = RenderTest::new(512, 512);
    t.renderer.create_bitmap(16, 16);
    t.render("A", -4, -6);
    t.render("B", 12, 8);

    let painted = t.painted();
    assert!(painted.contains(&(0, 0)));
    assert!(painted.contains(&(15, 15)));
    // 'A' box spans x -4..2, y -4..6; 'B' spans x 12..18, y 10..20.
    for (x, y) in painted {
        assert!((x < 2 && y < 6) || (x >= 12 && y >= 10), "unexpected pixel at ({}, {})", x, y);
    }
}

#[test]
fn test_measure_text() {
    let t = RenderTest::new(512, 512);
    let metrics = t.renderer.measure_text("AB", 16.0).unwrap();
    assert_eq!(metrics.width, 21);
    assert_eq!(metrics.ascent, 12);
    assert_eq!(metrics.descent, -4);
    assert_eq!(metrics.line_height(), 16);
    assert!(t.rasterized().is_empty());
}

// ============================================================================
// Caching
// ============================================================================

#[test]
fn test_rasterize_once_per_codepoint() {
    let mut t = RenderTest::new(512, 512);
    t.render("ABBA", 0, 0);
    t.render("BAB", 0, 40);
    t.render("AAA", 0, 80);

    assert_eq!(t.rasterized(), vec!['A', 'B']);
    assert_eq!(t.renderer.atlas(16.0).unwrap().len(), 2);

    let stats = t.renderer.stats();
    assert_eq!(stats.cache_misses, 2);
    assert_eq!(stats.cache_hits, 8);
}

#[test]
fn test_default_sdf_params_reach_source() {
    let mut t = RenderTest::new(512, 512);
    t.render("A", 0, 0);
    let params = (*t.renderer.source().unwrap().last_params.borrow()).expect("params recorded");
    assert_eq!(params, SdfParams::default());
    assert_eq!(params.padding, 5);
}

#[test]
fn test_atlas_per_font_size() {
    let mut t = RenderTest::new(512, 512);
    t.render("A", 0, 0);
    t.renderer.render_text("A", 0, 40, 32.0).unwrap();

    assert_eq!(t.rasterized(), vec!['A', 'A']);
    assert_eq!(t.renderer.atlas(16.0).unwrap().len(), 1);
    assert_eq!(t.renderer.atlas(32.0).unwrap().len(), 1);
    assert!(t.renderer.atlas(24.0).is_none());
}

#[test]
fn test_fractional_sizes_do_not_share_glyphs() {
    let mut t = RenderTest::new(512, 512);
    t.render("A", 0, 0);
    t.renderer.render_text("A", 0, 40, 16.2).unwrap();

    let scales: Vec<f32> = t.renderer.source().unwrap().rasterized.borrow().iter().map(|&(_, s)| s).collect();
    assert_eq!(scales.len(), 2);
    assert_eq!(scales[0], 16.0 / 1024.0);
    assert_eq!(scales[1], 16.2 / 1024.0);
    assert_eq!(t.renderer.atlas(16.0).unwrap().len(), 1);
    assert_eq!(t.renderer.atlas(16.2).unwrap().len(), 1);
    assert!(t.renderer.atlas(16.1).is_none());
}

#[test]
fn test_precache_ascii() {
    let mut t = RenderTest::new(512, 512);
    let added = t.renderer.precache_ascii(16.0).unwrap();
    assert_eq!(added, 95);
    let before = t.rasterized().len();
    t.render("Hello, World!", 0, 0);
    assert_eq!(t.rasterized().len(), before);
}

// ============================================================================
// Overflow
// ============================================================================

#[test]
fn test_atlas_full_aborts_render() {
    let mut t = RenderTest::new(2 * GLYPH_W, GLYPH_H);
    let result = t.renderer.render_text("ABC", 8, 8, 16.0);
    assert!(matches!(result, Err(RenderError::AtlasFull { codepoint: 'C', .. })));

    // 'A' and 'B' were drawn before the failure; nothing after it.
    t.expect_boxes(&[(8, 10), (18, 10)]);
    assert!(!t.renderer.atlas(16.0).unwrap().contains('C'));
}

#[test]
fn test_grow_policy_keeps_rendering() {
    let mut t = RenderTest::with_config(RendererConfig {
        atlas_width: 2 * GLYPH_W,
        atlas_height: GLYPH_H,
        overflow: OverflowPolicy::grow(),
        ..RendererConfig::default()
    });
    t.render("ABC", 8, 8);

    let atlas = t.renderer.atlas(16.0).unwrap();
    assert_eq!(atlas.len(), 3);
    assert_eq!(atlas.stats().grows, 1);
    assert_eq!(atlas.glyph_info('A').unwrap().x, 0);
    assert_eq!(atlas.glyph_info('C').unwrap().x, 2 * GLYPH_W);
}

// ============================================================================
// Font loading and export
// ============================================================================

#[test]
fn test_render_without_font_fails() {
    let mut renderer = TextRenderer::<MonoSource>::new(64, 64);
    renderer.create_bitmap(8, 8);
    assert!(matches!(renderer.render_text("A", 0, 0, 16.0), Err(RenderError::FontNotLoaded)));
    assert!(matches!(renderer.measure_text("A", 16.0), Err(RenderError::FontNotLoaded)));
}

#[test]
fn test_load_font() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("mono.font");
    let bad = dir.path().join("bad.font");
    std::fs::write(&good, b"MONO font data").unwrap();
    std::fs::write(&bad, b"garbage").unwrap();

    let mut renderer = TextRenderer::<MonoSource>::new(64, 64);
    assert!(matches!(renderer.load_font(dir.path().join("missing.font")), Err(RenderError::Io(_))));
    assert!(matches!(renderer.load_font(&bad), Err(RenderError::FontLoad(_))));
    assert!(renderer.source().is_none());

    renderer.load_font(&good).unwrap();
    renderer.create_bitmap(32, 32);
    renderer.render_text("A", 0, 0, 16.0).unwrap();
    assert_eq!(renderer.atlas(16.0).unwrap().len(), 1);

    // A new font invalidates every cached glyph.
    renderer.load_font(&good).unwrap();
    assert!(renderer.atlas(16.0).is_none());
}

#[test]
fn test_export_canvas_and_atlas() {
    let dir = tempfile::tempdir().unwrap();
    let mut t = RenderTest::new(64, 32);
    assert!(matches!(
        t.renderer.export_atlas(dir.path().join("atlas.png")),
        Err(RenderError::NoAtlas)
    ));

    t.render("AB", 8, 8);
    let canvas_path = dir.path().join("output.png");
    let atlas_path = dir.path().join("atlas.png");
    t.renderer.export_canvas(&canvas_path).unwrap();
    t.renderer.export_atlas(&atlas_path).unwrap();

    let output = image::open(&canvas_path).unwrap().to_rgba8();
    assert_eq!(output.dimensions(), (512, 128));
    assert_eq!(output.get_pixel(8, 10).0, [255, 255, 255, 255]);
    assert_eq!(output.get_pixel(0, 0).0, [0, 0, 0, 0]);

    let atlas = image::open(&atlas_path).unwrap().to_rgba8();
    assert_eq!(atlas.dimensions(), (64, 32));
    assert_eq!(atlas.into_raw(), t.renderer.atlas(16.0).unwrap().canvas().export_pixels());
}
