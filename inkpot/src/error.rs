//! Error types for the text renderer.

use thiserror::Error;

/// Errors that can occur while packing, compositing or exporting glyphs.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Cell access outside a region's declared extent.
    #[error("index ({row}, {col}) out of range for {width}x{height} region")]
    IndexOutOfRange {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },

    /// A region that does not fit inside its backing canvas.
    #[error(
        "region {width}x{height} at ({x}, {y}) exceeds {canvas_width}x{canvas_height} canvas"
    )]
    RegionOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        canvas_width: usize,
        canvas_height: usize,
    },

    /// The font file could not be parsed.
    #[error("failed to load font: {0}")]
    FontLoad(String),

    /// Rendering was requested before a font was loaded.
    #[error("no font loaded")]
    FontNotLoaded,

    /// No shelf space left for a glyph.
    #[error("atlas full: no room for {width}x{height} glyph {codepoint:?}")]
    AtlasFull {
        codepoint: char,
        width: usize,
        height: usize,
    },

    /// A single glyph is wider than the whole atlas.
    #[error("glyph {codepoint:?} ({width}x{height}) is wider than the {atlas_width}px atlas")]
    GlyphTooLarge {
        codepoint: char,
        width: usize,
        height: usize,
        atlas_width: usize,
    },

    /// A glyph bitmap with fewer bytes than its declared extent.
    #[error("glyph {codepoint:?}: {width}x{height} bitmap has only {len} coverage bytes")]
    CoverageTooShort {
        codepoint: char,
        width: usize,
        height: usize,
        len: usize,
    },

    /// Export was requested before any atlas was populated.
    #[error("no atlas has been populated yet")]
    NoAtlas,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image export error: {0}")]
    Export(#[from] image::ImageError),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
