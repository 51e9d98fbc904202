//! Inkpot - CPU text rendering through a shared glyph atlas.
//!
//! This crate contains:
//! - Pixel, canvas and region primitives (row-major RGBA8)
//! - A shelf-packed glyph atlas with SDF edge styling
//! - A single-line text renderer driven by a pluggable glyph source
//! - PNG export of the rendered canvas and the atlas

pub mod atlas;
pub mod config;
pub mod constants;
pub mod export;
pub mod renderer;
pub mod source;

mod canvas;
mod error;
mod pixel;
mod region;

pub use atlas::{Atlas, AtlasStats, GlyphInfo, ShelfCursor};
pub use canvas::Canvas;
pub use config::{OverflowPolicy, RendererConfig};
pub use error::{RenderError, RenderResult};
pub use pixel::Pixel;
pub use region::{Region, RegionMut};
pub use renderer::{RenderStats, TextMetrics, TextRenderer};
pub use source::{FontLoader, GlyphSource, HMetrics, SdfBitmap, SdfParams, VMetrics};
