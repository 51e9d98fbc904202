//! Canvas - an owned 2D grid of pixels.

use std::path::Path;

use crate::error::{RenderError, RenderResult};
use crate::export;
use crate::pixel::Pixel;
use crate::region::{Region, RegionMut};

/// An RGBA image stored row-major with `stride == width`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Canvas {
    /// The pixels, stored row-major.
    pixels: Vec<Pixel>,
    width: usize,
    height: usize,
}

impl Canvas {
    /// Create a transparent canvas with the given dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![Pixel::TRANSPARENT; width * height],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Canvas dimensions as `(width, height)`.
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Row stride in bytes.
    pub fn stride_bytes(&self) -> usize {
        self.width * std::mem::size_of::<Pixel>()
    }

    /// All pixels as a slice.
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Get a pixel at the given position.
    pub fn get(&self, x: usize, y: usize) -> Option<&Pixel> {
        if x < self.width && y < self.height {
            self.pixels.get(y * self.width + x)
        } else {
            None
        }
    }

    /// Mutable pixel at `y * width + x`.
    ///
    /// Only the storage length is checked; an `x` past the row end lands in
    /// the next row.
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut Pixel {
        &mut self.pixels[y * self.width + x]
    }

    /// Zero every pixel in place, keeping the dimensions.
    pub fn clear(&mut self) {
        self.pixels.fill(Pixel::TRANSPARENT);
    }

    /// Reallocate to `width x height`, discarding the previous contents.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.pixels = vec![Pixel::TRANSPARENT; width * height];
        self.width = width;
        self.height = height;
    }

    fn check_bounds(&self, x: usize, y: usize, width: usize, height: usize) -> RenderResult<()> {
        let fits_x = x.checked_add(width).is_some_and(|end| end <= self.width);
        let fits_y = y.checked_add(height).is_some_and(|end| end <= self.height);
        if fits_x && fits_y {
            Ok(())
        } else {
            Err(RenderError::RegionOutOfBounds {
                x,
                y,
                width,
                height,
                canvas_width: self.width,
                canvas_height: self.height,
            })
        }
    }

    /// Shared view over `width x height` pixels starting at `(x, y)`.
    pub fn view(&self, x: usize, y: usize, width: usize, height: usize) -> RenderResult<Region<'_>> {
        self.check_bounds(x, y, width, height)?;
        Ok(Region::new(&self.pixels, x, y, width, height, self.width))
    }

    /// Exclusive view over `width x height` pixels starting at `(x, y)`.
    pub fn view_mut(&mut self, x: usize, y: usize, width: usize, height: usize) -> RenderResult<RegionMut<'_>> {
        self.check_bounds(x, y, width, height)?;
        Ok(RegionMut::new(&mut self.pixels, x, y, width, height, self.width))
    }

    /// View over the whole canvas.
    pub fn full_view(&self) -> Region<'_> {
        Region::new(&self.pixels, 0, 0, self.width, self.height, self.width)
    }

    /// Tightly packed RGBA bytes, row-major, four bytes per pixel.
    pub fn export_pixels(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_rgba()).collect()
    }

    /// Encode the canvas as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        export::encode_png(path, self.width, self.height, self.export_pixels())
    }
}
