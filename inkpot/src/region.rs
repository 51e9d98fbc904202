//! Rectangular views into a [`Canvas`](crate::Canvas).
//!
//! A region borrows its canvas, so the canvas cannot be resized or cleared
//! while a region into it is alive. [`Region`] is a shared, `Copy` view;
//! [`RegionMut`] is the exclusive view used as a write target.

use std::fmt;

use crate::error::{RenderError, RenderResult};
use crate::pixel::Pixel;

/// Shared view over a rectangle of canvas pixels.
///
/// Copying a `Region` copies the view (origin, extent, stride), never the
/// pixel data.
#[derive(Clone, Copy, Default)]
pub struct Region<'a> {
    /// Canvas storage starting at the region's top-left cell.
    pixels: &'a [Pixel],
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    stride: usize,
}

/// Exclusive view over a rectangle of canvas pixels.
pub struct RegionMut<'a> {
    pixels: &'a mut [Pixel],
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    stride: usize,
}

/// Range of `storage` covered by a `width x height` rectangle at `(x, y)`.
fn span(x: usize, y: usize, width: usize, height: usize, stride: usize) -> std::ops::Range<usize> {
    if width == 0 || height == 0 {
        return 0..0;
    }
    let start = y * stride + x;
    start..start + (height - 1) * stride + width
}

fn out_of_range(row: usize, col: usize, width: usize, height: usize) -> RenderError {
    RenderError::IndexOutOfRange {
        row,
        col,
        width,
        height,
    }
}

/// First cell of a `width x height` source that `dst` cannot hold.
fn check_fits(width: usize, height: usize, dst: &RegionMut<'_>) -> RenderResult<()> {
    if width == 0 || height == 0 {
        return Ok(());
    }
    if dst.width < width {
        return Err(out_of_range(0, dst.width, dst.width, dst.height));
    }
    if dst.height < height {
        return Err(out_of_range(dst.height, 0, dst.width, dst.height));
    }
    Ok(())
}

impl<'a> Region<'a> {
    /// Build a view over `storage`, a whole canvas with the given stride.
    ///
    /// The rectangle must already be validated against the canvas.
    pub(crate) fn new(
        storage: &'a [Pixel],
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        stride: usize,
    ) -> Self {
        Self {
            pixels: &storage[span(x, y, width, height, stride)],
            x,
            y,
            width,
            height,
            stride,
        }
    }

    /// An empty region, used for zero-area glyphs.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Origin of the region within its canvas.
    pub fn origin(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    /// Region extent as `(width, height)`.
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Read the pixel at `(row, col)`, relative to the region origin.
    pub fn get(&self, row: usize, col: usize) -> RenderResult<Pixel> {
        if row >= self.height || col >= self.width {
            return Err(out_of_range(row, col, self.width, self.height));
        }
        Ok(self.pixels[row * self.stride + col])
    }

    /// One row of the region as a contiguous slice.
    pub fn row(&self, row: usize) -> RenderResult<&'a [Pixel]> {
        if row >= self.height {
            return Err(out_of_range(row, 0, self.width, self.height));
        }
        let start = row * self.stride;
        Ok(&self.pixels[start..start + self.width])
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &'a [Pixel]> + use<'a> {
        let (pixels, stride, width) = (self.pixels, self.stride, self.width);
        (0..self.height).map(move |row| &pixels[row * stride..row * stride + width])
    }

    /// A nested view, with `(x, y)` relative to this region's origin.
    pub fn sub_region(&self, x: usize, y: usize, width: usize, height: usize) -> RenderResult<Region<'a>> {
        let fits_x = x.checked_add(width).is_some_and(|end| end <= self.width);
        let fits_y = y.checked_add(height).is_some_and(|end| end <= self.height);
        if !fits_x || !fits_y {
            return Err(RenderError::RegionOutOfBounds {
                x,
                y,
                width,
                height,
                canvas_width: self.width,
                canvas_height: self.height,
            });
        }
        Ok(Region {
            pixels: &self.pixels[span(x, y, width, height, self.stride)],
            x: self.x + x,
            y: self.y + y,
            width,
            height,
            stride: self.stride,
        })
    }

    /// Overwrite the matching cells of `dst` with this region's pixels.
    pub fn copy_to(&self, dst: &mut RegionMut<'_>) -> RenderResult<()> {
        check_fits(self.width, self.height, dst)?;
        for (row, src) in self.rows().enumerate() {
            dst.row_mut(row)?[..self.width].copy_from_slice(src);
        }
        Ok(())
    }

    /// Blend this region over the matching cells of `dst`.
    pub fn blend_to(&self, dst: &mut RegionMut<'_>) -> RenderResult<()> {
        check_fits(self.width, self.height, dst)?;
        for (row, src) in self.rows().enumerate() {
            for (bg, fg) in dst.row_mut(row)?.iter_mut().zip(src) {
                bg.blend(fg);
            }
        }
        Ok(())
    }
}

impl<'a> RegionMut<'a> {
    pub(crate) fn new(
        storage: &'a mut [Pixel],
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        stride: usize,
    ) -> Self {
        Self {
            pixels: &mut storage[span(x, y, width, height, stride)],
            x,
            y,
            width,
            height,
            stride,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn origin(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reborrow as a shared view.
    pub fn as_region(&self) -> Region<'_> {
        Region {
            pixels: &*self.pixels,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            stride: self.stride,
        }
    }

    pub fn get(&self, row: usize, col: usize) -> RenderResult<Pixel> {
        self.as_region().get(row, col)
    }

    /// Mutable access to the pixel at `(row, col)`.
    pub fn get_mut(&mut self, row: usize, col: usize) -> RenderResult<&mut Pixel> {
        if row >= self.height || col >= self.width {
            return Err(out_of_range(row, col, self.width, self.height));
        }
        Ok(&mut self.pixels[row * self.stride + col])
    }

    pub fn set(&mut self, row: usize, col: usize, pixel: Pixel) -> RenderResult<()> {
        *self.get_mut(row, col)? = pixel;
        Ok(())
    }

    pub fn row_mut(&mut self, row: usize) -> RenderResult<&mut [Pixel]> {
        if row >= self.height {
            return Err(out_of_range(row, 0, self.width, self.height));
        }
        let start = row * self.stride;
        Ok(&mut self.pixels[start..start + self.width])
    }

    /// Set every cell of the region to `pixel`.
    pub fn fill(&mut self, pixel: Pixel) {
        for row in 0..self.height {
            let start = row * self.stride;
            self.pixels[start..start + self.width].fill(pixel);
        }
    }
}

impl fmt::Debug for Region<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Region")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .finish()
    }
}

impl fmt::Debug for RegionMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegionMut")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .finish()
    }
}
