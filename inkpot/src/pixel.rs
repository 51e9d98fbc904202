//! RGBA pixel value.

/// A single 8-bit RGBA pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    pub const TRANSPARENT: Pixel = Pixel::new(0, 0, 0, 0);
    pub const WHITE: Pixel = Pixel::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Blend `fg` over this pixel in place.
    ///
    /// Every channel, alpha included, is mixed with the foreground alpha as
    /// the weight: `(bg * (255 - a) + fg * a) / 255`.
    pub fn blend(&mut self, fg: &Pixel) {
        let alpha = fg.a as u32;
        let inv_alpha = 255 - alpha;
        let mix = |bg: u8, fg: u8| ((bg as u32 * inv_alpha + fg as u32 * alpha) / 255) as u8;

        self.r = mix(self.r, fg.r);
        self.g = mix(self.g, fg.g);
        self.b = mix(self.b, fg.b);
        self.a = mix(self.a, fg.a);
    }

    /// Return `fg` blended over `self` without mutating either.
    pub fn blended(mut self, fg: &Pixel) -> Self {
        self.blend(fg);
        self
    }

    /// Linear interpolation between two pixels, truncating each channel.
    pub fn lerp(a: &Pixel, b: &Pixel, t: f32) -> Pixel {
        let mix = |a: u8, b: u8| (a as f32 * (1.0 - t) + b as f32 * t) as u8;
        Pixel {
            r: mix(a.r, b.r),
            g: mix(a.g, b.g),
            b: mix(a.b, b.b),
            a: mix(a.a, b.a),
        }
    }

    /// Channels as `[r, g, b, a]` bytes.
    #[inline]
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

impl From<[u8; 4]> for Pixel {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}
