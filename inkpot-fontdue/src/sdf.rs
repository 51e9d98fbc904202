//! Signed distance fields from anti-aliased coverage bitmaps.
//!
//! Each coverage pixel is treated as a sample of an edge lying somewhere
//! inside it: a pixel with coverage `c` puts the edge `0.5 - c / 255`
//! pixels from its center, measured away from the ink. Distances are found
//! by brute force within `padding + 1` pixels, which is plenty for the small
//! paddings glyph atlases use.

use inkpot::SdfParams;

/// Coverage at `(x, y)` in padded coordinates; zero outside the source.
#[inline]
fn coverage_at(coverage: &[u8], width: usize, height: usize, pad: usize, x: usize, y: usize) -> u8 {
    if x < pad || y < pad {
        return 0;
    }
    let (sx, sy) = (x - pad, y - pad);
    if sx >= width || sy >= height {
        return 0;
    }
    coverage.get(sy * width + sx).copied().unwrap_or(0)
}

#[inline]
fn edge_offset(c: u8) -> f32 {
    0.5 - c as f32 / 255.0
}

/// Build a padded SDF from a `width x height` coverage bitmap.
///
/// The result is `(width + 2 * padding) x (height + 2 * padding)`, row-major.
/// Values equal `on_edge_value` on the outline, grow inside it and fall off
/// by `pixel_dist_scale` per pixel outside.
pub fn coverage_to_sdf(coverage: &[u8], width: usize, height: usize, params: &SdfParams) -> (Vec<u8>, usize, usize) {
    let pad = params.padding as usize;
    let out_w = width + 2 * pad;
    let out_h = height + 2 * pad;
    let radius = pad + 1;
    let mut out = vec![0u8; out_w * out_h];

    for y in 0..out_h {
        for x in 0..out_w {
            let inside = coverage_at(coverage, width, height, pad, x, y) >= 128;
            let mut best = radius as f32;

            for qy in y.saturating_sub(radius)..(y + radius + 1).min(out_h) {
                for qx in x.saturating_sub(radius)..(x + radius + 1).min(out_w) {
                    let c = coverage_at(coverage, width, height, pad, qx, qy);
                    let dx = qx as f32 - x as f32;
                    let dy = qy as f32 - y as f32;
                    let dist = (dx * dx + dy * dy).sqrt();
                    let candidate = if inside {
                        if c == 255 {
                            continue;
                        }
                        dist - edge_offset(c)
                    } else {
                        if c == 0 {
                            continue;
                        }
                        dist + edge_offset(c)
                    };
                    best = best.min(candidate);
                }
            }

            let signed = if inside { -best } else { best };
            let value = params.on_edge_value as f32 - params.pixel_dist_scale * signed;
            out[y * out_w + x] = value.round().clamp(0.0, 255.0) as u8;
        }
    }

    (out, out_w, out_h)
}
