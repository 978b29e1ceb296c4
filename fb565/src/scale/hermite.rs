//! Hermite downscaling.
//!
//! Every output pixel is a weighted average over the source pixels its area covers ("chunk"),
//! with weights falling off as `2w³ - 3w² + 1` over the normalized distance `w` from the chunk
//! center. Color weights are additionally scaled by source alpha so transparent pixels do not
//! bleed their color into opaque neighbours.

use super::halve::halve_to_target;
use crate::{
    buffer::BYTES_PER_PIXEL, consts::HERMITE_ALPHA_DIVISOR, utils::clamp_u8, Error, PixelBuffer,
    SizeOverflowSnafu,
};
use snafu::OptionExt;

/// Source span covered by one output coordinate along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Chunk {
    start: usize,
    end: usize,
    center: f32,
}

fn chunks(src_len: u32, dst_len: u32) -> Vec<Chunk> {
    let ratio = src_len as f32 / dst_len as f32;

    (0..dst_len)
        .map(|d| {
            let d = d as f32;
            Chunk {
                start: (d * ratio).floor() as usize,
                end: (((d + 1.0) * ratio).ceil() as usize).min(src_len as usize),
                center: (d + 0.5) * ratio,
            }
        })
        .collect()
}

#[inline]
fn hermite_weight(w: f32) -> f32 {
    2.0 * w * w * w - 3.0 * w * w + 1.0
}

/// Downscales `input` to `width` x `height`.
///
/// The source is first brought to exactly twice the target size with [`halve_to_target`], so the
/// convolution always sees a 2x2 neighbourhood per output pixel no matter how large (or how
/// small) the source image was.
pub(crate) fn downscale(input: &PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer, Error> {
    let pre_width = width
        .checked_mul(2)
        .context(SizeOverflowSnafu { width, height })?;
    let pre_height = height
        .checked_mul(2)
        .context(SizeOverflowSnafu { width, height })?;

    let source = halve_to_target(input, pre_width, pre_height)?;
    convolve(&source, width, height)
}

fn convolve(source: &PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer, Error> {
    let (src_w, src_h) = source.dimensions();
    let half_x = (src_w as f32 / width as f32 / 2.0).ceil();
    let half_y = (src_h as f32 / height as f32 / 2.0).ceil();

    let xs = chunks(src_w, width);
    let ys = chunks(src_h, height);
    let src = source.as_bytes();

    PixelBuffer::from_rows(width, height, |y, row| {
        let cy = ys[y];

        for (cx, px) in xs.iter().zip(row.chunks_exact_mut(BYTES_PER_PIXEL)) {
            let mut rgb = [0.0f32; 3];
            let mut alpha = 0.0f32;
            let mut weights = 0.0f32;
            let mut weights_alpha = 0.0f32;

            for sy in cy.start..cy.end {
                let dy = (cy.center - (sy as f32 + 0.5)).abs() / half_y;

                for sx in cx.start..cx.end {
                    let dx = (cx.center - (sx as f32 + 0.5)).abs() / half_x;
                    let w = (dy * dy + dx * dx).sqrt();
                    if w >= 1.0 {
                        continue;
                    }

                    let i = source.index(sx, sy);
                    let a = src[i + 3];
                    let mut weight = hermite_weight(w);

                    alpha += weight * f32::from(a);
                    weights_alpha += weight;

                    if a < 255 {
                        weight *= f32::from(a) / HERMITE_ALPHA_DIVISOR;
                    }
                    for (c, acc) in rgb.iter_mut().enumerate() {
                        *acc += weight * f32::from(src[i + c]);
                    }
                    weights += weight;
                }
            }

            // A chunk whose sources are all fully transparent has no color weight at all.
            for (out, acc) in px.iter_mut().zip(rgb) {
                *out = if weights > 0.0 {
                    clamp_u8(acc / weights)
                } else {
                    0
                };
            }
            px[3] = if weights_alpha > 0.0 {
                clamp_u8(alpha / weights_alpha)
            } else {
                0
            };
        }
    })
}
