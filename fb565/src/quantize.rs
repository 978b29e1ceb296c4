//! Conversions between [`PixelBuffer`] and the packed device formats.
//!
//! Decoding tolerates short input: pixels the input does not cover come out opaque white, which is
//! what a freshly erased framebuffer region looks like on the device.

use crate::{
    buffer::{byte_len, BYTES_PER_PIXEL},
    config::DitherConfig,
    consts::{BAYER_8X8, DITHER_G_BIAS, DITHER_G_SCALE, DITHER_RB_BIAS},
    utils::{decode_565, encode_rgb565_unchecked, rgb565_to_rgb888, rgb888_to_rgb565, ByteOrder},
    Error, PixelBuffer,
};
use itertools::{iproduct, izip};

const WHITE: [u8; 4] = [255; 4];

/// Per-channel offsets for the pixel at `(x, y)`, before scaling by the dither strength.
#[inline]
fn dither_offsets(x: usize, y: usize) -> [f32; 3] {
    let threshold = f32::from(BAYER_8X8[y % 8][x % 8]);
    let rb = threshold * 31.0 / 63.0 - DITHER_RB_BIAS;
    let g = (threshold - DITHER_G_BIAS) * DITHER_G_SCALE;

    [rb, g, rb]
}

/// Quantizes a dithered RGB888 pixel down to 5/6/5 bits.
#[inline]
fn dither_to_rgb565(rgb: [u8; 3], offsets: [f32; 3], strength: f32) -> [u8; 3] {
    let [r, g, b] = [0, 1, 2].map(|c| {
        let v = f32::from(rgb[c]) + offsets[c] * strength;
        v.clamp(0.0, 255.0) as u8
    });
    let [r, g, b] = rgb888_to_rgb565([r, g, b]);

    [r.min(31), g.min(63), b.min(31)]
}

/// Packs a buffer into 16-bit RGB565, two bytes per pixel in the byte order `B`.
///
/// The alpha channel is dropped. With dithering enabled, a position-dependent offset from
/// [`BAYER_8X8`] is added to each channel before the low bits are truncated; the result is fully
/// deterministic and the pattern repeats every 8 pixels in both directions.
pub fn to_rgb565<B: ByteOrder>(buffer: &PixelBuffer, dither: DitherConfig) -> Vec<u8> {
    let (width, height) = (buffer.width() as usize, buffer.height() as usize);
    let mut out = vec![0; width * height * 2];
    let strength = dither.strength();

    for ((y, x), px, packed) in izip!(
        iproduct!(0..height, 0..width),
        buffer.as_bytes().chunks_exact(BYTES_PER_PIXEL),
        out.chunks_exact_mut(2)
    ) {
        let rgb = [px[0], px[1], px[2]];
        let components = if dither.is_enabled() {
            dither_to_rgb565(rgb, dither_offsets(x, y), strength)
        } else {
            rgb888_to_rgb565(rgb)
        };

        B::write_u16(packed, encode_rgb565_unchecked(components));
    }

    out
}

/// Unpacks RGB565 data in the byte order `B` into an opaque buffer.
///
/// Input shorter than `2 * width * height` bytes leaves the remaining pixels white; extra input is
/// ignored.
pub fn from_rgb565<B: ByteOrder>(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> Result<PixelBuffer, Error> {
    let len = byte_len(width, height, BYTES_PER_PIXEL)?;
    let mut data = Vec::with_capacity(len);

    for packed in bytes.chunks_exact(2).take(len / BYTES_PER_PIXEL) {
        let [r, g, b] = rgb565_to_rgb888(decode_565(B::read_u16(packed)));
        data.extend_from_slice(&[r, g, b, 255]);
    }
    pad_white(&mut data, len);

    PixelBuffer::from_vec(width, height, data)
}

/// Converts a buffer to BGRA by swapping the red and blue bytes.
pub fn to_bgra(buffer: &PixelBuffer) -> Vec<u8> {
    let mut out = buffer.as_bytes().to_vec();
    out.chunks_exact_mut(BYTES_PER_PIXEL).for_each(|px| px.swap(0, 2));
    out
}

/// Converts BGRA bytes back into a buffer. The exact inverse of [`to_bgra`].
///
/// Pixels not covered by the input (including a trailing partial pixel) are white.
pub fn from_bgra(bytes: &[u8], width: u32, height: u32) -> Result<PixelBuffer, Error> {
    let len = byte_len(width, height, BYTES_PER_PIXEL)?;
    let mut data = Vec::with_capacity(len);

    for px in bytes.chunks_exact(BYTES_PER_PIXEL).take(len / BYTES_PER_PIXEL) {
        data.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
    }
    pad_white(&mut data, len);

    PixelBuffer::from_vec(width, height, data)
}

fn pad_white(data: &mut Vec<u8>, len: usize) {
    if data.len() < len {
        tracing::debug!(
            missing_pixels = (len - data.len()) / BYTES_PER_PIXEL,
            "packed input is short, padding with white"
        );
        data.extend(WHITE.iter().copied().cycle().take(len - data.len()));
    }
}
